use anyhow::{Context, Result};
use log::{debug, warn};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

/// One JSON document holding a whole collection.
///
/// Reads are forgiving: a missing or corrupt file yields `T::default()`.
/// Writes replace the file atomically through a sibling temp file.
pub struct JsonFile<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T> JsonFile<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            _marker: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load the collection, starting clean when the file is absent or unreadable.
    pub fn load(&self) -> T {
        match self.read_json_opt() {
            Ok(Some(data)) => data,
            Ok(None) => T::default(),
            Err(e) => {
                warn!(
                    "Treating {} as empty: {:#}",
                    self.path.display(),
                    e
                );
                T::default()
            }
        }
    }

    /// Write the full collection to a temp file and rename it over the target.
    pub fn save(&self, data: &T) -> Result<()> {
        self.ensure_parent_dir()?;

        let json = serde_json::to_string_pretty(data).context("Failed to serialize data")?;
        let tmp_path = self.build_tmp_path();

        fs::write(&tmp_path, json)
            .with_context(|| format!("Failed to write {}", tmp_path.display()))?;
        fs::rename(&tmp_path, &self.path)
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;

        debug!("Saved {}", self.path.display());
        Ok(())
    }

    /// Read-modify-write against the current on-disk state.
    ///
    /// `mutate` returns its result plus a flag telling whether the collection
    /// changed; the file is only rewritten when it did.
    pub fn modify<R, F>(&self, mutate: F) -> Result<(T, R)>
    where
        F: FnOnce(&mut T) -> (R, bool),
    {
        let mut data = self.load();
        let (result, changed) = mutate(&mut data);
        if changed {
            self.save(&data)?;
        }
        Ok((data, result))
    }

    // --- Helper Methods ---

    fn build_tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn ensure_parent_dir(&self) -> Result<()> {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create directory {}", dir.display())),
            _ => Ok(()),
        }
    }

    fn read_json_opt(&self) -> Result<Option<T>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        let data = serde_json::from_str(&json).with_context(|| {
            format!(
                "Failed to parse JSON from {:?}. First 200 chars: {}",
                self.path,
                json.chars().take(200).collect::<String>()
            )
        })?;
        Ok(Some(data))
    }
}
