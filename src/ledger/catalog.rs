use anyhow::{Result, bail};
use chrono::Utc;
use log::info;
use std::collections::BTreeMap;
use std::path::Path;

use crate::domain::{ManualFineType, fine_type_id};
use crate::storage::JsonFile;

/// Operator-defined fine types, keyed by id.
pub struct FineTypeCatalog {
    file: JsonFile<BTreeMap<String, ManualFineType>>,
}

impl FineTypeCatalog {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            file: JsonFile::new(path),
        }
    }

    /// `Ok(None)` when a type with the same id already exists.
    pub fn add(&self, name: &str, amount: u32, description: &str) -> Result<Option<ManualFineType>> {
        let id = fine_type_id(name);
        if id.is_empty() {
            bail!("Fine type name {name:?} has no usable characters");
        }

        let fine_type = ManualFineType {
            id: id.clone(),
            name: name.trim().to_string(),
            amount,
            description: description.trim().to_string(),
            created_date: Utc::now(),
        };

        let (_, added) = self.file.modify(|types| {
            if types.contains_key(&id) {
                return (None, false);
            }
            types.insert(id.clone(), fine_type.clone());
            (Some(fine_type), true)
        })?;

        if added.is_some() {
            info!("Added fine type {id}");
        }
        Ok(added)
    }

    pub fn remove(&self, id: &str) -> Result<bool> {
        let (_, removed) = self.file.modify(|types| {
            let removed = types.remove(id).is_some();
            (removed, removed)
        })?;
        Ok(removed)
    }

    pub fn get(&self, id: &str) -> Option<ManualFineType> {
        self.file.load().remove(id)
    }

    /// Sorted by name.
    pub fn list(&self) -> Vec<ManualFineType> {
        let mut types: Vec<_> = self.file.load().into_values().collect();
        types.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        types
    }
}
