use chrono::NaiveDate;
use log::warn;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct FineSettings {
    pub training_fine: u32,
    pub match_fine: u32,
    pub late_response_fine: u32,
    pub training_loss_fine: u32,
    pub late_response_hours: i64,
    /// Events starting before this date never produce fines.
    pub cutoff_date: Option<NaiveDate>,
    pub match_keywords: Vec<String>,
    pub assess_unanswered_as_missing: bool,
}

impl Default for FineSettings {
    fn default() -> Self {
        Self {
            training_fine: 50,
            match_fine: 100,
            late_response_fine: 25,
            training_loss_fine: 25,
            late_response_hours: 24,
            cutoff_date: None,
            match_keywords: ["match", "kamp", "spill", "game"]
                .iter()
                .map(|k| k.to_string())
                .collect(),
            assess_unanswered_as_missing: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BalanceSettings {
    pub default_win_rate: f64,
    pub max_iterations: usize,
    pub early_exit_difference: f64,
    pub optimal_player_limit: usize,
}

impl Default for BalanceSettings {
    fn default() -> Self {
        Self {
            default_win_rate: 0.5,
            max_iterations: 1000,
            early_exit_difference: 0.05,
            optimal_player_limit: 16,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StorageSettings {
    pub data_dir: PathBuf,
    pub fines_file: &'static str,
    pub matches_file: &'static str,
    pub fine_types_file: &'static str,
    pub members_file: &'static str,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            fines_file: "fines_data.json",
            matches_file: "training_matches.json",
            fine_types_file: "manual_fine_types.json",
            members_file: "member_data.json",
        }
    }
}

impl StorageSettings {
    pub fn in_dir<P: Into<PathBuf>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    pub fn fines_path(&self) -> PathBuf {
        self.data_dir.join(self.fines_file)
    }

    pub fn matches_path(&self) -> PathBuf {
        self.data_dir.join(self.matches_file)
    }

    pub fn fine_types_path(&self) -> PathBuf {
        self.data_dir.join(self.fine_types_file)
    }

    pub fn members_path(&self) -> PathBuf {
        self.data_dir.join(self.members_file)
    }
}

#[derive(Debug, Clone)]
pub struct SourceSettings {
    pub api_base_url: String,
    pub username: String,
    pub password: String,
    pub group_id: String,
    pub days_back: i64,
    pub max_events: u32,
    pub rate_limit_ms: u64,
    pub user_agent: &'static str,
    pub timeout_secs: u64,
    pub admin_token: Option<String>,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.spond.com/core/v1".to_string(),
            username: String::new(),
            password: String::new(),
            group_id: String::new(),
            days_back: 60,
            max_events: 200,
            rate_limit_ms: 100, // 10 req/sec
            user_agent: "SquadLedger/1.0",
            timeout_secs: 30,
            admin_token: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub fines: FineSettings,
    pub balance: BalanceSettings,
    pub storage: StorageSettings,
    pub source: SourceSettings,
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by whatever the environment provides.
    pub fn from_env() -> Self {
        let mut config = Self::new();
        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let fines = &mut self.fines;
        override_parsed(&lookup, "FINE_MISSING_TRAINING", &mut fines.training_fine);
        override_parsed(&lookup, "FINE_MISSING_MATCH", &mut fines.match_fine);
        override_parsed(&lookup, "FINE_LATE_RESPONSE", &mut fines.late_response_fine);
        override_parsed(&lookup, "FINE_TRAINING_LOSS", &mut fines.training_loss_fine);
        override_parsed(&lookup, "LATE_RESPONSE_HOURS", &mut fines.late_response_hours);
        override_parsed(
            &lookup,
            "FINE_UNANSWERED_AS_MISSING",
            &mut fines.assess_unanswered_as_missing,
        );
        if let Some(raw) = lookup("FINES_CUTOFF_DATE") {
            match NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") {
                Ok(date) => fines.cutoff_date = Some(date),
                Err(_) => warn!("Ignoring FINES_CUTOFF_DATE={raw:?}: expected YYYY-MM-DD"),
            }
        }
        if let Some(raw) = lookup("FINE_MATCH_KEYWORDS") {
            let keywords = parse_keywords(&raw);
            if !keywords.is_empty() {
                fines.match_keywords = keywords;
            }
        }

        if let Some(dir) = lookup("DATA_DIR").filter(|d| !d.trim().is_empty()) {
            self.storage.data_dir = PathBuf::from(dir);
        }

        let source = &mut self.source;
        override_string(&lookup, "SPOND_API_URL", &mut source.api_base_url);
        override_string(&lookup, "SPOND_USERNAME", &mut source.username);
        override_string(&lookup, "SPOND_PASSWORD", &mut source.password);
        override_string(&lookup, "SPOND_GROUP_ID", &mut source.group_id);
        override_parsed(&lookup, "SPOND_DAYS_BACK", &mut source.days_back);
        source.admin_token = lookup("ADMIN_TOKEN").filter(|t| !t.is_empty());
    }
}

fn override_parsed<T, F>(lookup: &F, key: &str, target: &mut T)
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return;
    };
    match raw.trim().parse::<T>() {
        Ok(value) => *target = value,
        Err(_) => warn!("Ignoring {key}={raw:?}: could not parse value"),
    }
}

fn override_string<F>(lookup: &F, key: &str, target: &mut String)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = lookup(key) {
        *target = value;
    }
}

fn parse_keywords(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_with(vars: &[(&str, &str)]) -> AppConfig {
        let env: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let mut config = AppConfig::new();
        config.apply_env(|key| env.get(key).cloned());
        config
    }

    #[test]
    fn defaults_match_club_policy() {
        let config = AppConfig::new();
        assert_eq!(config.fines.training_fine, 50);
        assert_eq!(config.fines.match_fine, 100);
        assert_eq!(config.fines.late_response_fine, 25);
        assert_eq!(config.balance.default_win_rate, 0.5);
        assert_eq!(config.balance.max_iterations, 1000);
        assert!(config.fines.cutoff_date.is_none());
    }

    #[test]
    fn env_overrides_are_applied() {
        let config = config_with(&[
            ("FINE_MISSING_MATCH", "150"),
            ("FINES_CUTOFF_DATE", "2025-08-01"),
            ("FINE_MATCH_KEYWORDS", "Cup, Derby"),
            ("DATA_DIR", "/tmp/club"),
        ]);
        assert_eq!(config.fines.match_fine, 150);
        assert_eq!(
            config.fines.cutoff_date,
            NaiveDate::from_ymd_opt(2025, 8, 1)
        );
        assert_eq!(config.fines.match_keywords, vec!["cup", "derby"]);
        assert_eq!(config.storage.fines_path(), PathBuf::from("/tmp/club/fines_data.json"));
    }

    #[test]
    fn unparseable_values_keep_defaults() {
        let config = config_with(&[
            ("FINE_MISSING_TRAINING", "fifty"),
            ("FINES_CUTOFF_DATE", "01/08/2025"),
        ]);
        assert_eq!(config.fines.training_fine, 50);
        assert!(config.fines.cutoff_date.is_none());
    }
}
