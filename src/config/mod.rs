pub mod settings;

pub use settings::{AppConfig, BalanceSettings, FineSettings, SourceSettings, StorageSettings};
