pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::storage::{LocalStorage, MemoryStorage};
pub use app::{AppState, SharedState};

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::toml_config::TomlConfig;
pub use crate::core::{accounts::AccountService, network::NetworkService, tier::classify};
pub use utils::error::{Result, TradeError};
