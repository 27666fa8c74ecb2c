pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_path, validate_positive_number, validate_range, validate_socket_addr,
};

#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

/// Checks shared by every configuration source.
pub fn validate_provider<C: ConfigProvider + ?Sized>(config: &C) -> Result<()> {
    validate_socket_addr("bind_address", config.bind_address())?;
    validate_path("data_path", config.data_path())?;
    validate_positive_number("request_timeout_seconds", config.request_timeout_seconds(), 1)?;
    validate_range("min_password_length", config.min_password_length(), 4, 128)?;
    validate_positive_number("session_ttl_minutes", config.session_ttl_minutes(), 1)
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "trade-network")]
#[command(about = "CRUD service for a three-tier supplier network")]
pub struct CliConfig {
    /// TOML configuration file; when given, the server settings come from it
    #[arg(long)]
    pub config: Option<String>,

    #[arg(long, default_value = "127.0.0.1:8000")]
    pub bind_address: String,

    #[arg(long, default_value = "./data")]
    pub data_path: String,

    #[arg(long, default_value = "30")]
    pub request_timeout_seconds: u64,

    #[arg(long, default_value = "8")]
    pub min_password_length: usize,

    /// Minutes a login token stays valid (default: two weeks)
    #[arg(long, default_value = "20160")]
    pub session_ttl_minutes: u64,

    #[arg(long, help = "Emit JSON log lines")]
    pub json_logs: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn bind_address(&self) -> &str {
        &self.bind_address
    }

    fn data_path(&self) -> &str {
        &self.data_path
    }

    fn request_timeout_seconds(&self) -> u64 {
        self.request_timeout_seconds
    }

    fn min_password_length(&self) -> usize {
        self.min_password_length
    }

    fn session_ttl_minutes(&self) -> u64 {
        self.session_ttl_minutes
    }
}

#[cfg(feature = "cli")]
impl crate::utils::validation::Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)
    }
}
