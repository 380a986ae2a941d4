pub mod toml_config;

#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{validate_path, Validate};
#[cfg(feature = "cli")]
use clap::{Parser, ValueEnum};

/// 要輸出的 DTO 種類
#[cfg(feature = "cli")]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EntityKind {
    Employee,
    Department,
    Organization,
    All,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "small-mapper")]
#[command(about = "Maps a sample organization to DTOs with declarative rules")]
pub struct CliConfig {
    /// Path to a TOML mapping configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(long, value_enum, default_value = "all")]
    pub entity: EntityKind,

    #[arg(long, help = "Pretty-print JSON output")]
    pub pretty: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if let Some(path) = &self.config {
            validate_path("config", path)?;
        }
        Ok(())
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let config = CliConfig::parse_from(["small-mapper"]);
        assert_eq!(config.entity, EntityKind::All);
        assert!(config.config.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cli_entity_and_config() {
        let config = CliConfig::parse_from([
            "small-mapper",
            "--entity",
            "department",
            "--config",
            "mapper.toml",
            "--pretty",
        ]);
        assert_eq!(config.entity, EntityKind::Department);
        assert_eq!(config.config.as_deref(), Some("mapper.toml"));
        assert!(config.pretty);
    }
}
