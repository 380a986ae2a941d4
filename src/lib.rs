pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, EntityKind};

pub use app::mappers::EntityToDtoMapper;
pub use config::toml_config::MapperConfig;
pub use crate::core::{MappingHook, ObjectMapper, UnmappedTargetPolicy};
pub use utils::error::{MapperError, Result};
