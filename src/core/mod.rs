pub mod mapper;
pub mod path;
pub mod projection;
pub mod schema;

pub use crate::domain::ports::{HasSchema, MappingHook, MappingSource, MappingTarget};
pub use crate::utils::error::Result;
pub use mapper::{MapperBuilder, MappingRule, ObjectMapper, StaticRule, UnmappedTargetPolicy};
