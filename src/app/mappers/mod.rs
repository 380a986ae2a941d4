pub mod entity_to_dto;

pub use entity_to_dto::EntityToDtoMapper;
