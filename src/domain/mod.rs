// Domain layer: models, DTOs and the ports the mapping engine works through.

pub mod dto;
pub mod model;
pub mod ports;
