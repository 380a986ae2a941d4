pub mod mappers;
pub mod sample;
