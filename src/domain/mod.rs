pub mod backend;
pub mod conversion;
