pub mod batch;
pub mod comparison;
pub mod retry;
pub mod traits;
