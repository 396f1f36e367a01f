pub mod bounds;
pub mod constants;
pub mod error;
pub mod face;
pub mod frame;
