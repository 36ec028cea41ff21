//! API response models

pub mod system;

pub use system::*;
