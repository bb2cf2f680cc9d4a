//! Utility functions shared across the crate
pub mod enums;
pub mod io;
pub mod math;

// Re-export commonly used utilities
pub use enums::*;
pub use math::*;
