//! Mapped-statement SQL: placeholder compilation, binding, row windows.

mod builder;
pub mod params;
pub use builder::*;
pub use params::*;
