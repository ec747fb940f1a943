//! CLI command implementations.

pub mod grade;
pub mod simulate;
pub mod windows;
