mod grade;
mod hit_error;

pub use grade::*;
pub use hit_error::*;
