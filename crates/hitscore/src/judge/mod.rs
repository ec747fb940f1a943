mod object;
mod result;
mod window;

pub use object::*;
pub use result::*;
pub use window::*;
