//! Audio Module
//!
//! Audio file references and format handling.

mod file;
mod format;

pub use file::*;
pub use format::*;
