//! Editing surface state and file conversions.

pub mod buffer;
pub mod file_io;
