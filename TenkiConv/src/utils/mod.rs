//! Utility functions

pub mod fs;
pub mod path;

pub use fs::{backup_file, write_atomic};
pub use path::{companion_path, extension_lowercase};
