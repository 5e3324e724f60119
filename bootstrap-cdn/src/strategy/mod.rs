//! Input strategies.
//!
//! Only the filesystem strategy exists; runs are always over a directory tree.

pub mod fs;
