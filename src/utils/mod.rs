//! Shared utility functions.
//!
//! - [`sanitize`] - Folder names derived from search queries

pub mod sanitize;

pub use sanitize::{sanitize_folder_name, MAX_FOLDER_NAME_LEN};
