//! Folder names derived from queries.

/// Longest folder name produced, in characters.
pub const MAX_FOLDER_NAME_LEN: usize = 100;

const RESERVED: [char; 9] = ['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

/// Turn a query into a folder name that is safe on every common filesystem.
///
/// Leading and trailing whitespace is dropped, each reserved character
/// (`\ / : * ? " < > |`) becomes `_`, whitespace runs collapse to a single
/// space and the result is cut at [`MAX_FOLDER_NAME_LEN`] characters.
///
/// ```rust
/// use imgrab::utils::sanitize_folder_name;
///
/// assert_eq!(sanitize_folder_name("  red/blue   cats? "), "red_blue cats_");
/// ```
pub fn sanitize_folder_name(query: &str) -> String {
    let replaced: String = query
        .trim()
        .chars()
        .map(|c| if RESERVED.contains(&c) { '_' } else { c })
        .collect();
    let collapsed = replaced.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.chars().take(MAX_FOLDER_NAME_LEN).collect()
}
