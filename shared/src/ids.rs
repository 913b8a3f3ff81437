//! Validation of names that end up as filesystem path components.

/// Longest name a tileset slot can hold
pub const MAX_TILESET_NAME_LEN: usize = 32;

/// Device names Windows refuses as file stems
const RESERVED_STEMS: [&str; 4] = ["CON", "PRN", "AUX", "NUL"];

/// Whether a tileset name can be used as one path component on any platform.
///
/// Tileset names come straight out of course blobs, so they are untrusted.
/// A safe name fits a tileset slot, is not `.`/`..` or a reserved device
/// name, has no separators, control characters or characters Windows
/// reserves, and does not end in a dot or space.
pub fn is_safe_tileset_name(name: &str) -> bool {
    if name.is_empty() || name.len() > MAX_TILESET_NAME_LEN || name == "." || name == ".." {
        return false;
    }

    if name.ends_with(['.', ' ']) {
        return false;
    }

    if RESERVED_STEMS.iter().any(|stem| name.eq_ignore_ascii_case(stem)) {
        return false;
    }

    name.chars().all(|c| {
        !(c == '/' || c == '\\' || c.is_control())
            && !matches!(c, ':' | '*' | '?' | '"' | '<' | '>' | '|')
    })
}
