/// Mask an API key for display, keeping only the last `visible` characters.
///
/// Keys no longer than `visible` are masked entirely.
pub fn mask_api_key(api_key: &str, visible: usize) -> String {
    let len = api_key.chars().count();
    if len <= visible {
        return "*".repeat(len);
    }
    let tail: String = api_key.chars().skip(len - visible).collect();
    format!("{}{tail}", "*".repeat(len - visible))
}

/// Local syntactic key check: non-blank and starting with `prefix`.
///
/// Says nothing about whether the remote service accepts the key.
pub fn has_key_prefix(api_key: &str, prefix: &str) -> bool {
    !api_key.trim().is_empty() && api_key.starts_with(prefix)
}
