/// Get environment variable with TRIPCAST_ prefix, falling back to unprefixed version
///
/// `TRIPCAST_{key}` wins over `{key}`, so a deployment can override a value
/// shared with other services (for example `DATABASE_URL`) without renaming it.
///
/// # Examples
///
/// ```rust,ignore
/// // Checks TRIPCAST_TRAVELPAYOUTS_TOKEN first, then TRAVELPAYOUTS_TOKEN
/// let token = get_env_with_prefix("TRAVELPAYOUTS_TOKEN");
/// ```
pub fn get_env_with_prefix(key: &str) -> Option<String> {
    std::env::var(format!("TRIPCAST_{}", key))
        .or_else(|_| std::env::var(key))
        .ok()
}

/// Like [`get_env_with_prefix`], but parses the value.
///
/// Unparseable values are logged and treated as absent.
pub fn parse_env_with_prefix<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = get_env_with_prefix(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key = %key, "ignoring unparseable environment value");
            None
        }
    }
}
