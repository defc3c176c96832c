//! Environment variable parsing helpers

use std::str::FromStr;

/// Parse an environment variable, falling back to `default` when it is
/// missing or does not parse.
pub fn parse_env_with_default<T: FromStr>(key: &str, default: T) -> T {
    parse_env_optional(key).unwrap_or(default)
}

/// Parse an environment variable, returning None if missing or invalid
pub fn parse_env_optional<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

/// Parse a required environment variable
pub fn parse_env_required<T: FromStr>(key: &str) -> Result<T, String> {
    std::env::var(key)
        .map_err(|_| format!("Environment variable {} not found", key))?
        .parse()
        .map_err(|_| format!("Failed to parse environment variable {}", key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_with_default() {
        let result: u32 = parse_env_with_default("KB_NONEXISTENT_VAR", 42);
        assert_eq!(result, 42);

        std::env::set_var("KB_TEST_PORT", "8080");
        let result: u16 = parse_env_with_default("KB_TEST_PORT", 3000);
        assert_eq!(result, 8080);
        std::env::remove_var("KB_TEST_PORT");
    }

    #[test]
    fn test_unparseable_value_falls_back() {
        std::env::set_var("KB_TEST_BAD_PORT", "eighty");
        let result: u16 = parse_env_with_default("KB_TEST_BAD_PORT", 3000);
        assert_eq!(result, 3000);
        std::env::remove_var("KB_TEST_BAD_PORT");
    }

    #[test]
    fn test_parse_env_required() {
        assert!(parse_env_required::<u32>("KB_NONEXISTENT_VAR").is_err());

        std::env::set_var("KB_TEST_REQ", "456");
        assert_eq!(parse_env_required::<u32>("KB_TEST_REQ"), Ok(456));
        std::env::remove_var("KB_TEST_REQ");
    }
}
