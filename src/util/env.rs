//! Environment helpers: centralized dotenv loading and ergonomic getters.
use std::str::FromStr;
use std::sync::Once;

static INIT: Once = Once::new();

/// Load `.env` exactly once. Safe to call many times.
pub fn init_env() {
    INIT.call_once(|| {
        let _ = dotenv::dotenv();
    });
}

/// Parsed value with a default fallback for unset or unparseable input.
pub fn env_parse<T>(key: &str, default: T) -> T
where
    T: FromStr,
{
    init_env();
    match std::env::var(key) {
        Ok(raw) => raw.parse::<T>().unwrap_or(default),
        Err(_) => default,
    }
}

/// Optional env var (None if unset or empty).
pub fn env_opt(key: &str) -> Option<String> {
    init_env();
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => Some(v),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_falls_back_on_garbage() {
        std::env::set_var("CARDHUNT_TEST_PARSE", "not-a-number");
        assert_eq!(env_parse::<u64>("CARDHUNT_TEST_PARSE", 15), 15);
        std::env::remove_var("CARDHUNT_TEST_PARSE");
    }

    #[test]
    fn opt_treats_empty_as_unset() {
        std::env::set_var("CARDHUNT_TEST_OPT", "  ");
        assert_eq!(env_opt("CARDHUNT_TEST_OPT"), None);
        std::env::remove_var("CARDHUNT_TEST_OPT");
    }
}
