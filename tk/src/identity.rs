//! Owner identity resolution
//!
//! The engine trusts whatever identity it is handed; resolving one is
//! this boundary's job. Order: explicit `--owner` flag, then config,
//! then the login user.

use eyre::{Result, eyre};

use crate::config::Config;

/// Resolve the acting owner identity, or fail as unauthenticated
pub fn resolve_owner(explicit: Option<String>, config: &Config) -> Result<String> {
    explicit
        .or_else(|| config.owner.clone())
        .or_else(|| std::env::var("USER").ok())
        .filter(|owner| !owner.trim().is_empty())
        .ok_or_else(|| eyre!("No owner identity: pass --owner or set `owner` in the config"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_beats_config() {
        let config = Config {
            owner: Some("from-config".to_string()),
            ..Default::default()
        };
        let owner = resolve_owner(Some("from-flag".to_string()), &config).unwrap();
        assert_eq!(owner, "from-flag");
    }

    #[test]
    fn test_config_fallback() {
        let config = Config {
            owner: Some("from-config".to_string()),
            ..Default::default()
        };
        let owner = resolve_owner(None, &config).unwrap();
        assert_eq!(owner, "from-config");
    }

    #[test]
    fn test_blank_explicit_owner_rejected() {
        let config = Config {
            owner: None,
            ..Default::default()
        };
        assert!(resolve_owner(Some("   ".to_string()), &config).is_err());
    }
}
