//! `${VAR}` expansion for the `[backlog]` section.
//!
//! Credentials usually live in the environment rather than in `blwiki.toml`,
//! so every `[backlog]` string may reference variables as `${VAR}` or
//! `${VAR:-default}`. Bare `$VAR` is kept literally.

use crate::{BacklogConfig, ConfigError};

/// Expand variable references in every `[backlog]` field, in place.
///
/// Error messages name the field and the variable but never the value.
pub(crate) fn expand_backlog(backlog: &mut BacklogConfig) -> Result<(), ConfigError> {
    let fields = [
        ("backlog.space_id", &mut backlog.space_id),
        ("backlog.domain", &mut backlog.domain),
        ("backlog.project_id", &mut backlog.project_id),
        ("backlog.api_key", &mut backlog.api_key),
    ];
    for (field, value) in fields {
        if let Some(expanded) = expand_field(value, field)? {
            *value = expanded;
        }
    }
    Ok(())
}

/// Expanded value, or `None` when there is nothing to expand.
fn expand_field(value: &str, field: &str) -> Result<Option<String>, ConfigError> {
    if !value.contains("${") {
        return Ok(None);
    }

    shellexpand::env_with_context(value, |var| std::env::var(var).map(Some))
        .map(|expanded| Some(expanded.into_owned()))
        .map_err(|e| ConfigError::EnvVar {
            field: field.to_owned(),
            message: format!("${{{}}} not set", e.var_name),
        })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn backlog(space_id: &str, domain: &str, project_id: &str, api_key: &str) -> BacklogConfig {
        BacklogConfig {
            space_id: space_id.to_owned(),
            domain: domain.to_owned(),
            project_id: project_id.to_owned(),
            api_key: api_key.to_owned(),
        }
    }

    #[test]
    fn test_api_key_from_environment() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("BLWIKI_EXPAND_KEY", "k3y");
        }
        let mut config = backlog("acme", "backlog.jp", "DOCS", "${BLWIKI_EXPAND_KEY}");

        expand_backlog(&mut config).unwrap();

        assert_eq!(config.api_key, "k3y");
        assert_eq!(config.space_id, "acme");
        unsafe {
            std::env::remove_var("BLWIKI_EXPAND_KEY");
        }
    }

    #[test]
    fn test_domain_default_when_unset() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("BLWIKI_EXPAND_DOMAIN");
        }
        let mut config = backlog("acme", "${BLWIKI_EXPAND_DOMAIN:-backlog.com}", "1", "k");

        expand_backlog(&mut config).unwrap();

        assert_eq!(config.domain, "backlog.com");
    }

    #[test]
    fn test_space_id_embedded_reference() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("BLWIKI_EXPAND_TEAM", "acme");
        }
        let mut config = backlog("${BLWIKI_EXPAND_TEAM}-docs", "backlog.jp", "1", "k");

        expand_backlog(&mut config).unwrap();

        assert_eq!(config.space_id, "acme-docs");
        unsafe {
            std::env::remove_var("BLWIKI_EXPAND_TEAM");
        }
    }

    #[test]
    fn test_missing_variable_names_field_not_value() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("BLWIKI_EXPAND_MISSING");
        }
        let mut config = backlog("acme", "backlog.jp", "${BLWIKI_EXPAND_MISSING}", "s3cr3t");

        let err = expand_backlog(&mut config).unwrap_err();

        assert!(matches!(err, ConfigError::EnvVar { .. }));
        let message = err.to_string();
        assert!(message.contains("backlog.project_id"));
        assert!(message.contains("BLWIKI_EXPAND_MISSING"));
        assert!(!message.contains("s3cr3t"));
    }

    #[test]
    fn test_literal_and_bare_dollar_unchanged() {
        let mut config = backlog("acme", "backlog.jp", "DOCS", "pa$word");

        expand_backlog(&mut config).unwrap();

        assert_eq!(config.project_id, "DOCS");
        assert_eq!(config.api_key, "pa$word");
    }
}
