//! Environment variable expansion for configuration strings.

use crate::ConfigError;

/// Expand `${VAR}` and `${VAR:-default}` references in `value`.
///
/// `field` names the configuration key for error messages.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    shellexpand::env(value)
        .map(std::borrow::Cow::into_owned)
        .map_err(|e| ConfigError::EnvVar {
            field: field.to_owned(),
            message: format!("${{{}}} not set", e.var_name),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_is_unchanged() {
        assert_eq!(expand_env("docs", "docs.source_dir").unwrap(), "docs");
    }

    #[test]
    fn test_default_used_when_unset() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("DOCNAV_EXPAND_UNSET");
        }
        let value = expand_env("${DOCNAV_EXPAND_UNSET:-fallback}", "docs.root_doc").unwrap();
        assert_eq!(value, "fallback");
    }

    #[test]
    fn test_missing_var_reports_field() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("DOCNAV_EXPAND_MISSING");
        }
        let err = expand_env("${DOCNAV_EXPAND_MISSING}", "docs.output_dir").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("DOCNAV_EXPAND_MISSING"));
        assert!(msg.contains("docs.output_dir"));
    }
}
