use super::{types::Config, ConfigError};

/// Validate configuration.
///
/// Client sections are allowed to be incomplete (that is their degraded
/// mode), but values that would make a configured client silently useless
/// are rejected up front.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if let Some(llm) = &config.llm {
        if llm.model.is_empty() {
            return Err(ConfigError::ValidationError(
                "llm.model cannot be empty".to_string(),
            ));
        }
        if llm.api_base.is_empty() {
            return Err(ConfigError::ValidationError(
                "llm.api_base cannot be empty".to_string(),
            ));
        }
    }

    if let Some(email) = &config.email {
        if email.host.is_empty() {
            return Err(ConfigError::ValidationError(
                "email.host cannot be empty".to_string(),
            ));
        }
        if email.port == 0 {
            return Err(ConfigError::ValidationError(
                "email.port cannot be 0".to_string(),
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config_from_str;

    #[test]
    fn test_validate_default_config() {
        let config = load_config_from_str("").unwrap();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_port_zero_fails() {
        let config = load_config_from_str("[server]\nport = 0").unwrap();
        let result = validate_config(&config);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validate_empty_llm_model_fails() {
        let config = load_config_from_str(
            "[llm]\napi_base = \"https://api.deepseek.com\"\nmodel = \"\"",
        )
        .unwrap();
        assert!(validate_config(&config).is_err());
    }
}
