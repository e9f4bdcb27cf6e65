//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check value ranges (timeouts > 0, limits > 0)
//! - Check tier thresholds are ordered ascending
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is a pure function: BotConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use crate::config::schema::BotConfig;

/// A single semantic validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate semantic constraints on a parsed configuration.
pub fn validate_config(config: &BotConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.ledger.rpc_url.parse::<url::Url>().is_err() {
        errors.push(ValidationError {
            field: "ledger.rpc_url".to_string(),
            message: format!("not a valid URL: '{}'", config.ledger.rpc_url),
        });
    }

    for (i, failover) in config.ledger.failover_urls.iter().enumerate() {
        if failover.parse::<url::Url>().is_err() {
            errors.push(ValidationError {
                field: format!("ledger.failover_urls[{}]", i),
                message: format!("not a valid URL: '{}'", failover),
            });
        }
    }

    if config.ledger.request_timeout_secs == 0 {
        errors.push(ValidationError {
            field: "ledger.request_timeout_secs".to_string(),
            message: "must be greater than zero".to_string(),
        });
    }

    if config.claims.max_wallets_per_account == 0 {
        errors.push(ValidationError {
            field: "claims.max_wallets_per_account".to_string(),
            message: "must be greater than zero".to_string(),
        });
    }

    let mut previous = f64::NEG_INFINITY;
    for (i, rule) in config.tiers.rules.iter().enumerate() {
        if rule.min_points < 0.0 {
            errors.push(ValidationError {
                field: format!("tiers.rules[{}].min_points", i),
                message: "must be non-negative".to_string(),
            });
        }
        if rule.min_points <= previous {
            errors.push(ValidationError {
                field: format!("tiers.rules[{}].min_points", i),
                message: "tier thresholds must be strictly ascending".to_string(),
            });
        }
        previous = rule.min_points;
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::TierRule;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&BotConfig::default()).is_ok());
    }

    #[test]
    fn test_bad_rpc_url() {
        let mut config = BotConfig::default();
        config.ledger.rpc_url = "not a url".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(|e| e.field == "ledger.rpc_url"));
    }

    #[test]
    fn test_unordered_tiers_rejected() {
        let mut config = BotConfig::default();
        config.tiers.rules = vec![
            TierRule {
                role_id: "a".into(),
                min_points: 100.0,
            },
            TierRule {
                role_id: "b".into(),
                min_points: 10.0,
            },
        ];
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("ascending"));
    }

    #[test]
    fn test_zero_limit_rejected() {
        let mut config = BotConfig::default();
        config.claims.max_wallets_per_account = 0;
        assert!(validate_config(&config).is_err());
    }
}
