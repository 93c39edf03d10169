//! Process settings, read from environment variables.

use declarative::EnvironmentSet;

/// Environments tracked when `AIRFORM_ENVIRONMENTS` is unset.
pub const DEFAULT_ENVIRONMENTS: &str = "dev,prod";

/// Reference environment when `AIRFORM_REFERENCE_ENV` is unset.
pub const DEFAULT_REFERENCE: &str = "prod";

/// Settings errors.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("missing environment variables: {}", .0.join(", "))]
    Missing(Vec<String>),

    #[error("invalid environments: {0}")]
    Environments(#[from] declarative::Error),
}

/// Connection details of one Airbyte environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub environment: String,
    pub url: String,
    pub client_id: String,
    pub client_secret: String,
}

/// Everything a run needs from its environment.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Data product name (`DP_NAME`).
    pub product: String,
    /// GitHub organization holding the product repository.
    pub organization: String,
    /// Token for the repository secrets API.
    pub github_token: String,
    pub environments: EnvironmentSet,
    /// One endpoint per environment, in environment order.
    pub endpoints: Vec<Endpoint>,
}

impl Settings {
    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`. Every missing variable is reported
    /// in a single error.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SettingsError> {
        let mut missing = Vec::new();
        let mut require = |key: &str| {
            let value = lookup(key).filter(|v| !v.trim().is_empty());
            if value.is_none() {
                missing.push(key.to_string());
            }
            value.unwrap_or_default()
        };

        let product = require("DP_NAME");
        let organization = require("GIT_ORGANIZATION");
        let github_token = require("TOKEN_GITHUB");

        let tags: Vec<String> = lookup("AIRFORM_ENVIRONMENTS")
            .unwrap_or_else(|| DEFAULT_ENVIRONMENTS.to_string())
            .split(',')
            .map(|tag| tag.trim().to_lowercase())
            .filter(|tag| !tag.is_empty())
            .collect();
        let reference = lookup("AIRFORM_REFERENCE_ENV")
            .map(|r| r.trim().to_lowercase())
            .unwrap_or_else(|| DEFAULT_REFERENCE.to_string());

        let mut endpoints = Vec::new();
        for tag in &tags {
            let prefix = tag.to_uppercase();
            endpoints.push(Endpoint {
                environment: tag.clone(),
                url: require(&format!("{prefix}_AIRBYTE_URL")),
                client_id: require(&format!("{prefix}_AIRBYTE_CLIENT_ID")),
                client_secret: require(&format!("{prefix}_AIRBYTE_CLIENT_SECRET")),
            });
        }

        if !missing.is_empty() {
            return Err(SettingsError::Missing(missing));
        }

        let environments = EnvironmentSet::new(tags, reference)?;
        Ok(Self {
            product,
            organization,
            github_token,
            environments,
            endpoints,
        })
    }

    /// `<organization>/data-product-<product>`, with `-` in the product
    /// name replaced by `_`.
    pub fn repository(&self) -> String {
        format!(
            "{}/data-product-{}",
            self.organization,
            self.product.replace('-', "_")
        )
    }

    /// SSH clone URL of the product repository.
    pub fn clone_url(&self) -> String {
        format!("git@github.com:{}.git", self.repository())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    const COMPLETE: &[(&str, &str)] = &[
        ("DP_NAME", "glb-orders"),
        ("GIT_ORGANIZATION", "acme"),
        ("TOKEN_GITHUB", "ghp_x"),
        ("DEV_AIRBYTE_URL", "https://airbyte.dev"),
        ("DEV_AIRBYTE_CLIENT_ID", "dev-id"),
        ("DEV_AIRBYTE_CLIENT_SECRET", "dev-secret"),
        ("PROD_AIRBYTE_URL", "https://airbyte.prod"),
        ("PROD_AIRBYTE_CLIENT_ID", "prod-id"),
        ("PROD_AIRBYTE_CLIENT_SECRET", "prod-secret"),
    ];

    #[test]
    fn test_from_lookup_defaults() {
        let settings = Settings::from_lookup(lookup(COMPLETE)).unwrap();
        assert_eq!(settings.product, "glb-orders");
        assert_eq!(
            settings.environments.iter().collect::<Vec<_>>(),
            vec!["dev", "prod"]
        );
        assert_eq!(settings.environments.reference(), "prod");
        assert_eq!(settings.endpoints.len(), 2);
        assert_eq!(settings.endpoints[0].url, "https://airbyte.dev");
        assert_eq!(settings.endpoints[1].client_secret, "prod-secret");
    }

    #[test]
    fn test_repository() {
        let settings = Settings::from_lookup(lookup(COMPLETE)).unwrap();
        assert_eq!(settings.repository(), "acme/data-product-glb_orders");
        assert_eq!(
            settings.clone_url(),
            "git@github.com:acme/data-product-glb_orders.git"
        );
    }

    #[test]
    fn test_missing_variables_reported_together() {
        let vars: Vec<(&str, &str)> = COMPLETE
            .iter()
            .copied()
            .filter(|(k, _)| *k != "TOKEN_GITHUB" && *k != "PROD_AIRBYTE_URL")
            .collect();

        match Settings::from_lookup(lookup(&vars)).unwrap_err() {
            SettingsError::Missing(keys) => {
                assert_eq!(keys, vec!["TOKEN_GITHUB", "PROD_AIRBYTE_URL"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_custom_environments() {
        let mut vars = COMPLETE.to_vec();
        vars.extend([
            ("AIRFORM_ENVIRONMENTS", "dev, Staging ,prod"),
            ("AIRFORM_REFERENCE_ENV", "staging"),
            ("STAGING_AIRBYTE_URL", "https://airbyte.staging"),
            ("STAGING_AIRBYTE_CLIENT_ID", "stg-id"),
            ("STAGING_AIRBYTE_CLIENT_SECRET", "stg-secret"),
        ]);

        let settings = Settings::from_lookup(lookup(&vars)).unwrap();
        assert_eq!(
            settings.environments.iter().collect::<Vec<_>>(),
            vec!["dev", "staging", "prod"]
        );
        assert_eq!(settings.environments.reference(), "staging");
        assert_eq!(settings.endpoints[1].client_id, "stg-id");
    }

    #[test]
    fn test_reference_outside_environments() {
        let mut vars = COMPLETE.to_vec();
        vars.push(("AIRFORM_REFERENCE_ENV", "qa"));

        let err = Settings::from_lookup(lookup(&vars)).unwrap_err();
        assert!(matches!(err, SettingsError::Environments(_)));
        assert!(err.to_string().contains("qa"));
    }
}
