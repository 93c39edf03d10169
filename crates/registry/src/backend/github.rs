//! GitHub repository secrets backend.
//!
//! Only secret names are readable through the API, which is all the
//! catalog needs: values are supplied at apply time as Terraform variables.

use crate::backend::SecretsCatalog;
use crate::error::Result;
use serde::Deserialize;
use std::collections::BTreeSet;

/// Largest page the secrets endpoint serves.
const PAGE_SIZE: u32 = 100;

/// Secrets catalog reading a repository's Actions secrets.
pub struct GitHubSecrets {
    agent: ureq::Agent,
    api_base: String,
    repository: String,
    token: String,
}

impl GitHubSecrets {
    /// Create a catalog for `owner/name`.
    #[must_use]
    pub fn new(repository: impl Into<String>, token: impl Into<String>) -> Self {
        Self::with_api_base("https://api.github.com", repository, token)
    }

    /// Create a catalog with a custom API base (for testing).
    #[must_use]
    pub fn with_api_base(
        api_base: impl Into<String>,
        repository: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            agent: ureq::Agent::new_with_defaults(),
            api_base: api_base.into(),
            repository: repository.into(),
            token: token.into(),
        }
    }

    /// Get the current API base URL.
    #[must_use]
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn secrets_url(&self, page: u32) -> String {
        format!(
            "{}/repos/{}/actions/secrets?per_page={PAGE_SIZE}&page={page}",
            self.api_base, self.repository
        )
    }

    fn fetch_page(&self, page: u32) -> Result<SecretsPage> {
        let url = self.secrets_url(page);
        log::debug!("GET {url}");

        let response: SecretsPage = self
            .agent
            .get(&url)
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", "airform")
            .header("Authorization", format!("Bearer {}", self.token))
            .call()?
            .body_mut()
            .read_json()?;

        Ok(response)
    }
}

impl SecretsCatalog for GitHubSecrets {
    fn secret_names(&self) -> Result<BTreeSet<String>> {
        let mut names = BTreeSet::new();
        let mut page = 1;

        loop {
            let response = self.fetch_page(page)?;
            let fetched = response.secrets.len();
            names.extend(response.secrets.into_iter().map(|s| s.name));

            if fetched < PAGE_SIZE as usize || names.len() >= response.total_count {
                break;
            }
            page += 1;
        }

        log::debug!("{} secrets declared in {}", names.len(), self.repository);
        Ok(names)
    }
}

// =============================================================================
// GitHub API response types
// =============================================================================

#[derive(Debug, Deserialize)]
struct SecretsPage {
    total_count: usize,
    secrets: Vec<SecretEntry>,
}

#[derive(Debug, Deserialize)]
struct SecretEntry {
    name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secrets_url() {
        let catalog = GitHubSecrets::new("acme/data-product-orders", "token");
        assert_eq!(
            catalog.secrets_url(1),
            "https://api.github.com/repos/acme/data-product-orders/actions/secrets?per_page=100&page=1"
        );
    }

    #[test]
    fn test_custom_api_base() {
        let catalog = GitHubSecrets::with_api_base("https://ghe.example.com/api/v3", "a/b", "t");
        assert_eq!(catalog.api_base(), "https://ghe.example.com/api/v3");
        assert!(catalog.secrets_url(2).starts_with("https://ghe.example.com/api/v3/repos/a/b/"));
        assert!(catalog.secrets_url(2).ends_with("page=2"));
    }

    #[test]
    fn test_secrets_page_deserialize() {
        let raw = r#"{
            "total_count": 2,
            "secrets": [
                {"name": "DEV_AIRBYTE_CLIENT_ID", "created_at": "2024-01-01T00:00:00Z"},
                {"name": "PROD_AIRBYTE_CLIENT_ID", "created_at": "2024-01-01T00:00:00Z"}
            ]
        }"#;
        let page: SecretsPage = serde_json::from_str(raw).unwrap();
        assert_eq!(page.total_count, 2);
        assert_eq!(page.secrets[0].name, "DEV_AIRBYTE_CLIENT_ID");
    }
}
