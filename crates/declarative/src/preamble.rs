//! Fixed blocks written ahead of the synthesized resources.
//!
//! Providers, variables for every declared secret, the global parameters
//! and the BigQuery destination all connections write to.

use crate::environment::EnvironmentSet;
use crate::emitter::DeclarativeBlock;
use hclkit::{Block, Body, OutputBuffer, Value};
use std::collections::BTreeSet;

/// Pinned provider versions: `(name, source, version)`.
pub const PROVIDERS: &[(&str, &str, &str)] = &[
    ("airbyte", "airbytehq/airbyte", "0.4.2"),
    ("google", "hashicorp/google", "5.10.0"),
];

/// Secrets served by the secret manager data sources instead of variables.
pub const MANAGED_SECRETS: &[&str] = &[
    "INGESTION_ACCOUNT_HMAC_KEY_ID",
    "INGESTION_ACCOUNT_HMAC_KEY_SECRET",
    "INGESTION_ACCOUNT_SECRET_JSON",
    "AIRBYTE_URL",
];

/// Credentials the provider block reads, declared even when no secret
/// carries them.
pub const PROVIDER_CREDENTIALS: &[&str] = &["AIRBYTE_CLIENT_ID", "AIRBYTE_CLIENT_SECRET"];

/// Resource type of the destination block.
pub const DESTINATION_TYPE: &str = "airbyte_destination_bigquery";

/// Label of the destination block.
pub const DESTINATION_LABEL: &str = "bigquery";

/// Connector definition of the destination.
pub const DESTINATION_DEFINITION_ID: &str = "22f6c74f-5699-40ff-833c-4a879ea40133";

/// Secret manager entries: `(data source label, secret suffix)`.
pub const SECRET_VERSIONS: &[(&str, &str)] = &[
    (
        "airbyte_ingestion_account_secret",
        "airbyte_ingestion_account_secret",
    ),
    (
        "airbyte_ingestion_airbyte_hmac_key_secret",
        "airbyte_hmac_key_secret",
    ),
    (
        "airbyte_ingestion_airbyte_hmac_key_id",
        "airbyte_hmac_key_id",
    ),
];

const SECRET_VERSION_TYPE: &str = "google_secret_manager_secret_version";

/// Everything the preamble depends on.
#[derive(Debug, Clone)]
pub struct Preamble<'a> {
    /// Product name, such as `glb-orders`.
    pub product: &'a str,
    /// Secret names as declared, environment prefixes included.
    pub secrets: &'a BTreeSet<String>,
    /// Tracked environments.
    pub envs: &'a EnvironmentSet,
}

impl Preamble<'_> {
    /// Append every preamble block except the destination.
    pub fn write(&self, out: &mut OutputBuffer) {
        out.push_block(&terraform_block());

        for name in secret_variables(self.secrets, self.envs) {
            out.blank();
            out.push_block(&variable(&name, &format!("Variable for {name}."), true));
        }

        out.blank();
        out.push_block(&variable("AIRBYTE_URL", "Url of Airbyte.", false));
        out.blank();
        out.push_block(&provider_block());

        out.blank();
        out.push_block(&variable(
            "WORKSPACE_ID",
            "ID of the Airbyte Workspace.",
            false,
        ));
        out.blank();
        out.push_block(&variable("ENV", &env_description(self.envs), false));
        out.blank();
        out.push_block(
            &Block::new("locals", std::iter::empty::<String>())
                .attr("bigquery_gcp_project", gcp_project(self.product)),
        );

        for (label, suffix) in SECRET_VERSIONS {
            out.blank();
            out.push_block(&secret_version(label, suffix));
        }
    }
}

/// Variable names for the declared secrets.
///
/// Environment prefixes (`DEV_`, `PROD_`, one per tracked environment) are
/// stripped, managed secrets excluded, provider credentials added. Sorted
/// and unique.
#[must_use]
pub fn secret_variables(secrets: &BTreeSet<String>, envs: &EnvironmentSet) -> Vec<String> {
    let prefixes: Vec<String> = envs
        .iter()
        .map(|env| format!("{}_", env.to_uppercase()))
        .collect();

    let mut names: BTreeSet<String> = secrets
        .iter()
        .map(|secret| {
            prefixes
                .iter()
                .find_map(|prefix| secret.strip_prefix(prefix.as_str()))
                .unwrap_or(secret.as_str())
                .to_string()
        })
        .filter(|name| !name.is_empty() && !MANAGED_SECRETS.contains(&name.as_str()))
        .collect();
    names.extend(PROVIDER_CREDENTIALS.iter().map(|c| (*c).to_string()));

    names.into_iter().collect()
}

/// `bigquery_gcp_project` value: the product name with `_` replaced by `-`,
/// suffixed with the environment.
#[must_use]
pub fn gcp_project(product: &str) -> String {
    format!("{}-${{var.ENV}}", product.replace('_', "-"))
}

/// `<type>.<label>` of the destination block.
#[must_use]
pub fn destination_address() -> String {
    format!("{DESTINATION_TYPE}.{DESTINATION_LABEL}")
}

/// The BigQuery destination, with credentials from the secret manager.
#[must_use]
pub fn destination_block() -> DeclarativeBlock {
    let hmac_key = Body::new()
        .with(
            "hmac_key_access_id",
            secret_data("airbyte_ingestion_airbyte_hmac_key_id"),
        )
        .with(
            "hmac_key_secret",
            secret_data("airbyte_ingestion_airbyte_hmac_key_secret"),
        );

    let gcs_staging = Body::new()
        .with("credential", Body::new().with("hmac_key", hmac_key))
        .with(
            "gcs_bucket_name",
            "${local.bigquery_gcp_project}-airbyte-ingestion",
        )
        .with("gcs_bucket_path", "gcs")
        .with("keep_files_in_gcs_bucket", "Keep all tmp files in GCS");

    let configuration = Body::new()
        .with("big_query_client_buffer_size_mb", 15_i64)
        .with(
            "credentials_json",
            secret_data("airbyte_ingestion_account_secret"),
        )
        .with("dataset_id", "airbyte_ingestion")
        .with("dataset_location", "EU")
        .with("disable_type_dedupe", false)
        .with(
            "loading_method",
            Body::new().with("gcs_staging", gcs_staging),
        )
        .with("project_id", "${local.bigquery_gcp_project}")
        .with("transformation_priority", "interactive");

    let attributes = Body::new()
        .with("name", "BigQuery")
        .with("configuration", configuration)
        .with("definition_id", DESTINATION_DEFINITION_ID)
        .with("workspace_id", Value::expr("var.WORKSPACE_ID"));

    DeclarativeBlock::new(DESTINATION_TYPE, DESTINATION_LABEL, attributes)
}

fn terraform_block() -> Block {
    let mut required = Block::new("required_providers", std::iter::empty::<String>());
    for (name, source, version) in PROVIDERS {
        required = required.attr(
            *name,
            Body::new().with("source", *source).with("version", *version),
        );
    }

    Block::new("terraform", std::iter::empty::<String>())
        .block(required)
        .block(Block::new("backend", ["gcs"]))
}

fn provider_block() -> Block {
    Block::new("provider", ["airbyte"])
        .attr("password", Value::expr("var.AIRBYTE_CLIENT_SECRET"))
        .attr("username", Value::expr("var.AIRBYTE_CLIENT_ID"))
        .attr("server_url", "${var.AIRBYTE_URL}/api/public/v1")
}

fn variable(name: &str, description: &str, sensitive: bool) -> Block {
    let block = Block::new("variable", [name]).attr("description", description);
    if sensitive {
        block.attr("sensitive", true)
    } else {
        block
    }
}

fn env_description(envs: &EnvironmentSet) -> String {
    let quoted: Vec<String> = envs.iter().map(|env| format!("'{env}'")).collect();
    format!("Environment. One of {}", quoted.join(", "))
}

fn secret_version(label: &str, suffix: &str) -> Block {
    Block::new("data", [SECRET_VERSION_TYPE, label])
        .attr("project", Value::expr("local.bigquery_gcp_project"))
        .attr("secret", format!("${{local.bigquery_gcp_project}}-{suffix}"))
        .attr("version", "latest")
}

fn secret_data(label: &str) -> Value {
    Value::expr(format!("data.{SECRET_VERSION_TYPE}.{label}.secret_data"))
}
