//! Conversion of captured configurations into resource blocks.
//!
//! Connectors (sources and destinations) keep their whole captured
//! configuration, minus bookkeeping fields. Connections are rebuilt from a
//! curated set of attributes, with canonical values taken from the
//! reference environment and stream settings taken from the checkout.

use crate::error::{Error, Result};
use crate::links::SourceLinkTable;
use crate::resolver::MatchGroup;
use crate::resource_file::ResourceFile;
use hclkit::{Block, Body, Value, writer};
use registry::{ResourceKind, ResourceRecord};

/// Checkout fields that never reach the output.
const DROPPED_FIELDS: &[&str] = &["definition_type", "definition_version"];

/// Resource type of every connection block.
pub const CONNECTION_TYPE: &str = "airbyte_connection";

/// Placeholder left for schedules that have no cron equivalent yet.
pub const CRON_PLACEHOLDER: &str = "TODO: Convert to CRON";

/// A resource block ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct DeclarativeBlock {
    /// Resource type token (`airbyte_source_github`).
    pub resource_type: String,
    /// Resource label.
    pub resource_label: String,
    /// Attributes, in emission order.
    pub attributes: Body,
}

impl DeclarativeBlock {
    /// Create a block.
    pub fn new(
        resource_type: impl Into<String>,
        resource_label: impl Into<String>,
        attributes: Body,
    ) -> Self {
        Self {
            resource_type: resource_type.into(),
            resource_label: resource_label.into(),
            attributes,
        }
    }

    /// `<type>.<label>`, the block's address in references and imports.
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}.{}", self.resource_type, self.resource_label)
    }

    /// The `resource` block.
    #[must_use]
    pub fn to_block(&self) -> Block {
        Block::resource(&self.resource_type, &self.resource_label).with_body(self.attributes.clone())
    }

    /// Serialized `resource` block.
    #[must_use]
    pub fn render(&self) -> String {
        writer::write_string(&self.to_block())
    }
}

/// Values connection emission reads besides the checkout file.
#[derive(Debug, Clone, Copy)]
pub struct EmitContext<'a> {
    /// Environment whose record supplies canonical values.
    pub reference: &'a str,
    /// Address of the destination every connection writes to.
    pub destination_address: &'a str,
}

/// Block label for a checkout folder name: whitespace becomes `_`.
#[must_use]
pub fn resource_label(folder: &str) -> String {
    folder
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect()
}

/// Resource type for a connector image: `airbyte/source-github` becomes
/// `airbyte_source_github`.
#[must_use]
pub fn resource_type_from_image(image: &str) -> String {
    image.replace(['/', '-'], "_")
}

/// Provider sync mode for a stream's source and destination modes.
#[must_use]
pub fn sync_mode(source: &str, destination: &str) -> String {
    if source == "incremental" && destination == "append_dedup" {
        "incremental_deduped_history".to_string()
    } else {
        format!("{source}_{destination}")
    }
}

/// Convert a source or destination file into a block.
///
/// The captured fields are kept in order, then `name` and `workspace_id`
/// are appended.
///
/// # Errors
///
/// Returns `Error::InvalidConfig` if the file is a connection, is not a
/// mapping, or lacks `resource_name` or `definition_image`.
pub fn emit_connector(
    kind: ResourceKind,
    file: &ResourceFile,
    workspace_ref: &str,
) -> Result<DeclarativeBlock> {
    if kind == ResourceKind::Connection {
        return Err(Error::invalid_config(
            &file.label,
            "connections are not connectors",
        ));
    }

    let fields = file
        .content
        .as_object()
        .ok_or_else(|| Error::invalid_config(&file.label, "expected a mapping"))?;
    let name = file.resource_name()?;
    let image = file.str_field("definition_image")?;

    let mut attributes = Body::new();
    for (key, value) in fields {
        if matches!(key.as_str(), "resource_name" | "definition_image")
            || DROPPED_FIELDS.contains(&key.as_str())
        {
            continue;
        }
        attributes.set(key.clone(), value);
    }
    attributes.set("name", name);
    attributes.set("workspace_id", Value::interpolation(workspace_ref));

    let block = DeclarativeBlock::new(
        resource_type_from_image(image),
        resource_label(&file.label),
        attributes,
    );
    log::debug!("Emitted {kind} {}", block.address());
    Ok(block)
}

/// Build a connection block.
///
/// # Errors
///
/// Returns `Error::MissingMatch` without a record in the reference
/// environment, `Error::UnresolvedSourceReference` when the record's source
/// was not emitted, and `Error::InvalidConfig` when the record or the file
/// lacks a required field.
pub fn emit_connection(
    file: &ResourceFile,
    group: &MatchGroup,
    ctx: &EmitContext<'_>,
    links: &SourceLinkTable,
) -> Result<DeclarativeBlock> {
    let record = group.require(ctx.reference)?;

    let source_id = required(record, "sourceId")?;
    let source_address =
        links
            .address_of(source_id)
            .ok_or_else(|| Error::UnresolvedSourceReference {
                connection: record.name.clone(),
                source_id: source_id.to_string(),
            })?;

    let mut attributes = Body::new();
    attributes.set(
        "destination_id",
        Value::interpolation(&format!("{}.destination_id", ctx.destination_address)),
    );
    attributes.set("name", record.name.as_str());
    if let Some(definition) = record.str_field("namespaceDefinition") {
        attributes.set(
            "namespace_definition",
            definition.replace("customformat", "custom_format"),
        );
    }
    if let Some(format) = record.str_field("namespaceFormat") {
        attributes.set("namespace_format", format);
    }
    if let Some(preference) = record.str_field("nonBreakingChangesPreference") {
        attributes.set("non_breaking_schema_updates_behavior", preference);
    }
    attributes.set(
        "source_id",
        Value::interpolation(&format!("{source_address}.source_id")),
    );
    attributes.set("status", required(record, "status")?);
    attributes.set("schedule", schedule(record)?);
    attributes.set(
        "configurations",
        Body::new().with("streams", Value::List(streams(file)?)),
    );

    let block = DeclarativeBlock::new(
        CONNECTION_TYPE,
        format!("{CONNECTION_TYPE}_{}", resource_label(&file.label)),
        attributes,
    );
    log::debug!("Emitted connection {}", block.address());
    Ok(block)
}

fn required<'a>(record: &'a ResourceRecord, key: &str) -> Result<&'a str> {
    record
        .str_field(key)
        .ok_or_else(|| Error::invalid_config(&record.name, format!("missing `{key}`")))
}

fn schedule(record: &ResourceRecord) -> Result<Body> {
    let schedule_type = required(record, "scheduleType")?;
    let mut schedule = Body::new().with("schedule_type", schedule_type);

    match schedule_type {
        "manual" => {}
        "cron" => {
            let expression = record
                .get("scheduleData")
                .and_then(|data| data.pointer("/cron/cronExpression"))
                .and_then(serde_json::Value::as_str)
                .ok_or_else(|| Error::invalid_config(&record.name, "cron schedule without expression"))?;
            schedule.set("cron", expression);
        }
        other => {
            log::debug!("Schedule type `{other}` of {} has no cron form", record.name);
            schedule.set("cron", CRON_PLACEHOLDER);
        }
    }

    Ok(schedule)
}

fn streams(file: &ResourceFile) -> Result<Vec<Value>> {
    let streams = file
        .pointer(&["configuration", "sync_catalog", "streams"])
        .and_then(serde_json::Value::as_array)
        .ok_or_else(|| Error::invalid_config(&file.label, "missing `configuration.sync_catalog.streams`"))?;

    streams.iter().map(|stream| stream_entry(file, stream)).collect()
}

fn stream_entry(file: &ResourceFile, stream: &serde_json::Value) -> Result<Value> {
    let text = |pointer: &str| {
        stream
            .pointer(pointer)
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| Error::invalid_config(&file.label, format!("stream without `{pointer}`")))
    };
    let list = |pointer: &str| {
        stream
            .pointer(pointer)
            .map_or_else(|| Value::List(Vec::new()), Value::from)
    };

    let body = Body::new()
        .with("name", text("/stream/name")?)
        .with(
            "sync_mode",
            sync_mode(text("/config/sync_mode")?, text("/config/destination_sync_mode")?),
        )
        .with("cursor_field", list("/stream/default_cursor_field"))
        .with("primary_key", list("/config/primary_key"));

    Ok(Value::Object(body))
}
