//! Parsing of command-line references and `field=value` assignments.

use anyhow::{bail, Context, Result};
use serde_json::{json, Value};
use tracker_types::models::{FieldKind, FieldValue, RichText};
use tracker_types::WORK_ITEM;

/// How a work item was named on the command line.
#[derive(Debug, PartialEq, Eq)]
pub enum ItemRef<'a> {
    Uri(&'a str),
    Id { project: &'a str, id: &'a str },
}

pub fn parse_reference(reference: &str) -> Result<ItemRef<'_>> {
    if reference.contains("${WorkItem}") {
        return Ok(ItemRef::Uri(reference));
    }
    match reference.split_once('/') {
        Some((project, id)) if !project.is_empty() && !id.is_empty() && !id.contains('/') => {
            Ok(ItemRef::Id { project, id })
        },
        _ => bail!("expected a work item URI or PROJECT/ID, got {reference:?}"),
    }
}

/// Parse `field=value` into a schema-checked field value. `null` clears.
pub fn parse_assignment(assignment: &str) -> Result<(&str, Option<FieldValue>)> {
    let (name, raw) = assignment
        .split_once('=')
        .with_context(|| format!("expected field=value, got {assignment:?}"))?;
    let spec = WORK_ITEM.require(name)?;
    let value = parse_value(spec.kind, raw).with_context(|| format!("invalid value for {name}"))?;
    Ok((name, value))
}

fn parse_value(kind: FieldKind, raw: &str) -> Result<Option<FieldValue>> {
    // Bare words are taken as strings.
    let parsed = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    let value = match (kind, parsed) {
        (_, Value::Null) => return Ok(None),
        (FieldKind::Enum, Value::String(id)) => json!({ "id": id }),
        (FieldKind::EnumList, Value::Array(items)) => Value::Array(
            items
                .into_iter()
                .map(|item| match item {
                    Value::String(id) => json!({ "id": id }),
                    other => other,
                })
                .collect(),
        ),
        (FieldKind::Rich, Value::String(html)) => serde_json::to_value(RichText::html(html))?,
        (_, other) => other,
    };
    let value = serde_json::from_value(json!({ "kind": kind.as_str(), "value": value }))?;
    Ok(Some(value))
}
