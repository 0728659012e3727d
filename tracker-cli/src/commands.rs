use std::sync::Arc;

use anyhow::{bail, Context, Result};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, Color, Table};
use serde_json::json;
use tracing::info;
use tracker_core::{RoleFilter, Session, WorkItem};
use tracker_types::models::FieldValue;

use crate::values::{parse_assignment, parse_reference, ItemRef};

pub fn load(session: &Arc<dyn Session>, reference: &str) -> Result<WorkItem> {
    let item = match parse_reference(reference)? {
        ItemRef::Uri(uri) => WorkItem::from_uri(Arc::clone(session), uri),
        ItemRef::Id { project, id } => WorkItem::from_id(Arc::clone(session), project, id),
    };
    item.with_context(|| format!("failed to load {reference}"))
}

fn display(value: &FieldValue) -> String {
    match value {
        FieldValue::Text(s) | FieldValue::Duration(s) => s.clone(),
        FieldValue::Enum(e) => e.id.clone(),
        FieldValue::Rich(text) => text.text().to_string(),
        FieldValue::User(user) => user.id.clone(),
        FieldValue::Users(users) => users.iter().map(|u| u.id.as_str()).collect::<Vec<_>>().join(", "),
        FieldValue::Links(links) => format!("{} links", links.len()),
        FieldValue::Comments(comments) => format!("{} comments", comments.len()),
        FieldValue::Attachments(files) => format!("{} attachments", files.len()),
        other => serde_json::to_value(other).map(|v| v["value"].to_string()).unwrap_or_default(),
    }
}

pub fn show(session: &Arc<dyn Session>, reference: &str, json: bool) -> Result<()> {
    let item = load(session, reference)?;

    if json {
        println!("{}", serde_json::to_string_pretty(item.fields())?);
        return Ok(());
    }

    println!("{} {}", item.id().bold(), item.title().unwrap_or("-"));
    println!("{}", item.url().dimmed());

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Field", "Value"]);
    for (name, value) in item.fields().iter() {
        table.add_row(vec![Cell::new(name), Cell::new(display(value))]);
    }
    if let Some(document) = item.document_name() {
        table.add_row(vec![Cell::new("document").fg(Color::Cyan), Cell::new(document)]);
    }

    println!("{table}");
    Ok(())
}

pub fn links(session: &Arc<dyn Session>, reference: &str, roles: Vec<String>, back: bool, json: bool) -> Result<()> {
    let item = load(session, reference)?;
    let filter = RoleFilter::new(roles);
    let edges: Vec<_> = if back {
        item.back_linked_edges(filter).collect()
    } else {
        item.linked_edges(filter).collect()
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&edges)?);
        return Ok(());
    }

    if edges.is_empty() {
        println!("{}", "No links found.".yellow());
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Role", "Target"]);
    for edge in &edges {
        table.add_row(vec![Cell::new(&edge.role), Cell::new(&edge.target)]);
    }

    println!("{table}");
    println!("\n{} links total", edges.len());
    Ok(())
}

pub fn set(session: &Arc<dyn Session>, reference: &str, assignments: &[String], json: bool) -> Result<()> {
    let changes = assignments.iter().map(|a| parse_assignment(a)).collect::<Result<Vec<_>>>()?;
    let mut item = load(session, reference)?;

    let mut scope = item.with_deferred_save();
    for (name, value) in changes {
        scope.set_field(name, value)?;
    }
    let sent = scope.diff();
    scope.finish().context("failed to save changes")?;

    let names: Vec<&str> = sent.field_names().collect();
    if json {
        println!("{}", json!({ "uri": item.uri(), "updated": names }));
    } else if names.is_empty() {
        println!("{}", "Nothing to update.".yellow());
    } else {
        info!(uri = %item.uri(), fields = ?names, "Work item updated");
        println!("{} {}", "✓ Updated".green(), names.join(", "));
    }
    Ok(())
}

pub fn status(session: &Arc<dyn Session>, reference: &str, status: &str) -> Result<()> {
    let mut item = load(session, reference)?;

    if !item.set_status(status)? {
        let available = item.available_status()?;
        bail!("status {status:?} is not available for {} (available: {})", item.id(), available.join(", "));
    }

    println!("{} {} is now {}", "✓".green(), item.id(), status.bold());
    Ok(())
}

pub fn actions(session: &Arc<dyn Session>, reference: &str, perform: Option<&str>, json: bool) -> Result<()> {
    let mut item = load(session, reference)?;

    if let Some(name) = perform {
        if !item.perform_action(name)? {
            bail!("action {name:?} is not available for {}", item.id());
        }
        println!("{} {} performed, status is {}", "✓".green(), name, item.status_id().unwrap_or("-"));
        return Ok(());
    }

    let actions = item.available_actions()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&actions)?);
        return Ok(());
    }

    if actions.is_empty() {
        println!("{}", "No workflow actions available.".yellow());
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Id", "Action", "Name", "Requires"]);
    for action in &actions {
        table.add_row(vec![
            Cell::new(action.action_id),
            Cell::new(&action.native_action_id),
            Cell::new(&action.action_name),
            Cell::new(action.required_features.join(", ")),
        ]);
    }

    println!("{table}");
    Ok(())
}
