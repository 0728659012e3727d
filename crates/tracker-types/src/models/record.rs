//! Raw records and partial updates.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use super::{FieldValue, RawLink};
use crate::schema::field;

/// A record as fetched from the server, before any local tracking.
///
/// Only fields the server filled in are present; a missing key and an
/// explicit null are the same thing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord {
    #[serde(deserialize_with = "skip_null_fields")]
    fields: BTreeMap<String, FieldValue>,
}

fn skip_null_fields<'de, D>(deserializer: D) -> Result<BTreeMap<String, FieldValue>, D::Error>
where
    D: Deserializer<'de>,
{
    let fields = BTreeMap::<String, Option<FieldValue>>::deserialize(deserializer)?;
    Ok(fields.into_iter().filter_map(|(name, value)| value.map(|v| (name, v))).collect())
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, handy for constructing fixtures and new records.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut FieldValue> {
        self.fields.get_mut(name)
    }

    /// Set or clear a field. Returns the previous value.
    pub fn set(&mut self, name: impl Into<String>, value: Option<FieldValue>) -> Option<FieldValue> {
        let name = name.into();
        match value {
            Some(v) => self.fields.insert(name, v),
            None => self.fields.remove(&name),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(FieldValue::as_text)
    }

    pub fn uri(&self) -> Option<&str> {
        self.text(field::URI)
    }

    pub fn id(&self) -> Option<&str> {
        self.text(field::ID)
    }

    /// Identifier of the owning project, if the server sent one.
    pub fn project_id(&self) -> Option<&str> {
        match self.fields.get(field::PROJECT) {
            Some(FieldValue::Project(p)) => Some(p.id.as_str()),
            _ => None,
        }
    }

    /// Whether the server flagged this record as unresolvable.
    pub fn is_unresolvable(&self) -> bool {
        self.fields.get(field::UNRESOLVABLE).and_then(FieldValue::as_bool).unwrap_or(false)
    }

    /// Raw edges stored under `name`; `None` when the collection is absent.
    pub fn links(&self, name: &str) -> Option<&[RawLink]> {
        match self.fields.get(name) {
            Some(FieldValue::Links(links)) => Some(links.as_slice()),
            _ => None,
        }
    }
}

/// Changed fields of a record, as sent in a partial update.
///
/// `None` clears the field on the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldDelta {
    changes: BTreeMap<String, Option<FieldValue>>,
}

impl FieldDelta {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Option<FieldValue>) {
        self.changes.insert(name.into(), value);
    }

    /// Value the field changes to; outer `None` when the field is unchanged.
    pub fn get(&self, name: &str) -> Option<Option<&FieldValue>> {
        self.changes.get(name).map(Option::as_ref)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.changes.contains_key(name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.changes.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&FieldValue>)> {
        self.changes.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}
