//! Typed conveniences over the raw field table.

use std::collections::BTreeMap;

use tracker_types::models::{EnumOptionId, FieldValue, RichText, UserRef};
use tracker_types::schema::field;
use tracker_types::{RecordError, Result};

use super::WorkItem;

impl WorkItem {
    pub fn title(&self) -> Option<&str> {
        self.known(field::TITLE).and_then(FieldValue::as_text)
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> Result<()> {
        self.set_field(field::TITLE, FieldValue::Text(title.into()))
    }

    /// Description body; may contain html.
    pub fn description(&self) -> Option<&RichText> {
        self.known(field::DESCRIPTION).and_then(FieldValue::as_rich)
    }

    /// Replace the description with html content and save.
    pub fn set_description(&mut self, html: impl Into<String>) -> Result<()> {
        self.set_field(field::DESCRIPTION, FieldValue::Rich(RichText::html(html)))?;
        self.save()
    }

    fn enum_id(&self, name: &'static str) -> Option<&str> {
        self.known(name).and_then(FieldValue::as_enum).map(|e| e.id.as_str())
    }

    pub fn type_id(&self) -> Option<&str> {
        self.enum_id(field::TYPE)
    }

    pub fn status_id(&self) -> Option<&str> {
        self.enum_id(field::STATUS)
    }

    pub fn resolution_id(&self) -> Option<&str> {
        self.enum_id(field::RESOLUTION)
    }

    /// Set the resolution and save.
    pub fn set_resolution(&mut self, resolution: &str) -> Result<()> {
        self.set_field(field::RESOLUTION, FieldValue::Enum(EnumOptionId::new(resolution)))?;
        self.save()
    }

    pub fn author(&self) -> Option<&UserRef> {
        match self.known(field::AUTHOR) {
            Some(FieldValue::User(user)) => Some(user),
            _ => None,
        }
    }

    /// Server-side location path of the item.
    pub fn location(&self) -> Option<&str> {
        self.known(field::LOCATION).and_then(FieldValue::as_text)
    }

    /// Name of the containing document: the location segments between
    /// `modules` and `workitems`. `None` for items outside a document.
    pub fn document_name(&self) -> Option<String> {
        document_from_location(self.location()?)
    }

    fn custom_fields(&self) -> Option<&BTreeMap<String, FieldValue>> {
        match self.known(field::CUSTOM_FIELDS) {
            Some(FieldValue::Custom(map)) => Some(map),
            _ => None,
        }
    }

    pub fn custom_field(&self, key: &str) -> Option<&FieldValue> {
        self.custom_fields()?.get(key)
    }

    /// Write a custom field locally. The key must be one the server allows
    /// for this item.
    pub fn set_custom_field(&mut self, key: &str, value: impl Into<Option<FieldValue>>) -> Result<()> {
        if !self.is_custom_field_allowed(key) {
            return Err(RecordError::UnknownField {
                record: format!("custom fields of {}", self.id),
                field: key.to_string(),
            }
            .into());
        }
        let had_map = self.custom_fields().is_some();
        let mut map = self.custom_fields().cloned().unwrap_or_default();
        match value.into() {
            Some(v) => {
                map.insert(key.to_string(), v);
            },
            None => {
                map.remove(key);
            },
        }
        let next = if map.is_empty() && !had_map { None } else { Some(FieldValue::Custom(map)) };
        self.set_field(field::CUSTOM_FIELDS, next)
    }
}

fn document_from_location(location: &str) -> Option<String> {
    let segments: Vec<&str> = location.split('/').collect();
    let start = segments.iter().position(|s| *s == "modules")?;
    let stop = segments.iter().position(|s| *s == "workitems")?;
    segments.get(start + 1..stop).map(|inner| inner.join("/"))
}
