//! File attachments.

use std::fs;
use std::path::Path;

use tracing::debug;
use tracker_types::models::{AttachmentInfo, FieldValue};
use tracker_types::schema::field;
use tracker_types::{RecordError, Result};

use super::WorkItem;

impl WorkItem {
    pub fn has_attachment(&self) -> bool {
        matches!(self.known(field::ATTACHMENTS), Some(FieldValue::Attachments(_)))
    }

    pub fn attachments(&self) -> &[AttachmentInfo] {
        match self.known(field::ATTACHMENTS) {
            Some(FieldValue::Attachments(list)) => list,
            _ => &[],
        }
    }

    pub fn attachment_info(&self, attachment_id: &str) -> Option<&AttachmentInfo> {
        self.attachments().iter().find(|a| a.id == attachment_id)
    }

    /// Download attachment content.
    pub fn attachment(&self, attachment_id: &str) -> Result<Vec<u8>> {
        self.ensure_live()?;
        self.session.get_attachment(&self.uri, attachment_id)
    }

    pub fn save_attachment_as_file(&self, attachment_id: &str, path: &Path) -> Result<()> {
        let data = self.attachment(attachment_id)?;
        fs::write(path, &data).map_err(|e| RecordError::from_io_error(path, &e))?;
        debug!(uri = %self.uri, attachment_id, path = %path.display(), bytes = data.len(), "Saved attachment");
        Ok(())
    }

    /// Upload a file as a new attachment. The stored file name is the last
    /// component of `path`.
    pub fn add_attachment(&mut self, path: &Path, title: &str) -> Result<()> {
        let (file_name, data) = read_upload(path)?;
        self.add_attachment_data(&data, title, &file_name)
    }

    pub fn add_attachment_data(&mut self, data: &[u8], title: &str, file_name: &str) -> Result<()> {
        self.ensure_live()?;
        self.session.create_attachment(&self.uri, file_name, title, data)?;
        self.reload()
    }

    /// Replace the content of an existing attachment with a file.
    pub fn update_attachment(&mut self, attachment_id: &str, path: &Path, title: &str) -> Result<()> {
        let (file_name, data) = read_upload(path)?;
        self.update_attachment_data(attachment_id, &data, title, &file_name)
    }

    pub fn update_attachment_data(
        &mut self,
        attachment_id: &str,
        data: &[u8],
        title: &str,
        file_name: &str,
    ) -> Result<()> {
        self.ensure_live()?;
        self.session.update_attachment(&self.uri, attachment_id, file_name, title, data)?;
        self.reload()
    }

    pub fn delete_attachment(&mut self, attachment_id: &str) -> Result<()> {
        self.ensure_live()?;
        self.session.delete_attachment(&self.uri, attachment_id)?;
        self.reload()
    }
}

fn read_upload(path: &Path) -> Result<(String, Vec<u8>)> {
    let data = fs::read(path).map_err(|e| RecordError::from_io_error(path, &e))?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| RecordError::Io { path: path.display().to_string(), message: "not a file path".to_string() })?;
    Ok((file_name, data))
}
