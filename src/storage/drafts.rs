//! Draft snapshots of in-progress forms
//!
//! Each session writes `<drafts dir>/<session id>.json`. The file is replaced
//! atomically on every save so a crash mid-write never leaves a torn draft.

use super::{ensure_dir, read_json, write_json, FileResult};
use crate::answers::FormData;
use crate::session::AutoSaveSink;
use crate::utils::ResultExt;
use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Current draft file format version
const DRAFT_FILE_VERSION: u32 = 1;

/// On-disk draft
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftFile {
    pub version: u32,
    pub session_id: String,
    pub form_title: String,
    pub saved_at: DateTime<Utc>,
    pub data: FormData,
}

/// Listing entry for a stored draft
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DraftSummary {
    pub session_id: String,
    pub form_title: String,
    pub saved_at: DateTime<Utc>,
    pub field_count: usize,
}

/// Get the file path for a session's draft
pub fn draft_file_path(drafts_dir: &Path, session_id: &str) -> PathBuf {
    drafts_dir.join(format!("{}.json", session_id))
}

/// Write a draft snapshot
pub fn save_draft(
    drafts_dir: &Path,
    session_id: &str,
    form_title: &str,
    data: &FormData,
) -> FileResult<PathBuf> {
    ensure_dir(drafts_dir)?;
    let file_path = draft_file_path(drafts_dir, session_id);

    let draft = DraftFile {
        version: DRAFT_FILE_VERSION,
        session_id: session_id.to_string(),
        form_title: form_title.to_string(),
        saved_at: Utc::now(),
        data: data.clone(),
    };

    write_json(&file_path, &draft)?;

    log::debug!("[Drafts] Saved draft {} to {:?}", session_id, file_path);
    Ok(file_path)
}

/// Read a draft, `None` when the session has never been saved
pub fn load_draft(drafts_dir: &Path, session_id: &str) -> FileResult<Option<DraftFile>> {
    let file_path = draft_file_path(drafts_dir, session_id);
    if !file_path.exists() {
        return Ok(None);
    }
    let draft: DraftFile = read_json(&file_path)?;
    if draft.version > DRAFT_FILE_VERSION {
        log::warn!(
            "[Drafts] Draft {} was written by a newer version ({}), reading it anyway",
            session_id,
            draft.version
        );
    }
    Ok(Some(draft))
}

/// Delete a draft file
pub fn delete_draft(drafts_dir: &Path, session_id: &str) -> FileResult<()> {
    let file_path = draft_file_path(drafts_dir, session_id);

    if file_path.exists() {
        fs::remove_file(&file_path).with_context("Failed to delete draft file")?;
        log::info!("[Drafts] Deleted draft file: {:?}", file_path);
    }
    Ok(())
}

/// List all drafts, newest first. Unreadable files are skipped.
pub fn list_drafts(drafts_dir: &Path) -> FileResult<Vec<DraftSummary>> {
    if !drafts_dir.exists() {
        return Ok(Vec::new());
    }

    let entries = fs::read_dir(drafts_dir).with_context("Failed to read drafts directory")?;

    let mut drafts = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().map_or(true, |ext| ext != "json") {
            continue;
        }
        match read_json::<DraftFile>(&path) {
            Ok(draft) => drafts.push(DraftSummary {
                field_count: draft.data.len(),
                session_id: draft.session_id,
                form_title: draft.form_title,
                saved_at: draft.saved_at,
            }),
            Err(e) => log::warn!("[Drafts] Skipping unreadable draft: {}", e),
        }
    }

    drafts.sort_by(|a, b| b.saved_at.cmp(&a.saved_at));
    Ok(drafts)
}

/// Auto-save sink that writes draft files
#[derive(Debug, Clone)]
pub struct FileDraftSink {
    drafts_dir: PathBuf,
    session_id: String,
    form_title: String,
}

impl FileDraftSink {
    pub fn new(drafts_dir: impl Into<PathBuf>, session_id: &str, form_title: &str) -> Self {
        Self {
            drafts_dir: drafts_dir.into(),
            session_id: session_id.to_string(),
            form_title: form_title.to_string(),
        }
    }

    pub fn path(&self) -> PathBuf {
        draft_file_path(&self.drafts_dir, &self.session_id)
    }

    /// Answers from the last saved draft, if any
    pub fn load(&self) -> FileResult<Option<FormData>> {
        Ok(load_draft(&self.drafts_dir, &self.session_id)?.map(|d| d.data))
    }

    pub fn delete(&self) -> FileResult<()> {
        delete_draft(&self.drafts_dir, &self.session_id)
    }
}

#[async_trait]
impl AutoSaveSink for FileDraftSink {
    async fn save(&self, data: &FormData) -> anyhow::Result<()> {
        let sink = self.clone();
        let data = data.clone();
        tokio::task::spawn_blocking(move || {
            save_draft(&sink.drafts_dir, &sink.session_id, &sink.form_title, &data)
        })
        .await
        .map_err(|e| anyhow!("Draft writer task failed: {}", e))?
        .map_err(|e| anyhow!(e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answers::FieldValue;
    use tempfile::TempDir;

    fn sample(title: &str) -> FormData {
        let mut data = FormData::new();
        data.insert("rfq_title".to_string(), FieldValue::from(title));
        data.insert("budget".to_string(), FieldValue::Number(50000.0));
        data
    }

    #[test]
    fn test_save_and_load_draft() {
        let temp_dir = TempDir::new().unwrap();
        let path = save_draft(temp_dir.path(), "s1", "Vendor RFQ", &sample("CRM")).unwrap();
        assert!(path.ends_with("s1.json"));

        let draft = load_draft(temp_dir.path(), "s1").unwrap().unwrap();
        assert_eq!(draft.version, DRAFT_FILE_VERSION);
        assert_eq!(draft.form_title, "Vendor RFQ");
        assert_eq!(draft.data, sample("CRM"));
    }

    #[test]
    fn test_load_missing_draft() {
        let temp_dir = TempDir::new().unwrap();
        assert!(load_draft(temp_dir.path(), "nope").unwrap().is_none());
    }

    #[test]
    fn test_list_and_delete_drafts() {
        let temp_dir = TempDir::new().unwrap();
        save_draft(temp_dir.path(), "a", "Form A", &sample("A")).unwrap();
        save_draft(temp_dir.path(), "b", "Form B", &sample("B")).unwrap();
        fs::write(temp_dir.path().join("junk.json"), "not json").unwrap();
        fs::write(temp_dir.path().join("notes.txt"), "ignored").unwrap();

        let drafts = list_drafts(temp_dir.path()).unwrap();
        assert_eq!(drafts.len(), 2);
        assert!(drafts.iter().all(|d| d.field_count == 2));

        delete_draft(temp_dir.path(), "a").unwrap();
        let drafts = list_drafts(temp_dir.path()).unwrap();
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].session_id, "b");
    }

    #[tokio::test]
    async fn test_file_sink_overwrites_draft() {
        let temp_dir = TempDir::new().unwrap();
        let sink = FileDraftSink::new(temp_dir.path().join("drafts"), "s1", "Vendor RFQ");

        sink.save(&sample("first")).await.unwrap();
        sink.save(&sample("second")).await.unwrap();

        assert_eq!(sink.load().unwrap(), Some(sample("second")));

        sink.delete().unwrap();
        assert!(!sink.path().exists());
    }
}
