use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;

use crate::parser::study::Study;

/// One email as delivered by the mail-retrieval side: either raw HTML or an
/// already-structured study list. When `studies` is present it is the
/// authoritative source and `rawHtml` is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmailInput {
    pub id: String,
    pub received_at: Option<DateTime<Utc>>,
    pub subject: String,
    pub from: String,
    pub raw_html: Option<String>,
    pub alert_query: String,
    pub studies: Option<Vec<RawStudy>>,
}

/// Pre-structured study entry with every field optional; missing fields
/// become empty strings and fall to the validity filter downstream.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawStudy {
    pub title: Option<String>,
    pub url: Option<String>,
    pub summary: Option<String>,
}

impl RawStudy {
    pub fn to_study(&self) -> Study {
        Study {
            title: self.title.clone().unwrap_or_default(),
            url: self.url.clone().unwrap_or_default(),
            summary: self.summary.clone().unwrap_or_default(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Payload {
    Envelope { emails: Vec<EmailInput> },
    List(Vec<EmailInput>),
    Single(EmailInput),
}

/// Load emails from a JSON file (`{"emails": [...]}` envelope, bare array,
/// or single object), a single HTML file, or a directory of such files.
/// Directory entries are processed in file-name order for determinism.
pub fn load_emails(path: &Path) -> Result<Vec<EmailInput>> {
    if path.is_dir() {
        let mut files: Vec<PathBuf> = fs::read_dir(path)
            .with_context(|| format!("reading directory {}", path.display()))?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|p| p.is_file())
            .collect();
        files.sort();

        let mut emails = Vec::new();
        for file in files {
            match file.extension().and_then(|e| e.to_str()) {
                Some("json") => emails.extend(load_json(&file)?),
                Some("html") | Some("htm") => emails.push(email_from_html(&file)?),
                _ => debug!(file = %file.display(), "skipping non-email file"),
            }
        }
        Ok(emails)
    } else {
        match path.extension().and_then(|e| e.to_str()) {
            Some("html") | Some("htm") => Ok(vec![email_from_html(path)?]),
            _ => load_json(path),
        }
    }
}

fn load_json(path: &Path) -> Result<Vec<EmailInput>> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let payload: Payload =
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
    Ok(match payload {
        Payload::Envelope { emails } => emails,
        Payload::List(emails) => emails,
        Payload::Single(email) => vec![email],
    })
}

fn email_from_html(path: &Path) -> Result<EmailInput> {
    let raw_html =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let id = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("email")
        .to_string();
    Ok(EmailInput {
        id,
        raw_html: Some(raw_html),
        ..Default::default()
    })
}

// ── Tests ──
