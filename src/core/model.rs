//! Wire-level data model — folders and image metadata as the gallery API
//! returns them.
//!
//! Records are immutable once decoded; the controller only ever replaces a
//! whole listing.

use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Deserializer, Serialize};

// ───────────────────────────────────────── folders ───────────

/// One node of the remote folder tree.  `name` is a single path segment;
/// the full path is derived by walking from the root (see
/// [`crate::core::folders`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    pub name: String,
    #[serde(default)]
    pub children: Vec<Folder>,
}

impl Folder {
    pub fn new(name: impl Into<String>, children: Vec<Folder>) -> Self {
        Self {
            name: name.into(),
            children,
        }
    }

    pub fn leaf(name: impl Into<String>) -> Self {
        Self::new(name, Vec::new())
    }
}

// ───────────────────────────────────────── images ────────────

/// Metadata for a single stored image.  `path` is repository-relative and
/// is the record's identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub path: String,
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    /// Modification time in epoch seconds.  The server reports a float
    /// `mtime`; fractional seconds are dropped.
    #[serde(deserialize_with = "epoch_seconds")]
    pub date: i64,
}

impl ImageRecord {
    /// Both dimensions, when the server could read them.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        match (self.width, self.height) {
            (Some(w), Some(h)) if w > 0 && h > 0 => Some((w, h)),
            _ => None,
        }
    }

    /// Folder the record lives in (everything before the last `/`).
    pub fn folder(&self) -> &str {
        self.path.rsplit_once('/').map_or("", |(dir, _)| dir)
    }

    /// Lower-cased extension of `name`, if any.
    pub fn extension(&self) -> Option<String> {
        self.name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .filter(|ext| !ext.is_empty())
    }

    /// `"123.45 KB"` — the unit the gallery has always shown.
    pub fn size_label(&self) -> String {
        format!("{:.2} KB", self.size as f64 / 1024.0)
    }

    /// Local timestamp for display.
    pub fn modified(&self) -> Option<DateTime<Local>> {
        Local.timestamp_opt(self.date, 0).single()
    }

    pub fn date_label(&self) -> String {
        self.modified()
            .map(|dt| dt.format("%Y-%m-%d %H:%M:%S %Z").to_string())
            .unwrap_or_else(|| "unknown".into())
    }
}

fn epoch_seconds<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let secs = f64::deserialize(deserializer)?;
    if !secs.is_finite() {
        return Err(serde::de::Error::custom("date is not a finite number"));
    }
    Ok(secs.floor() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_server_listing_with_float_dates() {
        let json = r#"[
            {"name":"a.png","path":"trips/a.png","size":2048,"date":1700000000.75,"width":640,"height":480},
            {"name":"b.mov","path":"trips/b.mov","size":10,"date":1700000001}
        ]"#;
        let records: Vec<ImageRecord> = serde_json::from_str(json).unwrap();
        assert_eq!(records[0].date, 1_700_000_000);
        assert_eq!(records[0].dimensions(), Some((640, 480)));
        assert_eq!(records[1].date, 1_700_000_001);
        assert_eq!(records[1].dimensions(), None);
    }

    #[test]
    fn folder_tree_children_default_to_empty() {
        let json = r#"[{"name":"a","children":[{"name":"b"}]}]"#;
        let tree: Vec<Folder> = serde_json::from_str(json).unwrap();
        assert_eq!(tree, vec![Folder::new("a", vec![Folder::leaf("b")])]);
    }

    #[test]
    fn record_helpers() {
        let rec = ImageRecord {
            path: "2024/summer/IMG_1.JPG".into(),
            name: "IMG_1.JPG".into(),
            size: 1536,
            width: None,
            height: Some(10),
            date: 0,
        };
        assert_eq!(rec.folder(), "2024/summer");
        assert_eq!(rec.extension().as_deref(), Some("jpg"));
        assert_eq!(rec.size_label(), "1.50 KB");
        assert_eq!(rec.dimensions(), None);
    }
}
