//! Client-side filtering of an image listing.
//!
//! Every criterion is an independent predicate; they are ANDed together and
//! a criterion left at its default imposes no constraint.  Filtering is
//! stable — survivors keep their relative order.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use super::error::GalleryError;
use super::model::ImageRecord;

const SMALL_LIMIT: u64 = 100 * 1024;
const LARGE_FROM: u64 = 1000 * 1024;
const MS_PER_DAY: i64 = 86_400 * 1000;

/// Age windows offered by the filter bar, in days (`None` = all time).
pub const AGE_PRESETS: &[Option<u32>] = &[None, Some(1), Some(7), Some(30)];

// ───────────────────────────────────────── size class ────────

/// Coarse size buckets.  Boundaries are half-open: exactly 100 KB is
/// `Medium`, exactly 1000 KB is `Large`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum SizeClass {
    #[default]
    Any,
    Small,
    Medium,
    Large,
}

impl SizeClass {
    pub const ALL: &[SizeClass] = &[
        SizeClass::Any,
        SizeClass::Small,
        SizeClass::Medium,
        SizeClass::Large,
    ];

    /// Bucket for a byte count (never `Any`).
    pub fn classify(bytes: u64) -> Self {
        if bytes < SMALL_LIMIT {
            SizeClass::Small
        } else if bytes < LARGE_FROM {
            SizeClass::Medium
        } else {
            SizeClass::Large
        }
    }

    pub fn matches(self, bytes: u64) -> bool {
        self == SizeClass::Any || self == Self::classify(bytes)
    }

    /// Next value in the filter bar's cycle.
    pub fn cycle(self) -> Self {
        let idx = Self::ALL.iter().position(|c| *c == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn label(self) -> &'static str {
        match self {
            SizeClass::Any => "All sizes",
            SizeClass::Small => "Small (<100 KB)",
            SizeClass::Medium => "Medium (100 KB–1 MB)",
            SizeClass::Large => "Large (>1 MB)",
        }
    }
}

impl fmt::Display for SizeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SizeClass::Any => "any",
            SizeClass::Small => "small",
            SizeClass::Medium => "medium",
            SizeClass::Large => "large",
        })
    }
}

impl FromStr for SizeClass {
    type Err = GalleryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "any" | "all" => Ok(SizeClass::Any),
            "small" => Ok(SizeClass::Small),
            "medium" => Ok(SizeClass::Medium),
            "large" => Ok(SizeClass::Large),
            other => Err(GalleryError::validation(
                "size",
                format!("unknown size class '{other}' (any, small, medium, large)"),
            )),
        }
    }
}

/// Human label for an age window.
pub fn age_label(days: Option<u32>) -> String {
    match days {
        None => "All time".into(),
        Some(1) => "Last 24 hours".into(),
        Some(d) => format!("Last {d} days"),
    }
}

/// Next age preset after `days` (unknown values restart the cycle).
pub fn cycle_age(days: Option<u32>) -> Option<u32> {
    let idx = AGE_PRESETS.iter().position(|d| *d == days);
    match idx {
        Some(i) => AGE_PRESETS[(i + 1) % AGE_PRESETS.len()],
        None => AGE_PRESETS[0],
    }
}

// ───────────────────────────────────────── criteria ──────────

/// The active filter.  `Default` filters nothing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterCriteria {
    /// Case-insensitive substring of the record name.
    pub name_pattern: String,
    pub size_class: SizeClass,
    /// Only records no older than this many days.
    pub max_age_days: Option<u32>,
}

/// A partial update to [`FilterCriteria`]; `None` fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CriteriaPatch {
    pub name_pattern: Option<String>,
    pub size_class: Option<SizeClass>,
    pub max_age_days: Option<Option<u32>>,
}

impl CriteriaPatch {
    pub fn name(pattern: impl Into<String>) -> Self {
        Self {
            name_pattern: Some(pattern.into()),
            ..Self::default()
        }
    }

    pub fn size(class: SizeClass) -> Self {
        Self {
            size_class: Some(class),
            ..Self::default()
        }
    }

    pub fn max_age(days: Option<u32>) -> Self {
        Self {
            max_age_days: Some(days),
            ..Self::default()
        }
    }
}

impl FilterCriteria {
    pub fn merge(&mut self, patch: CriteriaPatch) {
        if let Some(name) = patch.name_pattern {
            self.name_pattern = name;
        }
        if let Some(size) = patch.size_class {
            self.size_class = size;
        }
        if let Some(age) = patch.max_age_days {
            self.max_age_days = age;
        }
    }

    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Compile into a predicate evaluated against a fixed `now`.
    fn compile(&self, now: DateTime<Utc>) -> Predicate {
        Predicate {
            needle: self.name_pattern.to_lowercase(),
            size_class: self.size_class,
            cutoff_ms: self
                .max_age_days
                .map(|days| now.timestamp_millis() - i64::from(days) * MS_PER_DAY),
        }
    }
}

struct Predicate {
    needle: String,
    size_class: SizeClass,
    cutoff_ms: Option<i64>,
}

impl Predicate {
    fn accepts(&self, record: &ImageRecord) -> bool {
        if !self.needle.is_empty() && !record.name.to_lowercase().contains(&self.needle) {
            return false;
        }
        if !self.size_class.matches(record.size) {
            return false;
        }
        match self.cutoff_ms {
            Some(cutoff) => record.date.saturating_mul(1000) >= cutoff,
            None => true,
        }
    }
}

/// Reduce `images` to the records matching `criteria`, preserving order.
pub fn apply(images: &[ImageRecord], criteria: &FilterCriteria, now: DateTime<Utc>) -> Vec<ImageRecord> {
    if criteria.is_default() {
        return images.to_vec();
    }
    let predicate = criteria.compile(now);
    images
        .iter()
        .filter(|record| predicate.accepts(record))
        .cloned()
        .collect()
}
