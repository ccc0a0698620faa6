//! Tracker Entity
//!
//! A tracked habit/activity with its display and input configuration.

use serde::{Deserialize, Serialize};

use super::entity::Entity;

/// Tracker kind determines how entries are captured and summarized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TrackerKind {
    /// Numeric count per day (glasses of water, pages read)
    #[default]
    Counter,
    /// Bounded rating scale (mood 1-5)
    Rating,
    /// Did-it-or-not check-in
    Binary,
    /// Free-text or list entries
    Text,
    /// Composite of several sub-values captured together
    Composite,
}

impl TrackerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrackerKind::Counter => "counter",
            TrackerKind::Rating => "rating",
            TrackerKind::Binary => "binary",
            TrackerKind::Text => "text",
            TrackerKind::Composite => "composite",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "rating" => TrackerKind::Rating,
            "binary" => TrackerKind::Binary,
            "text" => TrackerKind::Text,
            "composite" => TrackerKind::Composite,
            _ => TrackerKind::Counter,
        }
    }
}

/// Free-form per-tracker configuration, stored as a JSON column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TrackerConfig {
    pub unit: Option<String>,
    pub goal: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    /// Choice options for rating/list style trackers
    #[serde(default)]
    pub options: Vec<String>,
}

/// A tracked habit or activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tracker {
    /// Unique identifier
    pub id: u32,
    pub name: String,
    pub kind: TrackerKind,
    pub config: TrackerConfig,
    pub color: String,
    pub icon: String,
    pub is_favorite: bool,
    /// Created by the user rather than shipped as a preset
    pub is_custom: bool,
    /// Sortable-list order on the tracker list page
    pub position: i32,
    /// Archived trackers keep their history but leave the dashboard
    pub archived: bool,
}

impl Tracker {
    /// Create a new tracker with default appearance
    pub fn new(id: u32, name: String, kind: TrackerKind) -> Self {
        Self {
            id,
            name,
            kind,
            config: TrackerConfig::default(),
            color: String::new(),
            icon: String::new(),
            is_favorite: false,
            is_custom: false,
            position: 0,
            archived: false,
        }
    }
}

impl Entity for Tracker {
    type Id = u32;

    fn id(&self) -> Self::Id {
        self.id
    }
}
