use serde::{Deserialize, Serialize};

/// A derived, human-readable observation about spending or budget status.
/// Recomputed on demand, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Insight {
    pub kind: InsightKind,
    pub title: String,
    pub message: String,
}

impl Insight {
    pub fn new(kind: InsightKind, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            message: message.into(),
        }
    }
}

/// Which analysis family produced an insight.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Weekly,
    Monthly,
    Category,
    Budget,
}

impl std::fmt::Display for InsightKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            InsightKind::Weekly => "weekly",
            InsightKind::Monthly => "monthly",
            InsightKind::Category => "category",
            InsightKind::Budget => "budget",
        };
        f.write_str(label)
    }
}
