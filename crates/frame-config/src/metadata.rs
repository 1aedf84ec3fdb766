use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Descriptive data stored alongside a preset's parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresetMetadata {
    pub name: String,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

impl PresetMetadata {
    /// Metadata with the given name, created now.
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            name: name.into(),
            created: now,
            modified: now,
        }
    }

    /// Bump the modification time. Never moves it before `created`.
    pub fn touch(&mut self) {
        self.modified = Utc::now().max(self.created);
    }
}
