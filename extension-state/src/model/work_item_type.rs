//! Work item type records

use flux_store::CollectionItem;
use serde::{Deserialize, Serialize};

/// A work item type, identified by its name (e.g. "Bug")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkItemType {
    pub name: String,
    #[serde(default)]
    pub reference_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

impl WorkItemType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reference_name: None,
            description: None,
            color: None,
        }
    }
}

impl CollectionItem for WorkItemType {
    fn id(&self) -> &str {
        &self.name
    }

    fn display_name(&self) -> &str {
        &self.name
    }
}
