//! Work item templates

use std::collections::BTreeMap;

use flux_store::CollectionItem;
use serde::{Deserialize, Serialize};

/// A team's template: default field values for a work item type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkItemTemplate {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub work_item_type_name: String,
    /// Field reference name -> value; empty on template references
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
}

impl WorkItemTemplate {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        work_item_type_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            work_item_type_name: work_item_type_name.into(),
            fields: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, reference_name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(reference_name.into(), value.into());
        self
    }
}

impl CollectionItem for WorkItemTemplate {
    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }
}
