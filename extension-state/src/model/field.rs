//! Work item field definitions

use flux_store::CollectionItem;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldType {
    String,
    Integer,
    Double,
    DateTime,
    PlainText,
    Html,
    TreePath,
    History,
    Boolean,
    Identity,
    #[serde(other)]
    Other,
}

/// A field definition, identified by its reference name (e.g. `System.Title`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkItemField {
    pub reference_name: String,
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub read_only: bool,
}

impl WorkItemField {
    pub fn new(reference_name: impl Into<String>, name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            reference_name: reference_name.into(),
            name: name.into(),
            field_type,
            read_only: false,
        }
    }
}

impl CollectionItem for WorkItemField {
    fn id(&self) -> &str {
        &self.reference_name
    }

    fn display_name(&self) -> &str {
        &self.name
    }
}
