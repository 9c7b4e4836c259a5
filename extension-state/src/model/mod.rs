//! Data model for records fetched from the host platform

mod document;
mod field;
mod repository;
mod team;
mod template;
mod work_item_type;

pub use document::{Document, DocumentScope};
pub use field::{FieldType, WorkItemField};
pub use repository::GitRepository;
pub use team::WebApiTeam;
pub use template::WorkItemTemplate;
pub use work_item_type::WorkItemType;
