//! Service boundaries: the host platform's REST clients and document store
//!
//! Every call may fail asynchronously with a [`ServiceError`]; callers only
//! rely on its message. Nothing here retries or times out on its own.

mod documents;

use async_trait::async_trait;

use crate::error::ServiceError;
use crate::model::{GitRepository, WebApiTeam, WorkItemField, WorkItemTemplate, WorkItemType};

pub use documents::{DocumentService, InMemoryDocumentService};

/// Result of a service call
pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

#[async_trait]
pub trait TeamClient: Send + Sync {
    /// Teams of `project`
    async fn get_teams(&self, project: &str) -> ServiceResult<Vec<WebApiTeam>>;
}

#[async_trait]
pub trait GitRepositoryClient: Send + Sync {
    async fn get_repositories(&self) -> ServiceResult<Vec<GitRepository>>;
}

#[async_trait]
pub trait WorkItemFieldClient: Send + Sync {
    async fn get_fields(&self) -> ServiceResult<Vec<WorkItemField>>;
}

#[async_trait]
pub trait WorkItemTypeClient: Send + Sync {
    async fn get_work_item_types(&self) -> ServiceResult<Vec<WorkItemType>>;
}

#[async_trait]
pub trait WorkItemTemplateClient: Send + Sync {
    /// Template references of a team; `fields` is empty on each
    async fn get_templates(&self, team_id: &str) -> ServiceResult<Vec<WorkItemTemplate>>;

    /// A single template with its field values
    async fn get_template(&self, team_id: &str, template_id: &str) -> ServiceResult<WorkItemTemplate>;

    async fn delete_template(&self, team_id: &str, template_id: &str) -> ServiceResult<()>;
}
