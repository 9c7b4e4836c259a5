//! Work Item Tracking Extension State
//!
//! Stores, action creators and settings persistence shared by the
//! extensions (forms, dashboard widgets, settings panels) that run inside a
//! work item tracking host.
//!
//! # Features
//!
//! - **Cached reads**: every store answers synchronously from memory; a fetch
//!   only happens through an action creator
//! - **No duplicate fetches**: `initialize_*` calls skip loaded keys and
//!   in-flight loads
//! - **Settings documents**: typed settings over the host document store,
//!   with optimistic concurrency and a user-facing conflict message
//! - **Injected services**: REST clients are async traits supplied to an
//!   `ExtensionContext`, so tests run against in-process fakes
//!
//! # Architecture
//!
//! ```text
//! view ──▶ ActionCreator ──fetch──▶ service client
//!                │
//!                └─invoke──▶ store actions ──▶ Store ──changed──▶ view
//! ```
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use extension_state::prelude::*;
//!
//! let context = ExtensionContext::builder()
//!     .with_team_client(Arc::new(RestTeamClient::new(host)))
//!     .with_document_service(Arc::new(InMemoryDocumentService::new()))
//!     .build()?;
//!
//! context.team_actions()?.initialize_teams("Fabrikam").await?;
//! let teams = context.team_store().get_item("fabrikam");
//!
//! let settings = context.settings_actions()?;
//! settings.initialize_setting("showClosed").await?;
//! if let Err(err) = settings.update_setting("showClosed", &true).await {
//!     context.report_error(&err);
//! }
//! ```

pub mod config;
pub mod context;
pub mod creators;
pub mod error;
pub mod logging;
pub mod model;
pub mod services;
pub mod stores;

pub use config::ExtensionConfig;
pub use context::{ExtensionContext, ExtensionContextBuilder};
pub use creators::{
    ErrorMessageActionCreator, GitRepoActionCreator, SettingsActionCreator, TeamActionCreator,
    WorkItemFieldActionCreator, WorkItemTemplateActionCreator, WorkItemTypeActionCreator,
};
pub use error::{Result, ServiceError, StateError, CONFLICT_MESSAGE};
pub use logging::{init_logging, init_logging_from_env, LoggingError, LoggingMode};
pub use model::{
    Document, DocumentScope, FieldType, GitRepository, WebApiTeam, WorkItemField,
    WorkItemTemplate, WorkItemType,
};
pub use services::{
    DocumentService, GitRepositoryClient, InMemoryDocumentService, ServiceResult, TeamClient,
    WorkItemFieldClient, WorkItemTemplateClient, WorkItemTypeClient,
};
pub use stores::{
    ErrorMessageStore, GitRepoStore, SettingsStore, SettingsStoreExt, TeamStore,
    WorkItemFieldStore, WorkItemTemplateItemStore, WorkItemTemplateStore, WorkItemTypeStore,
};

// Re-export the store layer so extensions need a single dependency
pub use flux_store;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::ExtensionConfig;
    pub use crate::context::ExtensionContext;
    pub use crate::error::{Result, ServiceError, StateError};
    pub use crate::model::*;
    pub use crate::services::*;
    pub use crate::stores::*;
    pub use flux_store::prelude::*;
    pub use flux_store::{ComponentBinding, FluxComponent};
}
