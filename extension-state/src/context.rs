//! Application-root context
//!
//! `ExtensionContext` owns the store registry, the configuration and the
//! injected service clients. Views and action creators get their stores
//! from here instead of from a process-wide singleton, so two contexts
//! never share state.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use extension_state::{ExtensionContext, InMemoryDocumentService};
//!
//! let context = ExtensionContext::builder()
//!     .with_document_service(Arc::new(InMemoryDocumentService::new()))
//!     .build()
//!     .unwrap();
//!
//! assert!(context.settings_actions().is_ok());
//! assert!(context.team_actions().is_err()); // no TeamClient injected
//! ```

use std::fmt;
use std::sync::Arc;

use flux_store::StoreRegistry;
use tracing::{info, warn};

use crate::config::ExtensionConfig;
use crate::creators::{
    ErrorMessageActionCreator, GitRepoActionCreator, SettingsActionCreator, TeamActionCreator,
    WorkItemFieldActionCreator, WorkItemTemplateActionCreator, WorkItemTypeActionCreator,
};
use crate::error::{Result, StateError};
use crate::logging::{self, LoggingError};
use crate::services::{
    DocumentService, GitRepositoryClient, TeamClient, WorkItemFieldClient, WorkItemTemplateClient,
    WorkItemTypeClient,
};
use crate::stores::{
    ErrorMessageStore, GitRepoStore, SettingsStore, TeamStore, WorkItemFieldStore,
    WorkItemTemplateItemStore, WorkItemTemplateStore, WorkItemTypeStore,
};

#[derive(Default)]
struct Services {
    teams: Option<Arc<dyn TeamClient>>,
    repositories: Option<Arc<dyn GitRepositoryClient>>,
    fields: Option<Arc<dyn WorkItemFieldClient>>,
    work_item_types: Option<Arc<dyn WorkItemTypeClient>>,
    templates: Option<Arc<dyn WorkItemTemplateClient>>,
    documents: Option<Arc<dyn DocumentService>>,
}

/// Stores, configuration and services of one extension instance
pub struct ExtensionContext {
    registry: StoreRegistry,
    config: ExtensionConfig,
    services: Services,
}

impl ExtensionContext {
    pub fn builder() -> ExtensionContextBuilder {
        ExtensionContextBuilder::default()
    }

    pub fn config(&self) -> &ExtensionConfig {
        &self.config
    }

    pub fn registry(&self) -> &StoreRegistry {
        &self.registry
    }

    /// Install the configured logging mode
    pub fn init_logging(&self) -> std::result::Result<(), LoggingError> {
        logging::init_logging(self.config.logging_mode)
    }

    // Stores

    pub fn team_store(&self) -> Arc<TeamStore> {
        self.registry.get_instance()
    }

    pub fn git_repo_store(&self) -> Arc<GitRepoStore> {
        self.registry.get_instance()
    }

    pub fn work_item_field_store(&self) -> Arc<WorkItemFieldStore> {
        self.registry.get_instance()
    }

    pub fn work_item_type_store(&self) -> Arc<WorkItemTypeStore> {
        self.registry.get_instance()
    }

    pub fn work_item_template_store(&self) -> Arc<WorkItemTemplateStore> {
        self.registry.get_instance()
    }

    pub fn work_item_template_item_store(&self) -> Arc<WorkItemTemplateItemStore> {
        self.registry.get_instance()
    }

    pub fn settings_store(&self) -> Arc<SettingsStore> {
        self.registry.get_instance()
    }

    pub fn error_message_store(&self) -> Arc<ErrorMessageStore> {
        self.registry.get_instance()
    }

    // Action creators

    pub fn team_actions(&self) -> Result<TeamActionCreator> {
        let client = required(&self.services.teams, "TeamClient")?;
        Ok(TeamActionCreator::new(self.team_store(), client).with_sorting(self.config.sort_results))
    }

    pub fn git_repo_actions(&self) -> Result<GitRepoActionCreator> {
        let client = required(&self.services.repositories, "GitRepositoryClient")?;
        Ok(GitRepoActionCreator::new(self.git_repo_store(), client)
            .with_sorting(self.config.sort_results))
    }

    pub fn work_item_field_actions(&self) -> Result<WorkItemFieldActionCreator> {
        let client = required(&self.services.fields, "WorkItemFieldClient")?;
        Ok(WorkItemFieldActionCreator::new(self.work_item_field_store(), client)
            .with_sorting(self.config.sort_results))
    }

    pub fn work_item_type_actions(&self) -> Result<WorkItemTypeActionCreator> {
        let client = required(&self.services.work_item_types, "WorkItemTypeClient")?;
        Ok(WorkItemTypeActionCreator::new(self.work_item_type_store(), client)
            .with_sorting(self.config.sort_results))
    }

    pub fn work_item_template_actions(&self) -> Result<WorkItemTemplateActionCreator> {
        let client = required(&self.services.templates, "WorkItemTemplateClient")?;
        Ok(WorkItemTemplateActionCreator::new(
            self.work_item_template_store(),
            self.work_item_template_item_store(),
            client,
        )
        .with_sorting(self.config.sort_results))
    }

    pub fn settings_actions(&self) -> Result<SettingsActionCreator> {
        let documents = required(&self.services.documents, "DocumentService")?;
        Ok(SettingsActionCreator::new(self.settings_store(), documents)
            .with_collection(self.config.settings_collection.clone())
            .with_scope(self.config.settings_scope))
    }

    pub fn error_message_actions(&self) -> ErrorMessageActionCreator {
        ErrorMessageActionCreator::new(self.error_message_store())
    }

    /// Route a failed user action into the error banner
    pub fn report_error(&self, error: &StateError) {
        warn!("Reporting error: {}", error);
        self.error_message_actions()
            .show_error_message(error.user_message());
    }

    /// Reset every store to its unloaded state
    pub fn clean_all(&self) {
        self.team_store().actions().clean();
        self.git_repo_store().actions().clean();
        self.work_item_field_store().actions().clean();
        self.work_item_type_store().actions().clean();
        self.work_item_template_store().actions().clean();
        self.work_item_template_item_store().actions().clean();
        self.settings_store().actions().clean();
        self.error_message_store().actions().clean();
    }
}

impl fmt::Debug for ExtensionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtensionContext")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

fn required<T: ?Sized>(service: &Option<Arc<T>>, name: &'static str) -> Result<Arc<T>> {
    service.clone().ok_or(StateError::ServiceNotConfigured(name))
}

/// Builder for `ExtensionContext`
#[derive(Default)]
pub struct ExtensionContextBuilder {
    config: ExtensionConfig,
    services: Services,
}

impl ExtensionContextBuilder {
    pub fn config(mut self, config: ExtensionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_team_client(mut self, client: Arc<dyn TeamClient>) -> Self {
        self.services.teams = Some(client);
        self
    }

    pub fn with_git_repository_client(mut self, client: Arc<dyn GitRepositoryClient>) -> Self {
        self.services.repositories = Some(client);
        self
    }

    pub fn with_work_item_field_client(mut self, client: Arc<dyn WorkItemFieldClient>) -> Self {
        self.services.fields = Some(client);
        self
    }

    pub fn with_work_item_type_client(mut self, client: Arc<dyn WorkItemTypeClient>) -> Self {
        self.services.work_item_types = Some(client);
        self
    }

    pub fn with_template_client(mut self, client: Arc<dyn WorkItemTemplateClient>) -> Self {
        self.services.templates = Some(client);
        self
    }

    pub fn with_document_service(mut self, service: Arc<dyn DocumentService>) -> Self {
        self.services.documents = Some(service);
        self
    }

    /// Validate the configuration and build the context
    pub fn build(self) -> Result<ExtensionContext> {
        self.config.validate()?;

        let context = ExtensionContext {
            registry: StoreRegistry::new(),
            config: self.config,
            services: self.services,
        };

        info!(
            settings_collection = %context.config.settings_collection,
            "ExtensionContext created"
        );
        Ok(context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::InMemoryDocumentService;
    use flux_store::Store;

    #[test]
    fn test_missing_services() {
        let context = ExtensionContext::builder().build().unwrap();

        assert!(matches!(
            context.team_actions(),
            Err(StateError::ServiceNotConfigured("TeamClient"))
        ));
        assert!(matches!(
            context.settings_actions(),
            Err(StateError::ServiceNotConfigured("DocumentService"))
        ));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = ExtensionContext::builder()
            .config(ExtensionConfig::new().with_settings_collection(""))
            .build();
        assert!(matches!(result, Err(StateError::Config(_))));
    }

    #[test]
    fn test_stores_are_shared_within_a_context() {
        let context = ExtensionContext::builder().build().unwrap();
        assert!(Arc::ptr_eq(&context.team_store(), &context.team_store()));

        let other = ExtensionContext::builder().build().unwrap();
        assert!(!Arc::ptr_eq(&context.team_store(), &other.team_store()));
    }

    #[test]
    fn test_report_error() {
        let context = ExtensionContext::builder()
            .with_document_service(Arc::new(InMemoryDocumentService::new()))
            .build()
            .unwrap();

        context.report_error(&StateError::Conflict);
        assert_eq!(
            context.error_message_store().value().as_deref(),
            Some(crate::error::CONFLICT_MESSAGE)
        );
    }

    #[test]
    fn test_clean_all() {
        let context = ExtensionContext::builder().build().unwrap();
        context.error_message_actions().show_error_message("boom");
        context.team_store().actions().loaded("Fabrikam", Some(Vec::new()));

        context.clean_all();

        assert!(context.error_message_store().value().is_none());
        assert!(!context.team_store().is_loaded(Some("fabrikam")));
    }
}
