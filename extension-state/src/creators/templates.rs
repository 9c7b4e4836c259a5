use std::sync::Arc;

use flux_store::{NormalizedKey, Store};
use tracing::{debug, warn};

use crate::error::{Result, StateError};
use crate::services::WorkItemTemplateClient;
use crate::stores::{WorkItemTemplateItemStore, WorkItemTemplateStore};

use super::{load_resource, sorted};

/// Loads team templates and single template details
///
/// Template lists are cached per team id; full templates per template id.
pub struct WorkItemTemplateActionCreator {
    templates: Arc<WorkItemTemplateStore>,
    items: Arc<WorkItemTemplateItemStore>,
    client: Arc<dyn WorkItemTemplateClient>,
    sort_results: bool,
}

impl WorkItemTemplateActionCreator {
    pub fn new(
        templates: Arc<WorkItemTemplateStore>,
        items: Arc<WorkItemTemplateItemStore>,
        client: Arc<dyn WorkItemTemplateClient>,
    ) -> Self {
        Self {
            templates,
            items,
            client,
            sort_results: true,
        }
    }

    pub fn with_sorting(mut self, enabled: bool) -> Self {
        self.sort_results = enabled;
        self
    }

    pub async fn initialize_templates(&self, team_id: &str) -> Result<()> {
        load_resource(
            self.templates.as_ref(),
            Some(team_id),
            || self.client.get_templates(team_id),
            |templates| {
                let templates = templates.map(|templates| sorted(templates, self.sort_results));
                self.templates.actions().loaded(team_id, templates);
            },
        )
        .await
    }

    pub async fn initialize_template(&self, team_id: &str, template_id: &str) -> Result<()> {
        load_resource(
            self.items.as_ref(),
            Some(template_id),
            || self.client.get_template(team_id, template_id),
            |template| self.items.actions().loaded(template_id, template),
        )
        .await
    }

    /// Delete a template, then drop it from both caches
    pub async fn delete_template(&self, team_id: &str, template_id: &str) -> Result<()> {
        if let Err(err) = self.client.delete_template(team_id, template_id).await {
            warn!(team = team_id, template = template_id, "Template delete failed: {}", err);
            return Err(StateError::Fetch(err));
        }
        debug!(team = team_id, template = template_id, "Template deleted");

        self.items.actions().remove(template_id);

        if let Some(mut remaining) = self.templates.get_item(team_id) {
            let deleted = NormalizedKey::new(template_id);
            let before = remaining.len();
            remaining.retain(|template| NormalizedKey::new(&template.id) != deleted);
            if remaining.len() != before {
                self.templates.actions().upsert(team_id, remaining);
            }
        }

        Ok(())
    }

    pub fn clean(&self) {
        self.templates.actions().clean();
        self.items.actions().clean();
    }
}
