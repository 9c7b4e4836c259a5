use std::sync::Arc;

use crate::error::Result;
use crate::services::WorkItemTypeClient;
use crate::stores::WorkItemTypeStore;

use super::{load_resource, sorted};

/// Loads the project's work item types into the `WorkItemTypeStore`
pub struct WorkItemTypeActionCreator {
    store: Arc<WorkItemTypeStore>,
    client: Arc<dyn WorkItemTypeClient>,
    sort_results: bool,
}

impl WorkItemTypeActionCreator {
    pub fn new(store: Arc<WorkItemTypeStore>, client: Arc<dyn WorkItemTypeClient>) -> Self {
        Self {
            store,
            client,
            sort_results: true,
        }
    }

    pub fn with_sorting(mut self, enabled: bool) -> Self {
        self.sort_results = enabled;
        self
    }

    pub async fn initialize_work_item_types(&self) -> Result<()> {
        load_resource(
            self.store.as_ref(),
            None,
            || self.client.get_work_item_types(),
            |types| {
                self.store
                    .actions()
                    .loaded(types.map(|types| sorted(types, self.sort_results)));
            },
        )
        .await
    }

    pub fn clean(&self) {
        self.store.actions().clean();
    }
}
