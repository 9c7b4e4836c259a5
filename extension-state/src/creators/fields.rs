use std::sync::Arc;

use crate::error::Result;
use crate::services::WorkItemFieldClient;
use crate::stores::WorkItemFieldStore;

use super::{load_resource, sorted};

/// Loads field definitions into the `WorkItemFieldStore`
pub struct WorkItemFieldActionCreator {
    store: Arc<WorkItemFieldStore>,
    client: Arc<dyn WorkItemFieldClient>,
    sort_results: bool,
}

impl WorkItemFieldActionCreator {
    pub fn new(store: Arc<WorkItemFieldStore>, client: Arc<dyn WorkItemFieldClient>) -> Self {
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

    pub async fn initialize_work_item_fields(&self) -> Result<()> {
        load_resource(
            self.store.as_ref(),
            None,
            || self.client.get_fields(),
            |fields| {
                self.store
                    .actions()
                    .loaded(fields.map(|fields| sorted(fields, self.sort_results)));
            },
        )
        .await
    }

    pub fn clean(&self) {
        self.store.actions().clean();
    }
}
