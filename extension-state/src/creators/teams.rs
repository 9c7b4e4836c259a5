use std::sync::Arc;

use crate::error::Result;
use crate::services::TeamClient;
use crate::stores::TeamStore;

use super::{load_resource, sorted};

/// Loads the teams of a project into the `TeamStore`
pub struct TeamActionCreator {
    store: Arc<TeamStore>,
    client: Arc<dyn TeamClient>,
    sort_results: bool,
}

impl TeamActionCreator {
    pub fn new(store: Arc<TeamStore>, client: Arc<dyn TeamClient>) -> Self {
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

    pub async fn initialize_teams(&self, project: &str) -> Result<()> {
        load_resource(
            self.store.as_ref(),
            Some(project),
            || self.client.get_teams(project),
            |teams| {
                let teams = teams.map(|teams| sorted(teams, self.sort_results));
                self.store.actions().loaded(project, teams);
            },
        )
        .await
    }

    pub fn clean(&self) {
        self.store.actions().clean();
    }
}
