use std::sync::Arc;

use crate::error::Result;
use crate::services::GitRepositoryClient;
use crate::stores::GitRepoStore;

use super::{load_resource, sorted};

/// Loads the project's git repositories into the `GitRepoStore`
pub struct GitRepoActionCreator {
    store: Arc<GitRepoStore>,
    client: Arc<dyn GitRepositoryClient>,
    sort_results: bool,
}

impl GitRepoActionCreator {
    pub fn new(store: Arc<GitRepoStore>, client: Arc<dyn GitRepositoryClient>) -> Self {
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

    pub async fn initialize_git_repos(&self) -> Result<()> {
        load_resource(
            self.store.as_ref(),
            None,
            || self.client.get_repositories(),
            |repos| {
                self.store
                    .actions()
                    .loaded(repos.map(|repos| sorted(repos, self.sort_results)));
            },
        )
        .await
    }

    pub fn clean(&self) {
        self.store.actions().clean();
    }
}
