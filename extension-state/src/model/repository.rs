//! Git repository records

use flux_store::CollectionItem;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitRepository {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub default_branch: Option<String>,
    #[serde(default)]
    pub remote_url: Option<String>,
}

impl GitRepository {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            default_branch: None,
            remote_url: None,
        }
    }

    /// Default branch without the `refs/heads/` prefix
    pub fn default_branch_name(&self) -> Option<&str> {
        self.default_branch
            .as_deref()
            .map(|branch| branch.strip_prefix("refs/heads/").unwrap_or(branch))
    }
}

impl CollectionItem for GitRepository {
    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_branch_name() {
        let mut repo = GitRepository::new("1", "core");
        assert_eq!(repo.default_branch_name(), None);

        repo.default_branch = Some("refs/heads/main".to_string());
        assert_eq!(repo.default_branch_name(), Some("main"));

        repo.default_branch = Some("develop".to_string());
        assert_eq!(repo.default_branch_name(), Some("develop"));
    }

    #[test]
    fn test_deserialize_rest_shape() {
        let json = r#"{"id":"a1","name":"web","defaultBranch":"refs/heads/main","size":42}"#;
        let repo: GitRepository = serde_json::from_str(json).unwrap();
        assert_eq!(repo.name, "web");
        assert_eq!(repo.default_branch_name(), Some("main"));
        assert!(repo.remote_url.is_none());
    }
}
