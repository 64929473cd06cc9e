use std::path::Path;

use async_trait::async_trait;

use crate::error::AppResult;

#[async_trait]
pub trait VersionControlService: Send + Sync {
    /// The commit that originally created `path`, traced back through renames.
    async fn originating_commit(&self, path: &Path) -> AppResult<String>;
}
