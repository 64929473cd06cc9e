use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::context::AppContext;
use crate::domain::change::ChangelogEntry;
use crate::domain::document::{ChangelogDocument, EntryBuckets};
use crate::error::{AppError, AppResult};
use crate::workflow::enrich::EntryEnricher;

const FRAGMENT_EXTENSIONS: &[&str] = &["yml", "yaml"];

/// Reads, enriches and groups every fragment under the configured changelog paths.
///
/// Stops at the first failure; a partial changelog is never produced.
pub async fn collect(ctx: &AppContext) -> AppResult<ChangelogDocument> {
    let enricher = EntryEnricher::new(ctx)?;
    let mut buckets = EntryBuckets::default();

    for changelog_path in &ctx.config.changelog_paths {
        collect_from_folder(ctx, &enricher, changelog_path, &mut buckets).await?;
    }

    info!("collected {} changelog entries", buckets.len());
    Ok(buckets.into_document(&ctx.config.title, &ctx.config.scope_priority))
}

async fn collect_from_folder(
    ctx: &AppContext,
    enricher: &EntryEnricher<'_>,
    changelog_path: &Path,
    buckets: &mut EntryBuckets,
) -> AppResult<()> {
    let repo_path = &ctx.config.repo_path;
    let folder = repo_path.join(changelog_path);
    if !folder.is_dir() {
        return Err(AppError::MissingDirectory(folder));
    }

    let mut files = fs::read_dir(&folder)?.collect::<Result<Vec<_>, _>>()?;
    files.sort_by_key(|file| file.file_name());
    let total = files.len();
    info!("reading files from folder {}", folder.display());

    for (index, file) in files.iter().enumerate() {
        let position = index + 1;
        let path = file.path();
        let name = file.file_name();
        let name = name.to_string_lossy();

        if file.file_type()?.is_dir() {
            continue;
        }
        if !is_fragment(&path) {
            debug!("skipping file: {name} ({position}/{total})");
            continue;
        }

        let contents = fs::read_to_string(&path)?;
        info!("processing changelog file: {name} ({position}/{total})");

        let mut entry = ChangelogEntry::parse(&path, &contents)?;
        let relative = path.strip_prefix(repo_path).unwrap_or(&path);
        enricher.enrich(&mut entry, relative).await?;
        buckets.insert(entry);
    }

    Ok(())
}

fn is_fragment(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| FRAGMENT_EXTENSIONS.contains(&ext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::Arc;

    use tempfile::TempDir;

    use crate::config::ResolutionStrategy;
    use crate::workflow::testing::{FakeGit, FakePlatform, config, merged_pull};

    fn write(root: &Path, rel: &str, contents: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn context_for(root: &Path, git: FakeGit, platform: FakePlatform) -> AppContext {
        AppContext::new(
            config(root, ResolutionStrategy::Locator),
            Arc::new(git),
            Arc::new(platform),
        )
    }

    #[tokio::test]
    async fn groups_enriched_fragments() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "changelog/a.yml", "message: Explicit PR\ntype: bugfix\nprs: [42]\n");
        write(root, "changelog/b.yml", "message: Inferred PR\ntype: bugfix\n");
        write(root, "changelog/README.md", "not a fragment");
        write(root, "changelog/nested/c.yml", "message: ignored\ntype: bugfix\n");

        let git = FakeGit::default()
            .with_commit("changelog/a.yml", "c1")
            .with_commit("changelog/b.yml", "c2");
        let platform = FakePlatform::default()
            .with_pulls("c1", vec![merged_pull(7, "Fixes ABC-9")])
            .with_pulls("c2", vec![merged_pull(7, "Fixes ABC-9")]);
        let ctx = context_for(root, git, platform);

        let doc = collect(&ctx).await.unwrap();

        assert_eq!(doc.types.len(), 1);
        assert_eq!(doc.types[0].kind, "bugfix");
        assert_eq!(doc.types[0].scopes.len(), 1);
        let scope = &doc.types[0].scopes[0];
        assert_eq!(scope.scope, "Default");
        assert_eq!(scope.entries.len(), 2);

        let first = &scope.entries[0];
        assert_eq!(first.message, "Explicit PR");
        assert_eq!(first.issues[0].label, "#42");

        let second = &scope.entries[1];
        assert_eq!(second.message, "Inferred PR");
        assert_eq!(second.issues[0].label, "#7");
        assert_eq!(second.tickets[0].id, "ABC-9");
    }

    #[tokio::test]
    async fn buckets_across_folders_by_type_and_scope() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "changelog/kong/1.yml", "message: one\ntype: feature\nscope: Plugin\n");
        write(root, "changelog/kong/2.yml", "message: two\ntype: bugfix\nscope: Core\n");
        write(root, "changelog/manager/3.yaml", "message: three\ntype: feature\nscope: Core\n");

        let git = FakeGit::default()
            .with_commit("changelog/kong/1.yml", "c1")
            .with_commit("changelog/kong/2.yml", "c1")
            .with_commit("changelog/manager/3.yaml", "c1");
        let platform = FakePlatform::default().with_pulls("c1", vec![merged_pull(1, "")]);
        let mut ctx = context_for(root, git, platform);
        ctx.config.changelog_paths = vec![
            PathBuf::from("changelog/kong"),
            PathBuf::from("changelog/manager"),
        ];

        let doc = collect(&ctx).await.unwrap();
        let kinds: Vec<&str> = doc.types.iter().map(|t| t.kind.as_str()).collect();
        assert_eq!(kinds, vec!["feature", "bugfix"]);

        let feature_scopes: Vec<&str> = doc.types[0]
            .scopes
            .iter()
            .map(|s| s.scope.as_str())
            .collect();
        assert_eq!(feature_scopes, vec!["Core", "Plugin"]);
    }

    #[tokio::test]
    async fn missing_folder_is_an_error() {
        let dir = TempDir::new().unwrap();
        let ctx = context_for(dir.path(), FakeGit::default(), FakePlatform::default());

        let result = collect(&ctx).await;
        assert!(matches!(result, Err(AppError::MissingDirectory(_))));
    }

    #[tokio::test]
    async fn malformed_fragment_stops_collection() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "changelog/a.yml", "message: [oops\n");

        let ctx = context_for(root, FakeGit::default(), FakePlatform::default());
        let result = collect(&ctx).await;
        assert!(matches!(result, Err(AppError::Parse { .. })));
    }

    #[tokio::test]
    async fn enrichment_failure_stops_collection() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "changelog/a.yml", "message: fine\ntype: bugfix\n");

        let ctx = context_for(root, FakeGit::default(), FakePlatform::default());
        let result = collect(&ctx).await;
        assert!(matches!(result, Err(AppError::Enrichment { .. })));
    }

    #[test]
    fn recognises_fragment_extensions() {
        assert!(is_fragment(Path::new("a/fix.yml")));
        assert!(is_fragment(Path::new("fix.yaml")));
        assert!(!is_fragment(Path::new("fix.yml.bak")));
        assert!(!is_fragment(Path::new("README")));
    }
}
