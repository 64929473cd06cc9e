use std::collections::HashSet;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::services::VersionControlService;

pub struct GitCli {
    workspace_root: PathBuf,
}

enum TraceStep {
    /// `commit` added the path by renaming `source`.
    Renamed { commit: String, source: PathBuf },
    Origin(String),
    Untracked,
}

impl GitCli {
    pub fn new(workspace_root: PathBuf) -> Self {
        Self { workspace_root }
    }

    async fn run<I, S>(&self, subcommand: &str, args: I) -> AppResult<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let output = Command::new("git")
            .env("GIT_LITERAL_PATHSPECS", "1")
            .arg(subcommand)
            .args(args)
            .current_dir(&self.workspace_root)
            .output()
            .await
            .map_err(|err| AppError::VersionControl(format!("failed to run git: {err}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AppError::VersionControl(format!(
                "git {subcommand} failed: {}",
                stderr.trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn pathspec(&self, path: &Path) -> PathBuf {
        path.strip_prefix(&self.workspace_root)
            .unwrap_or(path)
            .to_path_buf()
    }

    /// Earliest commit that added `path` as a new file.
    async fn added_commit(&self, path: &Path) -> AppResult<Option<String>> {
        let log = self
            .run(
                "log",
                [
                    OsStr::new("--diff-filter=A"),
                    OsStr::new("--pretty=format:%H"),
                    OsStr::new("--"),
                    path.as_os_str(),
                ],
            )
            .await?;
        Ok(last_hash(&log))
    }

    /// Oldest commit of any kind that touched `path`.
    async fn oldest_commit(&self, path: &Path) -> AppResult<Option<String>> {
        let log = self
            .run(
                "log",
                [
                    OsStr::new("--pretty=format:%H"),
                    OsStr::new("--"),
                    path.as_os_str(),
                ],
            )
            .await?;
        Ok(last_hash(&log))
    }

    /// If `commit` renamed some file to `path`'s base name, the path it was renamed from,
    /// placed in `path`'s directory.
    async fn rename_source(&self, commit: &str, path: &Path) -> AppResult<Option<PathBuf>> {
        let output = self
            .run(
                "diff-tree",
                [
                    "-r",
                    "-M",
                    "--no-commit-id",
                    "--diff-filter=R",
                    "--name-status",
                    commit,
                ],
            )
            .await?;
        Ok(find_rename_source(&output, path))
    }

    async fn trace_step(&self, path: &Path) -> AppResult<TraceStep> {
        let Some(commit) = self.added_commit(path).await? else {
            return Ok(self
                .oldest_commit(path)
                .await?
                .map(TraceStep::Origin)
                .unwrap_or(TraceStep::Untracked));
        };

        let source = self
            .rename_source(&commit, path)
            .await
            .unwrap_or_else(|err| {
                debug!(%commit, error = %err, "unable to inspect renames");
                None
            });

        Ok(match source {
            Some(source) => TraceStep::Renamed { commit, source },
            None => TraceStep::Origin(commit),
        })
    }
}

#[async_trait]
impl VersionControlService for GitCli {
    async fn originating_commit(&self, path: &Path) -> AppResult<String> {
        let target = self.pathspec(path);
        let mut current = target.clone();
        let mut nearest: Option<String> = None;
        let mut visited: HashSet<(String, PathBuf)> = HashSet::new();

        loop {
            let step = self.trace_step(&current).await;
            match (step, nearest.take()) {
                (Ok(TraceStep::Renamed { commit, source }), _) => {
                    if !visited.insert((commit.clone(), current.clone())) {
                        return Ok(commit);
                    }
                    debug!(
                        %commit,
                        from = %source.display(),
                        to = %current.display(),
                        "following rename"
                    );
                    nearest = Some(commit);
                    current = source;
                }
                (Ok(TraceStep::Origin(commit)), _) => return Ok(commit),
                (Ok(TraceStep::Untracked), Some(commit)) => return Ok(commit),
                (Ok(TraceStep::Untracked), None) => return Err(AppError::NotFound(target)),
                (Err(err), Some(commit)) => {
                    debug!(error = %err, %commit, "rename trace failed, using nearer commit");
                    return Ok(commit);
                }
                (Err(err), None) => return Err(err),
            }
        }
    }
}

fn last_hash(log: &str) -> Option<String> {
    log.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .last()
        .map(str::to_string)
}

/// Parses `git diff-tree --name-status` output (`R100\told\tnew`) for a rename onto `path`.
fn find_rename_source(output: &str, path: &Path) -> Option<PathBuf> {
    let target_name = path.file_name()?;
    output.lines().find_map(|line| {
        let mut fields = line.trim().split('\t');
        let (status, old, new) = (fields.next()?, fields.next()?, fields.next()?);
        if !status.starts_with('R') || Path::new(new).file_name() != Some(target_name) {
            return None;
        }
        let old_name = Path::new(old).file_name()?;
        Some(match path.parent() {
            Some(dir) => dir.join(old_name),
            None => PathBuf::from(old_name),
        })
    })
}
