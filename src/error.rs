use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("no commit history found for {}", .0.display())]
    NotFound(PathBuf),
    #[error("version control error: {0}")]
    VersionControl(String),
    #[error("failed to reach GitHub: {0}")]
    Transport(String),
    #[error("GitHub responded with {status}: {body}")]
    Http { status: u16, body: String },
    #[error("GitHub API rate limit exceeded")]
    RateLimited,
    #[error("no merged pull request found for commit {0}")]
    NoMergedPullRequest(String),
    #[error("failed to parse changelog fragment {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },
    #[error("changelog directory {} does not exist", .0.display())]
    MissingDirectory(PathBuf),
    #[error("failed to process {}: {source}", .path.display())]
    Enrichment {
        path: PathBuf,
        #[source]
        source: Box<AppError>,
    },
    #[error("render error: {0}")]
    Render(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn enrichment(path: impl Into<PathBuf>, source: AppError) -> Self {
        AppError::Enrichment {
            path: path.into(),
            source: Box::new(source),
        }
    }
}
