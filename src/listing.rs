use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// One unprocessed directory-listing result. Names may still be
/// percent-encoded; decoding is the walker's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntry {
    pub name: String,
    pub is_dir: bool,
    pub modified: Option<DateTime<Utc>>,
    pub size: u64,
}

/// A remote session that can list directories. One session serves exactly
/// one retrieval call; the orchestrator releases it on every exit path.
#[async_trait]
pub trait RemoteLister: Send {
    async fn connect(&mut self) -> Result<(), AppError>;

    async fn list(&mut self, path: &str) -> Result<Vec<RawEntry>, AppError>;

    /// Close the session. A no-op when nothing is connected; never fails
    /// the retrieval call.
    async fn disconnect(&mut self);
}

/// Produces a fresh, unconnected session per retrieval call.
pub trait ListerFactory: Send + Sync {
    fn create(&self) -> Box<dyn RemoteLister>;
}
