//! Audit trail storage
//!
//! The store is the injectable seam for audit persistence: in-process
//! deployments use [`InMemoryAuditStore`], single-node deployments that
//! need durability use [`FileAuditStore`], and horizontally scaled
//! deployments implement [`AuditStore`] over a shared log service.

use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::RwLock;

use crate::error::AuditResult;
use crate::query::ViolationQuery;
use crate::violation::Violation;

/// Append-only violation store
#[async_trait]
pub trait AuditStore: Send + Sync {
    /// Append one violation to the trail
    async fn append(&self, violation: &Violation) -> AuditResult<()>;

    /// Read violations matching the query, newest first
    async fn query(&self, query: &ViolationQuery) -> AuditResult<Vec<Violation>>;

    /// Total number of recorded violations
    async fn len(&self) -> AuditResult<usize>;

    /// True when no violations have been recorded
    async fn is_empty(&self) -> AuditResult<bool> {
        Ok(self.len().await? == 0)
    }
}

/// In-memory audit trail
pub struct InMemoryAuditStore {
    violations: RwLock<Vec<Violation>>,
}

impl InMemoryAuditStore {
    /// Create an empty trail
    pub fn new() -> Self {
        Self {
            violations: RwLock::new(Vec::new()),
        }
    }
}

impl Default for InMemoryAuditStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuditStore for InMemoryAuditStore {
    async fn append(&self, violation: &Violation) -> AuditResult<()> {
        self.violations.write().await.push(violation.clone());
        Ok(())
    }

    async fn query(&self, query: &ViolationQuery) -> AuditResult<Vec<Violation>> {
        let violations = self.violations.read().await;
        let mut matched: Vec<Violation> = violations
            .iter()
            .filter(|v| query.matches(v))
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(matched)
    }

    async fn len(&self) -> AuditResult<usize> {
        Ok(self.violations.read().await.len())
    }
}

/// File-backed audit trail, one JSON document per line. Appends are
/// serialized through a mutex so concurrent evaluations cannot
/// interleave partial lines.
pub struct FileAuditStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileAuditStore {
    /// Create a store appending to the given file (created on first
    /// append)
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    fn read_all(&self) -> AuditResult<Vec<Violation>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let file = std::fs::File::open(&self.path)?;
        let reader = BufReader::new(file);
        let mut violations = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            violations.push(serde_json::from_str(&line)?);
        }
        Ok(violations)
    }
}

#[async_trait]
impl AuditStore for FileAuditStore {
    async fn append(&self, violation: &Violation) -> AuditResult<()> {
        let line = serde_json::to_string(violation)?;
        let _guard = self.write_lock.lock();
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", line)?;
        Ok(())
    }

    async fn query(&self, query: &ViolationQuery) -> AuditResult<Vec<Violation>> {
        let mut matched: Vec<Violation> = self
            .read_all()?
            .into_iter()
            .filter(|v| query.matches(v))
            .collect();
        matched.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(matched)
    }

    async fn len(&self) -> AuditResult<usize> {
        Ok(self.read_all()?.len())
    }
}
