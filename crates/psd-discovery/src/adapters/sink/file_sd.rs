//! Prometheus `file_sd` output.
//!
//! Keeps the current target groups keyed by `"<sd-name>:<source>:<index>"`
//! and rewrites the output file after each batch that changed them. The
//! file is a JSON array of `{"targets": [...], "labels": {...}}` objects,
//! written to a temporary file first and renamed over the target so
//! Prometheus never reads a partial file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::domain::{SinkError, TargetGroup};
use crate::ports::TargetSink;

/// Name used in group keys when none is configured.
pub const DEFAULT_SD_NAME: &str = "peer_sd";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct FileSdGroup {
    targets: Vec<String>,
    labels: BTreeMap<String, String>,
}

#[derive(Debug, Default)]
struct FileSdState {
    groups: BTreeMap<String, FileSdGroup>,
    /// Content of the last successful write.
    written: Option<String>,
}

/// [`TargetSink`] maintaining a Prometheus `file_sd` JSON file.
#[derive(Debug)]
pub struct FileSdSink {
    path: PathBuf,
    name: String,
    state: Mutex<FileSdState>,
}

impl FileSdSink {
    pub fn new(path: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            state: Mutex::new(FileSdState::default()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn source_prefix(&self, source: &str) -> String {
        format!("{}:{}:", self.name, source)
    }

    fn apply(&self, groups: &mut BTreeMap<String, FileSdGroup>, batch: Vec<TargetGroup>) {
        let mut next_index: BTreeMap<String, usize> = BTreeMap::new();

        for group in batch {
            let prefix = self.source_prefix(&group.source);
            let index = next_index.entry(group.source.clone()).or_insert(0);
            if *index == 0 {
                groups.retain(|key, _| !key.starts_with(&prefix));
            }
            if group.is_removal() {
                continue;
            }

            let mut targets: Vec<String> = group.targets.into_iter().map(|t| t.address).collect();
            targets.sort();
            groups.insert(
                format!("{prefix}{index}"),
                FileSdGroup {
                    targets,
                    labels: group.labels,
                },
            );
            *index += 1;
        }
    }

    async fn write_atomically(&self, content: &str) -> Result<(), SinkError> {
        let io_error = |e: std::io::Error| SinkError::Io {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        };

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        tokio::fs::write(&tmp, content).await.map_err(io_error)?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(io_error)
    }
}

#[async_trait]
impl TargetSink for FileSdSink {
    async fn publish(&self, batch: Vec<TargetGroup>) -> Result<(), SinkError> {
        let mut state = self.state.lock().await;

        let mut groups = state.groups.clone();
        self.apply(&mut groups, batch);

        let entries: Vec<&FileSdGroup> = groups.values().collect();
        let content =
            serde_json::to_string_pretty(&entries).map_err(|e| SinkError::Encode(e.to_string()))?;

        let group_count = groups.len();
        // A failed write keeps the new groups; the next publish rewrites them.
        state.groups = groups;

        if state.written.as_deref() == Some(content.as_str()) {
            debug!(path = %self.path.display(), "Targets unchanged, skipping write");
            return Ok(());
        }

        state.written = None;
        self.write_atomically(&content).await?;
        info!(
            path = %self.path.display(),
            groups = group_count,
            "Wrote file_sd targets"
        );
        state.written = Some(content);
        Ok(())
    }
}
