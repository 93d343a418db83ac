//! Channel sink: hands every batch to an in-process consumer.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::domain::{SinkError, TargetGroup};
use crate::ports::TargetSink;

/// Forwards each round's batch on a bounded tokio channel.
#[derive(Debug, Clone)]
pub struct ChannelTargetSink {
    tx: mpsc::Sender<Vec<TargetGroup>>,
}

impl ChannelTargetSink {
    /// Create a sink and the receiver its batches arrive on.
    pub fn channel(buffer: usize) -> (Self, mpsc::Receiver<Vec<TargetGroup>>) {
        let (tx, rx) = mpsc::channel(buffer);
        (Self { tx }, rx)
    }

    pub fn from_sender(tx: mpsc::Sender<Vec<TargetGroup>>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl TargetSink for ChannelTargetSink {
    async fn publish(&self, groups: Vec<TargetGroup>) -> Result<(), SinkError> {
        self.tx.send(groups).await.map_err(|_| SinkError::Closed)
    }
}
