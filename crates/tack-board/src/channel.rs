//! Delivery of task summaries to an external chat channel.

use std::sync::Mutex;

use tack_core::task::{Task, TaskId};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("could not deliver to {channel}: {reason}")]
pub struct DeliveryError {
    pub channel: String,
    pub reason: String,
}

/// Chat collaborator that receives tasks selected for sharing.
pub trait ChannelSink {
    fn send(&self, channel: &str, tasks: &[Task]) -> Result<(), DeliveryError>;
}

/// Records deliveries instead of sending them. Can be told to fail.
#[derive(Debug, Default)]
pub struct RecordingSink {
    sent: Mutex<Vec<(String, Vec<TaskId>)>>,
    fail: Mutex<bool>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        if let Ok(mut fail) = self.fail.lock() {
            *fail = failing;
        }
    }

    /// Every successful delivery: channel and task ids.
    pub fn sent(&self) -> Vec<(String, Vec<TaskId>)> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

impl ChannelSink for RecordingSink {
    fn send(&self, channel: &str, tasks: &[Task]) -> Result<(), DeliveryError> {
        let failing = self.fail.lock().map(|f| *f).unwrap_or(true);
        if failing {
            return Err(DeliveryError {
                channel: channel.to_string(),
                reason: "channel unavailable".to_string(),
            });
        }
        let ids = tasks.iter().map(|t| t.id.clone()).collect();
        if let Ok(mut sent) = self.sent.lock() {
            sent.push((channel.to_string(), ids));
        }
        Ok(())
    }
}
