use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::event_source::{EventSource, EventSourceError};
use super::metadata::MetadataPort;
use super::notifier::{NotifierPort, NotifyError};
use crate::domain::{NotificationMessage, RawTransaction};

/// Mock metadata port that records lookups and answers from a fixed table
#[derive(Debug, Default, Clone)]
pub struct MockMetadata {
    calls: Arc<Mutex<Vec<String>>>,
    names: Arc<Mutex<HashMap<String, String>>>,
}

impl MockMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the name returned for a mint
    pub fn with_name(self, mint: &str, name: &str) -> Self {
        self.names
            .lock()
            .unwrap()
            .insert(mint.to_string(), name.to_string());
        self
    }

    /// Get all recorded lookups
    pub fn get_calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl MetadataPort for MockMetadata {
    async fn resolve_name(&self, mint_address: &str) -> Option<String> {
        self.calls.lock().unwrap().push(mint_address.to_string());
        self.names.lock().unwrap().get(mint_address).cloned()
    }
}

/// Mock notifier that records every message it is asked to send
#[derive(Debug, Default, Clone)]
pub struct MockNotifier {
    sent: Arc<Mutex<Vec<NotificationMessage>>>,
    fail: bool,
    delay: Option<Duration>,
    in_flight: Arc<AtomicUsize>,
    peak_in_flight: Arc<AtomicUsize>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call records the message and then fails
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Hold each call for `delay` before returning
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn sent(&self) -> Vec<NotificationMessage> {
        self.sent.lock().unwrap().clone()
    }

    /// Highest number of overlapping `notify` calls observed
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NotifierPort for MockNotifier {
    async fn notify(&self, message: &NotificationMessage) -> Result<(), NotifyError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.sent.lock().unwrap().push(message.clone());
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.fail {
            return Err(NotifyError::Rejected {
                status: 500,
                description: "mock failure".to_string(),
            });
        }
        Ok(())
    }
}

/// Event source that replays a fixed list of records, then ends
#[derive(Debug, Default, Clone)]
pub struct ReplaySource {
    records: Vec<RawTransaction>,
}

impl ReplaySource {
    pub fn new(records: Vec<RawTransaction>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl EventSource for ReplaySource {
    fn name(&self) -> &str {
        "replay"
    }

    async fn run(&self, sink: mpsc::Sender<RawTransaction>) -> Result<(), EventSourceError> {
        for record in &self.records {
            sink.send(record.clone())
                .await
                .map_err(|_| EventSourceError::Transport("pipeline channel closed".into()))?;
        }
        Ok(())
    }
}
