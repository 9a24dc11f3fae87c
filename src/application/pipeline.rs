//! Burn Pipeline
//!
//! Classifier -> metadata resolver -> notifier, once per inbound record.
//! `run` drains the event-source channel and processes records concurrently,
//! bounded by a semaphore; there is no ordering between records.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{mpsc, Semaphore};
use tracing::{debug, error, info};

use crate::domain::sentinels::DEFAULT_EXPLORER_TX_URL;
use crate::domain::{BurnClassifier, NotificationMessage, ParseMode, RawTransaction};
use crate::ports::{MetadataPort, NotifierPort};

/// Ceiling on `max_concurrent_events`; larger values are clamped
pub const MAX_CONCURRENT_EVENTS: usize = 4096;

/// Delivery settings shared by every event
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    /// Destination chat
    pub chat_id: String,
    /// Prefix the signature is appended to in alert links
    pub explorer_tx_url: String,
    pub parse_mode: ParseMode,
    /// Upper bound on records processed at once
    pub max_concurrent_events: usize,
}

impl PipelineSettings {
    pub fn new(chat_id: impl Into<String>) -> Self {
        Self {
            chat_id: chat_id.into(),
            explorer_tx_url: DEFAULT_EXPLORER_TX_URL.to_string(),
            parse_mode: ParseMode::Html,
            max_concurrent_events: 32,
        }
    }
}

/// What happened to one record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// Not a burn (or not classifiable)
    Skipped,
    Notified { signature: String },
    /// Burn detected but the notifier failed; the event is dropped
    DeliveryFailed { signature: String, error: String },
}

/// Stateless event-to-notification pipeline
pub struct BurnPipeline {
    classifier: BurnClassifier,
    metadata: Arc<dyn MetadataPort>,
    notifier: Arc<dyn NotifierPort>,
    settings: PipelineSettings,
}

impl BurnPipeline {
    pub fn new(
        classifier: BurnClassifier,
        metadata: Arc<dyn MetadataPort>,
        notifier: Arc<dyn NotifierPort>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            classifier,
            metadata,
            notifier,
            settings,
        }
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Process one record end to end
    pub async fn process(&self, tx: &RawTransaction) -> PipelineOutcome {
        let Some(event) = self.classifier.classify(tx) else {
            return PipelineOutcome::Skipped;
        };

        let token_name = if event.has_known_mint() {
            self.metadata.resolve_name(event.mint_address()).await
        } else {
            debug!(signature = %event.signature(), "Mint unknown, skipping metadata lookup");
            None
        };

        let message = NotificationMessage::burn_alert(
            &event,
            token_name.as_deref(),
            &self.settings.chat_id,
            &self.settings.explorer_tx_url,
            self.settings.parse_mode,
        );

        let signature = event.signature().to_string();
        match self.notifier.notify(&message).await {
            Ok(()) => {
                info!(
                    signature = %signature,
                    mint = %event.mint_address(),
                    amount = %event.amount(),
                    latency_ms = (Utc::now() - event.detected_at()).num_milliseconds(),
                    "Burn notification sent"
                );
                PipelineOutcome::Notified { signature }
            }
            Err(e) => {
                error!(signature = %signature, "Failed to deliver burn notification: {}", e);
                PipelineOutcome::DeliveryFailed {
                    signature,
                    error: e.to_string(),
                }
            }
        }
    }

    /// Drain the channel until every sender is gone, then wait for in-flight work
    pub async fn run(self: Arc<Self>, mut rx: mpsc::Receiver<RawTransaction>) {
        let permits = self.settings.max_concurrent_events.clamp(1, MAX_CONCURRENT_EVENTS);
        let drain_permits = u32::try_from(permits).unwrap_or(u32::MAX);
        let semaphore = Arc::new(Semaphore::new(permits));
        info!(max_concurrent_events = permits, "Burn pipeline started");

        while let Some(tx) = rx.recv().await {
            let permit = match semaphore.clone().acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => break,
            };
            let pipeline = Arc::clone(&self);
            tokio::spawn(async move {
                pipeline.process(&tx).await;
                drop(permit);
            });
        }

        // Every permit back means every spawned task has finished
        let _ = semaphore.acquire_many(drain_permits).await;
        info!("Burn pipeline drained");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BurnSentinelSet, ClassifierConfig, ClassifierStrategy};
    use crate::ports::mocks::{MockMetadata, MockNotifier};
    use crate::ports::NotifyError;
    use async_trait::async_trait;
    use mockall::mock;
    use serde_json::json;
    use std::time::Duration;

    const MINT: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";

    mock! {
        pub Delivery {}

        #[async_trait]
        impl NotifierPort for Delivery {
            async fn notify(&self, message: &NotificationMessage) -> Result<(), NotifyError>;
        }
    }

    fn log_classifier() -> BurnClassifier {
        BurnClassifier::new(
            Arc::new(BurnSentinelSet::default()),
            ClassifierConfig::with_strategy(ClassifierStrategy::LogPattern),
        )
    }

    fn sentinel_classifier() -> BurnClassifier {
        BurnClassifier::new(
            Arc::new(BurnSentinelSet::default()),
            ClassifierConfig::with_strategy(ClassifierStrategy::SentinelAccount),
        )
    }

    fn burn_tx(signature: &str) -> RawTransaction {
        RawTransaction::from_logs(
            signature,
            vec![
                "Program log: Instruction: Burn".to_string(),
                format!("Program log: mint: {}", MINT),
            ],
        )
    }

    fn pipeline(
        classifier: BurnClassifier,
        metadata: MockMetadata,
        notifier: Arc<dyn NotifierPort>,
    ) -> BurnPipeline {
        BurnPipeline::new(
            classifier,
            Arc::new(metadata),
            notifier,
            PipelineSettings::new("-100"),
        )
    }

    #[tokio::test]
    async fn test_process_burn_notifies_with_name() {
        let metadata = MockMetadata::new().with_name(MINT, "USD Coin");
        let notifier = MockNotifier::new();
        let pipeline = pipeline(log_classifier(), metadata.clone(), Arc::new(notifier.clone()));

        let outcome = pipeline.process(&burn_tx("sig1")).await;

        assert_eq!(
            outcome,
            PipelineOutcome::Notified {
                signature: "sig1".to_string()
            }
        );
        assert_eq!(metadata.get_calls(), vec![MINT.to_string()]);
        let sent = notifier.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].chat_id, "-100");
        assert!(sent[0].text.contains("USD Coin"));
        assert!(sent[0].text.contains("https://solscan.io/tx/sig1"));
    }

    #[tokio::test]
    async fn test_process_unresolved_name_uses_placeholder() {
        let notifier = MockNotifier::new();
        let pipeline = pipeline(log_classifier(), MockMetadata::new(), Arc::new(notifier.clone()));

        pipeline.process(&burn_tx("sig2")).await;

        assert!(notifier.sent()[0].text.contains("Unknown token"));
    }

    #[tokio::test]
    async fn test_process_non_burn_is_skipped() {
        let mut notifier = MockDelivery::new();
        notifier.expect_notify().times(0);
        let metadata = MockMetadata::new();
        let pipeline = pipeline(log_classifier(), metadata.clone(), Arc::new(notifier));

        let tx = RawTransaction::from_logs("sig3", vec!["Program log: Instruction: Transfer".into()]);
        assert_eq!(pipeline.process(&tx).await, PipelineOutcome::Skipped);
        assert!(metadata.get_calls().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_mint_skips_metadata_lookup() {
        let tx: RawTransaction = serde_json::from_value(json!({
            "transaction": {
                "signatures": ["sig4"],
                "message": { "accountKeys": ["11111111111111111111111111111111", "1nc1nerator11111111111111111111111111111111"] }
            },
            "meta": { "postTokenBalances": [] }
        }))
        .unwrap();

        let metadata = MockMetadata::new();
        let notifier = MockNotifier::new();
        let pipeline = pipeline(sentinel_classifier(), metadata.clone(), Arc::new(notifier.clone()));

        let outcome = pipeline.process(&tx).await;

        assert!(matches!(outcome, PipelineOutcome::Notified { .. }));
        assert!(metadata.get_calls().is_empty());
        assert!(notifier.sent()[0].text.contains("unknown"));
    }

    #[tokio::test]
    async fn test_delivery_failure_is_reported_not_raised() {
        let mut notifier = MockDelivery::new();
        notifier.expect_notify().times(1).returning(|_| {
            Err(NotifyError::Rejected {
                status: 403,
                description: "Forbidden: bot was kicked".to_string(),
            })
        });
        let pipeline = pipeline(log_classifier(), MockMetadata::new(), Arc::new(notifier));

        match pipeline.process(&burn_tx("sig5")).await {
            PipelineOutcome::DeliveryFailed { signature, error } => {
                assert_eq!(signature, "sig5");
                assert!(error.contains("403"));
            }
            other => panic!("expected delivery failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_run_processes_every_record() {
        let notifier = MockNotifier::new();
        let pipeline = Arc::new(pipeline(
            log_classifier(),
            MockMetadata::new(),
            Arc::new(notifier.clone()),
        ));
        let (tx, rx) = mpsc::channel(16);

        for i in 0..5 {
            tx.send(burn_tx(&format!("sig{}", i))).await.unwrap();
        }
        drop(tx);

        pipeline.run(rx).await;
        assert_eq!(notifier.sent().len(), 5);
    }

    #[tokio::test]
    async fn test_run_respects_concurrency_cap() {
        let notifier = MockNotifier::new().with_delay(Duration::from_millis(20));
        let mut settings = PipelineSettings::new("-100");
        settings.max_concurrent_events = 2;
        let pipeline = Arc::new(BurnPipeline::new(
            log_classifier(),
            Arc::new(MockMetadata::new()),
            Arc::new(notifier.clone()),
            settings,
        ));
        let (tx, rx) = mpsc::channel(16);

        for i in 0..8 {
            tx.send(burn_tx(&format!("sig{}", i))).await.unwrap();
        }
        drop(tx);

        pipeline.run(rx).await;
        assert_eq!(notifier.sent().len(), 8);
        assert!(notifier.peak_in_flight() <= 2);
        assert!(notifier.peak_in_flight() >= 1);
    }

    #[tokio::test]
    async fn test_run_drains_with_oversized_concurrency() {
        let notifier = MockNotifier::new().with_delay(Duration::from_millis(200));
        let mut settings = PipelineSettings::new("-100");
        settings.max_concurrent_events = usize::MAX;
        let pipeline = Arc::new(BurnPipeline::new(
            log_classifier(),
            Arc::new(MockMetadata::new()),
            Arc::new(notifier.clone()),
            settings,
        ));
        let (tx, rx) = mpsc::channel(1);

        tx.send(burn_tx("slow")).await.unwrap();
        drop(tx);

        pipeline.run(rx).await;
        assert_eq!(notifier.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_failure_does_not_stop_later_records() {
        let notifier = MockNotifier::failing();
        let pipeline = Arc::new(pipeline(
            log_classifier(),
            MockMetadata::new(),
            Arc::new(notifier.clone()),
        ));
        let (tx, rx) = mpsc::channel(4);

        tx.send(burn_tx("a")).await.unwrap();
        tx.send(burn_tx("b")).await.unwrap();
        drop(tx);

        pipeline.run(rx).await;
        assert_eq!(notifier.sent().len(), 2);
    }
}
