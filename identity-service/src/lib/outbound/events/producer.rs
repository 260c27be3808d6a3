use std::time::Duration;

use async_trait::async_trait;
use rdkafka::config::ClientConfig;
use rdkafka::producer::FutureProducer;
use rdkafka::producer::FutureRecord;
use rdkafka::util::Timeout;
use serde::Serialize;
use thiserror::Error;

use crate::config::Config;
use crate::domain::user::events::PasswordResetRequestedEvent;
use crate::domain::user::events::UserRegisteredEvent;
use crate::domain::user::events::VerificationRequestedEvent;
use crate::outbound::events::messages::NotificationMessage;
use crate::user::errors::NotificationError;
use crate::user::ports::NotificationPublisher;

#[derive(Debug, Error)]
pub enum KafkaProducerError {
    #[error("Failed to send message to Kafka: {0}")]
    SendError(String),

    #[error("Failed to serialize message: {0}")]
    SerializationError(String),
}

impl From<KafkaProducerError> for NotificationError {
    fn from(err: KafkaProducerError) -> Self {
        match err {
            KafkaProducerError::SerializationError(msg) => {
                NotificationError::SerializationFailed(msg)
            }
            KafkaProducerError::SendError(msg) => NotificationError::PublishFailed(msg),
        }
    }
}

/// Kafka-backed delivery channel for lifecycle notifications.
///
/// Opened once at startup and injected into the service; the connection has
/// an explicit lifecycle instead of living in ambient process state.
pub struct KafkaNotificationPublisher {
    producer: FutureProducer,
    topic: String,
    timeout: Duration,
}

impl KafkaNotificationPublisher {
    /// Create a new Kafka publisher with "at least once" delivery semantics
    ///
    /// # Notes:
    /// - `acks=all`: Wait for all in-sync replicas to acknowledge
    /// - `enable.idempotence=true`: Prevents duplicate messages during retries
    /// - `max.in.flight.requests.per.connection=5`: Allows pipelining with ordering guarantees
    /// - `retry.backoff.ms=100`: Backoff between retry attempts
    pub fn new(config: &Config) -> Result<Self, anyhow::Error> {
        tracing::info!(
            "Initializing Kafka producer for identity notifications: brokers={}, topic={}",
            &config.kafka.brokers,
            &config.kafka.topic
        );

        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", &config.kafka.brokers)
            .set("message.timeout.ms", "30000")
            .set("queue.buffering.max.messages", "10000")
            .set("queue.buffering.max.kbytes", "1048576")
            .set("batch.num.messages", "100")
            .set("compression.type", "gzip")
            .set("enable.idempotence", "true")
            .set("acks", "all")
            .set("retries", "10")
            .set("max.in.flight.requests.per.connection", "5")
            .set("retry.backoff.ms", "100")
            .create()?;

        tracing::info!("Kafka producer initialized successfully");

        Ok(Self {
            producer,
            topic: config.kafka.topic.to_string(),
            timeout: Duration::from_secs(30),
        })
    }

    /// Publish a notification keyed by user id, so deliveries for the same
    /// account stay ordered.
    async fn publish<T: Serialize>(
        &self,
        user_id: &str,
        message: &T,
    ) -> Result<(), KafkaProducerError> {
        let payload = serde_json::to_string(message)
            .map_err(|e| KafkaProducerError::SerializationError(e.to_string()))?;

        tracing::debug!(
            "Publishing notification to topic '{}' (user_id: {})",
            self.topic,
            user_id
        );

        let record = FutureRecord::to(&self.topic).key(user_id).payload(&payload);

        self.producer
            .send(record, Timeout::After(self.timeout))
            .await
            .map(|_| {
                tracing::debug!(
                    "Notification published to topic '{}' for user {}",
                    self.topic,
                    user_id
                );
            })
            .map_err(|(err, _)| {
                tracing::error!(
                    "Failed to publish notification to Kafka after all retries: {}",
                    err
                );
                KafkaProducerError::SendError(err.to_string())
            })
    }
}

#[async_trait]
impl NotificationPublisher for KafkaNotificationPublisher {
    async fn publish_registered(
        &self,
        event: &UserRegisteredEvent,
    ) -> Result<(), NotificationError> {
        let message = NotificationMessage::from(event);
        self.publish(&event.user_id, &message).await.map_err(|e| e.into())
    }

    async fn publish_password_reset_requested(
        &self,
        event: &PasswordResetRequestedEvent,
    ) -> Result<(), NotificationError> {
        let message = NotificationMessage::from(event);
        self.publish(&event.user_id, &message).await.map_err(|e| e.into())
    }

    async fn publish_verification_requested(
        &self,
        event: &VerificationRequestedEvent,
    ) -> Result<(), NotificationError> {
        let message = NotificationMessage::from(event);
        self.publish(&event.user_id, &message).await.map_err(|e| e.into())
    }
}
