/// NotificationError reports a failed alert delivery. It is logged by the
/// scheduler and never retried within the same cycle.
#[derive(Debug, thiserror::Error)]
#[error("alert delivery failed")]
pub struct NotificationError(#[source] pub anyhow::Error);

/// Notifier is the delivery seam for alert messages. The core decides when
/// to alert and what the message says; transports (email and the like) live
/// behind this trait.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    /// Delivers `message` to each of `recipients`.
    async fn send_alert(&self, message: &str, recipients: &[String])
        -> Result<(), NotificationError>;
}

/// Notifier which writes alerts to the log, for environments without a
/// configured delivery transport.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait::async_trait]
impl Notifier for LogNotifier {
    async fn send_alert(
        &self,
        message: &str,
        recipients: &[String],
    ) -> Result<(), NotificationError> {
        tracing::info!(message, ?recipients, "alert");
        Ok(())
    }
}
