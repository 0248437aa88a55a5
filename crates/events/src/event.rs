use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A recorded business fact.
///
/// Events are immutable once built and only ever appended to a stream.
pub trait Event: Clone + core::fmt::Debug + Serialize + Send + Sync + 'static {
    /// Stable dotted name, e.g. `order.payment_failed`.
    fn event_type(&self) -> &'static str;

    /// Payload schema version.
    fn version(&self) -> u32 {
        1
    }

    /// Business time of the fact.
    fn occurred_at(&self) -> DateTime<Utc>;

    /// Self-describing form for export (webhooks, audit logs).
    fn to_record(&self) -> serde_json::Result<EventRecord> {
        Ok(EventRecord {
            event_type: self.event_type().to_string(),
            version: self.version(),
            occurred_at: self.occurred_at(),
            payload: serde_json::to_value(self)?,
        })
    }
}

/// Type-tagged JSON rendering of an [`Event`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub event_type: String,
    pub version: u32,
    pub occurred_at: DateTime<Utc>,
    pub payload: serde_json::Value,
}
