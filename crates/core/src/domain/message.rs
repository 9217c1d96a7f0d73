// Message Domain Model

use serde::{Deserialize, Serialize};

/// Item submitted through the request layer
///
/// `count` is the queue size observed right before submission, so a caller
/// can tell roughly where its message landed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub content: String,
    pub count: usize,
    pub enqueued_at_ms: i64,
}

impl Message {
    pub fn new(content: impl Into<String>, count: usize) -> Self {
        Self {
            content: content.into(),
            count,
            enqueued_at_ms: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// Greeting message for a submission observed at queue position `count`
    pub fn greeting(count: usize) -> Self {
        Self::new(format!("Hello World! {}", count), count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greeting_embeds_count() {
        let msg = Message::greeting(7);
        assert_eq!(msg.content, "Hello World! 7");
        assert_eq!(msg.count, 7);
        assert!(msg.enqueued_at_ms > 0);
    }

    #[test]
    fn test_message_serializes_fields() {
        let msg = Message::new("payload", 2);
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["content"], "payload");
        assert_eq!(json["count"], 2);
    }
}
