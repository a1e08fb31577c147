//! Access event model for asynchronous access counting.

/// A successful redirect waiting to be counted.
///
/// Sent from the redirect handler to the background worker through a bounded
/// channel so the redirect response never waits on the counter update.
///
/// # Usage Flow
///
/// 1. Created in the redirect handler after the mapping was resolved
/// 2. Sent to the channel (non-blocking, dropped if the queue is full)
/// 3. Processed by [`crate::domain::access_worker::run_access_worker`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessEvent {
    pub short_code: String,
}

impl AccessEvent {
    pub fn new(short_code: impl Into<String>) -> Self {
        Self {
            short_code: short_code.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_event_creation() {
        let event = AccessEvent::new("abc123");
        assert_eq!(event.short_code, "abc123");
        assert_eq!(event, AccessEvent::new("abc123".to_string()));
    }
}
