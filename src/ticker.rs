use std::time::Duration;

/// Default tick interval in milliseconds
pub const DEFAULT_TICK_MS: u64 = 250;

/// How long a status message stays in the footer
pub const MESSAGE_TTL_SECS: i64 = 4;

/// Get tick duration
pub fn tick_duration() -> Duration {
    Duration::from_millis(DEFAULT_TICK_MS)
}

pub fn message_ttl() -> chrono::Duration {
    chrono::Duration::seconds(MESSAGE_TTL_SECS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_duration() {
        let duration = tick_duration();
        assert_eq!(duration, Duration::from_millis(250));
    }

    #[test]
    fn test_message_outlives_several_ticks() {
        let ticks = message_ttl().num_milliseconds() as u64 / DEFAULT_TICK_MS;
        assert!(ticks >= 8);
    }
}
