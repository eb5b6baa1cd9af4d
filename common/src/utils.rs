pub mod time {
    use std::time::{SystemTime, SystemTimeError, UNIX_EPOCH};

    /// Current Unix time in whole seconds.
    pub fn unix_now() -> Result<i64, SystemTimeError> {
        unix_seconds(SystemTime::now())
    }

    /// Whole seconds since the Unix epoch. Fails for instants before it.
    pub fn unix_seconds(at: SystemTime) -> Result<i64, SystemTimeError> {
        Ok(at.duration_since(UNIX_EPOCH)?.as_secs() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::time::{unix_now, unix_seconds};
    use std::time::{Duration, UNIX_EPOCH};

    #[test]
    fn test_unix_now_is_after_2020() {
        // 2020-01-01T00:00:00Z
        assert!(unix_now().unwrap() > 1_577_836_800);
    }

    #[test]
    fn test_unix_seconds() {
        assert_eq!(unix_seconds(UNIX_EPOCH + Duration::from_secs(90)).unwrap(), 90);
    }

    #[test]
    fn test_clock_before_epoch_is_an_error() {
        assert!(unix_seconds(UNIX_EPOCH - Duration::from_secs(1)).is_err());
    }
}
