use jiff::{SignedDuration, Timestamp};
use std::time::Duration;

/// Time-to-live applied to a new mapping.
///
/// A zero or negative duration means the mapping never expires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ttl(SignedDuration);

impl Ttl {
    /// A TTL that never expires.
    pub const NEVER: Ttl = Ttl(SignedDuration::ZERO);

    pub fn new(duration: SignedDuration) -> Self {
        Self(duration)
    }

    /// Creates a TTL from whole seconds; `secs <= 0` never expires.
    pub fn from_secs(secs: i64) -> Self {
        Self(SignedDuration::from_secs(secs))
    }

    pub fn from_millis(millis: i64) -> Self {
        Self(SignedDuration::from_millis(millis))
    }

    pub fn is_never(&self) -> bool {
        !self.0.is_positive()
    }

    /// Computes the expiration instant for a mapping created at `now`.
    ///
    /// Returns `None` for a never-expiring TTL, and also when the sum would
    /// overflow the representable time range.
    pub fn expires_at(&self, now: Timestamp) -> Option<Timestamp> {
        if self.is_never() {
            return None;
        }
        now.checked_add(self.0).ok()
    }
}

impl From<SignedDuration> for Ttl {
    fn from(value: SignedDuration) -> Self {
        Self::new(value)
    }
}

impl From<Duration> for Ttl {
    fn from(value: Duration) -> Self {
        Self(SignedDuration::try_from(value).unwrap_or(SignedDuration::MAX))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_and_negative_never_expire() {
        let now = Timestamp::now();
        assert_eq!(Ttl::from_secs(0).expires_at(now), None);
        assert_eq!(Ttl::from_secs(-5).expires_at(now), None);
        assert!(Ttl::NEVER.is_never());
    }

    #[test]
    fn positive_ttl_adds_to_now() {
        let now = Timestamp::from_second(1_000).unwrap();
        let expires = Ttl::from_secs(60).expires_at(now).unwrap();
        assert_eq!(expires.as_second(), 1_060);
    }

    #[test]
    fn from_std_duration() {
        let ttl = Ttl::from(Duration::from_secs(3600));
        assert_eq!(ttl, Ttl::from_secs(3600));
        assert!(!ttl.is_never());
    }
}
