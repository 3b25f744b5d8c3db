use std::{
    fmt::{self, Display, Formatter},
    ops::Add,
    str::FromStr,
    time::{Duration, SystemTime},
};

use humantime::{DurationError, TimestampError};
#[cfg(any(feature = "testing", test))]
use rand::Rng;
use serde::{de::Error as SerdeError, Deserialize, Deserializer, Serialize, Serializer};

use crate::bytesrepr::{self, FromBytes, ToBytes};
#[cfg(any(feature = "testing", test))]
use crate::testing::TestRng;

// Both types below are a count of milliseconds on the wire and text in JSON.
macro_rules! impl_millis_codec {
    ($type:ident) => {
        impl Serialize for $type {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                if serializer.is_human_readable() {
                    serializer.collect_str(self)
                } else {
                    serializer.serialize_u64(self.0)
                }
            }
        }

        impl<'de> Deserialize<'de> for $type {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                if deserializer.is_human_readable() {
                    let text = String::deserialize(deserializer)?;
                    text.parse().map_err(SerdeError::custom)
                } else {
                    u64::deserialize(deserializer).map($type)
                }
            }
        }

        impl ToBytes for $type {
            fn to_bytes(&self) -> Result<Vec<u8>, bytesrepr::Error> {
                self.0.to_bytes()
            }

            fn serialized_length(&self) -> usize {
                self.0.serialized_length()
            }

            fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), bytesrepr::Error> {
                self.0.write_bytes(writer)
            }
        }

        impl FromBytes for $type {
            fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), bytesrepr::Error> {
                let (millis, remainder) = u64::from_bytes(bytes)?;
                Ok(($type(millis), remainder))
            }
        }
    };
}

fn duration_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// A point in time, in milliseconds since the Unix epoch.
///
/// Rendered as RFC 3339 with millisecond precision, e.g. `2021-05-04T14:20:35.104Z`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(u64);

impl Timestamp {
    /// The current time according to the system clock.
    pub fn now() -> Self {
        let since_epoch = SystemTime::UNIX_EPOCH.elapsed().unwrap_or_default();
        Timestamp(duration_millis(since_epoch))
    }

    /// The Unix epoch.
    pub fn zero() -> Self {
        Timestamp(0)
    }

    /// Milliseconds since the Unix epoch.
    pub fn millis(&self) -> u64 {
        self.0
    }

    /// Adds `diff`, clamping at the largest representable instant.
    #[must_use]
    pub fn saturating_add(self, diff: TimeDiff) -> Timestamp {
        Timestamp(self.0.saturating_add(diff.0))
    }

    /// Returns a random `Timestamp` in the summer of 2020.
    #[cfg(any(feature = "testing", test))]
    pub fn random(rng: &mut TestRng) -> Self {
        Timestamp(1_596_763_000_000 + rng.gen_range(200_000..1_000_000))
    }
}

impl Display for Timestamp {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        match SystemTime::UNIX_EPOCH.checked_add(Duration::from_millis(self.0)) {
            // humantime refuses instants past the year 9999.
            Some(instant) => write!(formatter, "{}", humantime::format_rfc3339_millis(instant))
                .or_else(|_| write!(formatter, "{}ms after the Unix epoch", self.0)),
            None => write!(formatter, "{}ms after the Unix epoch", self.0),
        }
    }
}

impl FromStr for Timestamp {
    type Err = TimestampError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let since_epoch = humantime::parse_rfc3339_weak(text)?
            .duration_since(SystemTime::UNIX_EPOCH)
            .map_err(|_| TimestampError::OutOfRange)?;
        Ok(Timestamp(duration_millis(since_epoch)))
    }
}

impl Add<TimeDiff> for Timestamp {
    type Output = Timestamp;

    fn add(self, diff: TimeDiff) -> Timestamp {
        self.saturating_add(diff)
    }
}

impl From<u64> for Timestamp {
    fn from(millis: u64) -> Timestamp {
        Timestamp(millis)
    }
}

impl_millis_codec!(Timestamp);

/// A span of time in milliseconds, e.g. a deploy's time-to-live.
///
/// Rendered in humantime form such as `30m` or `1h 5m`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeDiff(u64);

impl TimeDiff {
    /// The length of the span in milliseconds.
    pub fn millis(&self) -> u64 {
        self.0
    }

    /// A span of `seconds` seconds.
    pub const fn from_seconds(seconds: u32) -> Self {
        TimeDiff(seconds as u64 * 1_000)
    }

    /// A span of `millis` milliseconds.
    pub const fn from_millis(millis: u64) -> Self {
        TimeDiff(millis)
    }
}

impl Display for TimeDiff {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        write!(formatter, "{}", humantime::format_duration(Duration::from(*self)))
    }
}

impl FromStr for TimeDiff {
    type Err = DurationError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        humantime::parse_duration(text).map(TimeDiff::from)
    }
}

impl From<TimeDiff> for Duration {
    fn from(diff: TimeDiff) -> Duration {
        Duration::from_millis(diff.0)
    }
}

impl From<Duration> for TimeDiff {
    fn from(duration: Duration) -> TimeDiff {
        TimeDiff(duration_millis(duration))
    }
}

impl_millis_codec!(TimeDiff);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_should_roundtrip_through_text_json_and_bytes() {
        let timestamp = Timestamp::now();
        assert_eq!(timestamp.to_string().parse::<Timestamp>().unwrap(), timestamp);

        let json = serde_json::to_string(&timestamp).unwrap();
        assert_eq!(serde_json::from_str::<Timestamp>(&json).unwrap(), timestamp);

        bytesrepr::test_serialization_roundtrip(&timestamp);
    }

    #[test]
    fn timestamp_should_use_rfc3339_millis() {
        let timestamp = Timestamp::from(1_620_138_035_104);
        assert_eq!(timestamp.to_string(), "2021-05-04T14:20:35.104Z");
        assert_eq!(
            Timestamp::from_str("2021-05-04T14:20:35.104Z").unwrap(),
            timestamp
        );
        assert_eq!(
            base16::encode_lower(&timestamp.to_bytes().unwrap()),
            "a087c03779010000"
        );
        assert!(Timestamp::from_str("yesterday").is_err());
    }

    #[test]
    fn timediff_should_roundtrip_through_text_json_and_bytes() {
        let mut rng = TestRng::new();
        // Up to roughly a year, which humantime renders without loss.
        let diff = TimeDiff::from_millis(rng.gen_range(0..31_536_000_000));
        assert_eq!(diff.to_string().parse::<TimeDiff>().unwrap(), diff);

        let json = serde_json::to_string(&diff).unwrap();
        assert_eq!(serde_json::from_str::<TimeDiff>(&json).unwrap(), diff);

        bytesrepr::test_serialization_roundtrip(&diff);
    }

    #[test]
    fn timediff_should_read_human_durations() {
        let ttl = TimeDiff::from_str("30m").unwrap();
        assert_eq!(ttl.millis(), 1_800_000);
        assert_eq!(ttl.to_string(), "30m");
        assert_eq!(
            base16::encode_lower(&ttl.to_bytes().unwrap()),
            "40771b0000000000"
        );
        assert_eq!(TimeDiff::from_seconds(1), TimeDiff::from_millis(1_000));
        assert_eq!(TimeDiff::from(Duration::from_secs(90)).to_string(), "1m 30s");
        assert!(TimeDiff::from_str("thirty").is_err());
    }

    #[test]
    fn should_add_saturating() {
        let timestamp = Timestamp::from(u64::MAX - 1);
        assert_eq!(timestamp + TimeDiff::from_millis(5), Timestamp::from(u64::MAX));
        assert_eq!(Timestamp::zero().millis(), 0);
    }
}
