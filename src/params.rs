//! Closed sets of query filters and the path tokens they serialise to.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Error;

/// Generates `as_str`, `ALL`, `Display`, `FromStr` and token-based serde for a
/// fieldless enum.
macro_rules! token_enum {
    ($name:ident, $what:literal, { $($variant:ident => $token:literal),+ $(,)? }) => {
        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Path token sent to the API.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $token),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($token => Ok($name::$variant),)+
                    other => Err(Error::invalid(format!("unknown {} `{}`", $what, other))),
                }
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let token = String::deserialize(deserializer)?;
                token.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

/// Which sensor channels a station data query returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorType {
    Data,
    Diagnostic,
    /// Both data and diagnostic channels. Serialises to an empty token, which
    /// the path builder drops rather than emitting an empty segment.
    All,
}

token_enum!(SensorType, "sensor type", {
    Data => "data",
    Diagnostic => "diagnostic",
    All => "",
});

/// Whether records are labelled with the start or the end of their interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeConvention {
    TimeBeginning,
    TimeEnding,
}

token_enum!(TimeConvention, "time convention", {
    TimeBeginning => "TimeBeginning",
    TimeEnding => "TimeEnding",
});

/// Server-side averaging window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AveragePeriod {
    Minutes5,
    Minutes10,
    Minutes15,
    Minutes20,
    Minutes30,
    Hours1,
    Hours2,
    Hours3,
    Hours4,
    Hours6,
    Hours8,
    Hours12,
    Hours24,
}

token_enum!(AveragePeriod, "average period", {
    Minutes5 => "AVG5",
    Minutes10 => "AVG10",
    Minutes15 => "AVG15",
    Minutes20 => "AVG20",
    Minutes30 => "AVG30",
    Hours1 => "AVG60",
    Hours2 => "AVG120",
    Hours3 => "AVG180",
    Hours4 => "AVG240",
    Hours6 => "AVG360",
    Hours8 => "AVG480",
    Hours12 => "AVG720",
    Hours24 => "AVG1440",
});

impl AveragePeriod {
    /// Length of the averaging window in minutes.
    pub const fn minutes(self) -> u32 {
        match self {
            Self::Minutes5 => 5,
            Self::Minutes10 => 10,
            Self::Minutes15 => 15,
            Self::Minutes20 => 20,
            Self::Minutes30 => 30,
            Self::Hours1 => 60,
            Self::Hours2 => 120,
            Self::Hours3 => 180,
            Self::Hours4 => 240,
            Self::Hours6 => 360,
            Self::Hours8 => 480,
            Self::Hours12 => 720,
            Self::Hours24 => 1440,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn average_period_tokens() {
        let tokens: Vec<&str> = AveragePeriod::ALL.iter().map(|p| p.as_str()).collect();
        assert_eq!(
            tokens,
            [
                "AVG5", "AVG10", "AVG15", "AVG20", "AVG30", "AVG60", "AVG120", "AVG180", "AVG240",
                "AVG360", "AVG480", "AVG720", "AVG1440",
            ]
        );
    }

    #[test]
    fn average_period_token_round_trip() {
        for period in AveragePeriod::ALL {
            let parsed: AveragePeriod = period.as_str().parse().unwrap();
            assert_eq!(parsed, *period);
            assert_eq!(parsed.as_str(), period.as_str());
        }
    }

    #[test]
    fn average_period_token_matches_minutes() {
        for period in AveragePeriod::ALL {
            assert_eq!(period.as_str(), format!("AVG{}", period.minutes()));
        }
    }

    #[test]
    fn tokens_are_unique_within_each_set() {
        let sensor: HashSet<_> = SensorType::ALL.iter().map(|s| s.as_str()).collect();
        let time: HashSet<_> = TimeConvention::ALL.iter().map(|t| t.as_str()).collect();
        let avg: HashSet<_> = AveragePeriod::ALL.iter().map(|p| p.as_str()).collect();

        assert_eq!(sensor.len(), SensorType::ALL.len());
        assert_eq!(time.len(), TimeConvention::ALL.len());
        assert_eq!(avg.len(), AveragePeriod::ALL.len());
    }

    #[test]
    fn sensor_type_tokens() {
        assert_eq!(SensorType::Data.as_str(), "data");
        assert_eq!(SensorType::Diagnostic.as_str(), "diagnostic");
        assert_eq!(SensorType::All.as_str(), "");
        assert_eq!("".parse::<SensorType>().unwrap(), SensorType::All);
    }

    #[test]
    fn unknown_token_is_invalid_parameter() {
        let err = "AVG7".parse::<AveragePeriod>().unwrap_err();
        assert!(matches!(err, Error::InvalidParameter(_)));

        // tokens are case sensitive
        assert!("timeending".parse::<TimeConvention>().is_err());
        assert!("Data".parse::<SensorType>().is_err());
    }

    #[test]
    fn serde_uses_tokens() {
        let json = serde_json::to_string(&AveragePeriod::Hours24).unwrap();
        assert_eq!(json, "\"AVG1440\"");

        let parsed: TimeConvention = serde_json::from_str("\"TimeBeginning\"").unwrap();
        assert_eq!(parsed, TimeConvention::TimeBeginning);

        assert!(serde_json::from_str::<AveragePeriod>("\"AVG2\"").is_err());
    }
}
