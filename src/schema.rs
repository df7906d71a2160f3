use std::num::ParseIntError;

use chrono::{DateTime, FixedOffset};
use getset::{CopyGetters, Getters};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use typed_builder::TypedBuilder;

/// Dotabuff player ID, as it appears in the profile URL.
#[derive(
    Clone,
    PartialEq,
    Eq,
    Debug,
    derive_more::AsRef,
    derive_more::Display,
    derive_more::From,
    derive_more::FromStr,
)]
pub struct PlayerId(String);

#[derive(
    Clone,
    PartialEq,
    Eq,
    Debug,
    derive_more::AsRef,
    derive_more::Display,
    derive_more::From,
    Serialize,
    Deserialize,
)]
pub struct HeroName(String);

/// Match ID, taken from the path of a match link with the leading
/// `/matches/` stripped.
#[derive(
    Clone,
    PartialEq,
    Eq,
    Debug,
    derive_more::AsRef,
    derive_more::Display,
    derive_more::From,
    Serialize,
    Deserialize,
)]
pub struct MatchId(String);

/// Time a match was played at, as recorded in the `datetime` attribute of
/// the time element next to the match result.
#[derive(
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Debug,
    derive_more::From,
    derive_more::Into,
    derive_more::FromStr,
    derive_more::Display,
    Serialize,
    Deserialize,
)]
pub struct MatchTime(DateTime<FixedOffset>);

impl MatchTime {
    pub fn get(self) -> DateTime<FixedOffset> {
        self.0
    }
}

/// Match length as displayed on the site, `hh:mm:ss` or `mm:ss`.
#[derive(
    Clone,
    PartialEq,
    Eq,
    Debug,
    derive_more::AsRef,
    derive_more::Display,
    derive_more::From,
    Serialize,
    Deserialize,
)]
pub struct MatchDuration(String);

impl MatchDuration {
    /// Total seconds of the displayed duration.
    /// The CSV output keeps the displayed form instead.
    pub fn to_secs(&self) -> Result<u32, DurationParseError> {
        let segments = self
            .0
            .split(':')
            .map(str::parse)
            .collect::<Result<Vec<u32>, _>>()?;
        match segments[..] {
            [hours, minutes, seconds] => Ok(hours * 3600 + minutes * 60 + seconds),
            [minutes, seconds] => Ok(minutes * 60 + seconds),
            [seconds] => Ok(seconds),
            _ => Err(DurationParseError::UnexpectedSegmentCount(segments.len())),
        }
    }
}

#[derive(PartialEq, Eq, Debug, Error)]
pub enum DurationParseError {
    #[error("Segment cannot be parsed as an integer: {0}")]
    ParseIntError(#[from] ParseIntError),
    #[error("Expected at most three colon-separated segments, found {0}")]
    UnexpectedSegmentCount(usize),
}

/// One row of the matches table.  Field order is the column order of the
/// CSV output.
#[derive(Clone, PartialEq, Eq, Debug, TypedBuilder, Getters, CopyGetters, Serialize, Deserialize)]
pub struct MatchRecord {
    #[getset(get = "pub")]
    hero: HeroName,
    #[getset(get = "pub")]
    match_id: MatchId,
    #[getset(get = "pub")]
    skill_level: String,
    #[getset(get = "pub")]
    result: String,
    #[getset(get_copy = "pub")]
    timestamp: MatchTime,
    #[getset(get = "pub")]
    #[serde(rename = "type")]
    match_type: String,
    #[getset(get = "pub")]
    game_mode: String,
    #[getset(get = "pub")]
    duration: MatchDuration,
    #[getset(get = "pub")]
    kda: String,
    #[getset(get = "pub")]
    items: String,
}

#[cfg(test)]
mod tests {
    use super::{DurationParseError, MatchDuration, MatchTime};

    #[test]
    fn test_duration_to_secs() {
        assert_eq!(MatchDuration::from("1:02:03".to_owned()).to_secs(), Ok(3723));
        assert_eq!(MatchDuration::from("5:30".to_owned()).to_secs(), Ok(330));
        assert_eq!(MatchDuration::from("45".to_owned()).to_secs(), Ok(45));
    }

    #[test]
    fn test_duration_to_secs_errors() {
        assert!(matches!(
            MatchDuration::from("".to_owned()).to_secs(),
            Err(DurationParseError::ParseIntError(_))
        ));
        assert!(matches!(
            MatchDuration::from("12:a4".to_owned()).to_secs(),
            Err(DurationParseError::ParseIntError(_))
        ));
        assert_eq!(
            MatchDuration::from("1:2:3:4".to_owned()).to_secs(),
            Err(DurationParseError::UnexpectedSegmentCount(4))
        );
    }

    #[test]
    fn test_match_time_ordering() {
        let utc: MatchTime = "2023-01-15T20:10:23+00:00".parse().unwrap();
        let jst: MatchTime = "2023-01-16T03:00:00+09:00".parse().unwrap();
        // Offsets are normalized: 03:00+09:00 is 18:00 UTC the day before.
        assert!(jst < utc);
    }

    #[test]
    fn test_match_time_round_trip() {
        let time: MatchTime = "2023-01-15T20:10:23+00:00".parse().unwrap();
        let json = serde_json::to_string(&time).unwrap();
        assert_eq!(json, r#""2023-01-15T20:10:23+00:00""#);
        assert_eq!(serde_json::from_str::<MatchTime>(&json).unwrap(), time);
    }
}
