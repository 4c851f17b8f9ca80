//! Mood tag model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// How the user felt when writing an entry.
///
/// The set is fixed; an entry without a mood is represented as `Option::None`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Happy,
    Sad,
    Angry,
    Excited,
    Relaxed,
}

impl Mood {
    /// Every mood, in display order.
    pub const ALL: [Self; 5] = [
        Self::Happy,
        Self::Sad,
        Self::Angry,
        Self::Excited,
        Self::Relaxed,
    ];

    /// Lower-case label used in storage and on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Happy => "happy",
            Self::Sad => "sad",
            Self::Angry => "angry",
            Self::Excited => "excited",
            Self::Relaxed => "relaxed",
        }
    }

    /// Parse a stored label, treating blanks as "unset".
    pub fn parse_optional(value: Option<&str>) -> Result<Option<Self>, Error> {
        match value.map(str::trim) {
            None | Some("") => Ok(None),
            Some(label) => label.parse().map(Some),
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mood {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim();
        Self::ALL
            .into_iter()
            .find(|mood| mood.as_str().eq_ignore_ascii_case(label))
            .ok_or_else(|| Error::InvalidInput(format!("Unknown mood: {label}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("Happy".parse::<Mood>().unwrap(), Mood::Happy);
        assert_eq!(" relaxed ".parse::<Mood>().unwrap(), Mood::Relaxed);
    }

    #[test]
    fn rejects_unknown_label() {
        assert!("meh".parse::<Mood>().is_err());
    }

    #[test]
    fn blank_label_is_unset() {
        assert_eq!(Mood::parse_optional(None).unwrap(), None);
        assert_eq!(Mood::parse_optional(Some("  ")).unwrap(), None);
        assert_eq!(
            Mood::parse_optional(Some("sad")).unwrap(),
            Some(Mood::Sad)
        );
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Mood::Excited).unwrap(), "\"excited\"");
    }
}
