//! Event shapes shared across layers: what a user authors, and what the
//! pipeline resolves it into.

use crate::common::error::{Result, ScraperError};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Competition stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Phase {
    Prelims,
    Finals,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Prelims => "prelims",
            Phase::Finals => "finals",
        }
    }
}

impl FromStr for Phase {
    type Err = ScraperError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "prelims" => Ok(Phase::Prelims),
            "finals" => Ok(Phase::Finals),
            other => Err(ScraperError::config(format!(
                "unknown phase '{other}' (expected prelims or finals)"
            ))),
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Gender {
    Girls,
    Boys,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Girls => "girls",
            Gender::Boys => "boys",
        }
    }
}

impl FromStr for Gender {
    type Err = ScraperError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "girls" => Ok(Gender::Girls),
            "boys" => Ok(Gender::Boys),
            other => Err(ScraperError::config(format!(
                "unknown gender '{other}' (expected girls or boys)"
            ))),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `season` XOR `seasons`, enforced by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeasonSelector {
    Single(String),
    Many(Vec<String>),
}

impl SeasonSelector {
    pub fn seasons(&self) -> &[String] {
        match self {
            SeasonSelector::Single(season) => std::slice::from_ref(season),
            SeasonSelector::Many(seasons) => seasons,
        }
    }
}

/// Where an event's CSV goes when the author overrides the default folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// Directory; the file name comes from the deterministic pattern.
    Folder(PathBuf),
    /// Explicit file path, optionally containing `{season}`.
    File(String),
}

impl OutputTarget {
    /// Interpret a config `out`/`folder` value: a `.csv` suffix means an explicit file.
    pub fn from_config_value(value: &str) -> Self {
        if value.to_ascii_lowercase().ends_with(".csv") {
            OutputTarget::File(value.to_string())
        } else {
            OutputTarget::Folder(PathBuf::from(value))
        }
    }
}

/// A validated event entry as authored, before season expansion and
/// default resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEventSpec {
    pub seasons: SeasonSelector,
    pub phase: Phase,
    pub gender: Gender,
    pub division: String,
    pub event_slug: String,
    pub state: Option<String>,
    pub output: Option<OutputTarget>,
    pub meet_slug: Option<String>,
    pub extension: Option<String>,
}

/// Top-level values applied to events that omit them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Defaults {
    pub state: Option<String>,
    pub folder: Option<PathBuf>,
}

/// The tuple that determines one fetch target.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EventKey {
    pub season: String,
    pub phase: Phase,
    pub gender: Gender,
    pub division: String,
    pub event_slug: String,
    pub state: String,
}

impl fmt::Display for EventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "season={} phase={} gender={} division={} event_slug={} state={}",
            self.season, self.phase, self.gender, self.division, self.event_slug, self.state
        )
    }
}

/// Source-side options that shape the URL but not the identity of an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceOptions {
    pub meet_slug: Option<String>,
    pub extension: String,
}

/// One fully resolved, single-season fetch unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEventSpec {
    pub key: EventKey,
    pub output_path: PathBuf,
    pub source: SourceOptions,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_and_gender_parse_case_insensitively() {
        assert_eq!("Finals".parse::<Phase>().unwrap(), Phase::Finals);
        assert_eq!(" prelims ".parse::<Phase>().unwrap(), Phase::Prelims);
        assert_eq!("BOYS".parse::<Gender>().unwrap(), Gender::Boys);
        assert!("semis".parse::<Phase>().is_err());
        assert!("mixed".parse::<Gender>().is_err());
    }

    #[test]
    fn test_output_target_from_config_value() {
        assert_eq!(
            OutputTarget::from_config_value("_data/ohio"),
            OutputTarget::Folder(PathBuf::from("_data/ohio"))
        );
        assert_eq!(
            OutputTarget::from_config_value("_data/{season}-finals.CSV"),
            OutputTarget::File("_data/{season}-finals.CSV".into())
        );
    }

    #[test]
    fn test_season_selector_slices() {
        let many = SeasonSelector::Many(vec!["2024-2025".into(), "2023-2024".into()]);
        assert_eq!(many.seasons().len(), 2);
        let single = SeasonSelector::Single("2024-2025".into());
        assert_eq!(single.seasons(), &["2024-2025".to_string()]);
    }
}
