use crate::common::constants::SEASON_PLACEHOLDER;
use crate::common::error::{Result, ScraperError};
use crate::domain::{Defaults, OutputTarget, RawEventSpec, SeasonSelector};
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Structured document formats accepted for event configs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Yaml,
    Json,
    Toml,
}

impl DocumentFormat {
    /// Pick a format from the file extension, falling back to sniffing the content.
    pub fn detect(path: &Path, text: &str) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("yaml") | Some("yml") => DocumentFormat::Yaml,
            Some("json") => DocumentFormat::Json,
            Some("toml") => DocumentFormat::Toml,
            _ => {
                let trimmed = text.trim_start();
                if trimmed.starts_with('{') || trimmed.starts_with('[') {
                    DocumentFormat::Json
                } else {
                    DocumentFormat::Yaml
                }
            }
        }
    }
}

/// One event entry exactly as authored. Every field is optional here;
/// [`validate_entry`] turns it into a [`RawEventSpec`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventEntry {
    pub season: Option<String>,
    pub seasons: Option<Vec<String>>,
    pub phase: Option<String>,
    pub gender: Option<String>,
    pub division: Option<String>,
    pub event_slug: Option<String>,
    pub state: Option<String>,
    pub folder: Option<String>,
    pub out: Option<String>,
    pub meet_slug: Option<String>,
    pub extension: Option<String>,
}

/// Canonical result of loading a config document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadedConfig {
    pub defaults: Defaults,
    pub events: Vec<RawEventSpec>,
}

/// The two accepted document shapes. Resolved once, right here.
enum ConfigDocument {
    Bare(Vec<Value>),
    Wrapped {
        state: Option<String>,
        folder: Option<String>,
        events: Vec<Value>,
    },
}

#[derive(Deserialize)]
struct WrappedDocument {
    events: Vec<Value>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default, alias = "out")]
    folder: Option<String>,
}

impl ConfigDocument {
    fn from_value(value: Value) -> Result<Self> {
        let wrapped = matches!(&value, Value::Object(map) if map.contains_key("events"));
        if wrapped {
            let doc: WrappedDocument = serde_json::from_value(value)?;
            return Ok(ConfigDocument::Wrapped {
                state: doc.state,
                folder: doc.folder,
                events: doc.events,
            });
        }
        match value {
            Value::Array(events) => Ok(ConfigDocument::Bare(events)),
            _ => Err(ScraperError::config(
                "config must be a list of events or contain an 'events' list",
            )),
        }
    }
}

/// Read and parse an event config document from disk.
pub fn load_config(path: &Path) -> Result<LoadedConfig> {
    let text = fs::read_to_string(path).map_err(|e| {
        ScraperError::config(format!("failed to read config file '{}': {}", path.display(), e))
    })?;
    let format = DocumentFormat::detect(path, &text);
    debug!("Loading {:?} config from {}", format, path.display());
    parse_config(&text, format)
}

pub fn parse_config(text: &str, format: DocumentFormat) -> Result<LoadedConfig> {
    let value: Value = match format {
        DocumentFormat::Yaml => serde_yaml::from_str(text)?,
        DocumentFormat::Json => serde_json::from_str(text)?,
        DocumentFormat::Toml => toml::from_str(text)?,
    };

    let (defaults, entries) = match ConfigDocument::from_value(value)? {
        ConfigDocument::Bare(events) => (Defaults::default(), events),
        ConfigDocument::Wrapped {
            state,
            folder,
            events,
        } => {
            let state = state
                .map(|s| validate_identity("state", &s))
                .transpose()
                .map_err(|e| ScraperError::config(format!("top-level {}", bare_message(e))))?;
            let folder = folder
                .map(|f| validate_folder(&f))
                .transpose()
                .map_err(|e| ScraperError::config(format!("top-level {}", bare_message(e))))?;
            (Defaults { state, folder }, events)
        }
    };

    let mut events = Vec::with_capacity(entries.len());
    for (idx, entry) in entries.into_iter().enumerate() {
        if !entry.is_object() {
            return Err(ScraperError::config(format!(
                "event[{idx}] is not a mapping: {entry}"
            )));
        }
        let entry: EventEntry = serde_json::from_value(entry)
            .map_err(|e| ScraperError::config(format!("event[{idx}]: {e}")))?;
        let spec = validate_entry(&entry)
            .map_err(|e| ScraperError::config(format!("event[{idx}]: {}", bare_message(e))))?;
        events.push(spec);
    }

    Ok(LoadedConfig { defaults, events })
}

/// Check one authored entry and convert it to a [`RawEventSpec`].
///
/// Shared by the config loader and the single-event CLI path.
pub fn validate_entry(entry: &EventEntry) -> Result<RawEventSpec> {
    let mut missing: Vec<&str> = Vec::new();
    if entry.phase.is_none() {
        missing.push("phase");
    }
    if entry.gender.is_none() {
        missing.push("gender");
    }
    if entry.division.is_none() {
        missing.push("division");
    }
    if entry.event_slug.is_none() {
        missing.push("event_slug");
    }
    if !missing.is_empty() {
        return Err(ScraperError::config(format!(
            "missing required fields: {}",
            missing.join(", ")
        )));
    }

    let seasons = match (&entry.season, &entry.seasons) {
        (Some(_), Some(_)) => {
            return Err(ScraperError::config(
                "specifies both `season` and `seasons`; use exactly one",
            ))
        }
        (None, None) => {
            return Err(ScraperError::config(
                "missing required field: `season` or `seasons`",
            ))
        }
        (Some(season), None) => SeasonSelector::Single(validate_identity("season", season)?),
        (None, Some(list)) => {
            if list.is_empty() {
                return Err(ScraperError::config("`seasons` must not be empty"));
            }
            let seasons = list
                .iter()
                .map(|s| validate_identity("season", s))
                .collect::<Result<Vec<_>>>()?;
            SeasonSelector::Many(seasons)
        }
    };

    // Presence was checked above.
    let phase = entry.phase.as_deref().unwrap_or_default().parse()?;
    let gender = entry.gender.as_deref().unwrap_or_default().parse()?;
    let division = validate_identity("division", entry.division.as_deref().unwrap_or_default())?;
    let event_slug =
        validate_identity("event_slug", entry.event_slug.as_deref().unwrap_or_default())?;

    let state = entry
        .state
        .as_deref()
        .map(|s| validate_identity("state", s))
        .transpose()?;

    let output = match (&entry.folder, &entry.out) {
        (Some(_), Some(_)) => {
            return Err(ScraperError::config(
                "specifies both `folder` and `out`; use exactly one",
            ))
        }
        (Some(folder), None) => Some(OutputTarget::Folder(validate_folder(folder)?)),
        (None, Some(out)) => {
            if out.trim().is_empty() {
                return Err(ScraperError::config("`out` must not be empty"));
            }
            Some(OutputTarget::from_config_value(out.trim()))
        }
        (None, None) => None,
    };

    if let (Some(OutputTarget::File(path)), SeasonSelector::Many(list)) = (&output, &seasons) {
        if list.len() > 1 && !path.contains(SEASON_PLACEHOLDER) {
            return Err(ScraperError::config(format!(
                "`out` file '{path}' must contain a {SEASON_PLACEHOLDER} placeholder when several seasons are listed"
            )));
        }
    }

    let meet_slug = entry
        .meet_slug
        .as_deref()
        .map(|s| validate_identity("meet_slug", s))
        .transpose()?;
    let extension = entry
        .extension
        .as_deref()
        .map(|e| validate_identity("extension", e.trim().trim_start_matches('.')))
        .transpose()?;

    Ok(RawEventSpec {
        seasons,
        phase,
        gender,
        division,
        event_slug,
        state,
        output,
        meet_slug,
        extension,
    })
}

/// Identity fields end up inside file names and URL segments, so they
/// may not be empty or carry path separators.
pub(crate) fn validate_identity(field: &str, value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ScraperError::config(format!("`{field}` must not be empty")));
    }
    if value.contains('/') || value.contains('\\') {
        return Err(ScraperError::config(format!(
            "`{field}` value '{value}' must not contain a path separator"
        )));
    }
    if value == "." || value == ".." {
        return Err(ScraperError::config(format!(
            "`{field}` value '{value}' is not a valid name"
        )));
    }
    Ok(value.to_string())
}

fn validate_folder(value: &str) -> Result<PathBuf> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ScraperError::config("`folder` must not be empty"));
    }
    Ok(PathBuf::from(value))
}

/// Strip the variant prefix so nested context reads as one message.
fn bare_message(err: ScraperError) -> String {
    match err {
        ScraperError::Config(message) => message,
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::error::ErrorKind;
    use crate::domain::{Gender, Phase};

    const WRAPPED_YAML: &str = r#"
state: ohio
folder: _data/ohio
events:
  - season: 2024-2025
    phase: finals
    gender: girls
    division: d1
    event_slug: 50-freestyle
  - seasons: [2024-2025, 2023-2024]
    phase: prelims
    gender: boys
    division: d2
    event_slug: 100-backstroke
    state: indiana
"#;

    #[test]
    fn test_wrapped_yaml_with_defaults() {
        let config = parse_config(WRAPPED_YAML, DocumentFormat::Yaml).unwrap();
        assert_eq!(config.defaults.state.as_deref(), Some("ohio"));
        assert_eq!(config.defaults.folder, Some(PathBuf::from("_data/ohio")));
        assert_eq!(config.events.len(), 2);

        let first = &config.events[0];
        assert_eq!(first.seasons, SeasonSelector::Single("2024-2025".into()));
        assert_eq!(first.phase, Phase::Finals);
        assert_eq!(first.gender, Gender::Girls);
        assert_eq!(first.state, None);

        let second = &config.events[1];
        assert_eq!(
            second.seasons,
            SeasonSelector::Many(vec!["2024-2025".into(), "2023-2024".into()])
        );
        assert_eq!(second.state.as_deref(), Some("indiana"));
    }

    #[test]
    fn test_bare_json_list_has_no_defaults() {
        let json = r#"[{"season": "2024-2025", "phase": "finals", "gender": "girls",
                        "division": "d1", "event_slug": "50-freestyle", "state": "ohio"}]"#;
        let config = parse_config(json, DocumentFormat::Json).unwrap();
        assert_eq!(config.defaults, Defaults::default());
        assert_eq!(config.events.len(), 1);
    }

    #[test]
    fn test_toml_events_table() {
        let text = r#"
state = "ohio"

[[events]]
season = "2024-2025"
phase = "finals"
gender = "boys"
division = "d1"
event_slug = "200-im"
"#;
        let config = parse_config(text, DocumentFormat::Toml).unwrap();
        assert_eq!(config.defaults.state.as_deref(), Some("ohio"));
        assert_eq!(config.events[0].event_slug, "200-im");
    }

    #[test]
    fn test_rejects_both_season_and_seasons() {
        let yaml = r#"
- season: 2024-2025
  seasons: [2023-2024]
  phase: finals
  gender: girls
  division: d1
  event_slug: 50-freestyle
"#;
        let err = parse_config(yaml, DocumentFormat::Yaml).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
        assert!(err.to_string().contains("both `season` and `seasons`"));
    }

    #[test]
    fn test_rejects_missing_identity_fields() {
        let yaml = "- season: 2024-2025\n  phase: finals\n";
        let err = parse_config(yaml, DocumentFormat::Yaml).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("event[0]"));
        assert!(message.contains("gender, division, event_slug"));
    }

    #[test]
    fn test_rejects_missing_season() {
        let entry = EventEntry {
            phase: Some("finals".into()),
            gender: Some("girls".into()),
            division: Some("d1".into()),
            event_slug: Some("50-freestyle".into()),
            ..Default::default()
        };
        assert!(validate_entry(&entry).is_err());
    }

    #[test]
    fn test_rejects_path_separator_in_identity_field() {
        let entry = EventEntry {
            season: Some("2024/2025".into()),
            phase: Some("finals".into()),
            gender: Some("girls".into()),
            division: Some("d1".into()),
            event_slug: Some("50-freestyle".into()),
            ..Default::default()
        };
        let err = validate_entry(&entry).unwrap_err();
        assert!(err.to_string().contains("path separator"));
    }

    #[test]
    fn test_rejects_unparseable_document() {
        let err = parse_config("{not json", DocumentFormat::Json).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);

        let err = parse_config("state: ohio\n", DocumentFormat::Yaml).unwrap_err();
        assert!(err.to_string().contains("'events' list"));
    }

    #[test]
    fn test_rejects_non_mapping_entry() {
        let err = parse_config("- just-a-string\n", DocumentFormat::Yaml).unwrap_err();
        assert!(err.to_string().contains("not a mapping"));
    }

    #[test]
    fn test_out_file_requires_placeholder_for_many_seasons() {
        let mut entry = EventEntry {
            seasons: Some(vec!["2024-2025".into(), "2023-2024".into()]),
            phase: Some("finals".into()),
            gender: Some("girls".into()),
            division: Some("d1".into()),
            event_slug: Some("50-freestyle".into()),
            out: Some("_data/girls-50.csv".into()),
            ..Default::default()
        };
        assert!(validate_entry(&entry).is_err());

        entry.out = Some("_data/{season}-girls-50.csv".into());
        let spec = validate_entry(&entry).unwrap();
        assert_eq!(
            spec.output,
            Some(OutputTarget::File("_data/{season}-girls-50.csv".into()))
        );
    }

    #[test]
    fn test_out_without_csv_suffix_is_a_folder() {
        let entry = EventEntry {
            season: Some("2024-2025".into()),
            phase: Some("finals".into()),
            gender: Some("girls".into()),
            division: Some("d1".into()),
            event_slug: Some("50-freestyle".into()),
            out: Some("_data/ohio".into()),
            extension: Some(".json".into()),
            ..Default::default()
        };
        let spec = validate_entry(&entry).unwrap();
        assert_eq!(spec.output, Some(OutputTarget::Folder(PathBuf::from("_data/ohio"))));
        assert_eq!(spec.extension.as_deref(), Some("json"));
    }

    #[test]
    fn test_detect_format() {
        assert_eq!(DocumentFormat::detect(Path::new("events.yml"), ""), DocumentFormat::Yaml);
        assert_eq!(DocumentFormat::detect(Path::new("events.JSON"), ""), DocumentFormat::Json);
        assert_eq!(DocumentFormat::detect(Path::new("events.toml"), ""), DocumentFormat::Toml);
        assert_eq!(DocumentFormat::detect(Path::new("events"), "  [ ]"), DocumentFormat::Json);
        assert_eq!(DocumentFormat::detect(Path::new("events"), "events: []"), DocumentFormat::Yaml);
    }

    #[test]
    fn test_load_config_missing_file() {
        let err = load_config(Path::new("/nonexistent/events.yaml")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }
}
