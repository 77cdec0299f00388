//! Deterministic output locations.
//!
//! Every output file is `{folder}/{season}-{phase}-{gender}-{division}-{event_slug}.csv`.
//! Identity fields are validated upstream to be free of path separators, so the
//! mapping from fields to file name is injective for a fixed folder.

use crate::common::constants::{OUTPUT_EXTENSION, SEASON_PLACEHOLDER};
use crate::domain::{Gender, Phase};
use std::path::{Component, Path, PathBuf};

pub fn event_file_name(
    season: &str,
    phase: Phase,
    gender: Gender,
    division: &str,
    event_slug: &str,
) -> String {
    format!("{season}-{phase}-{gender}-{division}-{event_slug}.{OUTPUT_EXTENSION}")
}

pub fn resolve_output_path(
    folder: &Path,
    season: &str,
    phase: Phase,
    gender: Gender,
    division: &str,
    event_slug: &str,
) -> PathBuf {
    folder.join(event_file_name(season, phase, gender, division, event_slug))
}

/// Fill the `{season}` placeholder of an explicit output file.
pub fn render_output_file(template: &str, season: &str) -> PathBuf {
    PathBuf::from(template.replace(SEASON_PLACEHOLDER, season))
}

/// Lexical form of a path for comparisons: `.` segments are dropped and
/// `dir/..` pairs cancel out. The filesystem is never consulted.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut parts: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }
    parts.iter().collect()
}
