use crate::common::constants::{DEFAULT_DATA_DIR, DEFAULT_EXTENSION};
use crate::common::error::{Result, ScraperError};
use crate::domain::{
    Defaults, EventKey, OutputTarget, RawEventSpec, ResolvedEventSpec, SourceOptions,
};
use crate::pipeline::paths::{render_output_file, resolve_output_path};
use std::path::PathBuf;

/// Resolve one authored event into one fetch unit per season, in list order.
///
/// Precedence for `state` and the output folder is: the event's own value,
/// then `defaults`, then (folder only) the base data directory. A missing
/// state is an error; there is no system-wide default.
pub fn expand(defaults: &Defaults, raw: &RawEventSpec) -> Result<Vec<ResolvedEventSpec>> {
    let state = raw
        .state
        .clone()
        .or_else(|| defaults.state.clone())
        .ok_or_else(|| {
            ScraperError::config(format!(
                "no state for {} {} {} {}: set `state` on the event or at the top level",
                raw.phase, raw.gender, raw.division, raw.event_slug
            ))
        })?;

    let output = match &raw.output {
        Some(target) => target.clone(),
        None => OutputTarget::Folder(
            defaults
                .folder
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
        ),
    };

    let source = SourceOptions {
        meet_slug: raw.meet_slug.clone(),
        extension: raw
            .extension
            .clone()
            .unwrap_or_else(|| DEFAULT_EXTENSION.to_string()),
    };

    let resolved = raw
        .seasons
        .seasons()
        .iter()
        .map(|season| {
            let output_path = match &output {
                OutputTarget::Folder(folder) => resolve_output_path(
                    folder,
                    season,
                    raw.phase,
                    raw.gender,
                    &raw.division,
                    &raw.event_slug,
                ),
                OutputTarget::File(template) => render_output_file(template, season),
            };
            ResolvedEventSpec {
                key: EventKey {
                    season: season.clone(),
                    phase: raw.phase,
                    gender: raw.gender,
                    division: raw.division.clone(),
                    event_slug: raw.event_slug.clone(),
                    state: state.clone(),
                },
                output_path,
                source: source.clone(),
            }
        })
        .collect();

    Ok(resolved)
}

/// Expand every event in order. Stops at the first configuration error.
pub fn expand_all(defaults: &Defaults, raws: &[RawEventSpec]) -> Result<Vec<ResolvedEventSpec>> {
    let mut resolved = Vec::new();
    for raw in raws {
        resolved.extend(expand(defaults, raw)?);
    }
    Ok(resolved)
}
