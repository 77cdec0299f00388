use crate::common::error::{Result, ScraperError};
use crate::domain::{EventKey, ResolvedEventSpec};
use crate::pipeline::paths::normalize_path;
use std::collections::HashMap;
use std::fmt;
use std::fmt::Write as _;
use std::path::PathBuf;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanAction {
    Fetch,
    SkipDuplicate,
}

impl fmt::Display for PlanAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanAction::Fetch => f.write_str("fetch"),
            PlanAction::SkipDuplicate => f.write_str("skip-duplicate"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchPlanItem {
    pub spec: ResolvedEventSpec,
    pub action: PlanAction,
}

/// Ordered, deduplicated list of work for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchPlan {
    items: Vec<FetchPlanItem>,
}

impl FetchPlan {
    /// Plan resolved specs in first-seen order.
    ///
    /// The first event for an identity key is fetched; later ones are marked
    /// `skip-duplicate`. Two different keys that land on the same output file,
    /// compared after lexical normalization, make the whole plan invalid.
    /// No I/O happens here.
    pub fn build(specs: Vec<ResolvedEventSpec>) -> Result<Self> {
        let mut seen: HashMap<EventKey, PathBuf> = HashMap::new();
        let mut claimed: HashMap<PathBuf, EventKey> = HashMap::new();
        let mut items = Vec::with_capacity(specs.len());

        for spec in specs {
            if let Some(first_path) = seen.get(&spec.key) {
                if normalize_path(first_path) != normalize_path(&spec.output_path) {
                    warn!(
                        "Duplicate event {} asks for {} but {} was planned first; keeping the first",
                        spec.key,
                        spec.output_path.display(),
                        first_path.display()
                    );
                }
                debug!("Skipping duplicate {}", spec.key);
                items.push(FetchPlanItem {
                    spec,
                    action: PlanAction::SkipDuplicate,
                });
                continue;
            }

            let target = normalize_path(&spec.output_path);
            if let Some(owner) = claimed.get(&target) {
                return Err(ScraperError::config(format!(
                    "output path {} is claimed by both [{}] and [{}]",
                    spec.output_path.display(),
                    owner,
                    spec.key
                )));
            }

            seen.insert(spec.key.clone(), spec.output_path.clone());
            claimed.insert(target, spec.key.clone());
            items.push(FetchPlanItem {
                spec,
                action: PlanAction::Fetch,
            });
        }

        Ok(Self { items })
    }

    /// A one-item plan for the single-event entry point.
    pub fn single(spec: ResolvedEventSpec) -> Self {
        Self {
            items: vec![FetchPlanItem {
                spec,
                action: PlanAction::Fetch,
            }],
        }
    }

    pub fn items(&self) -> &[FetchPlanItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn fetch_count(&self) -> usize {
        self.count(PlanAction::Fetch)
    }

    pub fn skip_count(&self) -> usize {
        self.count(PlanAction::SkipDuplicate)
    }

    fn count(&self, action: PlanAction) -> usize {
        self.items.iter().filter(|i| i.action == action).count()
    }

    /// Human-readable dry-run report: one line per item plus a totals line.
    pub fn render_report(&self) -> String {
        let mut out = String::new();
        for item in &self.items {
            let key = &item.spec.key;
            let _ = writeln!(
                out,
                "{:<14} {} {} {} {} {} {} -> {}",
                item.action.to_string(),
                key.season,
                key.phase,
                key.gender,
                key.division,
                key.event_slug,
                key.state,
                item.spec.output_path.display()
            );
        }
        let _ = writeln!(
            out,
            "{} planned: {} to fetch, {} duplicate(s) skipped",
            self.len(),
            self.fetch_count(),
            self.skip_count()
        );
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::error::ErrorKind;
    use crate::domain::{Gender, Phase, SourceOptions};

    fn spec(season: &str, state: &str, path: &str) -> ResolvedEventSpec {
        ResolvedEventSpec {
            key: EventKey {
                season: season.into(),
                phase: Phase::Finals,
                gender: Gender::Girls,
                division: "d1".into(),
                event_slug: "50-freestyle".into(),
                state: state.into(),
            },
            output_path: PathBuf::from(path),
            source: SourceOptions {
                meet_slug: None,
                extension: "xml".into(),
            },
        }
    }

    #[test]
    fn test_first_wins_and_order_is_preserved() {
        let plan = FetchPlan::build(vec![
            spec("2024-2025", "ohio", "_data/a.csv"),
            spec("2023-2024", "ohio", "_data/b.csv"),
            spec("2024-2025", "ohio", "_data/a.csv"),
            spec("2024-2025", "ohio", "_data/a.csv"),
        ])
        .unwrap();

        let actions: Vec<_> = plan.items().iter().map(|i| i.action).collect();
        assert_eq!(
            actions,
            vec![
                PlanAction::Fetch,
                PlanAction::Fetch,
                PlanAction::SkipDuplicate,
                PlanAction::SkipDuplicate
            ]
        );
        assert_eq!(plan.items()[1].spec.key.season, "2023-2024");
        assert_eq!(plan.fetch_count(), 2);
        assert_eq!(plan.skip_count(), 2);
    }

    #[test]
    fn test_duplicate_with_other_path_is_still_skipped() {
        let plan = FetchPlan::build(vec![
            spec("2024-2025", "ohio", "_data/a.csv"),
            spec("2024-2025", "ohio", "_data/other/a.csv"),
        ])
        .unwrap();
        assert_eq!(plan.items()[1].action, PlanAction::SkipDuplicate);
    }

    #[test]
    fn test_path_collision_between_keys_is_rejected() {
        let err = FetchPlan::build(vec![
            spec("2024-2025", "ohio", "_data/a.csv"),
            spec("2024-2025", "indiana", "_data/a.csv"),
        ])
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_path_collision_through_equivalent_spellings_is_rejected() {
        let err = FetchPlan::build(vec![
            spec("2024-2025", "ohio", "_data/2024-2025-finals-girls-d1-50-freestyle.csv"),
            spec("2024-2025", "indiana", "./_data/2024-2025-finals-girls-d1-50-freestyle.csv"),
        ])
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);

        let err = FetchPlan::build(vec![
            spec("2024-2025", "ohio", "_data/a.csv"),
            spec("2024-2025", "indiana", "_data/indiana/../a.csv"),
        ])
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_build_is_deterministic() {
        let input = vec![
            spec("2024-2025", "ohio", "_data/a.csv"),
            spec("2023-2024", "ohio", "_data/b.csv"),
            spec("2024-2025", "ohio", "_data/a.csv"),
        ];
        let first = FetchPlan::build(input.clone()).unwrap();
        let second = FetchPlan::build(input).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.render_report(), second.render_report());
    }

    #[test]
    fn test_render_report_lines() {
        let plan = FetchPlan::build(vec![
            spec("2024-2025", "ohio", "_data/a.csv"),
            spec("2024-2025", "ohio", "_data/a.csv"),
        ])
        .unwrap();
        let report = plan.render_report();
        let lines: Vec<_> = report.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("fetch "));
        assert!(lines[0].contains("2024-2025 finals girls d1 50-freestyle ohio -> _data/a.csv"));
        assert!(lines[1].starts_with("skip-duplicate "));
        assert_eq!(lines[2], "2 planned: 1 to fetch, 1 duplicate(s) skipped");
    }

    #[test]
    fn test_single_plan() {
        let plan = FetchPlan::single(spec("2024-2025", "ohio", "_data/a.csv"));
        assert_eq!(plan.len(), 1);
        assert_eq!(plan.fetch_count(), 1);
    }
}
