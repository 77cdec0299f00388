use crate::common::constants::COMPILATION_FOLDER;
use crate::domain::ResolvedEventSpec;

/// Build the remote URL for one event.
///
/// `{base}/{state}/{season}/compilation/{phase}/{gender}-{division}-{event_slug}.{ext}`,
/// or `{base}/{meet_slug}/{phase}/...` when the event names a meet. Every
/// segment is percent-encoded.
pub fn build_event_url(base_url: &str, spec: &ResolvedEventSpec) -> String {
    let key = &spec.key;
    let phase = key.phase.as_str();

    let segments: Vec<&str> = match spec.source.meet_slug.as_deref() {
        Some(meet) => vec![meet, phase],
        None => vec![key.state.as_str(), key.season.as_str(), COMPILATION_FOLDER, phase],
    };

    let file_stem = format!("{}-{}-{}", key.gender, key.division, key.event_slug).replace(' ', "-");
    let extension = spec.source.extension.trim_start_matches('.');

    let mut parts = vec![base_url.trim_end_matches('/').to_string()];
    parts.extend(segments.iter().map(|s| encode_segment(s)));
    parts.push(format!("{}.{}", encode_segment(&file_stem), extension));
    parts.join("/")
}

fn encode_segment(segment: &str) -> String {
    urlencoding::encode(segment.trim_matches('/')).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EventKey, Gender, Phase, SourceOptions};
    use std::path::PathBuf;

    fn spec(meet_slug: Option<&str>) -> ResolvedEventSpec {
        ResolvedEventSpec {
            key: EventKey {
                season: "2024-2025".into(),
                phase: Phase::Finals,
                gender: Gender::Girls,
                division: "d1".into(),
                event_slug: "50-freestyle".into(),
                state: "ohio".into(),
            },
            output_path: PathBuf::from("_data/x.csv"),
            source: SourceOptions {
                meet_slug: meet_slug.map(String::from),
                extension: "xml".into(),
            },
        }
    }

    #[test]
    fn test_compilation_url() {
        assert_eq!(
            build_event_url("https://example.com/swimmeets/", &spec(None)),
            "https://example.com/swimmeets/ohio/2024-2025/compilation/finals/girls-d1-50-freestyle.xml"
        );
    }

    #[test]
    fn test_meet_url() {
        assert_eq!(
            build_event_url("https://example.com", &spec(Some("nedistrict24"))),
            "https://example.com/nedistrict24/finals/girls-d1-50-freestyle.xml"
        );
    }

    #[test]
    fn test_segments_are_encoded() {
        let mut s = spec(None);
        s.key.state = "new york".into();
        s.key.event_slug = "100 fly".into();
        assert_eq!(
            build_event_url("https://example.com", &s),
            "https://example.com/new%20york/2024-2025/compilation/finals/girls-d1-100-fly.xml"
        );
    }
}
