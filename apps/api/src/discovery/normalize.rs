//! Turns free-text location and experience strings from sources into the
//! structured fields stored on a job.

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedLocation {
    pub city: Option<String>,
    pub country: Option<String>,
    pub is_remote: bool,
}

/// "Bangalore, Karnataka, India" -> city Bangalore, country India.
/// A single segment is taken as the city, unless a "Remote" segment sat next
/// to it ("Remote, India"), in which case it is the country. "Remote" segments
/// are dropped and set `is_remote`.
pub fn parse_location(raw: &str) -> ParsedLocation {
    let is_remote = raw.to_lowercase().contains("remote");

    let segments: Vec<&str> = raw
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();
    let parts: Vec<&str> = segments
        .iter()
        .copied()
        .filter(|p| {
            !p.trim_matches(|c: char| c == '(' || c == ')')
                .eq_ignore_ascii_case("remote")
        })
        .collect();
    let had_remote_segment = parts.len() < segments.len();

    let (city, country) = match parts.as_slice() {
        [] => (None, None),
        [only] if had_remote_segment => (None, Some(only.to_string())),
        [only] => (Some(only.to_string()), None),
        [first, .., last] => (Some(first.to_string()), Some(last.to_string())),
    };

    ParsedLocation {
        city,
        country,
        is_remote,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ExperienceRange {
    pub min_years: Option<f64>,
    pub max_years: Option<f64>,
}

/// "3-5 years" -> 3..5, "5+ yrs" -> 5.., "2 years" -> 2..2.
pub fn parse_experience(raw: &str) -> ExperienceRange {
    let numbers: Vec<f64> = raw
        .split(|c: char| !(c.is_ascii_digit() || c == '.'))
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse::<f64>().ok())
        .collect();

    match numbers.as_slice() {
        [] => ExperienceRange::default(),
        [n] if raw.contains('+') => ExperienceRange {
            min_years: Some(*n),
            max_years: None,
        },
        [n] => ExperienceRange {
            min_years: Some(*n),
            max_years: Some(*n),
        },
        [a, b, ..] => ExperienceRange {
            min_years: Some(a.min(*b)),
            max_years: Some(a.max(*b)),
        },
    }
}
