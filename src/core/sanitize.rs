// src/core/sanitize.rs

/// Decode the handful of entities the collector leaves in listing titles.
pub fn normalize_entities(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
}

/// Characters scraped titles carry that render as nothing.
const INVISIBLE: [char; 4] = ['\u{200b}', '\u{200c}', '\u{ad}', '\u{feff}'];

/// Drop invisible characters, collapse whitespace runs (NBSP included) into
/// single spaces and trim.
pub fn normalize_ws(s: &str) -> String {
    s.split(|c: char| c.is_whitespace())
        .map(|word| word.replace(INVISIBLE, ""))
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Clean a free-text title for display and matching.
pub fn clean_title(s: &str) -> String {
    normalize_ws(&normalize_entities(s))
}

/// Lowercase and strip French diacritics so keyword lists can stay ASCII.
pub fn fold(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars().flat_map(char::to_lowercase) {
        let mapped = match ch {
            'à' | 'â' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'î' | 'ï' => 'i',
            'ô' | 'ö' => 'o',
            'ù' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            other => other,
        };
        out.push(mapped);
    }
    out
}

/// Trimmed cell, or `None` when blank or a well-known null marker.
pub fn non_blank(cell: &str) -> Option<String> {
    let t = cell.trim();
    if t.is_empty() || t.eq_ignore_ascii_case("nan") || t.eq_ignore_ascii_case("none") {
        None
    } else {
        Some(t.to_string())
    }
}
