pub fn make_state_file_name(username: &str) -> String {
    format!("{username}-tmp.json")
}

pub fn make_csv_file_name(stem: &str) -> String {
    stem.to_string() + ".csv"
}

pub fn make_json_file_name(stem: &str) -> String {
    stem.to_string() + ".json"
}

/// Output file stem for cursor-suffixed runs: the plain username until a
/// cursor has been seen. Runs started from a cursor carry it in front of the
/// last one, keeping them apart from the run that handed the cursor out.
pub fn make_file_stem(username: &str, start: Option<&str>, last: Option<&str>) -> String {
    let start = start.filter(|c| !c.is_empty());
    let last = last.filter(|c| !c.is_empty());
    match (start, last) {
        (Some(start), Some(last)) => format!("{username}-{start}-{last}"),
        (Some(cursor), None) | (None, Some(cursor)) => format!("{username}-{cursor}"),
        (None, None) => username.to_string(),
    }
}

/// Escapes line breaks, tabs and backslashes so every value stays on one line.
pub fn escape_newlines(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            c => escaped.push(c),
        }
    }
    escaped
}
