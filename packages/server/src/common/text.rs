//! Small string helpers shared by extractors and the audit sink.

/// Truncate to at most `max_chars` characters.
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Truncate with a trailing "..." so the result is at most `max_chars` long.
pub fn truncate_with_ellipsis(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let keep = max_chars.saturating_sub(3);
    format!("{}...", truncate_chars(s, keep))
}

/// Treat empty strings the same as missing values.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Undo the JSON-in-HTML escaping platforms apply to embedded URLs.
pub fn unescape_embedded_url(raw: &str) -> String {
    raw.replace("\\u002F", "/")
        .replace("\\u002f", "/")
        .replace("\\u0026", "&")
        .replace("\\/", "/")
        .replace('\\', "")
}

/// Strip the query string and a trailing slash.
pub fn clean_post_url(url: &str) -> String {
    let without_query = url.split('?').next().unwrap_or(url);
    without_query
        .strip_suffix('/')
        .unwrap_or(without_query)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_chars_respects_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }

    #[test]
    fn test_truncate_with_ellipsis() {
        let long = "a".repeat(70);
        let out = truncate_with_ellipsis(&long, 60);
        assert_eq!(out.len(), 60);
        assert!(out.ends_with("..."));
        assert_eq!(truncate_with_ellipsis("short", 60), "short");
    }

    #[test]
    fn test_unescape_embedded_url() {
        assert_eq!(
            unescape_embedded_url(r"https:\u002F\u002Fv16.tiktokcdn.com\u002Fvideo\u002Fa.mp4"),
            "https://v16.tiktokcdn.com/video/a.mp4"
        );
        assert_eq!(
            unescape_embedded_url(r"https:\/\/scontent.cdn\/a.jpg?x=1&y=2"),
            "https://scontent.cdn/a.jpg?x=1&y=2"
        );
    }

    #[test]
    fn test_clean_post_url() {
        assert_eq!(
            clean_post_url("https://www.tiktok.com/@a/video/1/?is_from_webapp=1"),
            "https://www.tiktok.com/@a/video/1"
        );
        assert_eq!(
            clean_post_url("https://www.instagram.com/p/abc/"),
            "https://www.instagram.com/p/abc"
        );
    }
}
