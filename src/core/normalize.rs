// src/core/normalize.rs

/// Map full-width digits (U+FF10..=U+FF19) to ASCII. Everything else passes through.
pub fn normalize_digits(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '\u{FF10}'..='\u{FF19}' => char::from(b'0' + (c as u32 - 0xFF10) as u8),
            _ => c,
        })
        .collect()
}

/// Collapse every whitespace run to one ' ' and trim the ends.
pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

/// Canonical form every matcher runs on: ASCII digits, single spaces, trimmed.
pub fn clean_text(s: &str) -> String {
    normalize_ws(&normalize_digits(s))
}

/// Case-insensitive substring test. An empty needle never matches.
pub fn contains_ci(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() { return false; }
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// True when `text[start..end]` is not glued to an ASCII word character on either side.
/// Japanese text is full of CJK "word" characters, so a Unicode `\b` would reject
/// `2024年`; the year/date patterns only care about ASCII neighbours.
pub(crate) fn ascii_bounded(text: &str, start: usize, end: usize) -> bool {
    let is_word = |c: char| c.is_ascii_alphanumeric() || c == '_';
    let before = text[..start].chars().next_back().is_none_or(|c| !is_word(c));
    let after = text[end..].chars().next().is_none_or(|c| !is_word(c));
    before && after
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_width_digits_become_ascii() {
        assert_eq!(normalize_digits("２０２４年９月"), "2024年9月");
        assert_eq!(normalize_digits("abc"), "abc");
    }

    #[test]
    fn clean_text_collapses_whitespace() {
        assert_eq!(clean_text("  社長\n\tメッセージ　２０２５ "), "社長 メッセージ 2025");
    }

    #[test]
    fn clean_text_is_a_fixed_point_on_clean_input() {
        let once = clean_text("令和６年 ９月 １日");
        assert_eq!(clean_text(&once), once);
    }

    #[test]
    fn ascii_boundaries_ignore_cjk_neighbours() {
        let t = "2024年度";
        assert!(ascii_bounded(t, 0, 4));
        let t = "FY2024";
        assert!(!ascii_bounded(t, 2, 6));
        let t = "x20245";
        assert!(!ascii_bounded(t, 1, 5));
    }

    #[test]
    fn contains_ci_needs_a_needle() {
        assert!(contains_ci("Site SEARCH", "search"));
        assert!(!contains_ci("anything", ""));
    }
}
