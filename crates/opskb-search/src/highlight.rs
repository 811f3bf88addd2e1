//! Answer excerpts shown under each hit.
use opskb_core::config::HighlightSettings;

const ELLIPSIS: &str = "...";

/// Excerpt of `answer` around the query, else around the first matching
/// keyword, else the fixed-length lead of the answer.
pub fn excerpt(query: &str, keywords: &[String], answer: &str, settings: &HighlightSettings) -> String {
    let lowered = Lowered::new(answer);
    let query_lc = query.to_lowercase();
    if let Some(s) = lowered.window_around(answer, &query_lc, settings.window) {
        return s;
    }
    for kw in keywords {
        if let Some(s) = lowered.window_around(answer, &kw.to_lowercase(), settings.window) {
            return s;
        }
    }
    let lead: String = answer.chars().take(settings.fallback_len).collect();
    lead + ELLIPSIS
}

/// Lowercased text with, per lowercased char, the index of the original char
/// it came from. Lowercasing may expand one char into several.
struct Lowered {
    text: String,
    origin: Vec<usize>,
    original_len: usize,
}

impl Lowered {
    fn new(original: &str) -> Self {
        let mut text = String::with_capacity(original.len());
        let mut origin = Vec::with_capacity(original.len());
        let mut original_len = 0;
        for (i, c) in original.chars().enumerate() {
            for l in c.to_lowercase() {
                text.push(l);
                origin.push(i);
            }
            original_len = i + 1;
        }
        Self { text, origin, original_len }
    }

    /// Window of `radius` original chars on each side of the first match of `needle_lc`.
    fn window_around(&self, original: &str, needle_lc: &str, radius: usize) -> Option<String> {
        if needle_lc.is_empty() {
            return None;
        }
        let byte_pos = self.text.find(needle_lc)?;
        let first = self.text[..byte_pos].chars().count();
        let last = first + needle_lc.chars().count() - 1;
        let match_start = self.origin[first];
        let match_end = self.origin[last] + 1;
        let start = match_start.saturating_sub(radius);
        let end = (match_end + radius).min(self.original_len);

        let mut out = String::new();
        if start > 0 { out.push_str(ELLIPSIS); }
        out.extend(original.chars().skip(start).take(end - start));
        if end < self.original_len { out.push_str(ELLIPSIS); }
        Some(out)
    }
}
