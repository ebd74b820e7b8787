use regex::Regex;
use std::sync::OnceLock;

/// Text with interpolation markers swapped for opaque tokens, plus the
/// original spans indexed by token number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guarded {
    pub text: String,
    pub spans: Vec<String>,
}

fn marker_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{\{[^{}]*\}\}").unwrap())
}

fn token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"__PH_(\d+)__").unwrap())
}

/// Replaces every `{{ ... }}` span, left to right and non-overlapping,
/// with a positional `__PH_<n>__` token. The token is ASCII-only with no
/// spaces so providers pass it through unaltered.
pub fn protect(text: &str) -> Guarded {
    let mut spans = Vec::new();
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for m in marker_re().find_iter(text) {
        out.push_str(&text[last..m.start()]);
        out.push_str(&format!("__PH_{}__", spans.len()));
        spans.push(m.as_str().to_string());
        last = m.end();
    }
    out.push_str(&text[last..]);
    Guarded { text: out, spans }
}

/// Puts the recorded spans back. A token with no table entry stays
/// verbatim; this never fails.
pub fn restore(text: &str, spans: &[String]) -> String {
    token_re()
        .replace_all(text, |caps: &regex::Captures<'_>| {
            caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|index| spans.get(index))
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}
