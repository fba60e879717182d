//! Cleanup of narrative text before it reaches a renderer.
//!
//! Source text carries citation markers, `<br>` tags and placeholder
//! tokens for clickable elements. Markup turns it into blocks.

use std::sync::LazyLock;

use regex::Regex;

use crate::config::Substitution;
use crate::present::ContentBlock;

static CITATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s*\[cite:\s*\d+(?:\s*,\s*\d+)*\]").expect("citation pattern is valid")
});

static PARAGRAPH_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>\s*<br\s*/?>").expect("break pattern is valid"));

static LINE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s*<br\s*/?>\s*").expect("break pattern is valid"));

/// Remove `[cite: N]` markers.
pub fn strip_citations(text: &str) -> String {
    CITATION.replace_all(text, "").into_owned()
}

enum Segment {
    Text(String),
    Affordance { label: String, target: String },
}

fn segments(raw: &str, substitutions: &[Substitution]) -> Vec<Segment> {
    let cleaned = strip_citations(raw);
    let mut out = Vec::new();
    for line in cleaned.lines().map(str::trim).filter(|l| !l.is_empty()) {
        for paragraph in PARAGRAPH_BREAK.split(line) {
            let paragraph = LINE_BREAK.replace_all(paragraph.trim(), "\n");
            substitute(paragraph.trim(), substitutions, &mut out);
        }
    }
    out
}

fn substitute(text: &str, substitutions: &[Substitution], out: &mut Vec<Segment>) {
    if text.is_empty() {
        return;
    }
    let found = substitutions
        .iter()
        .filter(|s| !s.placeholder.is_empty())
        .filter_map(|s| text.find(&s.placeholder).map(|at| (at, s)))
        .min_by_key(|(at, _)| *at);
    match found {
        Some((at, sub)) => {
            substitute(text[..at].trim(), substitutions, out);
            out.push(Segment::Affordance {
                label: sub.label.clone(),
                target: sub.target.clone(),
            });
            substitute(
                text[at + sub.placeholder.len()..].trim(),
                substitutions,
                out,
            );
        }
        None => out.push(Segment::Text(text.to_string())),
    }
}

/// Turn narrative text into paragraph and affordance blocks.
pub fn render_text(raw: &str, substitutions: &[Substitution]) -> Vec<ContentBlock> {
    segments(raw, substitutions)
        .into_iter()
        .map(|segment| match segment {
            Segment::Text(text) => ContentBlock::paragraph(text),
            Segment::Affordance { label, target } => ContentBlock::Affordance { label, target },
        })
        .collect()
}

/// Turn prompt text into prompt and affordance blocks.
///
/// The id is attached to every prompt block produced.
pub fn render_prompt(
    raw: &str,
    id: Option<&str>,
    substitutions: &[Substitution],
) -> Vec<ContentBlock> {
    segments(raw, substitutions)
        .into_iter()
        .map(|segment| match segment {
            Segment::Text(text) => ContentBlock::Prompt {
                id: id.map(str::to_string),
                text,
            },
            Segment::Affordance { label, target } => ContentBlock::Affordance { label, target },
        })
        .collect()
}
