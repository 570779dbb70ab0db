//! Renders the per-user digest message in Telegram legacy `Markdown`.
//!
//! Pure and deterministic: same (name, digest) in, same bytes out.

use crate::domain::Digest;
use std::fmt::Write;

const SIGN_OFF: &str = "Stay curious and enjoy reading! 🚀\n\nBest,\nHackerNews Daily Bot";

/// Message formatter. Renders at most `per_category_cap` articles per category.
#[derive(Debug, Clone)]
pub struct MessageFormatter {
    per_category_cap: usize,
}

impl MessageFormatter {
    pub fn new(per_category_cap: usize) -> Self {
        Self { per_category_cap }
    }

    pub fn format(&self, display_name: &str, digest: &Digest) -> String {
        let mut text = String::new();
        let _ = write!(
            text,
            "Good morning, {}!\n\nHere are today's Hacker News highlights:\n\n",
            escape_text(display_name)
        );

        for category in digest.categories() {
            let _ = writeln!(text, "*{}*", heading(&category.name));
            for (i, article) in category
                .articles
                .iter()
                .take(self.per_category_cap)
                .enumerate()
            {
                let _ = writeln!(
                    text,
                    "{}. [{}]({})",
                    i + 1,
                    link_text(&article.title),
                    link_target(&article.link)
                );
            }
            text.push('\n');
        }

        text.push_str(SIGN_OFF);
        text
    }
}

/// Backslash-escape the characters legacy Markdown treats as entity starts.
fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '_' | '*' | '`' | '[') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Link text cannot carry escapes in legacy Markdown; square brackets become parentheses.
fn link_text(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '[' => '(',
            ']' => ')',
            other => other,
        })
        .collect()
}

/// `)` would end the link target early.
fn link_target(s: &str) -> String {
    s.replace('(', "%28").replace(')', "%29")
}

fn heading(s: &str) -> String {
    s.replace('*', "")
}
