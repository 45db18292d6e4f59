//! Identifier/label tokenization used by fuzzy entity matching.
//!
//! Search-path entity ids come out of the GraphRAG extractor in whatever shape
//! the LLM produced (`"JORGE LUIS BORGES"`, `"Entropy_Concept"`, `"Tlön, Uqbar"`),
//! while the rendered graph carries its own ids and labels. Both sides are
//! reduced to the same token sequence before comparison:
//!
//! - lowercase everything (Unicode-aware, so `Ménard` → `ménard`),
//! - every run of non-alphanumeric characters (including `_`) is a separator,
//! - tokens of a single character are dropped.

/// Tokens shorter than this are noise for matching purposes.
const MIN_TOKEN_CHARS: usize = 2;

pub fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();

    for c in text.chars() {
        if c.is_alphanumeric() {
            current.extend(c.to_lowercase());
            continue;
        }
        push_token(&mut tokens, &mut current);
    }
    push_token(&mut tokens, &mut current);

    tokens
}

fn push_token(tokens: &mut Vec<String>, current: &mut String) {
    if current.chars().count() >= MIN_TOKEN_CHARS {
        tokens.push(std::mem::take(current));
    } else {
        current.clear();
    }
}
