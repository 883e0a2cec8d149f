//! Complexity notation → canonical algebraic strings.
//!
//! Purpose
//! - Accept loosely LaTeX-flavoured runtime notation as it appears in the
//!   source sheets (`O(n \log n)`, `2^{n}`, `\sqrt{n}`, `L_n[1/3, c]`, ...).
//! - Produce a string the `expr` parser accepts, or report why not.
//!
//! Pipeline
//! 1. `$` delimiters dropped; placeholders (`-`, `?`, blank) → unavailable.
//! 2. `L_n[...]` family: take the body of the `exp((...))` wrapper, rewrite
//!    natural logs, return `e^(...)`.
//! 3. Unsupported parameters → unavailable.
//! 4. `REWRITE_RULES`, then `GRAPH_RULES` (`V → n`, `E → n^2`).
//! 5. `UNRESOLVED_MARKERS` → unavailable.

pub mod rules;

use thiserror::Error;

use rules::{
    apply_all, GRAPH_RULES, L_NOTATION_RULES, PLACEHOLDERS, REWRITE_RULES,
    UNRESOLVED_MARKERS, UNSUPPORTED_PARAMETERS,
};

/// Why a notation could not be converted.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Unavailable {
    #[error("no formula given")]
    Placeholder,
    #[error("L_n notation without an exp((...)) body")]
    MissingExpWrapper,
    #[error("unsupported parameter `{0}`")]
    UnsupportedParameter(&'static str),
    #[error("unresolved `{0}` after rewriting")]
    Unresolved(&'static str),
}

/// Convert raw notation to a canonical formula; `None` when unavailable.
pub fn convert(raw: &str) -> Option<String> {
    match convert_detailed(raw) {
        Ok(formula) => Some(formula),
        Err(reason) => {
            tracing::debug!(raw, %reason, "notation unavailable");
            None
        }
    }
}

/// Like `convert`, with the rejection reason.
pub fn convert_detailed(raw: &str) -> Result<String, Unavailable> {
    let stripped = raw.replace('$', "");
    let text = stripped.trim();
    if PLACEHOLDERS.contains(&text) {
        return Err(Unavailable::Placeholder);
    }

    if text.contains("L_n[") || text.contains("L_n\\[") {
        return l_notation(text);
    }
    if let Some(param) = UNSUPPORTED_PARAMETERS.iter().find(|p| text.contains(*p)) {
        return Err(Unavailable::UnsupportedParameter(*param));
    }

    let rewritten = apply_all(&REWRITE_RULES, text);
    let formula = apply_all(&GRAPH_RULES, rewritten.trim());
    check_resolved(&formula)?;
    if formula.is_empty() {
        return Err(Unavailable::Placeholder);
    }
    Ok(formula)
}

fn check_resolved(formula: &str) -> Result<(), Unavailable> {
    match UNRESOLVED_MARKERS.iter().find(|m| formula.contains(*m)) {
        Some(marker) => Err(Unavailable::Unresolved(*marker)),
        None => Ok(()),
    }
}

/// `L_n[a, c] = exp((body))` → `e^(body')`.
fn l_notation(text: &str) -> Result<String, Unavailable> {
    let body = exp_body(text).ok_or(Unavailable::MissingExpWrapper)?;
    let formula = format!("e^({})", apply_all(&L_NOTATION_RULES, body));
    check_resolved(&formula)?;
    Ok(formula)
}

/// Body of the first `exp((...))`: the text inside the inner parenthesis,
/// matched by depth so nested groups survive.
fn exp_body(text: &str) -> Option<&str> {
    let mut from = 0;
    while let Some(rel) = text[from..].find("exp((") {
        let open = from + rel + "exp(".len();
        if let Some(close) = matching_paren(text, open) {
            if text[close + 1..].starts_with(')') {
                return Some(&text[open + 1..close]);
            }
        }
        from = open;
    }
    None
}

/// Index of the `)` closing the `(` at byte `open`.
fn matching_paren(text: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in text[open..].char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + i);
                }
            }
            _ => {}
        }
    }
    None
}
