//! Rewrite rules and marker lists, exposed as data.
//!
//! Each rule is a `(predicate, transform)` pair over an immutable string:
//! `applies` tests the pattern, `apply` returns the rewritten text. Order is
//! significant; later rules see the output of earlier ones.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;

/// One pattern-based substitution.
#[derive(Debug)]
pub struct RewriteRule {
    pub name: &'static str,
    pub pattern: Regex,
    pub replacement: &'static str,
}

impl RewriteRule {
    fn new(name: &'static str, pattern: &str, replacement: &'static str) -> Self {
        Self {
            name,
            pattern: Regex::new(pattern).expect("static rewrite pattern"),
            replacement,
        }
    }

    #[inline]
    pub fn applies(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }

    #[inline]
    pub fn apply<'t>(&self, text: &'t str) -> Cow<'t, str> {
        self.pattern.replace_all(text, self.replacement)
    }
}

/// Apply `rules` left to right.
pub fn apply_all(rules: &[RewriteRule], text: &str) -> String {
    rules
        .iter()
        .fold(text.to_string(), |acc, rule| rule.apply(&acc).into_owned())
}

/// Inputs meaning "no formula".
pub const PLACEHOLDERS: &[&str] = &["", "-", "?", "derived"];

/// Parameters that cannot be reduced to the single free variable.
pub const UNSUPPORTED_PARAMETERS: &[&str] = &[
    "M^a",
    "r(a)",
    "T_1",
    "TP",
    "B \\",
    "pi(",
    "under assumption",
    "p(n)",
    "2^{(p(n)}",
];

/// Leftovers that mean canonicalization did not finish.
pub const UNRESOLVED_MARKERS: &[&str] = &[
    "\\",
    "_{",
    "{",
    "under",
    "assumption",
    "o(1)",
    "where",
];

/// The main canonicalization pipeline.
pub static REWRITE_RULES: Lazy<Vec<RewriteRule>> = Lazy::new(|| {
    vec![
        // Asymptotic wrappers
        RewriteRule::new("big-o", r"O\((.*?)\)", "${1}"),
        RewriteRule::new("omega", r"Omega\((.*?)\)", "${1}"),
        RewriteRule::new("theta", r"Theta\((.*?)\)", "${1}"),
        // Exponentials
        RewriteRule::new("exp-brace", r"\\exp\s*\{([^}]+)\}", "e^(${1})"),
        RewriteRule::new("exp-paren-escaped", r"\\exp\s*\(([^)]+)\)", "e^(${1})"),
        RewriteRule::new("exp-paren", r"exp\s*\(([^)]+)\)", "e^(${1})"),
        // Logarithms
        RewriteRule::new("log2-brace", r"\\log_2\s*\{([^}]+)\}", "log(${1}, 2)"),
        RewriteRule::new("log2-paren", r"\\log_2\s*\(([^)]+)\)", "log(${1}, 2)"),
        RewriteRule::new("log-brace", r"\\log\s*\{([^}]+)\}", "log(${1}, e)"),
        RewriteRule::new("log-paren", r"\\log\s*\(([^)]+)\)", "log(${1}, e)"),
        RewriteRule::new("ln-brace", r"\\ln\s*\{([^}]+)\}", "log(${1}, e)"),
        RewriteRule::new("ln-paren-escaped", r"\\ln\s*\(([^)]+)\)", "log(${1}, e)"),
        RewriteRule::new("ln-paren", r"ln\(([^)]+)\)", "log(${1}, e)"),
        RewriteRule::new("ln-n", r"ln n", "log(n, e)"),
        RewriteRule::new("log-n", r"log n", "log(n, e)"),
        RewriteRule::new("log-of-n", r"log\(n\)", "log(n, e)"),
        RewriteRule::new("log-v-escaped", r"\\log V", "log(V, e)"),
        RewriteRule::new("log-v", r"log V", "log(V, e)"),
        // Roots and rounding
        RewriteRule::new("sqrt", r"\\sqrt\{([^}]+)\}", "sqrt(${1})"),
        RewriteRule::new("ceil", r"\\lceil([^\\]+)\\rceil", "ceil(${1})"),
        // Powers and escaped delimiters
        RewriteRule::new("braced-exponent", r"\^\{([^}]+)\}", "^(${1})"),
        RewriteRule::new("open-brace", r"\\\{", "("),
        RewriteRule::new("close-brace", r"\\\}", ")"),
        // Clean up
        RewriteRule::new("escapes", r"\\", ""),
        RewriteRule::new("whitespace", r"\s+", " "),
    ]
});

/// Graph algorithms: vertices are the problem size, edges assumed quadratic.
pub static GRAPH_RULES: Lazy<Vec<RewriteRule>> = Lazy::new(|| {
    vec![
        RewriteRule::new("vertices", r"\bV\b", "n"),
        RewriteRule::new("edges", r"\bE\b", "n^2"),
    ]
});

/// Natural-log rewrites inside an `L_n[...]` exponent.
pub static L_NOTATION_RULES: Lazy<Vec<RewriteRule>> = Lazy::new(|| {
    vec![
        RewriteRule::new("ln-n", r"\\?ln\s+n", "log(n, e)"),
        RewriteRule::new("paren-ln-n", r"\(ln n\)", "(log(n, e))"),
        RewriteRule::new("ln-n-tight", r"ln\s*n", "log(n, e)"),
        RewriteRule::new("ln-ln-n", r"\\?ln\s*(log\(n, e\))", "log(${1}, e)"),
    ]
});
