//! Definite-article insertion for place names.
//!
//! Names such as "City Museum" read better as "the City Museum" when
//! dropped into prose. Rules are evaluated in order and the first match
//! wins.

use regex::Regex;
use std::borrow::Cow;
use std::sync::OnceLock;

/// A naming rule: a case-insensitive matcher and the rewrite applied on match.
pub struct NamingRule {
    pub pattern: &'static str,
    matcher: Regex,
    transform: fn(&str) -> Cow<'_, str>,
}

impl NamingRule {
    fn new(pattern: &'static str, transform: fn(&str) -> Cow<'_, str>) -> Self {
        let matcher = Regex::new(&format!("(?i){}", pattern))
            .unwrap_or_else(|e| panic!("invalid naming pattern {:?}: {}", pattern, e));
        Self {
            pattern,
            matcher,
            transform,
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        self.matcher.is_match(name)
    }

    pub fn apply<'a>(&self, name: &'a str) -> Cow<'a, str> {
        (self.transform)(name)
    }
}

const ARTICLE_PATTERNS: &[&str] = &[
    r"Museum$",
    r"Gallery$",
    r"Theater$",
    r"Theatre$",
    r"Library$",
    r"Bridge$",
    r"Park$",
    r"Garden$",
    r"Zoo$",
    r"Aquarium$",
    r"Observatory$",
    r"Cathedral$",
    r"Church$",
    r"Historic.*District",
    r"Old.*Town",
    r"Waterfront$",
    r"Boardwalk$",
];

/// Prefix "the " unless the name already starts with it (any case).
fn prefix_definite_article(name: &str) -> Cow<'_, str> {
    let already = name
        .get(..4)
        .map(|head| head.eq_ignore_ascii_case("the "))
        .unwrap_or(false);
    if already {
        Cow::Borrowed(name)
    } else {
        Cow::Owned(format!("the {}", name))
    }
}

/// The ordered rule table
pub fn rules() -> &'static [NamingRule] {
    static RULES: OnceLock<Vec<NamingRule>> = OnceLock::new();
    RULES.get_or_init(|| {
        ARTICLE_PATTERNS
            .iter()
            .map(|&p| NamingRule::new(p, prefix_definite_article))
            .collect()
    })
}

/// Squash whitespace runs (line breaks included) to single spaces, drop
/// other control characters, and turn `|` into `/` so a name can never
/// contain the POI line separator.
pub fn clean_name(name: &str) -> String {
    name.split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|c| !c.is_control())
                .map(|c| if c == '|' { '/' } else { c })
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Apply the first matching naming rule; names matching nothing come back unchanged.
pub fn add_article(name: &str) -> Cow<'_, str> {
    match rules().iter().find(|rule| rule.matches(name)) {
        Some(rule) => rule.apply(name),
        None => Cow::Borrowed(name),
    }
}
