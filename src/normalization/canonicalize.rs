// src/normalization/canonicalize.rs - Light and heavy canonical forms of company names

use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::models::{NormalizedRecord, RawRecord};
use crate::utils::constants::{ABBREVIATIONS, DEFAULT_REMOVE_PREFIXES, STOPWORDS};

/// Whole-word patterns for the abbreviation dictionary. Keys ending in a dot
/// only need a boundary in front; the expansion gets a trailing space so
/// `co.ltd` splits into two words.
static ABBREVIATION_PATTERNS: Lazy<Vec<(Regex, String)>> = Lazy::new(|| {
    ABBREVIATIONS
        .iter()
        .filter_map(|(abbr, expansion)| {
            let (pattern, replacement) = if abbr.ends_with('.') {
                (format!(r"\b{}", regex::escape(abbr)), format!("{} ", expansion))
            } else {
                (format!(r"\b{}\b", regex::escape(abbr)), expansion.to_string())
            };
            match Regex::new(&pattern) {
                Ok(re) => Some((re, replacement)),
                Err(e) => {
                    warn!("Invalid abbreviation pattern '{}': {}", pattern, e);
                    None
                }
            }
        })
        .collect()
});

static CONJUNCTION_SYMBOLS: Lazy<Option<Regex>> = Lazy::new(|| match Regex::new(r"[&@/\\]+") {
    Ok(re) => Some(re),
    Err(e) => {
        warn!("Invalid conjunction pattern: {}", e);
        None
    }
});

/// Turns raw names into the light (display) and heavy (clustering) forms.
#[derive(Debug, Clone)]
pub struct NameCanonicalizer {
    remove_prefixes: Vec<String>,
}

impl Default for NameCanonicalizer {
    fn default() -> Self {
        Self::new(DEFAULT_REMOVE_PREFIXES.iter().map(|s| s.to_string()).collect())
    }
}

impl NameCanonicalizer {
    pub fn new(remove_prefixes: Vec<String>) -> Self {
        Self {
            remove_prefixes: remove_prefixes
                .into_iter()
                .map(|p| p.trim().to_lowercase())
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    pub fn canonicalize(&self, record: &RawRecord) -> NormalizedRecord {
        let raw_name = record.raw_name.clone().unwrap_or_default();
        let normalized_light = self.light_form(&raw_name);
        let normalized_heavy = heavy_form(&normalized_light);
        NormalizedRecord {
            raw_name,
            normalized_light,
            normalized_heavy,
        }
    }

    /// Unicode cleanup, case folding, abbreviation expansion, prefix removal
    /// and punctuation stripping.
    pub fn light_form(&self, raw_name: &str) -> String {
        let mut cleaned = clean_unicode(raw_name).to_lowercase();

        for (pattern, replacement) in ABBREVIATION_PATTERNS.iter() {
            cleaned = pattern.replace_all(&cleaned, replacement.as_str()).into_owned();
        }

        for prefix in &self.remove_prefixes {
            let stripped = cleaned
                .strip_prefix(prefix.as_str())
                .filter(|rest| rest.starts_with(char::is_whitespace))
                .map(|rest| rest.trim().to_string());
            if let Some(rest) = stripped {
                cleaned = rest;
                break;
            }
        }

        basic_cleaning(&cleaned)
    }
}

/// Stopword-free, deduplicated token set of a light form. Tokens are emitted
/// in sorted order so the same token set always yields the same key.
pub fn heavy_form(light: &str) -> String {
    light
        .split_whitespace()
        .filter(|token| !STOPWORDS.contains(token))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect::<Vec<_>>()
        .join(" ")
}

/// NFKC-compose, then fold each character to ASCII on its own. Characters
/// with no ASCII rendering are kept in their composed form.
fn clean_unicode(text: &str) -> String {
    let composed: String = text.trim().nfkc().collect();
    let mut out = String::with_capacity(composed.len());
    for c in composed.chars() {
        match fold_char(c) {
            Some(folded) => out.push_str(&folded),
            None => out.push(c),
        }
    }
    out
}

/// ASCII rendering of one character: its decomposition without combining
/// marks, with non-decomposing letters looked up in a small table.
fn fold_char(c: char) -> Option<String> {
    if c.is_ascii() {
        return Some(c.to_string());
    }
    let mut out = String::new();
    for d in std::iter::once(c).nfkd().filter(|d| !is_combining_mark(*d)) {
        if d.is_ascii() {
            out.push(d);
        } else {
            out.push_str(special_char(d)?);
        }
    }
    Some(out)
}

fn special_char(c: char) -> Option<&'static str> {
    let replacement = match c {
        'ł' => "l",
        'Ł' => "L",
        'ø' => "o",
        'Ø' => "O",
        'æ' => "ae",
        'Æ' => "AE",
        'œ' => "oe",
        'Œ' => "OE",
        'ß' => "ss",
        'đ' | 'ð' => "d",
        'Đ' | 'Ð' => "D",
        'þ' => "th",
        'Þ' => "TH",
        'ı' => "i",
        '‘' | '’' | '‚' | '′' => "'",
        '“' | '”' | '„' | '″' => "\"",
        '‐' | '‑' | '‒' | '–' | '—' | '―' => "-",
        '\u{a0}' | '\u{2009}' | '\u{202f}' => " ",
        _ => return None,
    };
    Some(replacement)
}

fn basic_cleaning(text: &str) -> String {
    let joined = match CONJUNCTION_SYMBOLS.as_ref() {
        Some(re) => re.replace_all(text, " and ").into_owned(),
        None => text.to_string(),
    };
    let kept: String = joined
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c.is_whitespace() || c == '-' {
                c
            } else {
                ' '
            }
        })
        .collect();
    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}
