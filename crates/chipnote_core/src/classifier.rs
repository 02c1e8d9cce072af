//! Chip token classification.
//!
//! # Responsibility
//! - Map one finalized token to exactly one `Category`.
//! - Group a pending batch into a `CategorizedTokens` partition.
//!
//! # Invariants
//! - Classification is total and side-effect free.
//! - Precedence is Email, Tag, Link, Contact, PlainText; first match wins.
//! - URL parse failures mean "not a link", never an error.

use crate::model::category::Category;
use crate::model::task::CategorizedTokens;
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z][a-z0-9._%+-]*@[a-z0-9.-]+\.[a-z]{2,}$").expect("valid email regex")
});

/// Classifies one token.
pub fn classify(token: &str) -> Category {
    if is_email(token) {
        Category::Email
    } else if is_tag(token) {
        Category::Tag
    } else if is_link(token) {
        Category::Link
    } else if is_contact(token) {
        Category::Contact
    } else {
        Category::PlainText
    }
}

/// Classifies every token and groups them, preserving entry order.
pub fn partition<S: AsRef<str>>(tokens: &[S]) -> CategorizedTokens {
    let mut grouped = CategorizedTokens::default();
    for token in tokens {
        let token = token.as_ref();
        grouped.push(classify(token), token);
    }
    grouped
}

pub fn is_email(token: &str) -> bool {
    is_valid_email_format(token) && starts_with_lowercase(token)
}

/// Case-sensitive address shape check.
pub fn is_valid_email_format(token: &str) -> bool {
    EMAIL_RE.is_match(token)
}

pub fn is_tag(token: &str) -> bool {
    token.contains('#')
}

/// True for absolute URLs with an `http` or `https` scheme.
pub fn is_link(token: &str) -> bool {
    match Url::parse(token) {
        Ok(url) => matches!(url.scheme(), "http" | "https"),
        Err(_) => false,
    }
}

pub fn is_contact(token: &str) -> bool {
    starts_with_uppercase(token) && !is_email(token) && !is_link(token) && !is_tag(token)
}

pub fn is_plain_text(token: &str) -> bool {
    !is_email(token) && !is_link(token) && !is_tag(token) && !is_contact(token)
}

/// True when the first character equals its lowercase form.
///
/// Characters without case (digits, symbols) and the empty string count as
/// both lowercase and uppercase.
pub fn starts_with_lowercase(token: &str) -> bool {
    match token.chars().next() {
        Some(first) => first.to_lowercase().eq(std::iter::once(first)),
        None => true,
    }
}

/// True when the first character equals its uppercase form.
pub fn starts_with_uppercase(token: &str) -> bool {
    match token.chars().next() {
        Some(first) => first.to_uppercase().eq(std::iter::once(first)),
        None => true,
    }
}
