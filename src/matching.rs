//! Resolution of an argument head to a declared option.

use crate::option::{MatchMode, OptionDescriptor};

/// Result of looking up an argument head.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Index of the matching descriptor in the registry.
    Matched(usize),
    /// More than one option name starts with the head.
    Ambiguous(Vec<String>),
    NoMatch,
}

/// Resolve `head` (the part of an argument before any `=`) against `options`.
///
/// An exact name match always wins, and among equal names the first declared
/// one is used. In `UniquePrefix` mode a head that is the leading part of a
/// single distinct name resolves to that name's first descriptor.
pub fn resolve<C>(options: &[OptionDescriptor<C>], head: &str, mode: MatchMode) -> Resolution {
    if let Some(index) = find_exact(options, head) {
        return Resolution::Matched(index);
    }

    match mode {
        MatchMode::Exact => Resolution::NoMatch,
        MatchMode::UniquePrefix => find_unique_prefix(options, head),
    }
}

fn find_exact<C>(options: &[OptionDescriptor<C>], head: &str) -> Option<usize> {
    options.iter().position(|o| o.name() == Some(head))
}

fn find_unique_prefix<C>(options: &[OptionDescriptor<C>], head: &str) -> Resolution {
    if head.is_empty() {
        return Resolution::NoMatch;
    }

    let mut first: Option<usize> = None;
    let mut candidates: Vec<String> = Vec::new();

    for (index, option) in options.iter().enumerate() {
        let Some(name) = option.name() else {
            continue;
        };
        if !name.starts_with(head) {
            continue;
        }
        if candidates.iter().any(|c| c == name) {
            continue;
        }
        if first.is_none() {
            first = Some(index);
        }
        candidates.push(name.to_string());
    }

    match (first, candidates.len()) {
        (Some(index), 1) => Resolution::Matched(index),
        (_, 0) => Resolution::NoMatch,
        _ => Resolution::Ambiguous(candidates),
    }
}
