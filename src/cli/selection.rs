//! Table selection for `gen db --tables`.
//!
//! A selector is a comma-separated list of:
//!
//! - `all` or `*`: every table
//! - a 1-based index (`3`) or inclusive range (`2-5`) into the listing order
//! - a table name, exact match
//! - a pattern with `*` wildcards (`user*`, `*_log`)

use anyhow::{anyhow, bail, Context};
use regex::Regex;

/// Resolve `selector` against `available` (listing order), without duplicates.
pub fn select_tables(available: &[String], selector: &str) -> anyhow::Result<Vec<String>> {
    let selector = selector.trim();
    if selector.eq_ignore_ascii_case("all") || selector == "*" {
        return Ok(available.to_vec());
    }

    let mut selected: Vec<String> = Vec::new();
    let mut push = |name: &str| {
        if !selected.iter().any(|s| s == name) {
            selected.push(name.to_string());
        }
    };

    for token in selector.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if let Some(range) = parse_range(token)? {
            for idx in range.0..=range.1 {
                let name = available.get(idx - 1).ok_or_else(|| {
                    anyhow!("table index {idx} is out of range (1-{})", available.len())
                })?;
                push(name);
            }
        } else if token.contains('*') {
            let pattern = wildcard_regex(token)?;
            let matches: Vec<&String> = available.iter().filter(|t| pattern.is_match(t)).collect();
            if matches.is_empty() {
                bail!("pattern `{token}` matches no table");
            }
            for name in matches {
                push(name);
            }
        } else if available.iter().any(|t| t == token) {
            push(token);
        } else {
            bail!("table `{token}` not found");
        }
    }

    if selected.is_empty() {
        bail!("no tables selected");
    }
    Ok(selected)
}

/// `3` → (3, 3), `2-5` → (2, 5); anything non-numeric → `None`.
fn parse_range(token: &str) -> anyhow::Result<Option<(usize, usize)>> {
    let (start, end) = match token.split_once('-') {
        Some((a, b)) => (a.trim(), b.trim()),
        None => (token, token),
    };
    let numeric = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
    if !numeric(start) || !numeric(end) {
        return Ok(None);
    }
    let start: usize = start.parse().with_context(|| format!("bad index `{token}`"))?;
    let end: usize = end.parse().with_context(|| format!("bad index `{token}`"))?;
    if start == 0 || end < start {
        bail!("invalid table range `{token}`");
    }
    Ok(Some((start, end)))
}

fn wildcard_regex(token: &str) -> anyhow::Result<Regex> {
    let body = token
        .split('*')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(".*");
    Regex::new(&format!("^{body}$")).with_context(|| format!("bad table pattern `{token}`"))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;

    fn tables() -> Vec<String> {
        ["users", "user_profiles", "posts", "audit_log", "categories"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn test_all() {
        assert_eq!(select_tables(&tables(), "all").unwrap(), tables());
        assert_eq!(select_tables(&tables(), " * ").unwrap(), tables());
    }

    #[test]
    fn test_names_and_wildcards_keep_order_without_duplicates() {
        let picked = select_tables(&tables(), "posts,user*,users").unwrap();
        assert_eq!(picked, vec!["posts", "users", "user_profiles"]);
        let picked = select_tables(&tables(), "*_log").unwrap();
        assert_eq!(picked, vec!["audit_log"]);
    }

    #[test]
    fn test_indexes_and_ranges() {
        let picked = select_tables(&tables(), "1, 3-4").unwrap();
        assert_eq!(picked, vec!["users", "posts", "audit_log"]);
    }

    #[test]
    fn test_errors() {
        assert!(select_tables(&tables(), "orders").is_err());
        assert!(select_tables(&tables(), "order*").is_err());
        assert!(select_tables(&tables(), "9").is_err());
        assert!(select_tables(&tables(), "4-2").is_err());
        assert!(select_tables(&tables(), "0").is_err());
        assert!(select_tables(&tables(), " , ").is_err());
    }

    #[test]
    fn test_pattern_metacharacters_are_literal() {
        let available = vec!["a.b".to_string(), "axb".to_string()];
        assert_eq!(select_tables(&available, "a.*").unwrap(), vec!["a.b"]);
    }
}
