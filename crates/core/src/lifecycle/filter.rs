//! Filter composition
//!
//! Turns the prefix, tag and size options into a single rule filter. Two or
//! more predicates produce an `And` filter; fewer produce a simple one.

use crate::error::{Error, Result};

use super::options::LifecycleOptions;
use super::types::{Filter, FilterPredicates, Tag};

/// Parse a `k=v[,k=v...]` tag expression
///
/// An empty expression yields no tags.
pub fn parse_tags(expr: &str) -> Result<Vec<Tag>> {
    let mut tags: Vec<Tag> = Vec::new();

    for pair in expr.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').ok_or_else(|| {
            Error::Parse(format!("tags: '{pair}' is not a key=value pair"))
        })?;

        let key = key.trim();
        if key.is_empty() {
            return Err(Error::Parse(format!("tags: '{pair}' has an empty key")));
        }
        if tags.iter().any(|t| t.key == key) {
            return Err(Error::Parse(format!("tags: duplicate key '{key}'")));
        }

        tags.push(Tag::new(key, value.trim()));
    }

    Ok(tags)
}

/// Parse a size such as `1048576`, `512K` or `1MB` into bytes
///
/// Unit multiples are binary; `KB` and `KiB` both mean 1024.
pub fn parse_size(flag: &str, input: &str) -> Result<i64> {
    let invalid = || Error::Parse(format!("{flag} value '{input}' is invalid"));

    let s = input.trim();
    let split = s
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(s.len());
    let (number, unit) = s.split_at(split);
    if number.is_empty() {
        return Err(invalid());
    }

    let shift = match unit.trim().to_ascii_lowercase().as_str() {
        "" | "b" => 0,
        "k" | "kb" | "kib" => 10,
        "m" | "mb" | "mib" => 20,
        "g" | "gb" | "gib" => 30,
        "t" | "tb" | "tib" => 40,
        "p" | "pb" | "pib" => 50,
        _ => return Err(invalid()),
    };
    if number.contains('.') {
        let value: f64 = number.parse().map_err(|_| invalid())?;
        let bytes = (value * (1u64 << shift) as f64).round();
        if !bytes.is_finite() || bytes >= i64::MAX as f64 {
            return Err(invalid());
        }
        return Ok(bytes as i64);
    }

    let value: u64 = number.parse().map_err(|_| invalid())?;
    value
        .checked_shl(shift)
        .filter(|bytes| bytes >> shift == value)
        .and_then(|bytes| i64::try_from(bytes).ok())
        .ok_or_else(invalid)
}

/// Collect the filter predicates set in the options
fn predicates_from_options(opts: &LifecycleOptions) -> Result<FilterPredicates> {
    Ok(FilterPredicates {
        prefix: opts.prefix.clone(),
        tags: opts.tags.as_deref().map(parse_tags).transpose()?.unwrap_or_default(),
        size_greater_than: opts
            .size_gt
            .as_deref()
            .map(|s| parse_size("size-gt", s))
            .transpose()?,
        size_less_than: opts
            .size_lt
            .as_deref()
            .map(|s| parse_size("size-lt", s))
            .transpose()?,
    })
}

/// Build a filter for a new rule
pub fn compose_filter(opts: &LifecycleOptions) -> Result<Filter> {
    Ok(predicates_from_options(opts)?.compose())
}

/// Overlay the filter options onto an existing filter
///
/// A tag expression replaces the existing tag set. The shape is recomputed
/// from the resulting predicate count.
pub fn patch_filter(existing: &Filter, opts: &LifecycleOptions) -> Result<Filter> {
    if !opts.filter_touched() {
        return Ok(existing.clone());
    }

    let update = predicates_from_options(opts)?;
    let mut merged = existing.predicates();

    if update.prefix.is_some() {
        merged.prefix = update.prefix;
    }
    if opts.tags.is_some() {
        merged.tags = update.tags;
    }
    if update.size_greater_than.is_some() {
        merged.size_greater_than = update.size_greater_than;
    }
    if update.size_less_than.is_some() {
        merged.size_less_than = update.size_less_than;
    }

    Ok(merged.compose())
}
