//! Mapping merge resolution.
//!
//! Applies a HeaderMapping to a RawRow, combining values when several
//! source columns land on the same canonical field. Policy is per field:
//! concatenate, longest-wins, preferred-header, or last-write-wins; the
//! policy table is a static registry rather than a branch forest so each
//! rule stays testable on its own.
//!
//! The resolver is a pure fold over the row's columns in source order.
//! Calling it twice with the same inputs yields the same output.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::domain::fields;
use crate::domain::{CanonicalRow, HeaderMapping, RawRow};

static AMOUNT_HEADER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)amount|total").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergePolicy {
    /// Append after the existing value, space-separated.
    Concat,
    /// Keep the longer string. Short values are typically truncated
    /// abbreviations that would otherwise clobber a complete reference.
    LongestWins,
    /// Prefer sources whose header looks like an amount column.
    PreferredHeader,
    /// Each subsequent source overwrites the field.
    LastWins,
}

/// Static field -> policy registry.
pub fn policy_for(field: &str) -> MergePolicy {
    if fields::is_mergeable(field) {
        MergePolicy::Concat
    } else if field == fields::REFERENCE {
        MergePolicy::LongestWins
    } else if field == fields::AMOUNT {
        MergePolicy::PreferredHeader
    } else {
        MergePolicy::LastWins
    }
}

/// Combine an incoming value with an already-resolved one.
/// `header` is the incoming value's original source header.
fn apply_policy(policy: MergePolicy, existing: &str, incoming: &str, header: &str) -> String {
    match policy {
        MergePolicy::Concat => {
            format!("{} {}", existing.trim(), incoming.trim())
                .trim()
                .to_string()
        }
        MergePolicy::LongestWins => {
            if incoming.chars().count() > existing.chars().count() {
                incoming.to_string()
            } else {
                existing.to_string()
            }
        }
        MergePolicy::PreferredHeader => {
            // Preserved quirk: a preferred header is written unconditionally
            // whenever encountered, but a later non-preferred header still
            // overwrites it. The preference is only effective when the
            // preferred source happens to be the last one seen. Tests pin
            // this behavior down; do not "fix" it here.
            if AMOUNT_HEADER.is_match(header) {
                debug!(header = %header, "amount merged from preferred header");
            }
            incoming.to_string()
        }
        MergePolicy::LastWins => incoming.to_string(),
    }
}

/// Resolve one RawRow into a CanonicalRow.
pub fn resolve_row(row: &RawRow, mapping: &HeaderMapping) -> CanonicalRow {
    row.columns
        .iter()
        .fold(CanonicalRow::new(), |mut resolved, (header, value)| {
            if value.is_empty() {
                return resolved;
            }
            let field = match mapping.target_for(header) {
                Some(field) => field.to_string(),
                None => return resolved,
            };
            let incoming = value.as_text();
            let next = match resolved.get(&field) {
                Some(existing) => {
                    apply_policy(policy_for(&field), existing, &incoming, header)
                }
                None => incoming,
            };
            resolved.set(&field, next);
            resolved
        })
}

/// Resolve a whole sheet of rows.
pub fn resolve_rows(rows: &[RawRow], mapping: &HeaderMapping) -> Vec<CanonicalRow> {
    rows.iter().map(|row| resolve_row(row, mapping)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fields::{
        ADDRESS_LINE_1, AMOUNT, CITY, CONTACT_NAME, REFERENCE,
    };
    use crate::domain::{CellValue, MappingSource};

    fn mapping(pairs: &[(&str, &str)]) -> HeaderMapping {
        let mut m = HeaderMapping::new(MappingSource::Dictionary);
        for (header, field) in pairs {
            m.entries
                .insert(header.to_string(), Some(field.to_string()));
        }
        m
    }

    fn row(cells: &[(&str, &str)]) -> RawRow {
        RawRow::new(
            cells
                .iter()
                .map(|(h, v)| (h.to_string(), CellValue::from(*v)))
                .collect(),
        )
    }

    #[test]
    fn test_single_source_assigns_directly() {
        let r = row(&[("City", "Toronto")]);
        let m = mapping(&[("City", CITY)]);
        let resolved = resolve_row(&r, &m);
        assert_eq!(resolved.get(CITY), Some("Toronto"));
    }

    #[test]
    fn test_unmapped_and_empty_sources_are_skipped() {
        let r = row(&[("SKU", "AB-1"), ("City", ""), ("Town", "Toronto")]);
        let m = mapping(&[("City", CITY), ("Town", CITY)]);
        let resolved = resolve_row(&r, &m);
        assert_eq!(resolved.get(CITY), Some("Toronto"));
        assert!(resolved.get("SKU").is_none());
    }

    #[test]
    fn test_mergeable_fields_concatenate_in_source_order() {
        let r = row(&[("First Name", "Jane"), ("Last Name", "Doe")]);
        let m = mapping(&[("First Name", CONTACT_NAME), ("Last Name", CONTACT_NAME)]);
        let resolved = resolve_row(&r, &m);
        assert_eq!(resolved.get(CONTACT_NAME), Some("Jane Doe"));
    }

    #[test]
    fn test_address_concat_trims_spacing() {
        let r = row(&[("Street", " 12 Main St "), ("Unit", "Apt 4 ")]);
        let m = mapping(&[("Street", ADDRESS_LINE_1), ("Unit", ADDRESS_LINE_1)]);
        let resolved = resolve_row(&r, &m);
        assert_eq!(resolved.get(ADDRESS_LINE_1), Some("12 Main St Apt 4"));
    }

    #[test]
    fn test_reference_longest_wins_is_order_independent() {
        let forward = row(&[("Ref A", "ON"), ("Ref B", "264420524-A")]);
        let backward = row(&[("Ref B", "264420524-A"), ("Ref A", "ON")]);
        let m = mapping(&[("Ref A", REFERENCE), ("Ref B", REFERENCE)]);
        assert_eq!(resolve_row(&forward, &m).get(REFERENCE), Some("264420524-A"));
        assert_eq!(resolve_row(&backward, &m).get(REFERENCE), Some("264420524-A"));
    }

    #[test]
    fn test_default_policy_is_last_write_wins() {
        let r = row(&[("Phone 1", "111"), ("Phone 2", "222")]);
        let m = mapping(&[
            ("Phone 1", crate::domain::fields::PHONE),
            ("Phone 2", crate::domain::fields::PHONE),
        ]);
        assert_eq!(
            resolve_row(&r, &m).get(crate::domain::fields::PHONE),
            Some("222")
        );
    }

    // Documents the deliberate amount-policy quirk: the "preference" for
    // /amount|total/i headers is one-shot. A preferred source wins only
    // when it is the last one encountered; a later non-preferred source
    // still overwrites it.
    #[test]
    fn test_amount_preferred_header_wins_when_last() {
        let r = row(&[("Price", "10.00"), ("Order Total", "12.50")]);
        let m = mapping(&[("Price", AMOUNT), ("Order Total", AMOUNT)]);
        assert_eq!(resolve_row(&r, &m).get(AMOUNT), Some("12.50"));
    }

    #[test]
    fn test_amount_later_nonpreferred_source_still_overwrites() {
        let r = row(&[("Order Total", "12.50"), ("Price", "10.00")]);
        let m = mapping(&[("Order Total", AMOUNT), ("Price", AMOUNT)]);
        assert_eq!(resolve_row(&r, &m).get(AMOUNT), Some("10.00"));
    }

    #[test]
    fn test_resolver_is_idempotent() {
        let r = row(&[
            ("Name", "Jane"),
            ("Surname", "Doe"),
            ("Ref", "ORD-9"),
            ("Order No", "264420524"),
        ]);
        let m = mapping(&[
            ("Name", CONTACT_NAME),
            ("Surname", CONTACT_NAME),
            ("Ref", REFERENCE),
            ("Order No", REFERENCE),
        ]);
        let first = resolve_row(&r, &m);
        let second = resolve_row(&r, &m);
        assert_eq!(first, second);
    }

    #[test]
    fn test_policy_registry() {
        assert_eq!(policy_for(CONTACT_NAME), MergePolicy::Concat);
        assert_eq!(policy_for(REFERENCE), MergePolicy::LongestWins);
        assert_eq!(policy_for(AMOUNT), MergePolicy::PreferredHeader);
        assert_eq!(policy_for(CITY), MergePolicy::LastWins);
    }
}
