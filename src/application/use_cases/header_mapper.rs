//! Static header -> canonical field mapping.
//!
//! First stage of every import: run each raw header through the synonym
//! dictionary, case/whitespace/punctuation-insensitively. Headers the
//! dictionary does not know stay unmapped but keep working as literal keys.
//! Deterministic and order-independent; no side effects.

use crate::domain::fields;
use crate::domain::{HeaderMapping, MappingSource};

/// Map a raw header list onto the canonical schema.
pub fn map_headers(headers: &[String]) -> HeaderMapping {
    let mut mapping = HeaderMapping::new(MappingSource::Dictionary);
    for header in headers {
        let target = fields::lookup_canonical(header).map(|f| f.to_string());
        mapping.entries.insert(header.clone(), target);
    }
    mapping
}

/// Count how many headers resolved to a canonical field.
pub fn mapped_count(mapping: &HeaderMapping) -> usize {
    mapping
        .entries
        .values()
        .filter(|target| target.is_some())
        .count()
}
