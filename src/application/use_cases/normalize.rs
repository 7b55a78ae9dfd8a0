//! Carrier value normalization.
//!
//! Scalar cleanup rules applied to every row before serialization:
//! phone/postal stripping, country and province aliasing, the kg/gram
//! weight heuristic, dimension formatting and character-boundary
//! truncation. All pure functions over static tables.

use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::domain::fields::{self, PHONE, POSTAL_CODE};

/// Codes the carrier accepts as-is.
const VALID_SERVICE_CODES: &[&str] = &[
    "DOM.RP",
    "DOM.EP",
    "DOM.XP",
    "DOM.PC",
    "USA.EP",
    "USA.XP",
    "USA.PW.PAK",
];

const EXPEDITED_CODE: &str = "DOM.EP";
const XPRESS_CODE: &str = "DOM.XP";
const PRIORITY_CODE: &str = "DOM.PC";

static PROVINCE_CODES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("alberta", "AB"),
        ("british columbia", "BC"),
        ("manitoba", "MB"),
        ("new brunswick", "NB"),
        ("newfoundland", "NL"),
        ("newfoundland and labrador", "NL"),
        ("nova scotia", "NS"),
        ("northwest territories", "NT"),
        ("nunavut", "NU"),
        ("ontario", "ON"),
        ("prince edward island", "PE"),
        ("quebec", "QC"),
        ("québec", "QC"),
        ("saskatchewan", "SK"),
        ("yukon", "YT"),
        // common legacy spelling on older exports
        ("yukon territory", "YT"),
    ])
});

/// Truncate on character boundaries, never bytes.
pub fn truncate_chars(value: &str, max: usize) -> String {
    value.chars().take(max).collect()
}

/// Truncate to the carrier limit for `field`. Fields without a declared
/// limit pass through; the limit table in `domain::fields` is the single
/// source of truth.
pub fn clamp(field: &str, value: &str) -> String {
    match fields::char_limit(field) {
        Some(max) => truncate_chars(value, max),
        None => value.to_string(),
    }
}

/// Keep digits only, capped at the carrier's phone limit.
pub fn normalize_phone(value: &str) -> String {
    let digits: String = value.chars().filter(|c| c.is_ascii_digit()).collect();
    clamp(PHONE, &digits)
}

pub fn normalize_postal_code(value: &str) -> String {
    let compact: String = value
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase();
    clamp(POSTAL_CODE, &compact)
}

/// Alias table first; already-2-letter codes pass through; anything else
/// defaults to domestic.
pub fn normalize_country(value: &str) -> String {
    let upper = value.trim().to_uppercase();
    match upper.as_str() {
        "CAN" | "CA" | "CANADA" => "CA".to_string(),
        "USA" | "US" | "UNITED STATES" => "US".to_string(),
        _ if upper.chars().count() == 2 => upper,
        _ => "CA".to_string(),
    }
}

/// Full province/territory names map to their 2-letter codes; 2-letter
/// input passes through unchanged; unrecognized input passes through
/// as-is — the carrier owns rejection, not this crate.
pub fn normalize_province(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.chars().count() == 2 {
        return trimmed.to_uppercase();
    }
    match PROVINCE_CODES.get(trimmed.to_lowercase().as_str()) {
        Some(code) => code.to_string(),
        None => trimmed.to_string(),
    }
}

/// Resolve unit ambiguity without a unit column: values <= 50 are read as
/// kilograms and converted to grams; larger values are already grams.
pub fn normalize_weight_grams(value: &str) -> Option<i64> {
    let parsed: f64 = value.trim().replace(',', "").parse().ok()?;
    if parsed <= 0.0 {
        return None;
    }
    let grams = if parsed <= 50.0 { parsed * 1000.0 } else { parsed };
    Some(grams.round() as i64)
}

/// Integers stay integers, anything else gets one decimal place.
pub fn format_dimension(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{:.1}", value)
    }
}

/// Parse a dimension cell, falling back to the configured default.
pub fn normalize_dimension(value: &str, default: f64) -> String {
    let parsed = value.trim().replace(',', "").parse::<f64>().ok();
    match parsed {
        Some(v) if v > 0.0 => format_dimension(v),
        _ => format_dimension(default),
    }
}

/// Normalize a service description to a carrier code. Allow-listed codes
/// pass through; otherwise a keyword cascade; otherwise the configured
/// default. Never returns an empty string for a non-empty default.
pub fn normalize_service_code(value: &str, default_code: &str) -> String {
    let upper = value.trim().to_uppercase();
    if VALID_SERVICE_CODES.contains(&upper.as_str()) {
        return upper;
    }

    let lower = value.trim().to_lowercase();
    if ["xpress", "express"].iter().any(|k| lower.contains(k)) {
        return XPRESS_CODE.to_string();
    }
    if lower.contains("priority") {
        return PRIORITY_CODE.to_string();
    }
    if ["ground", "regular", "standard", "expedited"]
        .iter()
        .any(|k| lower.contains(k))
    {
        return EXPEDITED_CODE.to_string();
    }

    default_code.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_chars_respects_multibyte() {
        assert_eq!(truncate_chars("Québec City", 6), "Québec");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }

    #[test]
    fn test_clamp_follows_limit_table() {
        let long = "x".repeat(60);
        assert_eq!(clamp(fields::CITY, &long).chars().count(), 40);
        assert_eq!(clamp(fields::PROVINCE, &long).chars().count(), 20);
        // no declared limit: pass through
        assert_eq!(clamp(fields::WEIGHT, &long), long);
    }

    #[test]
    fn test_normalize_phone() {
        assert_eq!(normalize_phone("+1 (416) 555-0199"), "14165550199");
        assert_eq!(normalize_phone("ext. none"), "");
    }

    #[test]
    fn test_normalize_postal_code() {
        assert_eq!(normalize_postal_code(" m5v 2t6 "), "M5V2T6");
        assert_eq!(normalize_postal_code("90210-12345678901"), "90210-12345678");
    }

    #[test]
    fn test_normalize_country() {
        assert_eq!(normalize_country("CANADA"), "CA");
        assert_eq!(normalize_country("usa"), "US");
        assert_eq!(normalize_country("XX"), "XX");
        assert_eq!(normalize_country("Germany"), "CA");
    }

    #[test]
    fn test_normalize_province() {
        assert_eq!(normalize_province("Ontario"), "ON");
        assert_eq!(normalize_province("QC"), "QC");
        assert_eq!(normalize_province("Québec"), "QC");
        assert_eq!(normalize_province("Yukon Territory"), "YT");
        assert_eq!(normalize_province("Timbuktu"), "Timbuktu");
    }

    #[test]
    fn test_weight_heuristic_boundaries() {
        assert_eq!(normalize_weight_grams("2"), Some(2000));
        assert_eq!(normalize_weight_grams("0.5"), Some(500));
        assert_eq!(normalize_weight_grams("75"), Some(75));
        // boundary is inclusive: 50 is still kilograms
        assert_eq!(normalize_weight_grams("50"), Some(50000));
        assert_eq!(normalize_weight_grams("n/a"), None);
        assert_eq!(normalize_weight_grams("-3"), None);
    }

    #[test]
    fn test_dimension_formatting() {
        assert_eq!(format_dimension(30.0), "30");
        assert_eq!(format_dimension(10.25), "10.2");
        assert_eq!(normalize_dimension("12.5", 30.0), "12.5");
        assert_eq!(normalize_dimension("", 30.0), "30");
        assert_eq!(normalize_dimension("0", 23.0), "23");
    }

    #[test]
    fn test_service_code_allow_list_passes_through() {
        assert_eq!(normalize_service_code("dom.xp", "DOM.EP"), "DOM.XP");
        assert_eq!(normalize_service_code("USA.EP", "DOM.EP"), "USA.EP");
    }

    #[test]
    fn test_service_code_keyword_cascade() {
        assert_eq!(normalize_service_code("Ground", "DOM.EP"), "DOM.EP");
        assert_eq!(normalize_service_code("Standard Shipping", "DOM.EP"), "DOM.EP");
        assert_eq!(normalize_service_code("XPRESS", "DOM.EP"), "DOM.XP");
        assert_eq!(normalize_service_code("Express Saver", "DOM.EP"), "DOM.XP");
        assert_eq!(normalize_service_code("Priority Overnight", "DOM.EP"), "DOM.PC");
    }

    #[test]
    fn test_service_code_falls_back_to_default() {
        assert_eq!(normalize_service_code("pigeon post", "DOM.EP"), "DOM.EP");
        assert_eq!(normalize_service_code("", "DOM.XP"), "DOM.XP");
    }
}
