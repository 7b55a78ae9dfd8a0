//! Shipment document synthesis.
//!
//! Turns validated canonical rows into the carrier XML document: value
//! normalization, quantity-driven record duplication, conditional option
//! blocks, then serialization with a fixed element order. A single bad
//! record (empty service code) aborts the whole batch — partial carrier
//! submissions are worse than no submission.

use tracing::{info, warn};

use crate::application::use_cases::normalize::{
    clamp, normalize_country, normalize_dimension, normalize_phone, normalize_postal_code,
    normalize_province, normalize_service_code, normalize_weight_grams, truncate_chars,
};
use crate::domain::fields::{
    self, ADDRESS_LINE_1, ADDRESS_LINE_2, AMOUNT, CITY, COMPANY, CONTACT_NAME, COUNTRY, EMAIL,
    HEIGHT, LENGTH, PHONE, POSTAL_CODE, PROVINCE, QUANTITY, REFERENCE, SERVICE_CODE, WEIGHT,
    WIDTH,
};
use crate::domain::{AppError, CanonicalRow, Result, ShipmentConfig, ShipmentRecord};

/// Upper bound on quantity-driven duplication. Anything above this is a
/// data-entry mistake, not an order.
const MAX_UNITS_PER_ROW: usize = 100;

/// Expand canonical rows into carrier-ready records.
pub fn build_records(
    rows: &[CanonicalRow],
    config: &ShipmentConfig,
) -> Result<Vec<ShipmentRecord>> {
    config
        .validate()
        .map_err(AppError::SerializationError)?;

    let mut records = Vec::new();
    for (index, row) in rows.iter().enumerate() {
        let service_code = clamp(
            SERVICE_CODE,
            &normalize_service_code(row.get_or_empty(SERVICE_CODE), &config.default_service_code),
        );
        if service_code.is_empty() {
            return Err(AppError::SerializationError(format!(
                "Row {} resolved to an empty service code",
                index + 1
            )));
        }

        let amount = row
            .get(AMOUNT)
            .and_then(|v| v.trim().replace(',', "").parse::<f64>().ok())
            .unwrap_or(0.0);
        let signature_required = amount > config.signature_amount_threshold;

        let email = clamp(EMAIL, row.get_or_empty(EMAIL).trim());
        let notification_email = if config.notify_on_delivery && !email.is_empty() {
            Some(email)
        } else {
            None
        };

        let weight_grams = row
            .get(WEIGHT)
            .and_then(|v| normalize_weight_grams(v))
            .unwrap_or(config.default_weight_grams);

        let units = if config.duplicate_by_quantity {
            quantity_of(row)
        } else {
            1
        };

        let base = ShipmentRecord {
            client_id: config.client_id.clone(),
            contact_name: limited(row, CONTACT_NAME),
            company: limited(row, COMPANY),
            address_line_1: limited(row, ADDRESS_LINE_1),
            address_line_2: limited(row, ADDRESS_LINE_2),
            city: limited(row, CITY),
            province: clamp(PROVINCE, &normalize_province(row.get_or_empty(PROVINCE))),
            postal_code: normalize_postal_code(row.get_or_empty(POSTAL_CODE)),
            country: normalize_country(row.get_or_empty(COUNTRY)),
            phone: normalize_phone(row.get_or_empty(PHONE)),
            service_code,
            signature_required,
            length: normalize_dimension(row.get_or_empty(LENGTH), config.default_length_cm),
            width: normalize_dimension(row.get_or_empty(WIDTH), config.default_width_cm),
            height: normalize_dimension(row.get_or_empty(HEIGHT), config.default_height_cm),
            weight_grams,
            notification_email,
            reference: String::new(),
        };

        let reference = row.get_or_empty(REFERENCE).trim().to_string();
        if units > 1 {
            for unit in 1..=units {
                let mut record = base.clone();
                record.reference = suffixed_reference(&reference, unit);
                records.push(record);
            }
        } else {
            let mut record = base;
            record.reference = clamp(REFERENCE, &reference);
            records.push(record);
        }
    }

    Ok(records)
}

/// Serialize records into the carrier document. Refuses to emit an empty
/// document.
pub fn build_document(records: &[ShipmentRecord]) -> Result<String> {
    if records.is_empty() {
        return Err(AppError::SerializationError(
            "No records to serialize".to_string(),
        ));
    }

    let mut xml = String::new();
    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str("<delivery-requests>\n");
    for record in records {
        write_record(&mut xml, record);
    }
    xml.push_str("</delivery-requests>\n");

    info!(records = records.len(), "shipment document synthesized");
    Ok(xml)
}

/// One-call pipeline tail: rows -> records -> document.
pub fn synthesize(rows: &[CanonicalRow], config: &ShipmentConfig) -> Result<String> {
    let records = build_records(rows, config)?;
    build_document(&records)
}

fn quantity_of(row: &CanonicalRow) -> usize {
    let units = row
        .get(QUANTITY)
        .and_then(|v| v.trim().parse::<f64>().ok())
        .map(|q| q.round() as i64)
        .filter(|q| *q >= 1)
        .map(|q| q as usize)
        .unwrap_or(1);
    if units > MAX_UNITS_PER_ROW {
        warn!(units, cap = MAX_UNITS_PER_ROW, "quantity exceeds duplication cap, clamping");
        MAX_UNITS_PER_ROW
    } else {
        units
    }
}

fn limited(row: &CanonicalRow, field: &str) -> String {
    clamp(field, row.get_or_empty(field).trim())
}

/// Apply the "-{n}" duplicate suffix before the reference limit; the
/// suffix must survive, so the base is what gets truncated.
fn suffixed_reference(base: &str, unit: usize) -> String {
    let suffix = format!("-{}", unit);
    let max = fields::char_limit(REFERENCE).unwrap_or(usize::MAX);
    let room = max.saturating_sub(suffix.chars().count());
    format!("{}{}", truncate_chars(base, room), suffix)
}

// Element order inside <delivery-request> is fixed by the carrier;
// optional blocks drop out entirely, empty string fields emit empty tags.
fn write_record(xml: &mut String, record: &ShipmentRecord) {
    xml.push_str("  <delivery-request>\n");
    xml.push_str("    <destination>\n");
    push_element(xml, 6, "client-id", &record.client_id);
    push_element(xml, 6, "contact-name", &record.contact_name);
    push_element(xml, 6, "company", &record.company);
    push_element(xml, 6, "address-line-1", &record.address_line_1);
    push_element(xml, 6, "address-line-2", &record.address_line_2);
    push_element(xml, 6, "city", &record.city);
    push_element(xml, 6, "prov-state", &record.province);
    push_element(xml, 6, "postal-zip-code", &record.postal_code);
    push_element(xml, 6, "country-code", &record.country);
    push_element(xml, 6, "voice-number", &record.phone);
    xml.push_str("    </destination>\n");
    push_element(xml, 4, "product-code", &record.service_code);
    if record.signature_required {
        push_element(xml, 4, "signature-option", "true");
    }
    xml.push_str("    <parcel-characteristics>\n");
    push_element(xml, 6, "length", &record.length);
    push_element(xml, 6, "width", &record.width);
    push_element(xml, 6, "height", &record.height);
    push_element(xml, 6, "weight", &record.weight_grams.to_string());
    xml.push_str("    </parcel-characteristics>\n");
    if let Some(email) = &record.notification_email {
        xml.push_str("    <notification>\n");
        push_element(xml, 6, "email", email);
        push_element(xml, 6, "on-delivery", "true");
        xml.push_str("    </notification>\n");
    }
    xml.push_str("    <references>\n");
    push_element(xml, 6, "customer-ref", &record.reference);
    xml.push_str("    </references>\n");
    xml.push_str("  </delivery-request>\n");
}

fn push_element(xml: &mut String, indent: usize, tag: &str, value: &str) {
    xml.push_str(&" ".repeat(indent));
    xml.push('<');
    xml.push_str(tag);
    xml.push('>');
    xml.push_str(&escape_xml(value));
    xml.push_str("</");
    xml.push_str(tag);
    xml.push_str(">\n");
}

fn escape_xml(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
