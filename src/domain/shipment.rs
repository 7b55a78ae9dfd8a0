// ============================================================
// SHIPMENT TYPES
// ============================================================
// Carrier-ready record plus the knobs controlling document synthesis.

use serde::{Deserialize, Serialize};

/// One fully normalized, per-unit record ready for serialization.
/// All string fields are already truncated to the carrier's limits;
/// weight is in grams, dimensions are formatted centimetre strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipmentRecord {
    pub client_id: String,
    pub contact_name: String,
    pub company: String,
    pub address_line_1: String,
    pub address_line_2: String,
    pub city: String,
    pub province: String,
    pub postal_code: String,
    pub country: String,
    pub phone: String,

    pub service_code: String,
    pub signature_required: bool,

    pub length: String,
    pub width: String,
    pub height: String,
    pub weight_grams: i64,

    /// Present only when notifications are enabled and the row carried an
    /// email address.
    pub notification_email: Option<String>,

    /// Customer reference, possibly "-{n}" suffixed by quantity duplication.
    pub reference: String,
}

/// Configuration for shipment document synthesis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipmentConfig {
    /// Sender account identifier stamped on every destination block.
    pub client_id: String,

    /// Service code used when normalization matches nothing (default: DOM.EP)
    pub default_service_code: String,

    /// Order amount above which a signature option is attached (default: 200)
    pub signature_amount_threshold: f64,

    /// Attach a delivery-notification block when an email is present
    pub notify_on_delivery: bool,

    /// Emit one record per ordered unit when quantity > 1
    pub duplicate_by_quantity: bool,

    /// Fallback parcel dimensions, centimetres
    pub default_length_cm: f64,
    pub default_width_cm: f64,
    pub default_height_cm: f64,

    /// Fallback parcel weight, grams
    pub default_weight_grams: i64,
}

impl Default for ShipmentConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            default_service_code: "DOM.EP".to_string(),
            signature_amount_threshold: 200.0,
            notify_on_delivery: false,
            duplicate_by_quantity: true,
            default_length_cm: 30.0,
            default_width_cm: 23.0,
            default_height_cm: 10.0,
            default_weight_grams: 1000,
        }
    }
}

impl ShipmentConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.default_service_code.trim().is_empty() {
            return Err("default_service_code must not be empty".to_string());
        }
        if self.signature_amount_threshold < 0.0 {
            return Err("signature_amount_threshold must be >= 0".to_string());
        }
        if self.default_length_cm <= 0.0
            || self.default_width_cm <= 0.0
            || self.default_height_cm <= 0.0
        {
            return Err("default dimensions must be > 0".to_string());
        }
        if self.default_weight_grams <= 0 {
            return Err("default_weight_grams must be > 0".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(ShipmentConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_service_code() {
        let config = ShipmentConfig {
            default_service_code: " ".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
