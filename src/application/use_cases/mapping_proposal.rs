//! AI mapping-proposal handling.
//!
//! A text-extraction model may propose a header -> canonical-field map for
//! an unfamiliar export. The model output is untrusted: it gets parsed out
//! of whatever prose surrounds it, then sanitized against the sheet's
//! actual headers and the canonical schema before it is allowed to behave
//! like a manual mapping. A failed proposal degrades to dictionary mapping
//! and never aborts the import.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use crate::domain::fields;
use crate::domain::{AppError, ExtractionConfig, HeaderMapping, MappingSource, Result, SheetTable};
use crate::infrastructure::llm_clients::ExtractionClient;

static FENCED_JSON: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```(?:json)?\s*(\{.*?\})\s*```").unwrap());

static BARE_OBJECT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\{.*\}").unwrap());

/// Pull the proposal object out of a model response. Models wrap JSON in
/// fences or prose; take the fenced block first, then the widest brace
/// span.
pub fn parse_proposal_text(text: &str) -> Result<HashMap<String, Option<String>>> {
    let json_str = FENCED_JSON
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .or_else(|| BARE_OBJECT.find(text).map(|m| m.as_str()))
        .ok_or_else(|| AppError::LLMError("No JSON object in model response".to_string()))?;

    let value: serde_json::Value = serde_json::from_str(json_str)
        .map_err(|e| AppError::LLMError(format!("Proposal is not valid JSON: {}", e)))?;
    let object = value
        .as_object()
        .ok_or_else(|| AppError::LLMError("Proposal is not a JSON object".to_string()))?;

    let mut proposal = HashMap::new();
    for (header, target) in object {
        let target = match target {
            serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            _ => None,
        };
        proposal.insert(header.clone(), target);
    }
    Ok(proposal)
}

/// Sanitize a raw proposal against the sheet it claims to describe.
/// Headers the sheet does not have are dropped; targets outside the
/// canonical schema are cleared; sheet headers the proposal skipped stay
/// unmapped.
pub fn sanitize_proposal(
    proposal: &HashMap<String, Option<String>>,
    headers: &[String],
) -> HeaderMapping {
    let mut mapping = HeaderMapping::new(MappingSource::AiProposal);

    for header in headers {
        let target = match proposal.get(header) {
            Some(Some(target)) if fields::is_canonical(target) => Some(target.clone()),
            Some(Some(target)) => {
                warn!(header = %header, target = %target, "proposal names unknown canonical field, dropped");
                None
            }
            _ => None,
        };
        mapping.entries.insert(header.clone(), target);
    }

    let unknown = proposal
        .keys()
        .filter(|h| !headers.contains(h))
        .count();
    if unknown > 0 {
        warn!(count = unknown, "proposal referenced headers the sheet does not have");
    }

    mapping
}

const SYSTEM_PROMPT: &str = "You map spreadsheet column headers onto a fixed \
shipping schema. Reply with a single JSON object: each key is one of the \
given headers, each value is a canonical field name from the list or null \
when no field fits. No prose.";

/// Ask the extraction model for a mapping proposal and sanitize it.
/// Any failure here is reported to the caller, who simply stays in
/// dictionary/manual mapping mode; pipeline state is untouched.
pub async fn propose_mapping(
    client: &dyn ExtractionClient,
    config: &ExtractionConfig,
    sheet: &SheetTable,
) -> Result<HeaderMapping> {
    let sample = sheet
        .rows
        .first()
        .map(|row| {
            row.columns
                .iter()
                .map(|(header, value)| format!("{}: {}", header, value.as_text()))
                .collect::<Vec<_>>()
                .join("\n")
        })
        .unwrap_or_default();

    let user = format!(
        "Canonical fields:\n{}\n\nHeaders:\n{}\n\nFirst data row:\n{}",
        fields::ALL_FIELDS.join(", "),
        sheet.headers.join("\n"),
        sample
    );

    let response = client.generate(config, SYSTEM_PROMPT, &user).await?;
    let proposal = parse_proposal_text(&response)?;
    Ok(sanitize_proposal(&proposal, &sheet.headers))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fields::{CITY, POSTAL_CODE};

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_fenced_json() {
        let text = "Here is the mapping:\n```json\n{\"Zip\": \"PostalCode\", \"Memo\": null}\n```\nDone.";
        let proposal = parse_proposal_text(text).unwrap();
        assert_eq!(proposal["Zip"], Some("PostalCode".to_string()));
        assert_eq!(proposal["Memo"], None);
    }

    #[test]
    fn test_parse_bare_json() {
        let proposal = parse_proposal_text("{\"Town\": \"City\"}").unwrap();
        assert_eq!(proposal["Town"], Some("City".to_string()));
    }

    #[test]
    fn test_parse_rejects_non_json() {
        assert!(matches!(
            parse_proposal_text("I could not find any columns."),
            Err(AppError::LLMError(_))
        ));
    }

    struct CannedClient(String);

    #[async_trait::async_trait]
    impl ExtractionClient for CannedClient {
        async fn generate(
            &self,
            _config: &ExtractionConfig,
            _system: &str,
            _user: &str,
        ) -> Result<String> {
            Ok(self.0.clone())
        }
    }

    #[tokio::test]
    async fn test_propose_mapping_sanitizes_model_output() {
        let sheet = SheetTable {
            name: "Orders".to_string(),
            headers: headers(&["Zip", "Memo"]),
            rows: vec![],
        };
        let client = CannedClient(
            "```json\n{\"Zip\": \"PostalCode\", \"Memo\": \"NotAField\"}\n```".to_string(),
        );
        let mapping = propose_mapping(&client, &ExtractionConfig::default(), &sheet)
            .await
            .unwrap();
        assert_eq!(mapping.source, MappingSource::AiProposal);
        assert_eq!(mapping.target_for("Zip"), Some(POSTAL_CODE));
        assert_eq!(mapping.target_for("Memo"), None);
    }

    #[test]
    fn test_sanitize_drops_unknown_targets_and_headers() {
        let mut proposal = HashMap::new();
        proposal.insert("Zip".to_string(), Some(POSTAL_CODE.to_string()));
        proposal.insert("Town".to_string(), Some("Municipality".to_string()));
        proposal.insert("Ghost".to_string(), Some(CITY.to_string()));

        let mapping = sanitize_proposal(&proposal, &headers(&["Zip", "Town", "Memo"]));
        assert_eq!(mapping.source, MappingSource::AiProposal);
        assert_eq!(mapping.target_for("Zip"), Some(POSTAL_CODE));
        // unknown canonical target cleared
        assert_eq!(mapping.target_for("Town"), None);
        // header not on the sheet dropped entirely
        assert!(!mapping.entries.contains_key("Ghost"));
        // sheet header the proposal skipped stays unmapped
        assert_eq!(mapping.target_for("Memo"), None);
    }
}
