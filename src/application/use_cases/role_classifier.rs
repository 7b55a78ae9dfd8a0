//! Column role classification for template metadata sheets.
//!
//! Marketplace template exports ship an auxiliary metadata table (one row
//! per field, one column per attribute) whose column headers vary per
//! source. This module resolves which column plays which semantic role:
//! - code / description / example: substring keyword match
//! - requirement: a three-stage cascade (semantic header match, then
//!   value-distribution scoring, then positional fallback)
//!
//! The scoring stage exists because requirement columns have a small,
//! recognizable value alphabet ("Required"/"Optional"/...) even when the
//! header itself is unlabeled or mislabeled.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::domain::{RawRow, Requirement};

/// Rows sampled per header during value-distribution scoring.
const MAX_SCORING_ROWS: usize = 50;

const CODE_KEYWORDS: &[&str] = &["code", "field", "attribute", "key"];
const DESCRIPTION_KEYWORDS: &[&str] = &["description", "definition", "details", "notes"];
const EXAMPLE_KEYWORDS: &[&str] = &["example", "sample", "e.g"];

/// Headers that must never claim the code role even when they contain a
/// code keyword ("field description" contains "field").
const CODE_REJECT_KEYWORDS: &[&str] = &["description", "definition", "example", "sample"];

const REQUIREMENT_KEYWORDS: &[&str] = &["mandatory", "required", "usage", "requirement"];

/// Exact tokens worth 2 points during value scoring.
const STRONG_TOKENS: &[&str] = &["required", "mandatory", "optional", "recommended"];

/// How the requirement column was located.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequirementMatch {
    /// Header itself names the concept.
    Semantic,
    /// Chosen by sampled value distribution.
    ValueDistribution,
    /// Nothing scored; last column taken as a best-effort guess.
    Positional,
}

#[derive(Debug, Clone)]
pub struct RequirementColumn {
    pub header: String,
    pub resolved_by: RequirementMatch,
}

/// Resolved roles for one metadata table.
#[derive(Debug, Clone)]
pub struct ColumnRoles {
    pub code: Option<String>,
    pub description: Option<String>,
    pub example: Option<String>,
    pub requirement: Option<RequirementColumn>,
}

pub struct RoleClassifier {
    headers: Vec<String>,
    rows: Vec<RawRow>,
}

impl RoleClassifier {
    pub fn new(headers: Vec<String>, rows: Vec<RawRow>) -> Self {
        Self { headers, rows }
    }

    /// Resolve all four roles for the table.
    pub fn classify(&self) -> ColumnRoles {
        let code = self.find_by_keywords(CODE_KEYWORDS, CODE_REJECT_KEYWORDS);
        let description = self.find_by_keywords(DESCRIPTION_KEYWORDS, &[]);
        let example = self.find_by_keywords(EXAMPLE_KEYWORDS, &[]);

        let mut claimed: HashSet<&String> = HashSet::new();
        claimed.extend(code.iter());
        claimed.extend(description.iter());
        claimed.extend(example.iter());

        let requirement = self.resolve_requirement(&claimed);

        ColumnRoles {
            code,
            description,
            example,
            requirement,
        }
    }

    /// Look up the requirement token for a field code and classify it.
    /// Fields absent from the metadata table default to optional.
    pub fn requirement_for(&self, roles: &ColumnRoles, code: &str) -> Requirement {
        let (code_col, req_col) = match (&roles.code, &roles.requirement) {
            (Some(c), Some(r)) => (c, &r.header),
            _ => return Requirement::Optional,
        };

        let wanted = code.trim().to_lowercase();
        for row in &self.rows {
            let row_code = row
                .get(code_col)
                .map(|v| v.as_text().to_lowercase())
                .unwrap_or_default();
            if row_code == wanted {
                let token = row.get(req_col).map(|v| v.as_text()).unwrap_or_default();
                return Requirement::from_token(&token);
            }
        }
        Requirement::Optional
    }

    /// First header containing any keyword and none of the reject terms.
    fn find_by_keywords(&self, keywords: &[&str], reject: &[&str]) -> Option<String> {
        self.headers
            .iter()
            .find(|header| {
                let h = header.to_lowercase();
                keywords.iter().any(|k| h.contains(k))
                    && !reject.iter().any(|r| h.contains(r))
            })
            .cloned()
    }

    /// Requirement cascade: semantic -> value scoring -> positional.
    fn resolve_requirement(&self, claimed: &HashSet<&String>) -> Option<RequirementColumn> {
        if self.headers.is_empty() {
            return None;
        }

        if let Some(col) = self.try_semantic_match() {
            return Some(col);
        }
        if let Some(col) = self.try_value_scoring(claimed) {
            return Some(col);
        }
        self.positional_fallback()
    }

    /// Stage (a): any header naming the concept wins outright.
    fn try_semantic_match(&self) -> Option<RequirementColumn> {
        self.headers
            .iter()
            .find(|header| {
                let h = header.to_lowercase();
                REQUIREMENT_KEYWORDS.iter().any(|k| h.contains(k))
            })
            .map(|header| RequirementColumn {
                header: header.clone(),
                resolved_by: RequirementMatch::Semantic,
            })
    }

    /// Stage (b): score unclaimed headers by their sampled value alphabet.
    /// 2 points per exact strong-token match, 1 point for a weak signal.
    /// Highest positive score wins; ties keep the first encountered.
    fn try_value_scoring(&self, claimed: &HashSet<&String>) -> Option<RequirementColumn> {
        let mut best: Option<(&String, u32)> = None;

        for header in &self.headers {
            if claimed.contains(header) {
                continue;
            }
            let score = self.score_header(header);
            debug!(header = %header, score, "requirement column value score");
            if score > 0 && best.map_or(true, |(_, s)| score > s) {
                best = Some((header, score));
            }
        }

        best.map(|(header, _)| RequirementColumn {
            header: header.clone(),
            resolved_by: RequirementMatch::ValueDistribution,
        })
    }

    fn score_header(&self, header: &str) -> u32 {
        let mut score = 0u32;
        for row in self.rows.iter().take(MAX_SCORING_ROWS) {
            let value = match row.get(header) {
                Some(v) if !v.is_empty() => v.as_text().to_lowercase(),
                _ => continue,
            };
            if STRONG_TOKENS.contains(&value.as_str()) {
                score += 2;
            } else if value.contains("required")
                || value.contains("mandatory")
                || matches!(value.as_str(), "yes" | "y" | "r")
            {
                score += 1;
            }
        }
        score
    }

    /// Stage (c): best-effort guess, must stay observable in the logs.
    fn positional_fallback(&self) -> Option<RequirementColumn> {
        let header = self.headers.last()?.clone();
        warn!(
            header = %header,
            "no requirement column matched by name or values; falling back to last column"
        );
        Some(RequirementColumn {
            header,
            resolved_by: RequirementMatch::Positional,
        })
    }
}
