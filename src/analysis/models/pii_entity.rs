//! PII entity data models

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Category tag attached to a detected entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PiiLabel {
    /// Email addresses
    Email,
    /// Telephone numbers
    Phone,
    /// US Social Security Numbers
    Ssn,
    /// Payment card numbers
    CreditCard,
    /// Web URLs
    Url,
    /// Person names
    Person,
    /// Companies, agencies, institutions
    Org,
    /// Countries, cities, states
    Gpe,
    /// Absolute or relative dates
    Date,
}

impl PiiLabel {
    /// Tag as it appears in reports and pattern libraries
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "EMAIL",
            Self::Phone => "PHONE",
            Self::Ssn => "SSN",
            Self::CreditCard => "CREDIT_CARD",
            Self::Url => "URL",
            Self::Person => "PERSON",
            Self::Org => "ORG",
            Self::Gpe => "GPE",
            Self::Date => "DATE",
        }
    }
}

impl fmt::Display for PiiLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PiiLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "EMAIL" => Ok(Self::Email),
            "PHONE" => Ok(Self::Phone),
            "SSN" => Ok(Self::Ssn),
            "CREDIT_CARD" | "CARD" => Ok(Self::CreditCard),
            "URL" => Ok(Self::Url),
            "PERSON" | "NAME" => Ok(Self::Person),
            "ORG" | "ORGANIZATION" => Ok(Self::Org),
            "GPE" | "LOCATION" => Ok(Self::Gpe),
            "DATE" => Ok(Self::Date),
            _ => Err(format!("Unknown PII label: {s}")),
        }
    }
}

/// Detection method used to identify PII
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DetectionMethod {
    /// Regex pattern matching
    Pattern,
    /// Statistical named-entity recognition
    StatisticalModel,
}

impl fmt::Display for DetectionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pattern => f.write_str("pattern"),
            Self::StatisticalModel => f.write_str("statistical-model"),
        }
    }
}

/// Detected PII entity
///
/// `start` and `end` are half-open character (not byte) offsets into the
/// exact text handed to the detector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PiiEntity {
    /// Matched substring
    pub text: String,
    /// Category of PII
    pub label: PiiLabel,
    /// Start character offset (inclusive)
    pub start: usize,
    /// End character offset (exclusive)
    pub end: usize,
    /// Detection method used
    pub method: DetectionMethod,
}

impl PiiEntity {
    /// Create a new PII entity
    pub fn new(
        text: impl Into<String>,
        label: PiiLabel,
        start: usize,
        end: usize,
        method: DetectionMethod,
    ) -> Self {
        Self {
            text: text.into(),
            label,
            start,
            end,
            method,
        }
    }

    /// Length of the span in characters
    pub fn char_len(&self) -> usize {
        self.end - self.start
    }

    /// Whether two spans share at least one character
    pub fn overlaps(&self, other: &PiiEntity) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Re-extract the span from the source text using character offsets
    pub fn span_in(&self, source: &str) -> String {
        source
            .chars()
            .skip(self.start)
            .take(self.end - self.start)
            .collect()
    }
}
