use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use storage::models::AgeCategory;

pub const FORMAT_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanonicalFormat {
    pub format_version: String,
    pub source: SourceMetadata,
    #[serde(default)]
    pub rulesets: Vec<RulesetData>,
    #[serde(default)]
    pub clubs: Vec<ClubData>,
    #[serde(default)]
    pub athletes: Vec<AthleteData>,
}

impl CanonicalFormat {
    /// The ruleset the import will leave active: the last one flagged.
    pub fn active_ruleset(&self) -> Option<&RulesetData> {
        self.rulesets.iter().rev().find(|r| r.activate)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    #[serde(rename = "type")]
    pub r#type: SourceType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub extracted_at: DateTime<Utc>,
    pub extractor: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_filename: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Federation,
    Csv,
    Spreadsheet,
    Manual,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RulesetData {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub activate: bool,
    /// Priority order: the first matching category wins.
    pub categories: Vec<AgeCategory>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClubData {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AthleteData {
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
    /// Lenient: `M`, `male`, `F`, `women`, ...
    pub gender: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<String>,
    /// Club name, declared in `clubs` or already stored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub club: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nationality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_number: Option<String>,
}

impl AthleteData {
    pub fn label(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
