//! Structured extraction output.

use serde::{Deserialize, Serialize};

/// Structured requirements extracted from a job description.
///
/// Every field is a well-formed (possibly empty) collection; consumers never
/// see missing arrays.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    pub technical_skills: Vec<String>,
    pub soft_skills: Vec<String>,
    pub experience_range: String,
    pub education_level: String,
    pub responsibilities: Vec<String>,
    pub benefits: Vec<String>,
    pub company: CompanyInfo,
}

/// Company details, best-effort.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

impl ExtractionResult {
    /// Warn-only quality flags: fields a useful extraction should have
    /// filled. An incomplete result is still forwarded.
    pub fn quality_warnings(&self) -> Vec<&'static str> {
        let mut warnings = Vec::new();
        if self.technical_skills.is_empty() {
            warnings.push("technicalSkills is empty");
        }
        if self.responsibilities.is_empty() {
            warnings.push("responsibilities is empty");
        }
        warnings
    }
}
