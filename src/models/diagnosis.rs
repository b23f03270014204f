use serde::{Deserialize, Serialize};

/// A customer's electrical-issue report and where it sits in the lifecycle.
///
/// `status` is kept as a raw string: the override path stores whatever the
/// caller sends, so values outside `DiagnosisStatus` can be persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnosis {
    pub id: i64,
    pub name: Option<String>,
    pub contact: Option<String>,
    #[serde(rename = "imageUrl")]
    pub image_urls: Vec<String>,
    pub symptoms: Option<String>,
    pub description: Option<String>,
    pub ai_analysis: Option<String>,
    pub risk_score: i32,
    pub status: String,
    pub expert_comment: Option<String>,
    pub estimated_cost: Option<i64>,
    pub created_at: String,
}

/// Validated submission, ready for the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDiagnosis {
    pub name: String,
    pub contact: String,
    pub symptoms: String,
    pub description: String,
    #[serde(rename = "imageUrl", default)]
    pub image_urls: Vec<String>,
}

/// Key the tracking lookup matches on: the contact's digits, so
/// `010-1111-2222` and `01011112222` find the same rows. Contacts without
/// digits (an email address, say) key on their trimmed lowercase text.
pub fn contact_key(contact: &str) -> String {
    let digits: String = contact.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        contact.trim().to_lowercase()
    } else {
        digits
    }
}
