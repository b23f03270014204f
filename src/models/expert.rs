use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expert {
    pub id: i64,
    pub name: String,
    pub specialty: String,
    pub region: String,
    pub rating: f64,
    pub review_count: u32,
    pub is_certified: bool,
    pub image_url: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExpert {
    pub name: String,
    pub specialty: String,
    pub region: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub review_count: u32,
    #[serde(default)]
    pub is_certified: bool,
    pub image_url: Option<String>,
}
