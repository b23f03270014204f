use serde::{Deserialize, Serialize};

use super::enums::ReservationStatus;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: i64,
    pub expert_id: i64,
    pub user_id: Option<i64>,
    pub reservation_date: String,
    pub description: String,
    pub diagnosis_id: Option<i64>,
    pub status: ReservationStatus,
    pub confirmed_date: Option<String>,
    pub estimated_cost: Option<i64>,
    pub expert_note: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReservation {
    pub expert_id: i64,
    pub user_id: Option<i64>,
    pub reservation_date: String,
    #[serde(default)]
    pub description: String,
    pub diagnosis_id: Option<i64>,
}

/// Fields an expert supplies when confirming a visit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationConfirmation {
    pub estimated_cost: Option<i64>,
    pub expert_note: Option<String>,
    pub confirmed_date: Option<String>,
}
