use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Review status of an adoption or foster request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestStatus::Pending => write!(f, "Pending review"),
            RequestStatus::Approved => write!(f, "Approved"),
            RequestStatus::Rejected => write!(f, "Rejected"),
            RequestStatus::Cancelled => write!(f, "Cancelled"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdoptionRequest {
    pub id: i64,
    pub animal_id: i64,
    #[serde(default)]
    pub animal_name: Option<String>,
    pub status: RequestStatus,
    #[serde(default)]
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Body for submitting a new adoption request.
#[derive(Debug, Clone, Serialize)]
pub struct NewAdoptionRequest {
    pub animal_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Temporary-foster request. Dates are plain `YYYY-MM-DD` strings as the
/// backend sends them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FosterRequest {
    pub id: i64,
    pub animal_id: i64,
    #[serde(default)]
    pub animal_name: Option<String>,
    pub status: RequestStatus,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewFosterRequest {
    pub animal_id: i64,
    pub start_date: String,
    pub end_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
