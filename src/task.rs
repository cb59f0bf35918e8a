use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Task {
    pub id: i64,
    #[serde(rename = "task")]
    pub description: String,
    pub deadline: NaiveDate, // stored as YYYY-MM-DD
}
