use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A row of the `operations` table written by the licensing client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OperationRecord {
    /// Formatted `yyyy/MM/dd hh:mm -tt`
    #[serde(rename = "Time", default)]
    pub time: Option<String>,
    #[serde(rename = "Status", default)]
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl OperationRecord {
    pub fn at(time: &str) -> Self {
        Self {
            time: Some(time.to_string()),
            ..Default::default()
        }
    }

    pub fn with_status(mut self, status: &str) -> Self {
        self.status = Some(status.to_string());
        self
    }
}

/// One bar of the monthly operations chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyCount {
    /// `YYYY-MM`
    pub key: String,
    /// Short month name
    pub name: String,
    pub value: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OperationSummary {
    pub total: u64,
    pub successful: u64,
    pub failed: u64,
}

#[derive(Debug, Serialize)]
pub struct MonthlyOperationsResponse {
    pub title: String,
    pub series: Vec<MonthlyCount>,
    /// Localized "no data" text, set when the series is empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_message: Option<String>,
}
