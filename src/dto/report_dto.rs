use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateReportPayload {
    pub candidate_id: Uuid,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateReportStatusPayload {
    pub status: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportListQuery {
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn report_payload_takes_snake_case_keys() {
        let id = Uuid::new_v4();
        let payload: CreateReportPayload =
            serde_json::from_value(json!({ "candidate_id": id, "reason": "spam" }))
                .expect("snake_case report body");
        assert_eq!(payload.candidate_id, id);
        assert_eq!(payload.reason.as_deref(), Some("spam"));
    }
}
