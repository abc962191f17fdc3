use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikePayload {
    pub candidate_id: Uuid,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoritePayload {
    pub candidate_id: Uuid,
}

#[derive(Debug, Clone, Serialize)]
pub struct FavoriteResponse {
    pub is_favorited: bool,
}

// Note endpoints take snake_case keys, unlike like/views/favorite. The
// UI sends both shapes and each endpoint keeps the key casing its form
// already uses.
#[derive(Debug, Clone, Deserialize)]
pub struct FavoriteNotePayload {
    pub candidate_id: Uuid,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FavoriteNoteDeletePayload {
    pub candidate_id: Uuid,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewPayload {
    pub candidate_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn note_payloads_take_snake_case_keys() {
        let id = Uuid::new_v4();
        let upsert: FavoriteNotePayload =
            serde_json::from_value(json!({ "candidate_id": id, "note": "strong fit" }))
                .expect("snake_case note body");
        assert_eq!(upsert.candidate_id, id);
        assert_eq!(upsert.note.as_deref(), Some("strong fit"));

        let delete: FavoriteNoteDeletePayload =
            serde_json::from_value(json!({ "candidate_id": id })).expect("snake_case delete body");
        assert_eq!(delete.candidate_id, id);
    }

    #[test]
    fn like_and_views_take_camel_case_keys() {
        let id = Uuid::new_v4();
        let like: LikePayload =
            serde_json::from_value(json!({ "candidateId": id })).expect("camelCase like body");
        assert_eq!(like.candidate_id, id);
        assert!(serde_json::from_value::<LikePayload>(json!({ "candidate_id": id })).is_err());

        let view: ViewPayload =
            serde_json::from_value(json!({ "candidateId": id })).expect("camelCase view body");
        assert_eq!(view.candidate_id, Some(id));
    }
}
