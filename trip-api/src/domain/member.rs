use serde::{Deserialize, Serialize};

/// A user the owner shared the trip with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripMember {
    pub id: i64,
    pub trip_id: i64,
    pub user_id: i64,
    pub role: String,
}

/// Body of `POST /trips/{id}/members`. Posting a user who is already a
/// member changes their role.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberUpsert {
    pub user_id: i64,
    pub role: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_member_list() {
        let raw = r#"[{ "id": 5, "trip_id": 3, "user_id": 9, "role": "editor" }]"#;
        let members: Vec<TripMember> = serde_json::from_str(raw).unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].user_id, 9);
        assert_eq!(members[0].role, "editor");
    }
}
