#![forbid(unsafe_code)]

use poem::Request;
use poem_openapi::{ OpenApi, payload::Json, Object, ApiResponse };
use log::info;

use crate::utils::roster::{Friend, RosterStore};
use crate::utils::srv_utils::{self, has_value, RequestDebug};

// ***************************************************************************
//                          Request/Response Definiions
// ***************************************************************************
pub struct CreateFriendApi {
    store: RosterStore,
}

impl CreateFriendApi {
    pub fn new(store: RosterStore) -> Self {
        Self {store}
    }
}

// ***************************************************************************
//                          Request/Response Definiions
// ***************************************************************************
// All fields are declared optional so that validation happens here rather
// than in the payload parser.  A missing field and an empty string are
// rejected the same way.
#[derive(Object)]
pub struct ReqCreateFriend
{
    name: Option<String>,
    handle: Option<String>,
    skill: Option<String>,
}

// Implement the debug record trait for logging.
impl RequestDebug for ReqCreateFriend {
    type Req = ReqCreateFriend;
    fn get_request_info(&self) -> String {
        // Get optional values in displayable form.
        let name = format!("{:#?}", &self.name);
        let handle = format!("{:#?}", &self.handle);
        let skill = format!("{:#?}", &self.skill);

        let mut s = String::with_capacity(255);
        s.push_str("  Request body:");
        s.push_str("\n    name: ");
        s.push_str(name.as_str());
        s.push_str("\n    handle: ");
        s.push_str(handle.as_str());
        s.push_str("\n    skill: ");
        s.push_str(skill.as_str());
        s
    }
}

// ------------------- HTTP Status Codes -------------------
// Success and failure are conveyed by status code alone; both bodies are
// empty.
#[derive(Debug, ApiResponse)]
enum FriendsResponse {
    #[oai(status = 201)]
    Http201,
    #[oai(status = 422)]
    Http422,
}

fn make_http_201() -> FriendsResponse {
    FriendsResponse::Http201
}
fn make_http_422() -> FriendsResponse {
    FriendsResponse::Http422
}

// ***************************************************************************
//                             OpenAPI Endpoint
// ***************************************************************************
#[OpenApi]
impl CreateFriendApi {
    #[oai(path = "/api/friends", method = "post")]
    async fn create_friend(&self, http_req: &Request, req: Json<ReqCreateFriend>) -> FriendsResponse {
        FriendsResponse::process(http_req, &req, &self.store)
    }
}

// ***************************************************************************
//                          Request/Response Methods
// ***************************************************************************
impl ReqCreateFriend {
    /// Build the roster record, or return None when any field is missing
    /// or empty.
    fn to_friend(&self) -> Option<Friend> {
        if !has_value(&self.name) || !has_value(&self.handle) || !has_value(&self.skill) {
            return None;
        }
        Some(Friend::new(
            self.name.as_deref().unwrap_or_default(),
            self.handle.as_deref().unwrap_or_default(),
            self.skill.as_deref().unwrap_or_default(),
        ))
    }
}

impl FriendsResponse {
    /// Process the request.
    fn process(http_req: &Request, req: &ReqCreateFriend, store: &RosterStore) -> FriendsResponse {
        // Conditional logging depending on log level.
        srv_utils::debug_request(http_req, req);

        // -------------------- Validate Fields ------------------------
        // The complete record is required.  Nothing is stored on failure.
        let friend = match req.to_friend() {
            Some(f) => f,
            None => return make_http_422(),
        };

        // -------------------- Append Record --------------------------
        // New records always go to the end; existing records never move.
        info!("Adding friend '{}' with handle '{}'.", friend.name, friend.handle);
        store.append(friend);
        make_http_201()
    }
}

// ***************************************************************************
//                                  Tests
// ***************************************************************************
#[cfg(test)]
mod tests {
    use poem::http::StatusCode;
    use poem::test::TestClient;

    use crate::build_app;
    use crate::utils::roster::{Friend, RosterStore};

    fn seed_store() -> RosterStore {
        RosterStore::with_friends(vec![Friend::new("Rick", "rick", "portal gun")])
    }

    #[tokio::test]
    async fn json_body_creates_a_friend_at_the_end() {
        let store = seed_store();
        let cli = TestClient::new(build_app(store.clone()));

        let resp = cli
            .post("/api/friends")
            .header("Content-Type", "application/json")
            .body(r#"{"name":"Birdperson","handle":"birdperson","skill":"flight"}"#)
            .send()
            .await;
        resp.assert_status(StatusCode::CREATED);
        resp.assert_text("").await;

        assert_eq!(store.len(), 2);
        assert_eq!(store.find_index_by_handle("birdperson"), Some(1));
    }

    #[tokio::test]
    async fn url_encoded_body_creates_a_friend() {
        let store = seed_store();
        let cli = TestClient::new(build_app(store.clone()));

        let resp = cli
            .post("/api/friends")
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body("name=Squanchy&handle=squanchy&skill=squanching")
            .send()
            .await;
        resp.assert_status(StatusCode::CREATED);

        let friend = store.find_by_handle("squanchy").unwrap();
        assert_eq!(friend.name, "Squanchy");
        assert_eq!(friend.skill, "squanching");
    }

    #[tokio::test]
    async fn missing_field_is_rejected_with_422() {
        let store = seed_store();
        let cli = TestClient::new(build_app(store.clone()));

        let resp = cli
            .post("/api/friends")
            .header("Content-Type", "application/json")
            .body(r#"{"name":"Birdperson","handle":"birdperson"}"#)
            .send()
            .await;
        resp.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        resp.assert_text("").await;

        // Nothing was stored.
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn empty_field_is_rejected_with_422() {
        let store = seed_store();
        let cli = TestClient::new(build_app(store.clone()));

        let resp = cli
            .post("/api/friends")
            .header("Content-Type", "application/json")
            .body(r#"{"name":"Birdperson","handle":"birdperson","skill":""}"#)
            .send()
            .await;
        resp.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn duplicate_handle_is_accepted() {
        let store = seed_store();
        let cli = TestClient::new(build_app(store.clone()));

        let resp = cli
            .post("/api/friends")
            .header("Content-Type", "application/json")
            .body(r#"{"name":"Tiny Rick","handle":"rick","skill":"being young"}"#)
            .send()
            .await;
        resp.assert_status(StatusCode::CREATED);

        // Both records exist and lookups still find the original.
        assert_eq!(store.len(), 2);
        assert_eq!(store.find_by_handle("rick").unwrap().name, "Rick");
    }
}
