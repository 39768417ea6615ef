#![forbid(unsafe_code)]

use poem::Request;
use poem_openapi::{ OpenApi, payload::Json, Object, param::Path, ApiResponse };
use log::info;

use crate::utils::roster::RosterStore;
use crate::utils::srv_utils::{self, RequestDebug};

// ***************************************************************************
//                          Request/Response Definiions
// ***************************************************************************
pub struct GetFriendApi {
    store: RosterStore,
}

impl GetFriendApi {
    pub fn new(store: RosterStore) -> Self {
        Self {store}
    }
}

// ***************************************************************************
//                          Request/Response Definiions
// ***************************************************************************
#[derive(Object)]
struct ReqGetFriend
{
    handle: String,
}

#[derive(Object, Debug)]
pub struct RespGetFriend
{
    name: String,
    handle: String,
    skill: String,
}

// Implement the debug record trait for logging.
impl RequestDebug for ReqGetFriend {
    type Req = ReqGetFriend;
    fn get_request_info(&self) -> String {
        let mut s = String::with_capacity(255);
        s.push_str("  Request parameters:");
        s.push_str("\n    handle: ");
        s.push_str(&self.handle);
        s
    }
}

// ------------------- HTTP Status Codes -------------------
#[derive(Debug, ApiResponse)]
enum FriendsResponse {
    #[oai(status = 200)]
    Http200(Json<RespGetFriend>),
    /// The handle matches no roster record.  The body is empty.
    #[oai(status = 404)]
    Http404,
}

fn make_http_200(resp: RespGetFriend) -> FriendsResponse {
    FriendsResponse::Http200(Json(resp))
}
fn make_http_404() -> FriendsResponse {
    FriendsResponse::Http404
}

// ***************************************************************************
//                             OpenAPI Endpoint
// ***************************************************************************
#[OpenApi]
impl GetFriendApi {
    #[oai(path = "/api/friends/:handle", method = "get")]
    async fn get_friend(&self, http_req: &Request, handle: Path<String>) -> FriendsResponse {
        // Package the request parameters.
        let req = ReqGetFriend {handle: handle.to_string()};

        // -------------------- Process Request ----------------------
        RespGetFriend::process(http_req, &req, &self.store)
    }
}

// ***************************************************************************
//                          Request/Response Methods
// ***************************************************************************
impl RespGetFriend {
    /// Create a new response.
    fn new(name: String, handle: String, skill: String) -> Self {
        Self {name, handle, skill}
    }

    /// Process the request.  The first record whose handle matches wins;
    /// anything else is a 404 with no body.
    fn process(http_req: &Request, req: &ReqGetFriend, store: &RosterStore) -> FriendsResponse {
        // Conditional logging depending on log level.
        srv_utils::debug_request(http_req, req);

        match store.find_by_handle(&req.handle) {
            Some(friend) => make_http_200(Self::new(friend.name, friend.handle, friend.skill)),
            None => {
                info!("Friend '{}' NOT FOUND.", req.handle);
                make_http_404()
            },
        }
    }
}

// ***************************************************************************
//                                  Tests
// ***************************************************************************
#[cfg(test)]
mod tests {
    use poem::http::StatusCode;
    use poem::test::TestClient;
    use serde_json::json;

    use crate::build_app;
    use crate::utils::roster::{Friend, RosterStore};

    fn store_with_twins() -> RosterStore {
        RosterStore::with_friends(vec![
            Friend::new("Rick", "rick", "portal gun"),
            Friend::new("Evil Rick", "rick", "scanning memories"),
            Friend::new("Morty", "morty", "running"),
        ])
    }

    #[tokio::test]
    async fn known_handle_returns_the_record() {
        let cli = TestClient::new(build_app(store_with_twins()));

        let resp = cli.get("/api/friends/morty").send().await;
        resp.assert_status(StatusCode::OK);
        resp.assert_json(json!({"name": "Morty", "handle": "morty", "skill": "running"}))
            .await;
    }

    #[tokio::test]
    async fn duplicate_handle_returns_the_first_record() {
        let cli = TestClient::new(build_app(store_with_twins()));

        let resp = cli.get("/api/friends/rick").send().await;
        resp.assert_status(StatusCode::OK);
        resp.assert_json(json!({"name": "Rick", "handle": "rick", "skill": "portal gun"}))
            .await;
    }

    #[tokio::test]
    async fn unknown_handle_returns_404_with_empty_body() {
        let cli = TestClient::new(build_app(store_with_twins()));

        let resp = cli.get("/api/friends/birdperson").send().await;
        resp.assert_status(StatusCode::NOT_FOUND);
        resp.assert_text("").await;
    }
}
