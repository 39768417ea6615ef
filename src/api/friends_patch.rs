#![forbid(unsafe_code)]

use poem::Request;
use poem_openapi::{ OpenApi, payload::Json, Object, param::Path, ApiResponse };
use log::info;

use crate::utils::roster::{FriendPatch, RosterStore};
use crate::utils::srv_utils::{self, RequestDebug};

// ***************************************************************************
//                          Request/Response Definiions
// ***************************************************************************
pub struct PatchFriendApi {
    store: RosterStore,
}

impl PatchFriendApi {
    pub fn new(store: RosterStore) -> Self {
        Self {store}
    }
}

// ***************************************************************************
//                          Request/Response Definiions
// ***************************************************************************
// Any subset of the record's fields.  An empty string counts the same as
// an absent field and never overwrites a stored value.
#[derive(Object)]
pub struct ReqPatchFriend
{
    name: Option<String>,
    handle: Option<String>,
    skill: Option<String>,
}

// Implement the debug record trait for logging.
impl RequestDebug for ReqPatchFriend {
    type Req = ReqPatchFriend;
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
// All outcomes are conveyed by status code alone with empty bodies.
#[derive(Debug, ApiResponse)]
enum FriendsResponse {
    #[oai(status = 202)]
    Http202,
    #[oai(status = 404)]
    Http404,
    #[oai(status = 422)]
    Http422,
}

fn make_http_202() -> FriendsResponse {
    FriendsResponse::Http202
}
fn make_http_404() -> FriendsResponse {
    FriendsResponse::Http404
}
fn make_http_422() -> FriendsResponse {
    FriendsResponse::Http422
}

// ***************************************************************************
//                             OpenAPI Endpoint
// ***************************************************************************
#[OpenApi]
impl PatchFriendApi {
    #[oai(path = "/api/friends/:handle", method = "patch")]
    async fn patch_friend(&self, http_req: &Request, handle: Path<String>,
                          req: Json<ReqPatchFriend>) -> FriendsResponse {
        FriendsResponse::process(http_req, &handle, &req, &self.store)
    }
}

// ***************************************************************************
//                          Request/Response Methods
// ***************************************************************************
impl ReqPatchFriend {
    /// Reduce the body to the fields that actually carry a value.
    fn to_patch(&self) -> FriendPatch {
        FriendPatch {
            name: self.name.clone().filter(|s| !s.is_empty()),
            handle: self.handle.clone().filter(|s| !s.is_empty()),
            skill: self.skill.clone().filter(|s| !s.is_empty()),
        }
    }
}

impl FriendsResponse {
    /// Process the request.  Only the fields present in the body overwrite
    /// the stored record; everything else is left alone.
    fn process(http_req: &Request, path_handle: &str, req: &ReqPatchFriend,
               store: &RosterStore) -> FriendsResponse {
        // Conditional logging depending on log level.
        srv_utils::debug_request(http_req, req);

        // -------------------- Validate Fields ------------------------
        // A body with nothing to apply is rejected before the handle is
        // looked up, so unknown handles also get 422 here.
        let patch = req.to_patch();
        if patch.is_empty() {
            return make_http_422();
        }

        // -------------------- Merge Record ---------------------------
        let index = match store.find_index_by_handle(path_handle) {
            Some(i) => i,
            None => {
                info!("Friend '{}' NOT FOUND - nothing merged.", path_handle);
                return make_http_404();
            },
        };
        if store.merge_at(index, &patch) {
            info!("Friend '{}' updated.", path_handle);
            make_http_202()
        } else {
            // The record vanished between the lookup and the write.
            info!("Friend '{}' NOT FOUND - nothing merged.", path_handle);
            make_http_404()
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

    use crate::build_app;
    use crate::utils::roster::{Friend, RosterStore};

    fn seed_store() -> RosterStore {
        RosterStore::with_friends(vec![
            Friend::new("Rick", "rick", "portal gun"),
            Friend::new("Morty", "morty", "running"),
        ])
    }

    #[tokio::test]
    async fn single_field_patch_leaves_the_rest_alone() {
        let store = seed_store();
        let cli = TestClient::new(build_app(store.clone()));

        let resp = cli
            .patch("/api/friends/morty")
            .header("Content-Type", "application/json")
            .body(r#"{"skill":"true level"}"#)
            .send()
            .await;
        resp.assert_status(StatusCode::ACCEPTED);
        resp.assert_text("").await;

        let friend = store.find_by_handle("morty").unwrap();
        assert_eq!(friend.name, "Morty");
        assert_eq!(friend.skill, "true level");
    }

    #[tokio::test]
    async fn patch_can_rename_the_handle() {
        let store = seed_store();
        let cli = TestClient::new(build_app(store.clone()));

        let resp = cli
            .patch("/api/friends/rick")
            .header("Content-Type", "application/json")
            .body(r#"{"handle":"rick-c137"}"#)
            .send()
            .await;
        resp.assert_status(StatusCode::ACCEPTED);

        assert!(store.find_by_handle("rick").is_none());
        assert_eq!(store.find_by_handle("rick-c137").unwrap().name, "Rick");
    }

    #[tokio::test]
    async fn body_without_fields_is_422_even_for_known_handles() {
        let store = seed_store();
        let cli = TestClient::new(build_app(store.clone()));

        let resp = cli
            .patch("/api/friends/rick")
            .header("Content-Type", "application/json")
            .body(r#"{}"#)
            .send()
            .await;
        resp.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn body_without_fields_beats_unknown_handle() {
        let store = seed_store();
        let cli = TestClient::new(build_app(store.clone()));

        // The field check fires before the existence check.
        let resp = cli
            .patch("/api/friends/birdperson")
            .header("Content-Type", "application/json")
            .body(r#"{}"#)
            .send()
            .await;
        resp.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn patch_with_fields_and_unknown_handle_is_404() {
        let store = seed_store();
        let cli = TestClient::new(build_app(store.clone()));

        let resp = cli
            .patch("/api/friends/birdperson")
            .header("Content-Type", "application/json")
            .body(r#"{"skill":"flight"}"#)
            .send()
            .await;
        resp.assert_status(StatusCode::NOT_FOUND);
        resp.assert_text("").await;
    }

    #[tokio::test]
    async fn empty_string_fields_do_not_overwrite() {
        let store = seed_store();
        let cli = TestClient::new(build_app(store.clone()));

        let resp = cli
            .patch("/api/friends/rick")
            .header("Content-Type", "application/json")
            .body(r#"{"name":"","skill":"interdimensional cable"}"#)
            .send()
            .await;
        resp.assert_status(StatusCode::ACCEPTED);

        let friend = store.find_by_handle("rick").unwrap();
        assert_eq!(friend.name, "Rick");
        assert_eq!(friend.skill, "interdimensional cable");
    }

    #[tokio::test]
    async fn all_empty_strings_count_as_no_fields() {
        let store = seed_store();
        let cli = TestClient::new(build_app(store.clone()));

        let resp = cli
            .patch("/api/friends/rick")
            .header("Content-Type", "application/json")
            .body(r#"{"name":"","handle":"","skill":""}"#)
            .send()
            .await;
        resp.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }
}
