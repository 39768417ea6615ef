#![forbid(unsafe_code)]

use poem::Request;
use poem_openapi::{ OpenApi, payload::Json, Object, param::Path, ApiResponse };
use log::info;

use crate::utils::roster::{Friend, RosterStore};
use crate::utils::srv_utils::{self, has_value, RequestDebug};

// ***************************************************************************
//                          Request/Response Definiions
// ***************************************************************************
pub struct UpdateFriendApi {
    store: RosterStore,
}

impl UpdateFriendApi {
    pub fn new(store: RosterStore) -> Self {
        Self {store}
    }
}

// ***************************************************************************
//                          Request/Response Definiions
// ***************************************************************************
// The replacement record.  All fields are declared optional so that
// validation happens here rather than in the payload parser.
#[derive(Object)]
pub struct ReqUpdateFriend
{
    name: Option<String>,
    handle: Option<String>,
    skill: Option<String>,
}

// Implement the debug record trait for logging.
impl RequestDebug for ReqUpdateFriend {
    type Req = ReqUpdateFriend;
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
impl UpdateFriendApi {
    #[oai(path = "/api/friends/:handle", method = "put")]
    async fn update_friend(&self, http_req: &Request, handle: Path<String>,
                           req: Json<ReqUpdateFriend>) -> FriendsResponse {
        FriendsResponse::process(http_req, &handle, &req, &self.store)
    }
}

// ***************************************************************************
//                          Request/Response Methods
// ***************************************************************************
impl ReqUpdateFriend {
    /// Build the replacement record, or return None when any field is
    /// missing or empty.
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
    /// Process the request.  The record addressed by the path handle is
    /// replaced wholesale with the body, which may carry a different
    /// handle and thereby rename the record in place.
    fn process(http_req: &Request, path_handle: &str, req: &ReqUpdateFriend,
               store: &RosterStore) -> FriendsResponse {
        // Conditional logging depending on log level.
        srv_utils::debug_request(http_req, req);

        // -------------------- Validate Fields ------------------------
        // Validation runs before the existence check, so an incomplete
        // body yields 422 even when the handle matches nothing.
        let friend = match req.to_friend() {
            Some(f) => f,
            None => return make_http_422(),
        };

        // -------------------- Replace Record -------------------------
        let index = match store.find_index_by_handle(path_handle) {
            Some(i) => i,
            None => {
                info!("Friend '{}' NOT FOUND - nothing replaced.", path_handle);
                return make_http_404();
            },
        };
        if store.replace_at(index, friend) {
            info!("Friend '{}' replaced.", path_handle);
            make_http_202()
        } else {
            // The record vanished between the lookup and the write.
            info!("Friend '{}' NOT FOUND - nothing replaced.", path_handle);
            make_http_404()
        }
    }
}
