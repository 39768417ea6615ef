#![forbid(unsafe_code)]

use poem::Request;
use poem_openapi::{ OpenApi, Object, param::Path, ApiResponse };
use log::info;

use crate::utils::roster::RosterStore;
use crate::utils::srv_utils::{self, RequestDebug};

// ***************************************************************************
//                          Request/Response Definiions
// ***************************************************************************
pub struct DeleteFriendApi {
    store: RosterStore,
}

impl DeleteFriendApi {
    pub fn new(store: RosterStore) -> Self {
        Self {store}
    }
}

// ***************************************************************************
//                          Request/Response Definiions
// ***************************************************************************
#[derive(Object)]
struct ReqDeleteFriend
{
    handle: String,
}

// Implement the debug record trait for logging.
impl RequestDebug for ReqDeleteFriend {
    type Req = ReqDeleteFriend;
    fn get_request_info(&self) -> String {
        let mut s = String::with_capacity(255);
        s.push_str("  Request parameters:");
        s.push_str("\n    handle: ");
        s.push_str(&self.handle);
        s
    }
}

// ------------------- HTTP Status Codes -------------------
// Both outcomes are conveyed by status code alone with empty bodies.
#[derive(Debug, ApiResponse)]
enum FriendsResponse {
    #[oai(status = 204)]
    Http204,
    #[oai(status = 404)]
    Http404,
}

fn make_http_204() -> FriendsResponse {
    FriendsResponse::Http204
}
fn make_http_404() -> FriendsResponse {
    FriendsResponse::Http404
}

// ***************************************************************************
//                             OpenAPI Endpoint
// ***************************************************************************
#[OpenApi]
impl DeleteFriendApi {
    #[oai(path = "/api/friends/:handle", method = "delete")]
    async fn delete_friend(&self, http_req: &Request, handle: Path<String>) -> FriendsResponse {
        // Package the request parameters.
        let req = ReqDeleteFriend {handle: handle.to_string()};

        // -------------------- Process Request ----------------------
        FriendsResponse::process(http_req, &req, &self.store)
    }
}

// ***************************************************************************
//                          Request/Response Methods
// ***************************************************************************
impl FriendsResponse {
    /// Process the request.  Only the first record with a matching handle
    /// is removed; later duplicates survive and become reachable.
    fn process(http_req: &Request, req: &ReqDeleteFriend, store: &RosterStore) -> FriendsResponse {
        // Conditional logging depending on log level.
        srv_utils::debug_request(http_req, req);

        let index = match store.find_index_by_handle(&req.handle) {
            Some(i) => i,
            None => {
                info!("Friend '{}' NOT FOUND - nothing deleted.", req.handle);
                return make_http_404();
            },
        };
        match store.remove_at(index) {
            Some(friend) => {
                info!("Friend '{}' deleted.", friend.handle);
                make_http_204()
            },
            None => {
                // The record vanished between the lookup and the write.
                info!("Friend '{}' NOT FOUND - nothing deleted.", req.handle);
                make_http_404()
            },
        }
    }
}
