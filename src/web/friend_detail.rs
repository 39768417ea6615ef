#![forbid(unsafe_code)]

use poem::Request;
use poem_openapi::{ OpenApi, param::Path, payload::Html, payload::PlainText, ApiResponse };
use log::error;
use tera::Context;

use crate::utils::roster::{Friend, RosterStore};
use crate::utils::srv_utils::{self, RequestDebug};
use crate::utils::templates::{FRIEND_DETAIL_TEMPLATE, FRIEND_NOT_FOUND_TEMPLATE, TEMPLATES};

// ***************************************************************************
//                          Request/Response Definiions
// ***************************************************************************
pub struct FriendDetailApi {
    store: RosterStore,
}

impl FriendDetailApi {
    pub fn new(store: RosterStore) -> Self {
        Self {store}
    }
}

struct ReqFriendDetail {
    handle: String,
}

// Implement the debug record trait for logging.
impl RequestDebug for ReqFriendDetail {
    type Req = ReqFriendDetail;
    fn get_request_info(&self) -> String {
        let mut s = String::with_capacity(255);
        s.push_str("  Request parameters:");
        s.push_str("\n    handle: ");
        s.push_str(&self.handle);
        s
    }
}

// ------------------- HTTP Status Codes -------------------
// Unlike the JSON routes, the not-found case carries an HTML page naming
// the handle that missed.
#[derive(ApiResponse)]
enum FriendsResponse {
    #[oai(status = 200)]
    Http200(Html<String>),
    #[oai(status = 404)]
    Http404(Html<String>),
    #[oai(status = 500)]
    Http500(PlainText<String>),
}

// ***************************************************************************
//                             OpenAPI Endpoint
// ***************************************************************************
#[OpenApi]
impl FriendDetailApi {
    #[oai(path = "/friends/:handle", method = "get")]
    async fn friend_detail(&self, http_req: &Request, handle: Path<String>) -> FriendsResponse {
        // Package the request parameters.
        let req = ReqFriendDetail {handle: handle.to_string()};

        // -------------------- Process Request ----------------------
        FriendsResponse::process(http_req, &req, &self.store)
    }
}

// ***************************************************************************
//                          Request/Response Methods
// ***************************************************************************
impl FriendsResponse {
    /// Process the request.  The first record whose handle matches wins.
    fn process(http_req: &Request, req: &ReqFriendDetail, store: &RosterStore) -> FriendsResponse {
        // Conditional logging depending on log level.
        srv_utils::debug_request(http_req, req);

        match store.find_by_handle(&req.handle) {
            Some(friend) => Self::render_detail(&friend),
            None => Self::render_not_found(&req.handle),
        }
    }

    /// Render the detail page for a found record.
    fn render_detail(friend: &Friend) -> FriendsResponse {
        let mut ctx = Context::new();
        ctx.insert("name", &friend.name);
        ctx.insert("handle", &friend.handle);
        ctx.insert("skill", &friend.skill);
        match TEMPLATES.render(FRIEND_DETAIL_TEMPLATE, &ctx) {
            Ok(page) => FriendsResponse::Http200(Html(page)),
            Err(e) => Self::render_error(e),
        }
    }

    /// Render the 404 page naming the missing handle.
    fn render_not_found(handle: &str) -> FriendsResponse {
        let mut ctx = Context::new();
        ctx.insert("handle", handle);
        match TEMPLATES.render(FRIEND_NOT_FOUND_TEMPLATE, &ctx) {
            Ok(page) => FriendsResponse::Http404(Html(page)),
            Err(e) => Self::render_error(e),
        }
    }

    fn render_error(e: tera::Error) -> FriendsResponse {
        let msg = "ERROR: ".to_owned() + e.to_string().as_str();
        error!("{}", msg);
        FriendsResponse::Http500(PlainText(msg))
    }
}
