#![forbid(unsafe_code)]

use poem_openapi::{ OpenApi, payload::Html, payload::PlainText, ApiResponse };
use log::error;
use tera::Context;

use crate::utils::roster::RosterStore;
use crate::utils::templates::{FRIENDS_TEMPLATE, TEMPLATES};

// ***************************************************************************
//                          Request/Response Definiions
// ***************************************************************************
pub struct FriendsPageApi {
    store: RosterStore,
}

impl FriendsPageApi {
    pub fn new(store: RosterStore) -> Self {
        Self {store}
    }
}

// ------------------- HTTP Status Codes -------------------
#[derive(ApiResponse)]
enum FriendsResponse {
    #[oai(status = 200)]
    Http200(Html<String>),
    #[oai(status = 500)]
    Http500(PlainText<String>),
}

// ***************************************************************************
//                             OpenAPI Endpoint
// ***************************************************************************
#[OpenApi]
impl FriendsPageApi {
    #[oai(path = "/friends", method = "get")]
    async fn friends_page(&self) -> FriendsResponse {
        FriendsResponse::process(&self.store)
    }
}

// ***************************************************************************
//                          Request/Response Methods
// ***************************************************************************
impl FriendsResponse {
    /// Render the roster as a linked list, one item per record in store
    /// order.  Each link targets the record's detail page by handle.
    fn process(store: &RosterStore) -> FriendsResponse {
        let mut ctx = Context::new();
        ctx.insert("friends", &store.list_all());
        match TEMPLATES.render(FRIENDS_TEMPLATE, &ctx) {
            Ok(page) => FriendsResponse::Http200(Html(page)),
            Err(e) => {
                let msg = "ERROR: ".to_owned() + e.to_string().as_str();
                error!("{}", msg);
                FriendsResponse::Http500(PlainText(msg))
            },
        }
    }
}
