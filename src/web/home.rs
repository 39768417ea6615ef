#![forbid(unsafe_code)]

use poem_openapi::{ OpenApi, param::Query, payload::Html, payload::PlainText, ApiResponse };
use log::error;
use tera::Context;

use crate::utils::templates::{HOME_TEMPLATE, TEMPLATES};

// ***************************************************************************
//                          Request/Response Definiions
// ***************************************************************************
pub struct HomeApi;

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
impl HomeApi {
    #[oai(path = "/", method = "get")]
    async fn home(&self, name: Query<Option<String>>) -> FriendsResponse {
        // An absent or empty name query parameter falls back to the default.
        let name = match name.0 {
            Some(n) if !n.is_empty() => n,
            _ => "World".to_string(),
        };
        FriendsResponse::process(&name)
    }
}

// ***************************************************************************
//                          Request/Response Methods
// ***************************************************************************
impl FriendsResponse {
    /// Render the greeting page.
    fn process(name: &str) -> FriendsResponse {
        let mut ctx = Context::new();
        ctx.insert("name", name);
        match TEMPLATES.render(HOME_TEMPLATE, &ctx) {
            Ok(page) => FriendsResponse::Http200(Html(page)),
            Err(e) => {
                let msg = "ERROR: ".to_owned() + e.to_string().as_str();
                error!("{}", msg);
                FriendsResponse::Http500(PlainText(msg))
            },
        }
    }
}
