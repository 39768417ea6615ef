#![forbid(unsafe_code)]

use poem_openapi::{ OpenApi, payload::Html };

// The page body never changes, so no template is involved.
const ABOUT_PAGE: &str = "<h1>About page</h1>";

// ***************************************************************************
//                          Request/Response Definiions
// ***************************************************************************
pub struct AboutApi;

// ***************************************************************************
//                             OpenAPI Endpoint
// ***************************************************************************
#[OpenApi]
impl AboutApi {
    #[oai(path = "/about", method = "get")]
    async fn about(&self) -> Html<String> {
        Html(ABOUT_PAGE.to_string())
    }
}
