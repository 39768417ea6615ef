#![forbid(unsafe_code)]

use path_absolutize::Absolutize;
use std::ops::Deref;
use std::path::Path;

use poem::http::{header::CONTENT_TYPE, HeaderValue, StatusCode};
use poem::{Error, Request, Result};
use serde_json::{Map, Value};
use url::form_urlencoded;

use log::{debug, LevelFilter};

// ***************************************************************************
// GENERAL PUBLIC FUNCTIONS
// ***************************************************************************
// ---------------------------------------------------------------------------
// get_absolute_path:
// ---------------------------------------------------------------------------
/** Replace tilde (~) and environment variable values in a path name and
 * then construct the absolute path name.  The difference between
 * absolutize and standard canonicalize methods is that absolutize does not
 * care about whether the file exists and what the file really is.
 */
pub fn get_absolute_path(path: &str) -> String {
    // Replace ~ and environment variable values if possible.
    // On error, return the string version of the original path.
    let s = match shellexpand::full(path) {
        Ok(x) => x,
        Err(_) => return path.to_owned(),
    };

    // Convert to absolute path if necessary.
    // Return original input on error.
    let p = Path::new(s.deref());
    let p1 = match p.absolutize() {
        Ok(x) => x,
        Err(_) => return path.to_owned(),
    };
    let p2 = match p1.to_str() {
        Some(x) => x,
        None => return path.to_owned(),
    };

    p2.to_owned()
}

// ---------------------------------------------------------------------------
// has_value:
// ---------------------------------------------------------------------------
/** Determine whether an optional request field actually carries a value.
 * An absent field and an empty string are both treated as missing, which
 * is what the validation rules for create and update require.
 */
pub fn has_value(field: &Option<String>) -> bool {
    match field {
        Some(s) => !s.is_empty(),
        None => false,
    }
}

// ***************************************************************************
// REQUEST BODY NORMALIZATION
// ***************************************************************************
// ---------------------------------------------------------------------------
// normalize_form_body:
// ---------------------------------------------------------------------------
/** Middleware run before routing that rewrites url-encoded request bodies
 * into their equivalent flat JSON objects, so the route handlers only ever
 * parse JSON.  Clients may submit either content type to the mutating
 * routes and get identical behavior.
 *
 * Requests that do not declare application/x-www-form-urlencoded pass
 * through untouched.  All decoded values are strings; repeated keys keep
 * the last occurrence.
 */
pub async fn normalize_form_body(mut req: Request) -> Result<Request> {
    // Fast exit for everything except url-encoded submissions.
    let is_form = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| {
            v.trim()
                .to_ascii_lowercase()
                .starts_with("application/x-www-form-urlencoded")
        })
        .unwrap_or(false);
    if !is_form {
        return Ok(req);
    }

    // Decode the pairs into a flat JSON object of strings.
    let bytes = req.take_body().into_vec().await?;
    let mut fields = Map::new();
    for (key, value) in form_urlencoded::parse(&bytes) {
        fields.insert(key.into_owned(), Value::String(value.into_owned()));
    }

    // Replace the body and advertise the new content type.
    let body = serde_json::to_vec(&Value::Object(fields))
        .map_err(|e| Error::from_string(e.to_string(), StatusCode::INTERNAL_SERVER_ERROR))?;
    req.headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    req.set_body(body);
    Ok(req)
}

// ***************************************************************************
//                                  Traits
// ***************************************************************************
pub trait RequestDebug {
    type Req;
    fn get_request_info(&self) -> String;
}

// ---------------------------------------------------------------------------
// debug_request:
// ---------------------------------------------------------------------------
// Dump http request information to the log.
pub fn debug_request(http_req: &Request, req: &impl RequestDebug) {
    // Check that debug or higher logging is in effect.
    let level = log::max_level();
    if level < LevelFilter::Debug {
        return;
    }

    // Accumulate the output.
    let mut s = "\n".to_string();

    // Restate the URI.
    let uri = http_req.uri();
    s += format!("  URI: {:?}\n", uri).as_str();

    // Accumulate the headers
    let it = http_req.headers().iter();
    for v in it {
        s += format!("  Header: {} = {:?} \n", v.0, v.1).as_str();
    }

    // List query parameters.
    if let Some(q) = uri.query() {
        s += format!("  Query Parameters: {:?}\n", q).as_str();
    } else {
        s += "  * No Query Parameters\n";
    }

    // Add the request's information.
    s += req.get_request_info().as_str();

    // Write the single log record.
    debug!("{}", s);
}

// ***************************************************************************
//                                  Tests
// ***************************************************************************
#[cfg(test)]
mod tests {
    use super::*;
    use poem::http::Method;

    #[test]
    fn has_value_requires_a_nonempty_string() {
        assert!(!has_value(&None));
        assert!(!has_value(&Some(String::new())));
        assert!(has_value(&Some("portal gun".to_string())));
    }

    #[tokio::test]
    async fn form_bodies_become_json() {
        let req = Request::builder()
            .method(Method::POST)
            .uri("/api/friends".parse().unwrap())
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body("name=Rick&handle=rick&skill=portal+gun");

        let mut req = normalize_form_body(req).await.unwrap();
        let content_type = req.headers().get(CONTENT_TYPE).unwrap();
        assert_eq!(content_type, "application/json");

        let bytes = req.take_body().into_vec().await.unwrap();
        let json: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["name"], "Rick");
        assert_eq!(json["handle"], "rick");
        assert_eq!(json["skill"], "portal gun");
    }

    #[tokio::test]
    async fn json_bodies_pass_through_untouched() {
        let req = Request::builder()
            .method(Method::POST)
            .uri("/api/friends".parse().unwrap())
            .header("Content-Type", "application/json")
            .body(r#"{"name":"Rick"}"#);

        let mut req = normalize_form_body(req).await.unwrap();
        let bytes = req.take_body().into_vec().await.unwrap();
        assert_eq!(bytes, br#"{"name":"Rick"}"#);
    }

    #[tokio::test]
    async fn bodyless_requests_pass_through_untouched() {
        let req = Request::builder()
            .method(Method::GET)
            .uri("/friends".parse().unwrap())
            .finish();

        let req = normalize_form_body(req).await.unwrap();
        assert!(req.headers().get(CONTENT_TYPE).is_none());
    }
}
