#![forbid(unsafe_code)]

use poem_openapi::{ OpenApi, param::Query, payload::PlainText };

// The year the age arithmetic is anchored to.
const BASE_YEAR: i64 = 2020;

// ***************************************************************************
//                          Request/Response Definiions
// ***************************************************************************
pub struct YearApi;

// ***************************************************************************
//                             OpenAPI Endpoint
// ***************************************************************************
#[OpenApi]
impl YearApi {
    #[oai(path = "/year", method = "get")]
    async fn year(&self, age: Query<Option<String>>) -> PlainText<String> {
        PlainText(birth_year_message(age.0.as_deref()))
    }
}

// ***************************************************************************
//                             Private Functions
// ***************************************************************************
// ---------------------------------------------------------------------------
// birth_year_message:
// ---------------------------------------------------------------------------
/** Build the response line.  An absent or unparseable age produces the
 * literal word NaN in place of a year; the route always answers 200.
 */
fn birth_year_message(age: Option<&str>) -> String {
    // Widened past the parse range so the subtraction cannot overflow.
    let year = match age.and_then(parse_int_loose) {
        Some(age) => (BASE_YEAR as i128 - age as i128).to_string(),
        None => "NaN".to_string(),
    };
    format!("You were born in {}", year)
}

// ---------------------------------------------------------------------------
// parse_int_loose:
// ---------------------------------------------------------------------------
/** Parse the leading integer of a string: optional whitespace, an optional
 * sign, then as many decimal digits as appear before the first non-digit.
 * Trailing garbage is ignored; no leading digits at all is a failure.
 */
fn parse_int_loose(input: &str) -> Option<i64> {
    let s = input.trim_start();
    let (sign, rest) = match s.strip_prefix('-') {
        Some(r) => (-1i64, r),
        None => (1i64, s.strip_prefix('+').unwrap_or(s)),
    };

    // Take the run of digits at the front, if any.
    let end = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
    let digits = &rest[..end];
    if digits.is_empty() {
        return None;
    }
    digits.parse::<i64>().ok().map(|v| sign * v)
}

// ***************************************************************************
//                                  Tests
// ***************************************************************************
#[cfg(test)]
mod tests {
    use poem::http::StatusCode;
    use poem::test::TestClient;

    use super::parse_int_loose;
    use crate::build_app;
    use crate::utils::roster::RosterStore;

    #[test]
    fn loose_parsing_takes_the_leading_digits() {
        assert_eq!(parse_int_loose("30"), Some(30));
        assert_eq!(parse_int_loose("12abc"), Some(12));
        assert_eq!(parse_int_loose("  42"), Some(42));
        assert_eq!(parse_int_loose("+20"), Some(20));
        assert_eq!(parse_int_loose("-5"), Some(-5));
        assert_eq!(parse_int_loose("-9223372036854775807"), Some(-9223372036854775807));
    }

    #[test]
    fn loose_parsing_fails_without_leading_digits() {
        assert_eq!(parse_int_loose(""), None);
        assert_eq!(parse_int_loose("abc"), None);
        assert_eq!(parse_int_loose("abc12"), None);
        assert_eq!(parse_int_loose("-"), None);
        assert_eq!(parse_int_loose("+"), None);
    }

    #[tokio::test]
    async fn numeric_age_yields_the_birth_year() {
        let cli = TestClient::new(build_app(RosterStore::new()));

        let resp = cli.get("/year?age=30").send().await;
        resp.assert_status(StatusCode::OK);
        resp.assert_text("You were born in 1990").await;
    }

    #[tokio::test]
    async fn missing_age_yields_nan() {
        let cli = TestClient::new(build_app(RosterStore::new()));

        let resp = cli.get("/year").send().await;
        resp.assert_status(StatusCode::OK);
        resp.assert_text("You were born in NaN").await;
    }

    #[tokio::test]
    async fn unparseable_age_yields_nan() {
        let cli = TestClient::new(build_app(RosterStore::new()));

        let resp = cli.get("/year?age=abc").send().await;
        resp.assert_status(StatusCode::OK);
        resp.assert_text("You were born in NaN").await;
    }

    #[tokio::test]
    async fn trailing_garbage_is_ignored() {
        let cli = TestClient::new(build_app(RosterStore::new()));

        let resp = cli.get("/year?age=12abc").send().await;
        resp.assert_status(StatusCode::OK);
        resp.assert_text("You were born in 2008").await;
    }

    #[tokio::test]
    async fn negative_age_lands_in_the_future() {
        let cli = TestClient::new(build_app(RosterStore::new()));

        let resp = cli.get("/year?age=-5").send().await;
        resp.assert_status(StatusCode::OK);
        resp.assert_text("You were born in 2025").await;
    }

    #[tokio::test]
    async fn extreme_negative_age_still_yields_a_year() {
        let cli = TestClient::new(build_app(RosterStore::new()));

        let resp = cli.get("/year?age=-9223372036854775807").send().await;
        resp.assert_status(StatusCode::OK);
        resp.assert_text("You were born in 9223372036854777827").await;
    }
}
