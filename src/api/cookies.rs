//! Session cookie helpers
//!
//! Cookies are written as plain `Set-Cookie` strings and read by splitting
//! the `Cookie` request header.

use axum::http::{header, HeaderMap};

/// Expiry date sent with a clearing cookie
const EPOCH_HTTP_DATE: &str = "Thu, 01 Jan 1970 00:00:00 GMT";

/// Build the `Set-Cookie` value that hands a session token to the client.
pub fn session_cookie(name: &str, token: &str, max_age_seconds: i64, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        name, token, max_age_seconds
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Build the `Set-Cookie` value that removes the session cookie.
///
/// Carries both `Max-Age=0` and a past `Expires` so older clients drop it too.
pub fn clear_session_cookie(name: &str, secure: bool) -> String {
    let mut cookie = format!(
        "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0; Expires={}",
        name, EPOCH_HTTP_DATE
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Find a cookie value by name across all `Cookie` headers.
///
/// An empty value counts as no cookie.
pub fn extract_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use axum::http::HeaderValue;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        #[test]
        fn property_issued_cookie_is_readable(token in "[0-9a-f]{64}", max_age in 1i64..=86400) {
            let set_cookie = session_cookie("session_token", &token, max_age, false);
            // A browser echoes back only the name=value pair
            let pair = set_cookie.split(';').next().unwrap().to_string();

            let mut headers = HeaderMap::new();
            headers.insert(header::COOKIE, HeaderValue::from_str(&pair).unwrap());

            prop_assert_eq!(extract_cookie(&headers, "session_token"), Some(token.as_str()));
            let expected_max_age = format!("Max-Age={}", max_age);
            prop_assert!(set_cookie.contains(&expected_max_age));
        }
    }
}
