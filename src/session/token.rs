//! Access token extraction from request headers.

use axum::http::{header, HeaderMap};

/// Find the access token in `Authorization: Bearer` or the auth cookie.
///
/// The cookie holds either the raw JWT or a JSON array whose first
/// element is the JWT.
pub fn access_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    bearer_token(headers).or_else(|| cookie_token(headers, cookie_name))
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then(|| token.to_string())
}

fn cookie_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    let raw = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == cookie_name)
        .map(|(_, value)| value.trim())?;

    let decoded = percent_decode(raw);
    let token = if decoded.starts_with('[') {
        serde_json::from_str::<Vec<serde_json::Value>>(&decoded)
            .ok()?
            .into_iter()
            .next()?
            .as_str()?
            .to_string()
    } else {
        decoded
    };

    (!token.is_empty()).then_some(token)
}

fn percent_decode(input: &str) -> String {
    url::form_urlencoded::parse(format!("v={input}").as_bytes())
        .next()
        .map(|(_, v)| v.into_owned())
        .unwrap_or_else(|| input.to_string())
}
