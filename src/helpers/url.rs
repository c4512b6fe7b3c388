//! Endpoint and path joining.
//!
//! Endpoints are accepted with or without a trailing slash and always
//! normalize to exactly one.

use crate::utils::constants::TOKEN_PATH;

pub fn with_trailing_slash(url: &str) -> String {
    format!("{}/", url.trim_end_matches('/'))
}

/// `{endpoint}auth/token/`, the URL the token is requested from
pub fn token_url(endpoint: &str) -> String {
    format!("{}{}/", with_trailing_slash(endpoint), TOKEN_PATH)
}

/// Case-insensitive issuer comparison, ignoring trailing slashes
pub fn issuer_matches(issuer: &str, expected: &str) -> bool {
    with_trailing_slash(issuer).eq_ignore_ascii_case(&with_trailing_slash(expected))
}

/// `{endpoint}{resource_path}[/{id}]`
pub fn resource_url(endpoint: &str, resource_path: &str, id: Option<&str>) -> String {
    let mut path = resource_path.trim_start_matches('/').to_owned();
    if let Some(id) = id {
        if !path.is_empty() && !path.ends_with('/') {
            path.push('/');
        }
        path.push_str(id);
    }
    format!("{}{}", with_trailing_slash(endpoint), path)
}
