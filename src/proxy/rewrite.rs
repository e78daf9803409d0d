//! Backend URI derivation from the inbound request path
//!
//! Inbound paths have the fixed shape `<api_prefix><service><remainder>`.
//! The prefix and service segment are stripped, the remainder is appended to
//! the route's backend base URI, and the original query string is reattached
//! unmodified.

use url::Url;

/// Split an inbound path into (service, remainder) when it matches the
/// configured prefix. The remainder keeps its leading slash, or is empty
/// for requests to the service root.
pub fn match_route<'a>(path: &'a str, api_prefix: &str) -> Option<(&'a str, &'a str)> {
    let rest = path.strip_prefix(api_prefix)?;
    if rest.is_empty() {
        return None;
    }

    match rest.find('/') {
        Some(idx) => Some((&rest[..idx], &rest[idx..])),
        None => Some((rest, "")),
    }
}

/// Compose the backend target URI. The query string is carried over
/// byte-for-byte; `Url` would re-encode it, so plain string assembly is used
/// for the final target.
pub fn rewrite(base: &Url, remainder: &str, query: Option<&str>) -> String {
    // Url normalizes a bare authority to a trailing "/"; strip it so the
    // remainder's leading slash is the only separator.
    let mut target = base.as_str().trim_end_matches('/').to_string();
    target.push_str(remainder);

    if let Some(q) = query {
        target.push('?');
        target.push_str(q);
    }

    target
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_service_and_remainder() {
        assert_eq!(
            match_route("/api/service1/hello", "/api/"),
            Some(("service1", "/hello"))
        );
        assert_eq!(
            match_route("/api/service1/a/b/c", "/api/"),
            Some(("service1", "/a/b/c"))
        );
    }

    #[test]
    fn service_root_has_empty_remainder() {
        assert_eq!(match_route("/api/service1", "/api/"), Some(("service1", "")));
        assert_eq!(
            match_route("/api/service1/", "/api/"),
            Some(("service1", "/"))
        );
    }

    #[test]
    fn non_api_paths_do_not_match() {
        assert!(match_route("/", "/api/").is_none());
        assert!(match_route("/health", "/api/").is_none());
        assert!(match_route("/api/", "/api/").is_none());
        assert!(match_route("/apiservice1/x", "/api/").is_none());
    }

    #[test]
    fn custom_prefix() {
        assert_eq!(
            match_route("/gateway/svc/x", "/gateway/"),
            Some(("svc", "/x"))
        );
    }

    #[test]
    fn rewrite_reproduces_uri_byte_for_byte() {
        let base = Url::parse("http://localhost:9081").unwrap();
        assert_eq!(
            rewrite(&base, "/hello", None),
            "http://localhost:9081/hello"
        );
        assert_eq!(
            rewrite(&base, "/hello", Some("a=1&b=x%20y")),
            "http://localhost:9081/hello?a=1&b=x%20y"
        );
    }

    #[test]
    fn rewrite_with_empty_remainder_is_the_base() {
        let base = Url::parse("http://localhost:9081").unwrap();
        assert_eq!(rewrite(&base, "", None), "http://localhost:9081");
        assert_eq!(
            rewrite(&base, "", Some("q=1")),
            "http://localhost:9081?q=1"
        );
    }

    #[test]
    fn rewrite_preserves_base_path() {
        let base = Url::parse("http://localhost:9081/v2").unwrap();
        assert_eq!(
            rewrite(&base, "/users", None),
            "http://localhost:9081/v2/users"
        );
    }
}
