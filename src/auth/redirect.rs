//! Where to send the user after they log in.

use axum::{extract::Request, http::Uri};

use crate::endpoints;

/// Only same-origin paths other than the log-in page are allowed, so the
/// log-in form cannot be used as an open redirect.
fn is_safe_redirect_target(path_and_query: &str) -> bool {
    let is_local_path = path_and_query.starts_with('/') && !path_and_query.starts_with("//");
    let path = path_and_query
        .split_once('?')
        .map_or(path_and_query, |(path, _)| path);

    is_local_path && path != endpoints::LOG_IN_VIEW && !path.starts_with("/api")
}

/// Reduce `raw_url` to a safe local path and query.
///
/// Returns `None` for absolute URLs, protocol relative URLs, API routes and
/// the log-in page itself.
pub fn normalize_redirect_url(raw_url: &str) -> Option<String> {
    let uri = raw_url.parse::<Uri>().ok()?;

    if uri.scheme().is_some() || uri.authority().is_some() {
        return None;
    }

    let path_and_query = uri.path_and_query()?.as_str();

    is_safe_redirect_target(path_and_query).then(|| path_and_query.to_owned())
}

/// Build the log-in URL that returns the user to where `request` came from.
///
/// Page requests return to the requested page. HTMX requests to the API
/// return to the page given in the `HX-Current-URL` header.
pub fn build_log_in_redirect_url(request: &Request) -> Option<String> {
    let target = if request.uri().path().starts_with("/api") {
        hx_current_page(request)?
    } else {
        normalize_redirect_url(request.uri().path_and_query()?.as_str())?
    };

    log_in_url_with_redirect(&target)
}

/// The log-in URL with `target` as the `redirect_url` query parameter.
pub fn log_in_url_with_redirect(target: &str) -> Option<String> {
    serde_urlencoded::to_string([("redirect_url", target)])
        .inspect_err(|error| tracing::error!("could not encode redirect URL {target}: {error}"))
        .ok()
        .map(|query| format!("{}?{query}", endpoints::LOG_IN_VIEW))
}

fn hx_current_page(request: &Request) -> Option<String> {
    let headers = request.headers();
    let is_htmx = headers
        .get("hx-request")
        .and_then(|header| header.to_str().ok())
        .is_some_and(|header| header.eq_ignore_ascii_case("true"));

    if !is_htmx {
        tracing::warn!("API request without the HX-Request header");
        return None;
    }

    let current_url = headers
        .get("hx-current-url")
        .and_then(|header| header.to_str().ok())?;

    // HTMX sends the full URL, so only keep the path and query.
    let page = current_url
        .parse::<Uri>()
        .ok()
        .and_then(|uri| uri.path_and_query().map(|pq| pq.as_str().to_owned()))
        .filter(|page| is_safe_redirect_target(page));

    if page.is_none() {
        tracing::warn!("invalid HX-Current-URL header: {current_url}");
    }

    page
}

#[cfg(test)]
mod tests {
    use axum::{body::Body, extract::Request};

    use crate::endpoints;

    use super::{build_log_in_redirect_url, normalize_redirect_url};

    #[test]
    fn keeps_local_paths_with_query() {
        assert_eq!(
            normalize_redirect_url("/monthly?table=3"),
            Some("/monthly?table=3".to_owned())
        );
    }

    #[test]
    fn rejects_unsafe_targets() {
        for url in [
            "https://evil.example.com/monthly",
            "//evil.example.com",
            "monthly",
            "/log_in?redirect_url=%2Fmonthly",
            "/api/tables",
        ] {
            assert_eq!(normalize_redirect_url(url), None, "{url} should be rejected");
        }
    }

    #[test]
    fn page_request_redirects_back_to_page() {
        let request = Request::get("/monthly?table=3").body(Body::empty()).unwrap();

        let url = build_log_in_redirect_url(&request).unwrap();

        assert_eq!(
            url,
            format!("{}?redirect_url=%2Fmonthly%3Ftable%3D3", endpoints::LOG_IN_VIEW)
        );
    }

    #[test]
    fn htmx_request_redirects_back_to_current_page() {
        let request = Request::post("/api/entries")
            .header("HX-Request", "true")
            .header("HX-Current-URL", "http://localhost:3000/dashboard?table=2")
            .body(Body::empty())
            .unwrap();

        let url = build_log_in_redirect_url(&request).unwrap();

        assert_eq!(
            url,
            format!("{}?redirect_url=%2Fdashboard%3Ftable%3D2", endpoints::LOG_IN_VIEW)
        );
    }

    #[test]
    fn api_request_without_htmx_has_no_target() {
        let request = Request::post("/api/entries").body(Body::empty()).unwrap();

        assert_eq!(build_log_in_redirect_url(&request), None);
    }
}
