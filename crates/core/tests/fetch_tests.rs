//! Fetcher integration tests against a local HTTP server
#![cfg(feature = "fetch")]

use std::net::TcpListener;
use std::thread;
use std::time::Duration;

use postgrade_core::*;

const POST: &str = r#"<html><head><title>Local post</title></head><body><article><h1>Is it local?</h1><p>Yes.</p></article></body></html>"#;

/// Serves every request with `route(path, user_agent)` after `delay`.
fn spawn_server<F>(delay: Duration, route: F) -> String
where
    F: Fn(&str, &str) -> tiny_http::ResponseBox + Send + 'static,
{
    let server = tiny_http::Server::http("127.0.0.1:0").expect("start tiny_http server");
    let base_url = format!("http://{}", server.server_addr());

    thread::spawn(move || {
        for request in server.incoming_requests() {
            thread::sleep(delay);
            let user_agent = request
                .headers()
                .iter()
                .find(|h| h.field.equiv("User-Agent"))
                .map(|h| h.value.to_string())
                .unwrap_or_default();
            let response = route(request.url(), &user_agent);
            let _ = request.respond(response);
        }
    });

    base_url
}

fn status(code: u16) -> impl Fn(&str, &str) -> tiny_http::ResponseBox + Send + 'static {
    move |_, _| tiny_http::Response::from_string("error page").with_status_code(code).boxed()
}

fn blog(path: &str, user_agent: &str) -> tiny_http::ResponseBox {
    if path == "/old" {
        let location = tiny_http::Header::from_bytes(&b"Location"[..], &b"/post"[..]).unwrap();
        return tiny_http::Response::empty(301).with_header(location).boxed();
    }

    // `/hop/N` redirects N times before landing on `/post`.
    if let Some(hops) = path.strip_prefix("/hop/").and_then(|n| n.parse::<usize>().ok()) {
        let next = if hops <= 1 { "/post".to_string() } else { format!("/hop/{}", hops - 1) };
        let location = tiny_http::Header::from_bytes(&b"Location"[..], next.as_bytes()).unwrap();
        return tiny_http::Response::empty(302).with_header(location).boxed();
    }

    let content_type = tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"text/html; charset=utf-8"[..]).unwrap();
    let engine = tiny_http::Header::from_bytes(&b"X-Blog-Engine"[..], &b"handmade"[..]).unwrap();
    let body = POST.replace("Yes.", &format!("Yes. Served to {}.", user_agent));

    tiny_http::Response::from_string(body).with_header(content_type).with_header(engine).boxed()
}

fn fetch(url: String, config: FetchConfig) -> Result<RawDocument> {
    thread::spawn(move || tokio::runtime::Runtime::new().unwrap().block_on(fetch_url(&url, &config)))
        .join()
        .unwrap()
}

fn fetch_error(code: u16) -> PostgradeError {
    let base = spawn_server(Duration::ZERO, status(code));
    fetch(format!("{}/post", base), FetchConfig::default()).unwrap_err()
}

#[test]
fn test_forbidden_surfaces_blocking_message() {
    let err = fetch_error(403);
    assert!(matches!(err, PostgradeError::Forbidden));
    assert!(err.to_string().contains("blocking automated access"));
}

#[test]
fn test_not_found_surfaces_not_found_message() {
    let err = fetch_error(404);
    assert!(matches!(err, PostgradeError::NotFound));
    assert!(err.to_string().contains("not found"));
}

#[test]
fn test_unauthorized() {
    let err = fetch_error(401);
    assert!(matches!(err, PostgradeError::Unauthorized));
    assert!(err.to_string().contains("requires authentication"));
}

#[test]
fn test_server_error_reports_status() {
    let err = fetch_error(500);
    assert!(matches!(err, PostgradeError::HttpStatus { status: 500 }));
    assert!(err.to_string().contains("HTTP 500"));
    assert!(!err.is_validation());
}

#[test]
fn test_success_returns_raw_document() {
    let base = spawn_server(Duration::ZERO, blog);
    let config = FetchConfig { user_agent: "postgrade-test-agent".to_string(), ..Default::default() };

    let raw = fetch(format!("{}/post", base), config).unwrap();

    assert_eq!(raw.status_code, 200);
    assert_eq!(raw.final_url, format!("{}/post", base));
    assert_eq!(raw.headers.get("x-blog-engine").map(String::as_str), Some("handmade"));
    assert!(raw.html.contains("Served to postgrade-test-agent."));
}

#[test]
fn test_redirect_updates_final_url() {
    let base = spawn_server(Duration::ZERO, blog);
    let raw = fetch(format!("{}/old", base), FetchConfig::default()).unwrap();

    assert_eq!(raw.final_url, format!("{}/post", base));
    assert!(raw.html.contains("Local post"));
}

#[test]
fn test_redirect_chain_at_limit_is_followed() {
    let base = spawn_server(Duration::ZERO, blog);
    let raw = fetch(format!("{}/hop/5", base), FetchConfig::default()).unwrap();

    assert_eq!(raw.status_code, 200);
    assert_eq!(raw.final_url, format!("{}/post", base));
}

#[test]
fn test_redirect_chain_past_limit_fails() {
    let base = spawn_server(Duration::ZERO, blog);
    let err = fetch(format!("{}/hop/6", base), FetchConfig::default()).unwrap_err();

    assert!(matches!(err, PostgradeError::Network { .. }), "{err:?}");
    assert_eq!(
        err.to_string(),
        "Network error while fetching the blog. Please check your internet connection."
    );
}

#[test]
fn test_redirect_limit_is_configurable() {
    let base = spawn_server(Duration::ZERO, blog);
    let config = FetchConfig { max_redirects: 1, ..Default::default() };

    assert!(fetch(format!("{}/hop/1", base), config.clone()).is_ok());
    assert!(matches!(fetch(format!("{}/hop/2", base), config), Err(PostgradeError::Network { .. })));
}

#[test]
fn test_timeout_surfaces_timeout_message() {
    let base = spawn_server(Duration::from_secs(3), blog);
    let config = FetchConfig { timeout: 1, ..Default::default() };

    let err = fetch(format!("{}/post", base), config).unwrap_err();

    assert!(matches!(err, PostgradeError::Timeout { timeout: 1 }));
    assert_eq!(err.to_string(), "Request timeout. The website took too long to respond.");
}

#[test]
fn test_refused_connection() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let err = fetch(format!("http://127.0.0.1:{}/post", port), FetchConfig::default()).unwrap_err();

    assert!(matches!(err, PostgradeError::ConnectionRefused), "{err:?}");
    assert!(err.to_string().contains("Connection refused"));
}

#[test]
fn test_pipeline_fetch_and_analyze() {
    let base = spawn_server(Duration::ZERO, blog);
    let url = format!("{}/post", base);

    let document = thread::spawn(move || {
        tokio::runtime::Runtime::new().unwrap().block_on(Pipeline::new().fetch_and_analyze(&url))
    })
    .join()
    .unwrap()
    .unwrap();

    assert_eq!(document.metadata.title, "Local post");
    assert!(document.analyze().has_main_question);
}
