use std::path::PathBuf;

use reqwest::redirect::Policy;

use super::*;
use crate::state::test_helpers::test_app_state;

const SHELL: &str = "<!doctype html><title>shell</title><div id=\"app\"></div>";

fn static_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("gameshelf-static-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).expect("create static dir");
    std::fs::write(dir.join("index.html"), SHELL).expect("write shell");
    std::fs::write(dir.join("app.js"), "console.log('hi');").expect("write asset");
    dir
}

async fn spawn_app() -> String {
    let app = app(test_app_state(), &static_dir());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind app");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("app server");
    });
    format!("http://{addr}")
}

fn client() -> reqwest::Client {
    reqwest::Client::builder().redirect(Policy::none()).build().expect("client")
}

fn location(response: &reqwest::Response) -> Option<&str> {
    response.headers().get(reqwest::header::LOCATION).and_then(|v| v.to_str().ok())
}

#[tokio::test]
async fn healthz_is_ok() {
    let base = spawn_app().await;
    let response = client().get(format!("{base}/healthz")).send().await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
}

#[tokio::test]
async fn root_redirects_home() {
    let base = spawn_app().await;
    let response = client().get(format!("{base}/")).send().await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), Some("/home"));
}

#[tokio::test]
async fn guarded_pages_redirect_to_sign_in_without_session() {
    let base = spawn_app().await;
    for page in GUARDED_PAGES {
        let response = client().get(format!("{base}{page}")).send().await.unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::TEMPORARY_REDIRECT, "{page}");
        assert_eq!(location(&response), Some(SIGN_IN_PATH), "{page}");
    }
}

#[tokio::test]
async fn public_pages_serve_the_shell() {
    let base = spawn_app().await;
    for page in ["/sign-in", "/sign-up", "/share/ABCD2345"] {
        let response = client().get(format!("{base}{page}")).send().await.unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::OK, "{page}");
        assert_eq!(response.text().await.unwrap(), SHELL);
    }
}

#[tokio::test]
async fn static_assets_are_served() {
    let base = spawn_app().await;
    let response = client().get(format!("{base}/app.js")).send().await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
}

#[tokio::test]
async fn api_requires_session() {
    let base = spawn_app().await;
    let http = client();
    for path in ["/api/auth/me", "/api/collection", "/api/top-games", "/api/notifications", "/api/games", "/api/share"] {
        let response = http.get(format!("{base}{path}")).send().await.unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::UNAUTHORIZED, "{path}");
    }
    let response = http.post(format!("{base}/api/notifications/check")).send().await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn malformed_share_code_is_not_found_without_session() {
    let base = spawn_app().await;
    let response = client().get(format!("{base}/api/share/nope")).send().await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
}
