//! E2E Static File Tests
//!
//! Everything except `/upload` is served from the public directory.

use super::common::E2ETestEnv;

#[tokio::test]
async fn test_serves_public_file() {
    let env = E2ETestEnv::with_public_files(&[("hello.txt", "hello from public")])
        .await
        .expect("Failed to create test env");

    let response = env
        .client
        .get(format!("{}/hello.txt", env.base_url()))
        .send()
        .await
        .expect("Request failed");

    assert_eq!(response.status(), 200);
    assert_eq!(
        response.headers()["content-type"],
        "text/plain; charset=utf-8"
    );
    assert_eq!(response.text().await.unwrap(), "hello from public");
}

#[tokio::test]
async fn test_root_serves_index() {
    let env = E2ETestEnv::with_public_files(&[("index.html", "<form action=\"/upload\"></form>")])
        .await
        .expect("Failed to create test env");

    let response = env
        .client
        .get(format!("{}/", env.base_url()))
        .send()
        .await
        .expect("Request failed");

    assert_eq!(response.status(), 200);
    assert!(response.headers()["content-type"]
        .to_str()
        .unwrap()
        .starts_with("text/html"));
    assert!(response.text().await.unwrap().contains("/upload"));
}

#[tokio::test]
async fn test_root_lists_directory_without_index() {
    let env = E2ETestEnv::with_public_files(&[("a.txt", "a"), ("sub/b.txt", "b")])
        .await
        .expect("Failed to create test env");

    let response = env
        .client
        .get(format!("{}/", env.base_url()))
        .send()
        .await
        .expect("Request failed");

    assert_eq!(response.status(), 200);
    let html = response.text().await.unwrap();
    assert!(html.contains("href=\"a.txt\""));
    assert!(html.contains("href=\"sub/\""));
}

#[tokio::test]
async fn test_directory_without_slash_redirects() {
    let env = E2ETestEnv::with_public_files(&[("sub/b.txt", "b")])
        .await
        .expect("Failed to create test env");

    let response = env
        .client
        .get(format!("{}/sub", env.base_url()))
        .send()
        .await
        .expect("Request failed");

    assert_eq!(response.status(), 301);
    assert_eq!(response.headers()["location"], "/sub/");
}

#[tokio::test]
async fn test_missing_public_file() {
    let env = E2ETestEnv::new().await.expect("Failed to create test env");

    let response = env
        .client
        .get(format!("{}/missing.txt", env.base_url()))
        .send()
        .await
        .expect("Request failed");

    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_uploads_are_not_served() {
    let env = E2ETestEnv::new().await.expect("Failed to create test env");

    let response = env
        .upload_files(&[("secret.txt", b"s3cr3t".as_slice())])
        .await
        .expect("Request failed");
    assert_eq!(response.status(), 200);

    let stored = &env.stored_files()[0].name;
    let response = env
        .client
        .get(format!("{}/{}", env.base_url(), stored))
        .send()
        .await
        .expect("Request failed");
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_post_to_static_path() {
    let env = E2ETestEnv::with_public_files(&[("hello.txt", "hi")])
        .await
        .expect("Failed to create test env");

    let response = env
        .client
        .post(format!("{}/hello.txt", env.base_url()))
        .body("x")
        .send()
        .await
        .expect("Request failed");

    assert_eq!(response.status(), 405);
}
