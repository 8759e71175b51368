//! E2E Error Scenario Tests
//!
//! ## Test Coverage
//!
//! - Non-POST methods on the upload path
//! - Missing or malformed multipart framing
//! - Missing or read-only upload directory
//! - Partial failure across parts

use super::common::{E2ETestEnv, BOUNDARY};

/// Test: every non-POST method on /upload answers 404 "Not Found"
#[tokio::test]
async fn test_non_post_methods_are_not_found() {
    let env = E2ETestEnv::new().await.expect("Failed to create test env");

    for method in [
        reqwest::Method::GET,
        reqwest::Method::PUT,
        reqwest::Method::DELETE,
        reqwest::Method::PATCH,
        reqwest::Method::OPTIONS,
    ] {
        let response = env
            .client
            .request(method.clone(), env.upload_url())
            .send()
            .await
            .expect("Request failed");

        assert_eq!(response.status(), 404, "{} /upload", method);
        assert_eq!(response.text().await.unwrap(), "Not Found");
    }
    assert!(env.stored_files().is_empty());
}

/// Test: HEAD /upload answers 404 without a body
#[tokio::test]
async fn test_head_upload_is_not_found() {
    let env = E2ETestEnv::new().await.expect("Failed to create test env");

    let response = env
        .client
        .head(env.upload_url())
        .send()
        .await
        .expect("Request failed");

    assert_eq!(response.status(), 404);
}

/// Test: multipart content type without a boundary is a 500
#[tokio::test]
async fn test_missing_boundary() {
    let env = E2ETestEnv::new().await.expect("Failed to create test env");

    let response = env
        .post_raw("multipart/form-data", "not really multipart")
        .await
        .expect("Request failed");

    assert_eq!(response.status(), 500);
    assert_eq!(response.text().await.unwrap(), "Internal server error");
    assert!(env.stored_files().is_empty());
}

/// Test: a non-multipart body is a 500
#[tokio::test]
async fn test_non_multipart_content_type() {
    let env = E2ETestEnv::new().await.expect("Failed to create test env");

    let response = env
        .post_raw("application/json", r#"{"file":"a.txt"}"#)
        .await
        .expect("Request failed");

    assert_eq!(response.status(), 500);
    assert_eq!(response.text().await.unwrap(), "Internal server error");
}

/// Test: a body that never reaches the closing boundary is a 500
#[tokio::test]
async fn test_truncated_multipart_body() {
    let env = E2ETestEnv::new().await.expect("Failed to create test env");

    let body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"cut.txt\"\r\n\r\npartial data"
    );
    let response = env
        .post_raw(&E2ETestEnv::multipart_content_type(), body)
        .await
        .expect("Request failed");

    assert_eq!(response.status(), 500);
    assert_eq!(response.text().await.unwrap(), "Internal server error");
}

/// Test: a body that does not start with the boundary is a 500
#[tokio::test]
async fn test_garbage_body_with_boundary() {
    let env = E2ETestEnv::new().await.expect("Failed to create test env");

    let response = env
        .post_raw(&E2ETestEnv::multipart_content_type(), "no boundary anywhere")
        .await
        .expect("Request failed");

    assert_eq!(response.status(), 500);
    assert!(env.stored_files().is_empty());
}

/// Test: the upload directory disappearing after startup yields a 500
#[tokio::test]
async fn test_missing_upload_dir() {
    let env = E2ETestEnv::new().await.expect("Failed to create test env");
    std::fs::remove_dir_all(env.upload_dir()).expect("Failed to remove upload dir");

    let response = env
        .upload_files(&[("a.txt", b"data".as_slice())])
        .await
        .expect("Request failed");

    assert_eq!(response.status(), 500);
    assert_eq!(response.text().await.unwrap(), "Internal server error");
    assert!(!env.upload_dir().exists(), "Handler must not create the directory");
}

/// Test: a read-only upload directory yields a 500 and no stored file
#[cfg(unix)]
#[tokio::test]
async fn test_read_only_upload_dir() {
    use std::os::unix::fs::PermissionsExt;

    let env = E2ETestEnv::new().await.expect("Failed to create test env");
    let dir = env.upload_dir();
    std::fs::set_permissions(dir, std::fs::Permissions::from_mode(0o555))
        .expect("Failed to make upload dir read-only");

    // Root ignores directory permissions
    if std::fs::write(dir.join("write-check"), b"").is_ok() {
        std::fs::remove_file(dir.join("write-check")).ok();
        std::fs::set_permissions(dir, std::fs::Permissions::from_mode(0o755)).ok();
        eprintln!("skipping: running with permission to write read-only directories");
        return;
    }

    let response = env
        .upload_files(&[("a.txt", b"data".as_slice())])
        .await
        .expect("Request failed");

    std::fs::set_permissions(dir, std::fs::Permissions::from_mode(0o755))
        .expect("Failed to restore upload dir permissions");

    assert_eq!(response.status(), 500);
    assert_eq!(response.text().await.unwrap(), "Internal server error");
    assert!(env.stored_files().is_empty());
}

/// Test: a framing error in the second part keeps the first part on disk
#[tokio::test]
async fn test_earlier_parts_survive_later_failure() {
    let env = E2ETestEnv::new().await.expect("Failed to create test env");

    let body = format!(
        "{}--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"second.txt\"\r\n\r\nnever finished",
        E2ETestEnv::raw_part("first.txt", "complete")
    );
    let response = env
        .post_raw(&E2ETestEnv::multipart_content_type(), body)
        .await
        .expect("Request failed");

    assert_eq!(response.status(), 500);

    let files = env.stored_files();
    let first = files
        .iter()
        .find(|f| f.declared == "first.txt")
        .expect("First part should stay on disk");
    assert_eq!(first.content, b"complete");
}

/// Test: the server keeps serving after a failed request
#[tokio::test]
async fn test_server_survives_errors() {
    let env = E2ETestEnv::new().await.expect("Failed to create test env");

    let response = env
        .post_raw("multipart/form-data", "broken")
        .await
        .expect("Request failed");
    assert_eq!(response.status(), 500);

    let response = env
        .upload_files(&[("after.txt", b"ok".as_slice())])
        .await
        .expect("Request failed");
    assert_eq!(response.status(), 200);
}
