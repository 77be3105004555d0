//! Custom assertion macros and utilities

use axum::http::StatusCode;
use axum_test::TestResponse;

/// Assert that a result is ok and return the value
#[macro_export]
macro_rules! assert_ok {
    ($result:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
    ($result:expr, $message:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!("{}: {:?}", $message, e),
        }
    };
}

/// Assert that a string contains a substring
#[macro_export]
macro_rules! assert_contains {
    ($haystack:expr, $needle:expr) => {
        assert!(
            $haystack.contains($needle),
            "Expected '{}' to contain '{}'",
            $haystack,
            $needle
        );
    };
}

/// Assert an error response: status plus the `{"error","status"}` body
pub fn assert_error(response: &TestResponse, status: StatusCode, message: &str) {
    assert_eq!(response.status_code(), status, "body: {}", response.text());
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], message);
    assert_eq!(body["status"], status.as_u16());
}

/// Assert that ranks are exactly `0..n` in order
pub fn assert_dense(ranks: &[(String, i64)]) {
    let orders: Vec<i64> = ranks.iter().map(|(_, order)| *order).collect();
    let expected: Vec<i64> = (0..ranks.len() as i64).collect();
    assert_eq!(orders, expected, "ranks are not dense: {ranks:?}");
}

/// Titles in rank order
pub fn titles(ranks: &[(String, i64)]) -> Vec<&str> {
    ranks.iter().map(|(title, _)| title.as_str()).collect()
}
