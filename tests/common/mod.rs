//! Common test utilities and fixtures

#![allow(dead_code)]

use serde_json::{json, Value};

/// A small user table in the shape most populate tests work against
pub fn users() -> Vec<Value> {
    vec![
        json!({"id": 1, "email": "ada@example.com", "team": "core", "profile": {"country": "uk"}}),
        json!({"id": 2, "email": "bob@example.com", "team": "web", "profile": {"country": "us"}}),
        json!({"id": 3, "email": "cyd@example.com", "team": "core", "profile": {"country": "uk"}}),
        json!({"id": 4, "email": "dee@example.com", "team": "ops"}),
        json!({"id": 5, "email": "eve@example.com", "team": "web", "profile": {"country": "de"}}),
    ]
}

/// `count` generated users cycling through `distinct` teams
pub fn generated_users(count: usize, distinct: usize) -> Vec<Value> {
    (0..count)
        .map(|i| {
            json!({
                "id": i,
                "email": format!("user{}@example.com", i),
                "team": format!("team-{}", i % distinct.max(1)),
            })
        })
        .collect()
}

/// String at `key`, panicking with a readable message otherwise
pub fn str_field<'a>(item: &'a Value, key: &str) -> &'a str {
    item[key]
        .as_str()
        .unwrap_or_else(|| panic!("expected string at '{}' in {}", key, item))
}
