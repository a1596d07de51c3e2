use assert_cmd::{cargo::cargo_bin_cmd, Command};
use std::fs;
use std::path::{Path, PathBuf};

/// Get a Command for apidup
pub fn apidup() -> Command {
    cargo_bin_cmd!("apidup")
}

/// Four APIs: two near-identical user lookups and two unrelated endpoints
pub const CATALOG_JSON: &str = r#"[
  {
    "id": "users-get",
    "path": "/api/v1/users/{id}",
    "method": "get",
    "description": "Retrieve user profile information",
    "parameters": ["id"],
    "response_schema": {"id": "string", "name": "string", "email": "string"},
    "domain": "users"
  },
  {
    "id": "users-fetch",
    "path": "/api/users/{id}",
    "method": "GET",
    "description": "Retrieve user profile information",
    "parameters": ["id"],
    "response_schema": {"id": "string", "name": "string", "email": "string"},
    "domain": "users"
  },
  {
    "id": "orders-list",
    "path": "/orders",
    "method": "GET",
    "description": "List all orders for an account",
    "parameters": ["account"],
    "response_schema": {"orders": "array", "total": "integer"},
    "domain": "orders"
  },
  {
    "id": "invoices-delete",
    "path": "/billing/invoices/{invoiceId}",
    "method": "DELETE",
    "description": "Remove an invoice",
    "parameters": ["invoiceId"],
    "domain": "billing"
  }
]"#;

/// Write the sample catalog into `dir` and return its path
pub fn write_catalog(dir: &Path) -> PathBuf {
    let path = dir.join("apis.json");
    fs::write(&path, CATALOG_JSON).expect("write catalog");
    path
}

/// Parse stdout of a successful command as JSON
#[allow(dead_code)]
pub fn stdout_json(output: &std::process::Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}
