//! Shared test helpers for integration tests
//!
//! This module provides common utilities used across all test files.

#![allow(dead_code)]

use std::path::PathBuf;

use assert_cmd::cargo;
use assert_cmd::Command;
use tempfile::TempDir;

/// Helper to get an invcat command that ignores the user's config and environment
pub fn invcat() -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("invcat"));
    cmd.env_remove("INVCAT_DB").env_remove("INVCAT_FORMAT");
    cmd
}

/// A catalog database in a temp directory
pub struct TestCatalog {
    pub dir: TempDir,
}

impl TestCatalog {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn db_path(&self) -> PathBuf {
        self.dir.path().join("catalog.db")
    }

    /// An invcat command bound to this catalog, with config and data dirs inside the temp dir
    pub fn cmd(&self) -> Command {
        let mut cmd = invcat();
        cmd.env("XDG_CONFIG_HOME", self.dir.path().join("config"))
            .env("XDG_DATA_HOME", self.dir.path().join("data"))
            .arg("--db")
            .arg(self.db_path());
        cmd
    }

    /// Run a creating command with `--format id` and return the printed id
    pub fn create(&self, args: &[&str]) -> String {
        let output = self
            .cmd()
            .args(args)
            .args(["--format", "id"])
            .output()
            .unwrap();
        assert!(
            output.status.success(),
            "command {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    }

    pub fn create_supplier(&self, name: &str, contact: &str) -> String {
        self.create(&["sup", "new", "--name", name, "--contact", contact])
    }

    pub fn create_category(&self, name: &str) -> String {
        self.create(&["cat", "new", "--name", name])
    }

    pub fn create_product(&self, name: &str, quantity: i64, price: f64) -> String {
        self.create(&[
            "product",
            "new",
            "--name",
            name,
            "--quantity",
            &quantity.to_string(),
            "--price",
            &price.to_string(),
        ])
    }

    pub fn create_image(&self, product_id: &str, url: &str) -> String {
        self.create(&["img", "new", "--product", product_id, "--url", url])
    }

    /// Run a command with `--format json` and parse its output
    pub fn json(&self, args: &[&str]) -> serde_json::Value {
        let output = self
            .cmd()
            .args(args)
            .args(["--format", "json"])
            .output()
            .unwrap();
        assert!(
            output.status.success(),
            "command {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        serde_json::from_slice(&output.stdout).unwrap()
    }
}
