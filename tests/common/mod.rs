#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Runs the ticketdesk binary against an isolated config home
pub struct DeskTest {
    pub temp_dir: TempDir,
    base_url: Option<String>,
}

impl DeskTest {
    pub fn new() -> Self {
        DeskTest {
            temp_dir: TempDir::new().expect("Failed to create temp directory"),
            base_url: None,
        }
    }

    /// Point every command at `base_url`
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn home(&self) -> PathBuf {
        self.temp_dir.path().join("home")
    }

    pub fn run(&self, args: &[&str]) -> Output {
        let mut command = Command::new(env!("CARGO_BIN_EXE_ticketdesk"));
        command
            .args(args)
            .env("TICKETDESK_HOME", self.home())
            .env_remove("RUST_LOG")
            .env_remove("TICKETDESK_BASE_URL");
        if let Some(url) = &self.base_url {
            command.env("TICKETDESK_BASE_URL", url);
        }
        command.output().expect("Failed to execute ticketdesk")
    }

    pub fn run_success(&self, args: &[&str]) -> String {
        let output = self.run(args);
        if !output.status.success() {
            panic!(
                "Command {:?} failed with status {:?}\nstdout: {}\nstderr: {}",
                args,
                output.status,
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            );
        }
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    pub fn run_failure(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            !output.status.success(),
            "Expected command {:?} to fail, but it succeeded\nstdout: {}",
            args,
            String::from_utf8_lossy(&output.stdout)
        );
        String::from_utf8_lossy(&output.stderr).to_string()
    }

    /// Write a session file as `login` would
    pub fn write_session(&self, email: &str, token: &str, role: &str) {
        fs::create_dir_all(self.home()).expect("Failed to create home");
        fs::write(
            self.home().join("session.yaml"),
            format!("email: {email}\ntoken: {token}\nrole: {role}\n"),
        )
        .expect("Failed to write session");
    }

    pub fn session_exists(&self) -> bool {
        self.home().join("session.yaml").exists()
    }

    pub fn read_config(&self) -> String {
        fs::read_to_string(self.home().join("config.yaml")).expect("Failed to read config")
    }
}
