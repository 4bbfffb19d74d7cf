//! Test configuration builder for creating config directories programmatically

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Builder for a config directory containing `main.toml`
pub struct TestConfigBuilder {
    temp_dir: TempDir,
    endpoint_url: Option<String>,
    diagnostics_enabled: Option<bool>,
    username: Option<String>,
    password: Option<String>,
    connect_timeout_seconds: Option<u64>,
}

impl TestConfigBuilder {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        Self {
            temp_dir,
            endpoint_url: None,
            diagnostics_enabled: None,
            username: None,
            password: None,
            connect_timeout_seconds: None,
        }
    }

    pub fn endpoint_url(mut self, url: &str) -> Self {
        self.endpoint_url = Some(url.to_string());
        self
    }

    pub fn diagnostics(mut self, enabled: bool) -> Self {
        self.diagnostics_enabled = Some(enabled);
        self
    }

    pub fn credentials(mut self, username: &str, password: &str) -> Self {
        self.username = Some(username.to_string());
        self.password = Some(password.to_string());
        self
    }

    pub fn password_only(mut self, password: &str) -> Self {
        self.password = Some(password.to_string());
        self
    }

    pub fn connect_timeout(mut self, seconds: u64) -> Self {
        self.connect_timeout_seconds = Some(seconds);
        self
    }

    fn to_toml(&self) -> String {
        let mut toml = String::new();
        if let Some(url) = &self.endpoint_url {
            toml.push_str(&format!("endpoint_url = \"{}\"\n", url));
        }
        if let Some(enabled) = self.diagnostics_enabled {
            toml.push_str(&format!("diagnostics_enabled = {}\n", enabled));
        }
        if let Some(username) = &self.username {
            toml.push_str(&format!("username = \"{}\"\n", username));
        }
        if let Some(password) = &self.password {
            toml.push_str(&format!("password = \"{}\"\n", password));
        }
        if let Some(seconds) = self.connect_timeout_seconds {
            toml.push_str(&format!("connect_timeout_seconds = {}\n", seconds));
        }
        toml
    }

    /// Write `main.toml` into a fresh `config` directory
    pub fn build(self) -> TestConfig {
        let config_dir = self.temp_dir.path().join("config");
        fs::create_dir_all(&config_dir).expect("Failed to create config dir");
        fs::write(config_dir.join("main.toml"), self.to_toml()).expect("Failed to write main.toml");

        TestConfig {
            _temp_dir: self.temp_dir,
            config_dir,
        }
    }
}

impl Default for TestConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Written config directory, removed when dropped
pub struct TestConfig {
    _temp_dir: TempDir,
    config_dir: PathBuf,
}

impl TestConfig {
    pub fn config_dir(&self) -> &PathBuf {
        &self.config_dir
    }

    pub fn config_dir_string(&self) -> String {
        self.config_dir.to_string_lossy().to_string()
    }
}
