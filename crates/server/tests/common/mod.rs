//! Shared helpers for server integration tests.

use std::io::Write;
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Client;
use tempfile::TempDir;
use tokio::time::sleep;

/// Find an available port
pub fn get_available_port() -> u16 {
    TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

/// A spawned server plus the temp dir holding its database and datasets.
pub struct TestServer {
    pub port: u16,
    pub child: tokio::process::Child,
    #[allow(dead_code)]
    pub temp_dir: TempDir,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://127.0.0.1:{}{}", self.port, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.start_kill();
    }
}

/// Write a file into the server's temp dir and return its path.
pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    path
}

/// Spawn a server with the given extra config sections appended to the
/// base (server + database) config.
pub async fn start_test_server(extra_config: &str) -> TestServer {
    let port = get_available_port();
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");

    let config_content = format!(
        r#"
[server]
host = "127.0.0.1"
port = {}

[database]
path = "{}"

{}
"#,
        port,
        db_path.display(),
        extra_config
    );
    let config_path = write_file(temp_dir.path(), "config.toml", &config_content);

    let child = tokio::process::Command::new(env!("CARGO_BIN_EXE_supportflow"))
        .env("SUPPORTFLOW_CONFIG", &config_path)
        .env("RUST_LOG", "error") // Quiet logs during tests
        .kill_on_drop(true)
        .spawn()
        .expect("Failed to spawn server");

    let server = TestServer {
        port,
        child,
        temp_dir,
    };

    assert!(
        wait_for_server(port, 100).await,
        "Server did not start in time"
    );

    server
}

/// Wait for server to be ready
async fn wait_for_server(port: u16, max_attempts: u32) -> bool {
    let client = Client::new();
    for _ in 0..max_attempts {
        if client
            .get(format!("http://127.0.0.1:{}/api/v1/health", port))
            .send()
            .await
            .is_ok()
        {
            return true;
        }
        sleep(Duration::from_millis(50)).await;
    }
    false
}
