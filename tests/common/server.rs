//! Test server management.
//!
//! Spawns and manages chatterd instances for integration testing.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::time::Duration;
use tempfile::TempDir;
use tokio::time::sleep;

/// A test server instance.
pub struct TestServer {
    child: Child,
    port: u16,
    // Held for its Drop: the config lives here.
    _data_dir: TempDir,
}

// Each test binary uses its own subset of the harness.
#[allow(dead_code)]
impl TestServer {
    /// Spawn a new test server listening on the given port.
    pub async fn spawn(port: u16) -> anyhow::Result<Self> {
        let data_dir = tempfile::Builder::new()
            .prefix("chatterd-test-")
            .tempdir()?;

        // Create minimal test configuration
        let config_path = data_dir.path().join("config.toml");
        let config_content = format!(
            r#"
[server]
name = "test.server"
shutdown_word = "shutdown"

[listen]
address = "127.0.0.1:{}"
"#,
            port
        );
        std::fs::write(&config_path, config_content)?;

        // Build path to the chatterd binary (in workspace target dir)
        let cargo_manifest_dir = env!("CARGO_MANIFEST_DIR");
        let binary_path = PathBuf::from(cargo_manifest_dir).join("target/debug/chatterd");

        // Spawn the server process. stdin stays piped so tests can type the
        // console shutdown sentinel.
        let child = Command::new(&binary_path)
            .arg(config_path.to_str().unwrap())
            .stdin(Stdio::piped())
            .spawn()?;

        let server = Self {
            child,
            port,
            _data_dir: data_dir,
        };

        // Wait for server to start listening
        server.wait_until_ready().await?;

        Ok(server)
    }

    /// Wait until the server is accepting connections.
    async fn wait_until_ready(&self) -> anyhow::Result<()> {
        for _ in 0..30 {
            if tokio::net::TcpStream::connect(("127.0.0.1", self.port))
                .await
                .is_ok()
            {
                return Ok(());
            }
            sleep(Duration::from_millis(100)).await;
        }
        anyhow::bail!("Server failed to start within 3 seconds")
    }

    /// Get the server address.
    pub fn address(&self) -> String {
        format!("127.0.0.1:{}", self.port)
    }

    /// Type the shutdown sentinel on the server's console.
    pub fn type_shutdown_word(&mut self) -> anyhow::Result<()> {
        let stdin = self
            .child
            .stdin
            .as_mut()
            .ok_or_else(|| anyhow::anyhow!("server stdin not piped"))?;
        stdin.write_all(b"shutdown\n")?;
        stdin.flush()?;
        Ok(())
    }

    /// Wait for the server process to exit, returning its status.
    pub async fn wait_for_exit(&mut self) -> anyhow::Result<std::process::ExitStatus> {
        for _ in 0..100 {
            if let Some(status) = self.child.try_wait()? {
                return Ok(status);
            }
            sleep(Duration::from_millis(100)).await;
        }
        anyhow::bail!("Server did not exit within 10 seconds")
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        // Kill the server process; the tempdir cleans itself up.
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
