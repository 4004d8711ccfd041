//! Test chat client.
//!
//! Drives a real TCP connection against a test server and asserts on the
//! reply lines coming back.

use anyhow::bail;
use chatter_proto::{Command, Reply};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::time::timeout;

/// A test chat client.
pub struct TestClient {
    reader: BufReader<OwnedReadHalf>,
    writer: BufWriter<OwnedWriteHalf>,
}

// Each test binary uses its own subset of the harness.
#[allow(dead_code)]
impl TestClient {
    /// Connect to a test server.
    pub async fn connect(address: &str) -> anyhow::Result<Self> {
        let stream = TcpStream::connect(address).await?;
        let (read_half, write_half) = stream.into_split();

        Ok(Self {
            reader: BufReader::new(read_half),
            writer: BufWriter::new(write_half),
        })
    }

    /// Send a raw protocol line.
    pub async fn send_raw(&mut self, line: &str) -> anyhow::Result<()> {
        self.writer.write_all(line.as_bytes()).await?;
        if !line.ends_with("\r\n") {
            self.writer.write_all(b"\r\n").await?;
        }
        self.writer.flush().await?;
        Ok(())
    }

    /// Send a command.
    pub async fn send(&mut self, cmd: Command) -> anyhow::Result<()> {
        self.send_raw(&cmd.to_string()).await
    }

    /// Read one line, `Ok(None)` meaning the server closed the connection.
    async fn read_line_opt(&mut self, dur: Duration) -> anyhow::Result<Option<String>> {
        let mut line = String::new();
        let n = timeout(dur, self.reader.read_line(&mut line)).await??;
        if n == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end().to_string()))
    }

    /// Receive a single reply with a timeout.
    pub async fn recv_timeout(&mut self, dur: Duration) -> anyhow::Result<Reply> {
        match self.read_line_opt(dur).await? {
            Some(line) => line
                .parse::<Reply>()
                .map_err(|e| anyhow::anyhow!("unparseable server line: {}", e)),
            None => bail!("connection closed"),
        }
    }

    /// Receive a single reply (5 second timeout).
    pub async fn recv(&mut self) -> anyhow::Result<Reply> {
        self.recv_timeout(Duration::from_secs(5)).await
    }

    /// Receive replies until the given predicate returns true.
    pub async fn recv_until<F>(&mut self, mut predicate: F) -> anyhow::Result<Vec<Reply>>
    where
        F: FnMut(&Reply) -> bool,
    {
        let mut replies = Vec::new();
        loop {
            let reply = self.recv().await?;
            let done = predicate(&reply);
            replies.push(reply);
            if done {
                break;
            }
        }
        Ok(replies)
    }

    /// Collect everything the server has queued for us right now.
    ///
    /// Reads with a short per-line timeout until the stream goes quiet.
    pub async fn drain(&mut self) -> Vec<Reply> {
        let mut replies = Vec::new();
        while let Ok(reply) = self.recv_timeout(Duration::from_millis(100)).await {
            replies.push(reply);
        }
        replies
    }

    /// Log in and return the server's verdict (`LoginSuccess` or
    /// `LoginFailure`).
    pub async fn login(&mut self, name: &str) -> anyhow::Result<Reply> {
        self.send(Command::Login(name.to_string())).await?;
        let reply = self.recv().await?;
        match reply {
            Reply::LoginSuccess | Reply::LoginFailure => Ok(reply),
            other => bail!("unexpected reply to login: {}", other),
        }
    }

    /// Log in, failing the test if the name is rejected.
    pub async fn login_ok(&mut self, name: &str) -> anyhow::Result<()> {
        match self.login(name).await? {
            Reply::LoginSuccess => Ok(()),
            other => bail!("login as {:?} failed: {}", name, other),
        }
    }

    /// Send `logout` and wait for the acknowledgment.
    pub async fn logout(&mut self, name: &str) -> anyhow::Result<()> {
        self.send(Command::Logout(name.to_string())).await?;
        let replies = self
            .recv_until(|r| matches!(r, Reply::LogoutSuccess))
            .await?;
        if replies.iter().any(|r| matches!(r, Reply::LogoutSuccess)) {
            Ok(())
        } else {
            bail!("no logout acknowledgment received")
        }
    }

    /// Broadcast a message.
    pub async fn msg(&mut self, text: &str) -> anyhow::Result<()> {
        self.send(Command::Msg(text.to_string())).await
    }

    /// Whisper to one user.
    pub async fn whsp(&mut self, target: &str, text: &str) -> anyhow::Result<()> {
        self.send(Command::Whsp {
            target: target.to_string(),
            text: text.to_string(),
        })
        .await
    }

    /// Assert that the server closes this connection, tolerating any lines
    /// still in flight before the close.
    pub async fn expect_closed(&mut self, dur: Duration) -> anyhow::Result<()> {
        let deadline = tokio::time::Instant::now() + dur;
        loop {
            let remaining = deadline
                .checked_duration_since(tokio::time::Instant::now())
                .unwrap_or(Duration::ZERO);
            if remaining.is_zero() {
                bail!("connection still open");
            }
            match self.read_line_opt(remaining).await {
                Ok(None) => return Ok(()),
                Ok(Some(_)) => continue,
                Err(e) => {
                    if e.downcast_ref::<tokio::time::error::Elapsed>().is_some() {
                        bail!("connection still open");
                    }
                    // A reset counts as closed too.
                    return Ok(());
                }
            }
        }
    }
}
