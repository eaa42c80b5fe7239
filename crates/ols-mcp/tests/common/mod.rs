use anyhow::Context as _;
use serde_json::{Value, json};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt as _, AsyncWriteExt as _, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};

/// Minimal line-delimited JSON-RPC client for the server binary's stdio transport.
///
/// Exists only for integration tests; it does not re-implement any MCP logic.
pub struct StdioSession {
    _child: Child,
    stdin: ChildStdin,
    stdout: Lines<BufReader<ChildStdout>>,
}

impl StdioSession {
    /// Spawn the server pointed at `api_url` and complete the initialize handshake.
    pub async fn start(api_url: &str) -> anyhow::Result<Self> {
        let bin = env!("CARGO_BIN_EXE_ols-mcp");
        let mut child = Command::new(bin)
            .env("OLS_API_URL", api_url)
            .env_remove("OLS_API_TOKEN")
            .env("OLS_TIMEOUT", "5")
            .env_remove("OLS_VERIFY_SSL")
            .env("OLS_MCP_LOG", "warn")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .context("spawn ols-mcp")?;

        let stdin = child.stdin.take().context("child stdin")?;
        let stdout = child.stdout.take().context("child stdout")?;

        let mut session = Self {
            _child: child,
            stdin,
            stdout: BufReader::new(stdout).lines(),
        };

        let init = session
            .request(
                0,
                "initialize",
                json!({
                    "protocolVersion": "2024-11-05",
                    "capabilities": {},
                    "clientInfo": { "name": "ols-mcp-integration-tests", "version": "0" }
                }),
            )
            .await?;
        anyhow::ensure!(init.get("result").is_some(), "initialize failed: {init}");

        session
            .send(&json!({ "jsonrpc": "2.0", "method": "notifications/initialized" }))
            .await?;

        Ok(session)
    }

    pub async fn request(&mut self, id: u64, method: &str, params: Value) -> anyhow::Result<Value> {
        self.send(&json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        }))
        .await?;

        let read = async {
            loop {
                let line = self
                    .stdout
                    .next_line()
                    .await?
                    .context("server closed stdout")?;
                let msg: Value = serde_json::from_str(&line)
                    .with_context(|| format!("invalid JSON from server: {line}"))?;
                // Skip server-initiated notifications.
                if msg.get("id") == Some(&json!(id)) {
                    return anyhow::Ok(msg);
                }
            }
        };

        tokio::time::timeout(Duration::from_secs(10), read)
            .await
            .with_context(|| format!("timed out waiting for response to {method}"))?
    }

    async fn send(&mut self, msg: &Value) -> anyhow::Result<()> {
        let mut line = serde_json::to_string(msg)?;
        line.push('\n');
        self.stdin.write_all(line.as_bytes()).await?;
        self.stdin.flush().await?;
        Ok(())
    }
}

/// Extract `result.content[0].text` from a `tools/call` response.
pub fn tool_call_text(msg: &Value) -> anyhow::Result<&str> {
    let content = msg
        .pointer("/result/content")
        .and_then(Value::as_array)
        .context("tools/call missing result.content")?;
    anyhow::ensure!(content.len() == 1, "expected exactly one content item: {msg}");
    content[0]
        .get("text")
        .and_then(Value::as_str)
        .context("tools/call missing content[0].text")
}
