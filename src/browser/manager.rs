//! Playwright-backed capture sessions.
//!
//! One `node` helper process serves a whole analysis run. Requests and
//! responses are single JSON lines over stdin/stdout; stderr is collected for
//! error mapping.

use async_trait::async_trait;
use serde::Serialize;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, info, warn};
use url::Url;

use super::capture::{CaptureSession, CapturedPage, PageCapture};
use super::dom::{convert_raw_elements, ScriptResponse};
use super::playwright::{
    ensure_node_available, ensure_playwright_available, map_playwright_error,
    map_playwright_status_error, map_spawn_error, PLAYWRIGHT_SESSION_SCRIPT,
};
use crate::{DccError, Result, Viewport};

/// Default timeout for page navigation.
pub const DEFAULT_NAVIGATION_TIMEOUT: Duration = Duration::from_secs(30);

/// Default timeout for waiting for network idle state.
pub const DEFAULT_NETWORK_IDLE_TIMEOUT: Duration = Duration::from_secs(10);

/// Default bound on helper startup and on each viewport capture.
pub const DEFAULT_PROCESS_TIMEOUT: Duration = Duration::from_secs(45);

/// How long `close` waits for the helper to exit before killing it.
const CLOSE_TIMEOUT: Duration = Duration::from_secs(5);

/// Configuration options for browser sessions.
#[derive(Debug, Clone)]
pub struct BrowserOptions {
    /// The Node.js command to use (default: "node").
    pub node_command: String,
    /// Whether to run in headless mode.
    pub headless: bool,
    /// Timeout for page navigation.
    pub navigation_timeout: Duration,
    /// Timeout for waiting for network idle state.
    pub network_idle_timeout: Duration,
    /// Bound on helper startup and on each viewport capture.
    pub process_timeout: Duration,
    /// Where `<viewport>.png` screenshots are written; none when unset.
    pub screenshot_dir: Option<PathBuf>,
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            node_command: "node".to_string(),
            headless: true,
            navigation_timeout: DEFAULT_NAVIGATION_TIMEOUT,
            network_idle_timeout: DEFAULT_NETWORK_IDLE_TIMEOUT,
            process_timeout: DEFAULT_PROCESS_TIMEOUT,
            screenshot_dir: None,
        }
    }
}

/// Captures a live page through a Playwright helper process.
#[derive(Debug, Clone)]
pub struct PlaywrightCapture {
    url: Url,
    options: BrowserOptions,
}

impl PlaywrightCapture {
    pub fn new(url: Url, options: BrowserOptions) -> Self {
        Self { url, options }
    }
}

#[async_trait]
impl PageCapture for PlaywrightCapture {
    async fn open(&self) -> Result<Box<dyn CaptureSession>> {
        let node = &self.options.node_command;
        // Fail fast if Node is missing to avoid spawning Playwright unnecessarily.
        ensure_node_available(node).await?;
        ensure_playwright_available(node).await?;

        if let Some(dir) = &self.options.screenshot_dir {
            tokio::fs::create_dir_all(dir).await.map_err(|e| {
                DccError::capture(format!(
                    "Failed to create screenshot dir {}: {}",
                    dir.display(),
                    e
                ))
            })?;
        }

        info!(
            url = %self.url,
            nav_secs = self.options.navigation_timeout.as_secs(),
            idle_secs = self.options.network_idle_timeout.as_secs(),
            "launching headless browser"
        );

        let mut cmd = Command::new(node);
        cmd.arg("-e")
            .arg(PLAYWRIGHT_SESSION_SCRIPT)
            .arg(self.url.as_str())
            .arg(self.options.navigation_timeout.as_millis().to_string())
            .arg(self.options.network_idle_timeout.as_millis().to_string())
            .arg(if self.options.headless { "1" } else { "0" })
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = cmd.spawn().map_err(|err| map_spawn_error(err, node))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| DccError::capture("Playwright helper stdin unavailable"))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| DccError::capture("Playwright helper stdout unavailable"))?;
        let stderr_task = child.stderr.take().map(|mut pipe| {
            tokio::spawn(async move {
                let mut buf = Vec::new();
                let _ = pipe.read_to_end(&mut buf).await;
                buf
            })
        });

        let mut session = PlaywrightSession {
            child,
            stdin: Some(stdin),
            stdout: BufReader::new(stdout).lines(),
            stderr_task,
            options: self.options.clone(),
            closed: false,
        };

        let line = session.read_line("starting the browser").await?;
        let ready: ScriptResponse = serde_json::from_str(&line).map_err(|e| {
            DccError::capture(format!(
                "Unexpected Playwright output: {} - raw: {}",
                e,
                line.trim()
            ))
        })?;
        if ready.status != "ready" {
            let message = ready.message.unwrap_or_else(|| "no additional details".into());
            return Err(map_playwright_status_error(&ready.status, message));
        }
        debug!("playwright helper ready");
        Ok(Box::new(session))
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CaptureRequest<'a> {
    viewport: &'a Viewport,
    screenshot_path: Option<String>,
}

struct PlaywrightSession {
    child: Child,
    stdin: Option<ChildStdin>,
    stdout: Lines<BufReader<ChildStdout>>,
    stderr_task: Option<JoinHandle<Vec<u8>>>,
    options: BrowserOptions,
    closed: bool,
}

impl PlaywrightSession {
    async fn read_line(&mut self, activity: &str) -> Result<String> {
        match timeout(self.options.process_timeout, self.stdout.next_line()).await {
            Ok(Ok(Some(line))) => Ok(line),
            Ok(Ok(None)) => Err(self.exit_error().await),
            Ok(Err(err)) => Err(DccError::Io(err)),
            Err(_) => {
                self.kill().await;
                Err(DccError::capture(format!(
                    "Playwright timed out after {:?} {}",
                    self.options.process_timeout, activity
                )))
            }
        }
    }

    async fn send(&mut self, request: &str) -> Result<()> {
        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| DccError::capture("Playwright session is already closed"))?;
        let written = async {
            stdin.write_all(request.as_bytes()).await?;
            stdin.write_all(b"\n").await?;
            stdin.flush().await
        }
        .await;
        match written {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::BrokenPipe => Err(self.exit_error().await),
            Err(err) => Err(DccError::Io(err)),
        }
    }

    /// Error describing why the helper went away, built from its stderr.
    async fn exit_error(&mut self) -> DccError {
        self.closed = true;
        self.stdin = None;
        let status = match timeout(CLOSE_TIMEOUT, self.child.wait()).await {
            Ok(Ok(status)) => status.to_string(),
            Ok(Err(err)) => return DccError::Io(err),
            Err(_) => {
                self.kill().await;
                "killed".to_string()
            }
        };
        // Browser processes may inherit the pipe, so the read is bounded too.
        let stderr = match self.stderr_task.take() {
            Some(task) => match timeout(CLOSE_TIMEOUT, task).await {
                Ok(Ok(buf)) => buf,
                _ => Vec::new(),
            },
            None => Vec::new(),
        };
        map_playwright_error(status, &String::from_utf8_lossy(&stderr))
    }

    async fn kill(&mut self) {
        self.closed = true;
        self.stdin = None;
        let _ = self.child.kill().await;
        let _ = self.child.wait().await;
    }
}

#[async_trait]
impl CaptureSession for PlaywrightSession {
    async fn capture(&mut self, viewport: &Viewport) -> Result<CapturedPage> {
        if self.closed {
            return Err(DccError::capture("Playwright session is already closed"));
        }
        let screenshot_path = self
            .options
            .screenshot_dir
            .as_ref()
            .map(|dir| dir.join(format!("{}.png", viewport.file_stem())));
        let request = serde_json::to_string(&CaptureRequest {
            viewport,
            screenshot_path: screenshot_path
                .as_ref()
                .map(|p| p.to_string_lossy().into_owned()),
        })?;

        info!(viewport = %viewport, "capturing page");
        self.send(&request).await?;
        let activity = format!("capturing {}", viewport.name);
        let line = self.read_line(&activity).await?;
        let response: ScriptResponse = serde_json::from_str(&line).map_err(|e| {
            DccError::capture(format!(
                "Failed to parse Playwright output: {} - raw: {}",
                e,
                line.trim()
            ))
        })?;

        if response.status != "ok" {
            let message = response
                .message
                .unwrap_or_else(|| "no additional details".to_string());
            return Err(map_playwright_status_error(&response.status, message));
        }

        let elements = convert_raw_elements(response.elements);
        debug!(viewport = %viewport.name, elements = elements.len(), "page captured");
        Ok(CapturedPage {
            elements,
            screenshot: response.screenshot,
        })
    }

    async fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        // EOF on stdin tells the helper to close the browser and exit.
        self.stdin = None;
        match timeout(CLOSE_TIMEOUT, self.child.wait()).await {
            Ok(Ok(status)) => debug!(%status, "playwright helper exited"),
            Ok(Err(err)) => return Err(DccError::Io(err)),
            Err(_) => {
                warn!("playwright helper did not exit after {:?}; killing it", CLOSE_TIMEOUT);
                let _ = self.child.kill().await;
                let _ = self.child.wait().await;
            }
        }
        Ok(())
    }
}
