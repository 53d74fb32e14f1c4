//! Playwright integration for headless browser automation.
//!
//! This module contains the inline Playwright helper script, error mapping,
//! and availability checks for Node.js and Playwright.

use crate::{DccError, Result};
use std::io;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// Long-lived helper: launches Chromium once, prints a `ready` line, then
/// answers one JSON request per stdin line with one JSON response line.
/// Each request gets a fresh browser context that is closed afterwards.
pub(crate) const PLAYWRIGHT_SESSION_SCRIPT: &str = r#"
const [, url, navTimeout, idleTimeout, headlessFlag] = process.argv;
const readline = require('readline');

const STYLE_KEYS = [
  'font-family', 'font-size', 'font-weight', 'line-height', 'color',
  'background-color', 'margin', 'padding', 'border-radius', 'display'
];

function write(payload) {
  process.stdout.write(JSON.stringify(payload) + '\n');
}

function errMessage(err) {
  return err && err.message ? err.message : String(err);
}

function extractElements(keys) {
  const cssPath = (el) => {
    const parts = [];
    let node = el;
    while (node && node.nodeType === Node.ELEMENT_NODE && node !== document.documentElement) {
      const tag = node.tagName.toLowerCase();
      if (node.id) {
        parts.unshift(`${tag}#${CSS.escape(node.id)}`);
        break;
      }
      let index = 1;
      let sibling = node;
      while ((sibling = sibling.previousElementSibling)) {
        if (sibling.tagName === node.tagName) index++;
      }
      parts.unshift(`${tag}:nth-of-type(${index})`);
      node = node.parentElement;
    }
    return parts.join(' > ');
  };

  const out = [];
  for (const el of document.body.querySelectorAll('*')) {
    const rect = el.getBoundingClientRect();
    if (rect.width <= 0 || rect.height <= 0) continue;
    const style = window.getComputedStyle(el);
    if (style.visibility === 'hidden' || style.display === 'none') continue;
    const computed = {};
    for (const key of keys) {
      computed[key] = style.getPropertyValue(key) || null;
    }
    out.push({
      selector: cssPath(el),
      tag: el.tagName.toLowerCase(),
      id: el.id || null,
      classes: Array.from(el.classList),
      boundingBox: {
        x: rect.x + window.scrollX,
        y: rect.y + window.scrollY,
        width: rect.width,
        height: rect.height
      },
      computedStyle: computed
    });
  }
  return out;
}

async function run() {
  let browser;
  try {
    const { chromium } = require('playwright');
    browser = await chromium.launch({ headless: headlessFlag !== '0' });
  } catch (err) {
    console.error(JSON.stringify({ status: 'error', message: errMessage(err) }));
    process.exitCode = 1;
    return;
  }

  write({ status: 'ready' });
  const navMs = parseInt(navTimeout, 10);
  const idleMs = parseInt(idleTimeout, 10);
  const rl = readline.createInterface({ input: process.stdin, terminal: false });

  for await (const line of rl) {
    if (!line.trim()) continue;
    let context;
    try {
      const request = JSON.parse(line);
      context = await browser.newContext({
        viewport: { width: request.viewport.width, height: request.viewport.height }
      });
      const page = await context.newPage();
      await page.goto(url, { waitUntil: 'networkidle', timeout: navMs });
      await page.waitForLoadState('networkidle', { timeout: idleMs });
      if (request.screenshotPath) {
        await page.screenshot({ path: request.screenshotPath, fullPage: true });
      }
      const elements = await page.evaluate(extractElements, STYLE_KEYS);
      write({ status: 'ok', elements, screenshot: request.screenshotPath || null });
    } catch (err) {
      write({ status: 'error', message: errMessage(err) });
    } finally {
      if (context) {
        await context.close().catch(() => {});
      }
    }
  }

  await browser.close();
}

run();
"#;

/// Timeout for checking node/playwright availability.
pub(crate) const NODE_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// Script to check if Playwright is installed.
const PLAYWRIGHT_CHECK_SCRIPT: &str = "require('playwright'); process.stdout.write('ok');";

/// Error line printed by the helper on stderr before exiting.
#[derive(Debug, serde::Deserialize)]
pub(crate) struct ScriptError {
    pub status: String,
    pub message: String,
}

/// Maps a spawn error to an appropriate DccError.
pub(crate) fn map_spawn_error(err: io::Error, command: &str) -> DccError {
    if err.kind() == io::ErrorKind::NotFound {
        DccError::capture(format!(
            "Unable to spawn Playwright helper; '{}' was not found on PATH",
            command
        ))
    } else {
        DccError::Io(err)
    }
}

/// Maps Playwright stderr output to an appropriate DccError.
pub(crate) fn map_playwright_error(status_text: impl Into<String>, stderr: &str) -> DccError {
    let last_line = stderr.lines().rev().find(|l| !l.trim().is_empty()).unwrap_or("");
    if let Ok(error) = serde_json::from_str::<ScriptError>(last_line) {
        return map_playwright_status_error(&error.status, error.message);
    }

    let lower = stderr.to_ascii_lowercase();

    if lower.contains("cannot find module 'playwright'") {
        return missing_playwright();
    }

    if lower.contains("executable doesn't exist") {
        return missing_chromium();
    }

    if lower.contains("timeout") {
        return DccError::capture(
            "Playwright timed out; try increasing --nav-timeout or --process-timeout, and ensure the page finishes loading."
                .to_string(),
        );
    }

    DccError::capture(format!(
        "Playwright exited with status {}: {}",
        status_text.into(),
        stderr.trim()
    ))
}

/// Maps a Playwright status error to an appropriate DccError.
pub(crate) fn map_playwright_status_error(status: &str, message: String) -> DccError {
    let lower = message.to_ascii_lowercase();
    if lower.contains("cannot find module 'playwright'") {
        missing_playwright()
    } else if lower.contains("executable doesn't exist") {
        missing_chromium()
    } else if lower.contains("timeout") {
        DccError::capture(format!(
            "Playwright error (status {}): {}. Hint: increase --nav-timeout or --process-timeout, and ensure the page finishes loading.",
            status, message
        ))
    } else {
        DccError::capture(format!("Playwright error (status {}): {}", status, message))
    }
}

fn missing_playwright() -> DccError {
    DccError::capture(
        "Playwright npm package is missing; install with `npm install playwright`.".to_string(),
    )
}

fn missing_chromium() -> DccError {
    DccError::capture(
        "Playwright could not find its Chromium executable; download it with `npx playwright install chromium`."
            .to_string(),
    )
}

/// Ensures Node.js is available on the system.
pub(crate) async fn ensure_node_available(node_command: &str) -> Result<()> {
    let mut cmd = Command::new(node_command);
    cmd.arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null());

    let status = tokio::time::timeout(NODE_CHECK_TIMEOUT, cmd.status())
        .await
        .map_err(|_| {
            DccError::capture(format!(
                "Timed out checking node availability after {:?}",
                NODE_CHECK_TIMEOUT
            ))
        })?
        .map_err(|err| map_spawn_error(err, node_command))?;

    if !status.success() {
        return Err(DccError::capture(format!(
            "Node command {:?} is not available (exit {})",
            node_command, status
        )));
    }

    Ok(())
}

/// Ensures Playwright npm package is installed.
pub(crate) async fn ensure_playwright_available(node_command: &str) -> Result<()> {
    let mut cmd = Command::new(node_command);
    cmd.arg("-e")
        .arg(PLAYWRIGHT_CHECK_SCRIPT)
        .stdout(Stdio::null())
        .stderr(Stdio::piped());

    let output = tokio::time::timeout(NODE_CHECK_TIMEOUT, cmd.output())
        .await
        .map_err(|_| {
            DccError::capture(format!(
                "Timed out checking Playwright availability after {:?}",
                NODE_CHECK_TIMEOUT
            ))
        })?
        .map_err(|err| map_spawn_error(err, node_command))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(map_playwright_error(
            format!("{:?}", output.status),
            &stderr,
        ));
    }

    Ok(())
}
