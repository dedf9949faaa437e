mod probe;

use crate::config::{BrowserConfig, Config};
use crate::Result;
use eoka::{Browser, Page};
use std::fmt;
use std::path::PathBuf;
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use tracing::{debug, info, warn};

/// What one verification run concluded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Button was visible, got clicked, and the post-click capture was written.
    Clicked,
    /// Page rendered but no visible element matched the configured button.
    /// Not a failure: the flow completes with the initial capture only.
    ButtonMissing,
    /// A step failed and the remaining steps were skipped.
    Failed(FailureKind),
}

/// Classified step failure, so callers can assert on the kind instead of
/// parsing printed text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    /// Navigation to the target did not complete.
    Navigation(String),
    /// A bounded wait expired (ready marker or settle condition).
    Timeout(String),
    /// Probing or clicking the button selector failed.
    Selector(String),
    /// The browser engine errored outside the cases above.
    Browser(String),
    /// Writing an artifact failed.
    Io(String),
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Navigation(msg) => write!(f, "navigation: {}", msg),
            Self::Timeout(msg) => write!(f, "timeout: {}", msg),
            Self::Selector(msg) => write!(f, "selector: {}", msg),
            Self::Browser(msg) => write!(f, "browser: {}", msg),
            Self::Io(msg) => write!(f, "io: {}", msg),
        }
    }
}

/// Result of one verification run.
#[derive(Debug)]
pub struct VerifyReport {
    /// What the run concluded.
    pub outcome: Outcome,
    /// Total duration in milliseconds.
    pub duration_ms: u64,
    /// Artifacts written by this run, in capture order. A stale file from a
    /// previous run never appears here.
    pub screenshots: Vec<PathBuf>,
}

/// Drives one page through the configured verification flow.
pub struct Runner {
    browser: Browser,
    page: Page,
}

impl Runner {
    /// Launch a browser per the config.
    pub async fn new(config: &BrowserConfig) -> Result<Self> {
        let stealth = eoka::StealthConfig {
            headless: config.headless,
            user_agent: config.user_agent.clone(),
            viewport_width: config.viewport.as_ref().map(|v| v.width).unwrap_or(1280),
            viewport_height: config.viewport.as_ref().map(|v| v.height).unwrap_or(720),
            ..Default::default()
        };

        debug!("Launching browser (headless: {})", config.headless);
        let browser = Browser::launch_with_config(stealth).await?;
        let page = browser.new_page("about:blank").await?;

        Ok(Self { browser, page })
    }

    /// Run the verification flow. Step failures are absorbed into the
    /// report's outcome; the browser stays usable and still owed a `close`.
    pub async fn verify(&mut self, config: &Config) -> VerifyReport {
        let start = Instant::now();
        let mut written = Vec::new();

        let outcome = match self.run_steps(config, &mut written).await {
            Ok(outcome) => outcome,
            Err(kind) => {
                warn!("Verification failed: {}", kind);
                self.handle_failure(config).await;
                Outcome::Failed(kind)
            }
        };

        VerifyReport {
            outcome,
            duration_ms: start.elapsed().as_millis() as u64,
            screenshots: written,
        }
    }

    async fn run_steps(
        &mut self,
        config: &Config,
        written: &mut Vec<PathBuf>,
    ) -> std::result::Result<Outcome, FailureKind> {
        info!("Navigating to: {}", config.target.url);
        self.page
            .goto(&config.target.url)
            .await
            .map_err(|e| FailureKind::Navigation(e.to_string()))?;

        debug!("Waiting for ready marker: '{}'", config.ready.text);
        self.page
            .wait_for_text(&config.ready.text, config.ready.timeout_ms)
            .await
            .map_err(|e| {
                FailureKind::Timeout(format!(
                    "ready marker '{}' did not appear: {}",
                    config.ready.text, e
                ))
            })?;

        self.capture(&config.screenshots.initial, written).await?;

        let selector = config.button.css();
        let visible = probe::is_visible(&self.page, &selector)
            .await
            .map_err(|e| FailureKind::Selector(format!("probing '{}': {}", selector, e)))?;

        if !visible {
            info!("No visible match for '{}', skipping click", selector);
            return Ok(Outcome::ButtonMissing);
        }

        info!("Clicking: {}", selector);
        self.page
            .click(&selector)
            .await
            .map_err(|e| FailureKind::Selector(format!("clicking '{}': {}", selector, e)))?;

        self.settle(config, &selector).await?;
        self.capture(&config.screenshots.after_click, written).await?;

        Ok(Outcome::Clicked)
    }

    /// Capture a screenshot and record the artifact path.
    async fn capture(
        &self,
        path: &str,
        written: &mut Vec<PathBuf>,
    ) -> std::result::Result<(), FailureKind> {
        info!("Screenshot: {}", path);
        let data = self
            .page
            .screenshot()
            .await
            .map_err(|e| FailureKind::Browser(e.to_string()))?;
        std::fs::write(path, data)
            .map_err(|e| FailureKind::Io(format!("writing '{}': {}", path, e)))?;
        written.push(PathBuf::from(path));
        Ok(())
    }

    /// Wait for the UI to finish reacting to the click: poll the configured
    /// title condition when one is set, otherwise sleep the fixed fallback.
    async fn settle(
        &self,
        config: &Config,
        selector: &str,
    ) -> std::result::Result<(), FailureKind> {
        match config.settle.title_becomes {
            Some(ref expected) => {
                debug!("Settle: waiting for title '{}'", expected);
                probe::wait_for_title(&self.page, selector, expected, config.settle.timeout_ms)
                    .await
            }
            None => {
                debug!("Settle: fixed {}ms", config.settle.fallback_ms);
                self.page.wait(config.settle.fallback_ms).await;
                Ok(())
            }
        }
    }

    /// Best-effort failure artifact. Never turns a step failure into a panic
    /// or a second error.
    async fn handle_failure(&self, config: &Config) {
        if let Some(ref on_failure) = config.on_failure {
            if let Some(ref screenshot_path) = on_failure.screenshot {
                let timestamp = SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .map(|d| d.as_secs())
                    .unwrap_or(0);
                let path = screenshot_path.replace("{timestamp}", &timestamp.to_string());
                info!("Saving failure screenshot to: {}", path);
                if let Ok(data) = self.page.screenshot().await {
                    if let Err(e) = std::fs::write(&path, data) {
                        warn!("Failed to save failure screenshot: {}", e);
                    }
                }
            }
        }
    }

    /// Close the browser.
    pub async fn close(self) -> Result<()> {
        self.browser.close().await?;
        Ok(())
    }
}
