use crate::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Top-level verification config.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Name of this verification flow.
    pub name: String,

    /// Browser configuration.
    #[serde(default)]
    pub browser: BrowserConfig,

    /// Target URL to navigate to.
    pub target: TargetUrl,

    /// Readiness gate checked after navigation.
    pub ready: ReadyCheck,

    /// The element to find and click.
    pub button: ButtonSpec,

    /// How to decide the UI has finished reacting to the click.
    #[serde(default)]
    pub settle: SettleSpec,

    /// Screenshot artifact paths.
    #[serde(default)]
    pub screenshots: Screenshots,

    /// Failure handling (optional).
    pub on_failure: Option<OnFailure>,
}

impl Config {
    /// Load config from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Parse config from a YAML string.
    pub fn parse(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the config.
    fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(Error::Config("name is required".into()));
        }
        if self.target.url.is_empty() {
            return Err(Error::Config("target.url is required".into()));
        }
        if self.ready.text.is_empty() {
            return Err(Error::Config("ready.text is required".into()));
        }
        match (&self.button.title, &self.button.selector) {
            (Some(_), Some(_)) => {
                return Err(Error::Config(
                    "button: specify either 'title' or 'selector', not both".into(),
                ));
            }
            (None, None) => {
                return Err(Error::Config(
                    "button: either 'title' or 'selector' is required".into(),
                ));
            }
            _ => {}
        }
        if self.settle.title_becomes.is_some() && self.settle.timeout_ms == 0 {
            return Err(Error::Config(
                "settle.timeout_ms must be at least 1 when a condition is set".into(),
            ));
        }
        Ok(())
    }
}

/// Browser launch configuration.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct BrowserConfig {
    /// Run in headless mode.
    #[serde(default)]
    pub headless: bool,

    /// Custom user agent.
    pub user_agent: Option<String>,

    /// Viewport size.
    pub viewport: Option<Viewport>,
}

/// Viewport dimensions.
#[derive(Debug, Clone, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// Target URL configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct TargetUrl {
    /// URL to navigate to.
    pub url: String,
}

fn default_ready_timeout_ms() -> u64 {
    10000
}

/// Text that must appear before the page counts as rendered.
#[derive(Debug, Clone, Deserialize)]
pub struct ReadyCheck {
    /// Marker text to wait for.
    pub text: String,

    /// Wait budget for the marker.
    #[serde(default = "default_ready_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_button_label() -> String {
    "Button".into()
}

/// The element under verification, found by title attribute or raw CSS
/// selector. The first match in document order wins.
#[derive(Debug, Clone, Deserialize)]
pub struct ButtonSpec {
    /// Match `button[title="..."]`.
    pub title: Option<String>,

    /// Raw CSS selector, used verbatim.
    pub selector: Option<String>,

    /// Display name used in the printed outcome lines.
    #[serde(default = "default_button_label")]
    pub label: String,
}

impl ButtonSpec {
    /// CSS selector for the element.
    pub fn css(&self) -> String {
        match (&self.selector, &self.title) {
            (Some(sel), _) => sel.clone(),
            (None, Some(title)) => {
                format!("button[title={}]", serde_json::to_string(title).unwrap())
            }
            // validate() rules this out
            (None, None) => String::new(),
        }
    }
}

fn default_settle_timeout_ms() -> u64 {
    5000
}
fn default_settle_fallback_ms() -> u64 {
    1000
}

/// Post-click settle strategy. With `title_becomes` set, the runner polls the
/// element's title attribute until it matches, bounded by `timeout_ms`.
/// Without it, the runner sleeps `fallback_ms`.
#[derive(Debug, Clone, Deserialize)]
pub struct SettleSpec {
    /// Wait until the element's title attribute equals this value.
    pub title_becomes: Option<String>,

    /// Bound on the condition wait.
    #[serde(default = "default_settle_timeout_ms")]
    pub timeout_ms: u64,

    /// Fixed wait used when no condition is configured.
    #[serde(default = "default_settle_fallback_ms")]
    pub fallback_ms: u64,
}

impl Default for SettleSpec {
    fn default() -> Self {
        Self {
            title_becomes: None,
            timeout_ms: default_settle_timeout_ms(),
            fallback_ms: default_settle_fallback_ms(),
        }
    }
}

fn default_initial_path() -> String {
    "verification_initial.png".into()
}
fn default_after_click_path() -> String {
    "verification_playing.png".into()
}

/// Screenshot artifact paths, overwritten on every run.
#[derive(Debug, Clone, Deserialize)]
pub struct Screenshots {
    /// Capture taken once the ready marker appears.
    #[serde(default = "default_initial_path")]
    pub initial: String,

    /// Capture taken after the click settles.
    #[serde(default = "default_after_click_path")]
    pub after_click: String,
}

impl Default for Screenshots {
    fn default() -> Self {
        Self {
            initial: default_initial_path(),
            after_click: default_after_click_path(),
        }
    }
}

/// Failure handling configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct OnFailure {
    /// Screenshot path on failure (supports {timestamp}).
    pub screenshot: Option<String>,
}
