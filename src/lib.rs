//! # ui-verify
//!
//! Config-based UI smoke verification. Define one flow in YAML — navigate,
//! wait for a ready marker, screenshot, click a titled button, let the UI
//! settle, screenshot again — and execute it against a running dev server.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ui_verify::{Config, Runner};
//!
//! # #[tokio::main]
//! # async fn main() -> ui_verify::Result<()> {
//! let config = Config::load("configs/story_selector.yaml")?;
//! let mut runner = Runner::new(&config.browser).await?;
//! let report = runner.verify(&config).await;
//! println!("Outcome: {:?}", report.outcome);
//! runner.close().await?;
//! # Ok(())
//! # }
//! ```

mod config;
mod runner;

pub use config::{
    BrowserConfig, ButtonSpec, Config, OnFailure, ReadyCheck, Screenshots, SettleSpec, TargetUrl,
    Viewport,
};
pub use runner::{FailureKind, Outcome, Runner, VerifyReport};

/// Result type for ui-verify operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during config loading or browser lifecycle.
/// Failures inside the verification flow itself are reported as
/// [`FailureKind`] values on the run's outcome instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("yaml parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("browser error: {0}")]
    Browser(#[from] eoka::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_config() {
        let yaml = r#"
name: "Test"
target:
  url: "http://localhost:5173"
ready:
  text: "Welcome"
button:
  title: "Play"
"#;
        let config = Config::parse(yaml).unwrap();
        assert_eq!(config.name, "Test");
        assert_eq!(config.target.url, "http://localhost:5173");
        assert_eq!(config.ready.text, "Welcome");
        assert!(!config.browser.headless);
    }

    #[test]
    fn test_defaults() {
        let yaml = r#"
name: "Test"
target:
  url: "http://localhost:5173"
ready:
  text: "Welcome"
button:
  title: "Play"
"#;
        let config = Config::parse(yaml).unwrap();
        assert_eq!(config.ready.timeout_ms, 10000);
        assert_eq!(config.button.label, "Button");
        assert!(config.settle.title_becomes.is_none());
        assert_eq!(config.settle.timeout_ms, 5000);
        assert_eq!(config.settle.fallback_ms, 1000);
        assert_eq!(config.screenshots.initial, "verification_initial.png");
        assert_eq!(config.screenshots.after_click, "verification_playing.png");
        assert!(config.on_failure.is_none());
    }

    #[test]
    fn test_parse_browser_config() {
        let yaml = r#"
name: "Test"
browser:
  headless: true
  user_agent: "Custom UA"
  viewport:
    width: 1920
    height: 1080
target:
  url: "http://localhost:5173"
ready:
  text: "Welcome"
button:
  title: "Play"
"#;
        let config = Config::parse(yaml).unwrap();
        assert!(config.browser.headless);
        assert_eq!(config.browser.user_agent, Some("Custom UA".into()));
        let viewport = config.browser.viewport.unwrap();
        assert_eq!(viewport.width, 1920);
        assert_eq!(viewport.height, 1080);
    }

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
name: "Test"
target:
  url: "http://localhost:5173"
ready:
  text: "Welcome"
  timeout_ms: 3000
button:
  title: "Play the story"
  label: "Play button"
settle:
  title_becomes: "Stop the story"
  timeout_ms: 2000
screenshots:
  initial: "before.png"
  after_click: "after.png"
on_failure:
  screenshot: "error_{timestamp}.png"
"#;
        let config = Config::parse(yaml).unwrap();
        assert_eq!(config.ready.timeout_ms, 3000);
        assert_eq!(config.button.label, "Play button");
        assert_eq!(config.settle.title_becomes, Some("Stop the story".into()));
        assert_eq!(config.settle.timeout_ms, 2000);
        assert_eq!(config.screenshots.initial, "before.png");
        assert_eq!(config.screenshots.after_click, "after.png");
        let on_failure = config.on_failure.unwrap();
        assert_eq!(on_failure.screenshot, Some("error_{timestamp}.png".into()));
    }

    #[test]
    fn test_button_selector_from_title() {
        let yaml = r#"
name: "Test"
target:
  url: "http://localhost:5173"
ready:
  text: "Welcome"
button:
  title: "Écouter la description"
"#;
        let config = Config::parse(yaml).unwrap();
        assert_eq!(
            config.button.css(),
            r#"button[title="Écouter la description"]"#
        );
    }

    #[test]
    fn test_button_selector_escapes_quotes() {
        let yaml = r#"
name: "Test"
target:
  url: "http://localhost:5173"
ready:
  text: "Welcome"
button:
  title: 'Say "hello"'
"#;
        let config = Config::parse(yaml).unwrap();
        assert_eq!(config.button.css(), r#"button[title="Say \"hello\""]"#);
    }

    #[test]
    fn test_button_raw_selector_verbatim() {
        let yaml = r##"
name: "Test"
target:
  url: "http://localhost:5173"
ready:
  text: "Welcome"
button:
  selector: "#listen-btn"
"##;
        let config = Config::parse(yaml).unwrap();
        assert_eq!(config.button.css(), "#listen-btn");
    }

    #[test]
    fn test_validation_missing_name() {
        let yaml = r#"
target:
  url: "http://localhost:5173"
ready:
  text: "Welcome"
button:
  title: "Play"
"#;
        let result = Config::parse(yaml);
        assert!(result.is_err());
    }

    #[test]
    fn test_validation_empty_name() {
        let yaml = r#"
name: ""
target:
  url: "http://localhost:5173"
ready:
  text: "Welcome"
button:
  title: "Play"
"#;
        let result = Config::parse(yaml);
        assert!(result.is_err());
    }

    #[test]
    fn test_validation_empty_url() {
        let yaml = r#"
name: "Test"
target:
  url: ""
ready:
  text: "Welcome"
button:
  title: "Play"
"#;
        let result = Config::parse(yaml);
        assert!(result.is_err());
    }

    #[test]
    fn test_validation_empty_ready_text() {
        let yaml = r#"
name: "Test"
target:
  url: "http://localhost:5173"
ready:
  text: ""
button:
  title: "Play"
"#;
        let result = Config::parse(yaml);
        assert!(result.is_err());
    }

    #[test]
    fn test_validation_button_needs_title_or_selector() {
        let yaml = r#"
name: "Test"
target:
  url: "http://localhost:5173"
ready:
  text: "Welcome"
button:
  label: "Play button"
"#;
        let result = Config::parse(yaml);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("either 'title' or 'selector'"));
    }

    #[test]
    fn test_validation_button_title_and_selector_exclusive() {
        let yaml = r##"
name: "Test"
target:
  url: "http://localhost:5173"
ready:
  text: "Welcome"
button:
  title: "Play"
  selector: "#play"
"##;
        let result = Config::parse(yaml);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("not both"));
    }

    #[test]
    fn test_validation_zero_settle_timeout_with_condition() {
        let yaml = r#"
name: "Test"
target:
  url: "http://localhost:5173"
ready:
  text: "Welcome"
button:
  title: "Play"
settle:
  title_becomes: "Stop"
  timeout_ms: 0
"#;
        let result = Config::parse(yaml);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("at least 1"));
    }

    #[test]
    fn test_load_shipped_config() {
        let config = Config::load("configs/story_selector.yaml").unwrap();
        assert_eq!(config.name, "Story selector verification");
        assert_eq!(config.target.url, "http://localhost:5173");
        assert_eq!(config.ready.text, "Aventure Lecture");
        assert_eq!(
            config.button.css(),
            r#"button[title="Écouter la description"]"#
        );
        assert_eq!(config.button.label, "Listen button");
        assert_eq!(config.settle.fallback_ms, 1000);
        assert_eq!(config.screenshots.initial, "verification_initial.png");
        assert_eq!(config.screenshots.after_click, "verification_playing.png");
    }
}
