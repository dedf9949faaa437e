//! Synchronous DOM probes evaluated in the page.

use super::FailureKind;
use eoka::Page;
use std::time::{Duration, Instant};

/// Poll interval for condition waits.
const POLL_INTERVAL_MS: u64 = 100;

/// Whether the first element matching `selector` exists, has layout, and is
/// not `visibility: hidden`.
pub async fn is_visible(page: &Page, selector: &str) -> eoka::Result<bool> {
    let js = format!(
        r#"(() => {{
            const el = document.querySelector({sel});
            if (!el) return false;
            const rect = el.getBoundingClientRect();
            if (rect.width === 0 || rect.height === 0) return false;
            return getComputedStyle(el).visibility !== 'hidden';
        }})()"#,
        sel = serde_json::to_string(selector).unwrap()
    );
    page.evaluate(&js).await
}

/// Current value of the element's title attribute. None when the element is
/// detached or has no title.
async fn title_of(page: &Page, selector: &str) -> eoka::Result<Option<String>> {
    let js = format!(
        "document.querySelector({})?.getAttribute('title')",
        serde_json::to_string(selector).unwrap()
    );
    page.evaluate(&js).await
}

/// Poll until the element's title attribute equals `expected`, bounded by
/// `timeout_ms`.
pub async fn wait_for_title(
    page: &Page,
    selector: &str,
    expected: &str,
    timeout_ms: u64,
) -> std::result::Result<(), FailureKind> {
    let deadline = Instant::now() + Duration::from_millis(timeout_ms);
    loop {
        match title_of(page, selector).await {
            Ok(Some(ref title)) if title == expected => return Ok(()),
            Ok(_) => {}
            Err(e) => {
                return Err(FailureKind::Selector(format!(
                    "reading title of '{}': {}",
                    selector, e
                )))
            }
        }
        if Instant::now() >= deadline {
            return Err(FailureKind::Timeout(format!(
                "title of '{}' did not become '{}' within {}ms",
                selector, expected, timeout_ms
            )));
        }
        page.wait(POLL_INTERVAL_MS).await;
    }
}
