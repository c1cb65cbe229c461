//! The browser fixture: one WebDriver session per UI check.

use crate::config::{BrowserKind, Settings};
use crate::error::CheckError;
use crate::session::connector;
use fantoccini::error::NewSessionError;
use fantoccini::wd::Capabilities;
use fantoccini::{Client, ClientBuilder};
use std::future::Future;

/// The capabilities requested for `settings.browser`.
pub fn capabilities(settings: &Settings) -> Capabilities {
    let mut caps = Capabilities::new();
    match settings.browser {
        BrowserKind::Firefox => {
            let mut args = Vec::new();
            if settings.headless {
                args.push("--headless");
            }
            caps.insert(
                "moz:firefoxOptions".to_string(),
                serde_json::json!({ "args": args }),
            );
        }
        BrowserKind::Chrome => {
            let args: &[&str] = if settings.headless {
                &[
                    "--headless",
                    "--disable-gpu",
                    "--no-sandbox",
                    "--disable-dev-shm-usage",
                    "--window-size=1920,1080",
                ]
            } else {
                &["--start-maximized"]
            };
            caps.insert(
                "goog:chromeOptions".to_string(),
                serde_json::json!({ "args": args }),
            );
        }
    }
    caps
}

/// Start a new browser session against the configured WebDriver server.
pub async fn connect(settings: &Settings) -> Result<Client, NewSessionError> {
    let mut builder = ClientBuilder::new(connector().map_err(NewSessionError::Lost)?);
    builder.capabilities(capabilities(settings));
    tracing::info!(
        browser = %settings.browser,
        webdriver = %settings.webdriver_url,
        "starting browser session"
    );
    builder.connect(settings.webdriver_url.as_str()).await
}

/// Run `f` with a fresh browser session, and end the session afterwards whether or not `f`
/// succeeded.
pub async fn with_browser<F, FF, T>(settings: &Settings, f: F) -> Result<T, CheckError>
where
    F: FnOnce(Client) -> FF,
    FF: Future<Output = Result<T, CheckError>>,
{
    let client = connect(settings).await?;
    let res = f(client.clone()).await;
    if let Err(e) = client.close().await {
        tracing::warn!(error = %e, "failed to close browser session");
    }
    res
}
