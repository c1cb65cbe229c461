//! Page objects for the employee dashboard.
//!
//! Each page object owns a handle to the browser session and a table of locators, and exposes
//! the user-level actions of its page. Lookups wait for the element to reach the state the
//! action needs (present, visible, or clickable) before touching it.

use crate::wait::Poll;
use fantoccini::elements::Element;
use fantoccini::error::CmdError;
use fantoccini::{Client, Locator};

mod dashboard;
mod login;

pub use self::dashboard::DashboardPage;
pub use self::login::LoginPage;

const SCROLL_INTO_VIEW: &str = "arguments[0].scrollIntoView({block: 'center'});";

/// Wait for an element to be present on the page.
pub async fn present(
    client: &Client,
    poll: &Poll,
    locator: Locator<'_>,
) -> Result<Element, CmdError> {
    poll.until(|| async move {
        match client.find(locator).await {
            Ok(e) => Ok(Some(e)),
            Err(e) if e.is_no_such_element() => Ok(None),
            Err(e) => Err(e),
        }
    })
    .await
}

/// Wait for an element to be present and displayed.
pub async fn visible(
    client: &Client,
    poll: &Poll,
    locator: Locator<'_>,
) -> Result<Element, CmdError> {
    poll.until(|| async move {
        let e = match client.find(locator).await {
            Ok(e) => e,
            Err(e) if e.is_no_such_element() => return Ok(None),
            Err(e) => return Err(e),
        };
        let shown = e.is_displayed().await;
        match shown {
            Ok(true) => Ok(Some(e)),
            Ok(false) => Ok(None),
            Err(e) if e.is_no_such_element() => Ok(None),
            Err(e) => Err(e),
        }
    })
    .await
}

/// Wait for an element to be present, displayed and enabled.
pub async fn clickable(
    client: &Client,
    poll: &Poll,
    locator: Locator<'_>,
) -> Result<Element, CmdError> {
    poll.until(|| async move {
        let e = match client.find(locator).await {
            Ok(e) => e,
            Err(e) if e.is_no_such_element() => return Ok(None),
            Err(e) => return Err(e),
        };
        let ready = match e.is_displayed().await {
            Ok(true) => e.is_enabled().await,
            other => other,
        };
        match ready {
            Ok(true) => Ok(Some(e)),
            Ok(false) => Ok(None),
            Err(e) if e.is_no_such_element() => Ok(None),
            Err(e) => Err(e),
        }
    })
    .await
}

/// Scroll `element` to the vertical center of the viewport.
pub async fn scroll_into_view(client: &Client, element: &Element) -> Result<(), CmdError> {
    let arg = serde_json::to_value(element).map_err(CmdError::Json)?;
    client.execute(SCROLL_INTO_VIEW, vec![arg]).await?;
    Ok(())
}

/// Replace the contents of an input with `text`.
pub async fn replace_text(element: &Element, text: &str) -> Result<(), CmdError> {
    element.clear().await?;
    element.send_keys(text).await
}
