use crate::wait::Poll;
use crate::Settings;
use fantoccini::error::CmdError;
use fantoccini::{Client, Locator};
use url::Url;

const USERNAME_INPUT: Locator<'static> = Locator::Id("Username");
const PASSWORD_INPUT: Locator<'static> = Locator::Id("Password");
const SUBMIT_BUTTON: Locator<'static> = Locator::Css("button[type='submit']");

/// The dashboard's login form.
#[derive(Clone, Debug)]
pub struct LoginPage {
    client: Client,
    url: Url,
    poll: Poll,
}

impl LoginPage {
    /// A login page for the dashboard configured in `settings`.
    pub fn new(client: &Client, settings: &Settings) -> Self {
        LoginPage {
            client: client.clone(),
            url: settings.ui_base_url.clone(),
            poll: Poll::new(settings.wait_timeout).every(settings.poll_interval),
        }
    }

    /// Navigate to the login page.
    ///
    /// Call this before [`LoginPage::login`].
    pub async fn load(&self) -> Result<(), CmdError> {
        tracing::debug!(url = %self.url, "loading login page");
        self.client.goto(self.url.as_str()).await
    }

    /// Fill in the credentials and submit the form.
    pub async fn login(&self, username: &str, password: &str) -> Result<(), CmdError> {
        let user = super::visible(&self.client, &self.poll, USERNAME_INPUT).await?;
        user.send_keys(username).await?;
        let pass = self.client.find(PASSWORD_INPUT).await?;
        pass.send_keys(password).await?;
        self.client.find(SUBMIT_BUTTON).await?.click().await?;
        tracing::info!(username, "logged in");
        Ok(())
    }
}
