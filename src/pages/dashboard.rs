use crate::wait::Poll;
use crate::Settings;
use fantoccini::elements::Element;
use fantoccini::error::CmdError;
use fantoccini::{Client, Locator};
use std::fmt::Display;
use std::time::Duration;

/// How long a freshly loaded table gets to fill in before it is taken to be empty.
const TABLE_LOAD_GRACE: Duration = Duration::from_secs(3);

const ADD_EMPLOYEE_BUTTON: Locator<'static> = Locator::Id("add");
const FIRST_NAME_INPUT: Locator<'static> = Locator::Id("firstName");
const LAST_NAME_INPUT: Locator<'static> = Locator::Id("lastName");
const DEPENDANTS_INPUT: Locator<'static> = Locator::Id("dependants");
const SUBMIT_EMPLOYEE_BUTTON: Locator<'static> = Locator::Id("addEmployee");
const UPDATE_EMPLOYEE_BUTTON: Locator<'static> = Locator::Id("updateEmployee");

const EMPLOYEE_TABLE: Locator<'static> = Locator::Css("table tbody");
const EMPLOYEE_ROWS: Locator<'static> = Locator::Css("table tbody tr");
const EDIT_EMPLOYEE_BUTTON: Locator<'static> = Locator::Css("td:last-child i.fa-edit");
const DELETE_EMPLOYEE_BUTTON: Locator<'static> = Locator::Css("td:last-child i.fa-times");
const DELETE_CONFIRMATION: Locator<'static> = Locator::Id("deleteEmployee");

/// Any of the markers the dashboard might use for a field validation message.
pub const VALIDATION_ERROR: Locator<'static> =
    Locator::Css(".field-validation-error, .error, .text-danger");

/// The employee table and its add/edit/delete modals.
#[derive(Clone, Debug)]
pub struct DashboardPage {
    client: Client,
    poll: Poll,
}

impl DashboardPage {
    /// A dashboard page that waits as long as `settings` allows.
    pub fn new(client: &Client, settings: &Settings) -> Self {
        DashboardPage {
            client: client.clone(),
            poll: Poll::new(settings.wait_timeout).every(settings.poll_interval),
        }
    }

    /// The browser session this page drives.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Wait until the dashboard can be used: the add button is clickable and the employee table
    /// is on the page.
    pub async fn wait_until_ready(&self) -> Result<(), CmdError> {
        super::clickable(&self.client, &self.poll, ADD_EMPLOYEE_BUTTON).await?;
        super::present(&self.client, &self.poll, EMPLOYEE_TABLE).await?;
        Ok(())
    }

    /// Open the "add employee" modal.
    pub async fn click_add_employee(&self) -> Result<(), CmdError> {
        let button = super::clickable(&self.client, &self.poll, ADD_EMPLOYEE_BUTTON).await?;
        super::scroll_into_view(&self.client, &button).await?;
        button.click().await
    }

    /// Submit the "add employee" modal.
    pub async fn click_submit_button(&self) -> Result<(), CmdError> {
        super::clickable(&self.client, &self.poll, SUBMIT_EMPLOYEE_BUTTON)
            .await?
            .click()
            .await
    }

    /// Submit the "edit employee" modal.
    pub async fn click_update_button(&self) -> Result<(), CmdError> {
        super::clickable(&self.client, &self.poll, UPDATE_EMPLOYEE_BUTTON)
            .await?
            .click()
            .await
    }

    /// Fill the open modal's fields.
    ///
    /// `dependants` is typed as-is, so out-of-range values such as `-1` can be entered.
    pub async fn fill_employee_form(
        &self,
        first_name: &str,
        last_name: &str,
        dependants: impl Display,
    ) -> Result<(), CmdError> {
        let input = super::visible(&self.client, &self.poll, FIRST_NAME_INPUT).await?;
        super::replace_text(&input, first_name).await?;

        let input = super::visible(&self.client, &self.poll, LAST_NAME_INPUT).await?;
        super::replace_text(&input, last_name).await?;

        let input = super::visible(&self.client, &self.poll, DEPENDANTS_INPUT).await?;
        super::replace_text(&input, &dependants.to_string()).await
    }

    /// The rows currently shown in the employee table.
    ///
    /// The table body may legitimately be empty, so this does not wait for rows to appear.
    pub async fn employee_rows(&self) -> Result<Vec<Element>, CmdError> {
        self.client.find_all(EMPLOYEE_ROWS).await
    }

    /// The number of rows currently shown in the employee table.
    pub async fn employee_count(&self) -> Result<usize, CmdError> {
        Ok(self.employee_rows().await?.len())
    }

    /// The number of rows once the table has loaded its data.
    ///
    /// The table body renders before its rows arrive, so this gives the rows a short grace
    /// period to show up and only then reports an empty table.
    pub async fn loaded_employee_count(&self) -> Result<usize, CmdError> {
        match self.wait_for_rows(|n| n > 0, TABLE_LOAD_GRACE).await {
            Ok(n) => Ok(n),
            Err(CmdError::WaitTimeout) => Ok(0),
            Err(e) => Err(e),
        }
    }

    /// Delete the first employee in the table, confirming the prompt.
    pub async fn delete_first_employee(&self) -> Result<(), CmdError> {
        super::clickable(&self.client, &self.poll, DELETE_EMPLOYEE_BUTTON)
            .await?
            .click()
            .await?;
        super::clickable(&self.client, &self.poll, DELETE_CONFIRMATION)
            .await?
            .click()
            .await
    }

    /// Make sure the table has at least one employee, adding Jane Smith if it is empty.
    pub async fn ensure_employee_exists(&self) -> Result<(), CmdError> {
        if self.loaded_employee_count().await? > 0 {
            return Ok(());
        }

        tracing::debug!("employee table is empty, adding one");
        self.click_add_employee().await?;
        self.fill_employee_form("Jane", "Smith", 1).await?;
        self.click_submit_button().await?;
        self.wait_for_rows(|n| n >= 1, self.poll.timeout()).await?;
        Ok(())
    }

    /// Edit the first employee in the table and wait for the new last name to show up.
    pub async fn edit_first_employee(
        &self,
        first_name: &str,
        last_name: &str,
        dependants: impl Display,
    ) -> Result<(), CmdError> {
        let rows = super::present(&self.client, &self.poll, EMPLOYEE_ROWS).await?;
        let edit = rows.find(EDIT_EMPLOYEE_BUTTON).await?;
        super::scroll_into_view(&self.client, &edit).await?;
        edit.click().await?;

        self.fill_employee_form(first_name, last_name, dependants)
            .await?;
        self.click_update_button().await?;

        self.wait_for_text_in_rows(last_name).await
    }

    /// Wait until some row of the table contains `text`.
    pub async fn wait_for_text_in_rows(&self, text: &str) -> Result<(), CmdError> {
        let client = &self.client;
        self.poll
            .until(|| async move {
                for row in client.find_all(EMPLOYEE_ROWS).await? {
                    match row.text().await {
                        Ok(t) if t.contains(text) => return Ok(Some(())),
                        Ok(_) => {}
                        Err(e) if e.is_no_such_element() => {}
                        Err(e) => return Err(e),
                    }
                }
                Ok(None)
            })
            .await
    }

    /// Wait until the table shows exactly `expected` rows.
    ///
    /// The table is re-rendered asynchronously after adds and deletes, so checks should
    /// synchronize on this before counting rows.
    pub async fn wait_for_table_update(
        &self,
        expected: usize,
        timeout: Duration,
    ) -> Result<usize, CmdError> {
        self.wait_for_rows(|n| n == expected, timeout).await
    }

    /// Wait until the row count satisfies `accept`, returning the count.
    pub async fn wait_for_rows<F>(&self, accept: F, timeout: Duration) -> Result<usize, CmdError>
    where
        F: Fn(usize) -> bool,
    {
        let client = &self.client;
        let accept = &accept;
        Poll::new(timeout)
            .every(self.poll_interval())
            .until(|| async move {
                let n = client.find_all(EMPLOYEE_ROWS).await?.len();
                Ok(if accept(n) { Some(n) } else { None })
            })
            .await
    }

    /// Wait for a validation message to appear on the open modal.
    pub async fn wait_for_validation_error(&self, timeout: Duration) -> Result<Element, CmdError> {
        let poll = Poll::new(timeout).every(self.poll_interval());
        super::present(&self.client, &poll, VALIDATION_ERROR).await
    }

    /// Whether the page's source contains `text`.
    pub async fn page_contains(&self, text: &str) -> Result<bool, CmdError> {
        Ok(self.client.source().await?.contains(text))
    }

    fn poll_interval(&self) -> Duration {
        self.poll.interval()
    }
}
