//! Checks driven through the dashboard in a real browser.

use crate::browser::with_browser;
use crate::error::CheckError;
use crate::pages::{DashboardPage, LoginPage};
use crate::xfail::{self, Outcome};
use crate::Settings;
use fantoccini::error::CmdError;
use fantoccini::Client;
use std::fmt;
use std::time::Duration;

const KNOWN_BUG_TIMEOUT: Duration = Duration::from_secs(5);

/// Every UI check, by name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UiCheck {
    /// An employee can be added from the dashboard.
    AddEmployee,
    /// An employee can be edited from the dashboard.
    EditEmployee,
    /// An employee can be deleted from the dashboard.
    DeleteEmployee,
    /// Adding the same employee twice is refused.
    NoDuplicateEmployees,
    /// Negative dependants produce a validation message.
    InvalidDependantsShowsError,
}

impl UiCheck {
    /// All UI checks, in the order they run.
    pub const ALL: [UiCheck; 5] = [
        UiCheck::AddEmployee,
        UiCheck::EditEmployee,
        UiCheck::DeleteEmployee,
        UiCheck::NoDuplicateEmployees,
        UiCheck::InvalidDependantsShowsError,
    ];

    /// The check's name, as shown in reports and matched by filters.
    pub fn name(self) -> &'static str {
        match self {
            UiCheck::AddEmployee => "ui::add_employee",
            UiCheck::EditEmployee => "ui::edit_employee",
            UiCheck::DeleteEmployee => "ui::delete_employee",
            UiCheck::NoDuplicateEmployees => "ui::no_duplicate_employees",
            UiCheck::InvalidDependantsShowsError => "ui::invalid_dependants_shows_error",
        }
    }

    /// The defect this check documents, if it is expected to fail.
    pub fn known_bug(self) -> Option<&'static str> {
        match self {
            UiCheck::NoDuplicateEmployees => Some("BUG: UI allows duplicate employees"),
            UiCheck::InvalidDependantsShowsError => {
                Some("BUG: No validation feedback for invalid dependants")
            }
            _ => None,
        }
    }

    /// Run the check in a fresh browser session.
    pub async fn run(self, settings: &Settings) -> Outcome {
        let check = with_browser(settings, move |client| async move {
            match self {
                UiCheck::AddEmployee => add_employee(&client, settings).await,
                UiCheck::EditEmployee => edit_employee(&client, settings).await,
                UiCheck::DeleteEmployee => delete_employee(&client, settings).await,
                UiCheck::NoDuplicateEmployees => no_duplicate_employees(&client, settings).await,
                UiCheck::InvalidDependantsShowsError => {
                    invalid_dependants_shows_error(&client, settings).await
                }
            }
        });
        match self.known_bug() {
            Some(reason) => xfail::known_bug(reason, check).await,
            None => xfail::expect_pass(check).await,
        }
    }
}

impl fmt::Display for UiCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Load the login page, sign in, and hand back the dashboard once it is ready.
pub async fn login(client: &Client, settings: &Settings) -> Result<DashboardPage, CmdError> {
    let login = LoginPage::new(client, settings);
    login.load().await?;
    login.login(&settings.username, &settings.password).await?;
    let dashboard = DashboardPage::new(client, settings);
    dashboard.wait_until_ready().await?;
    Ok(dashboard)
}

/// Adding an employee grows the table by one row.
pub async fn add_employee(client: &Client, settings: &Settings) -> Result<(), CheckError> {
    let dashboard = login(client, settings).await?;
    let initial = dashboard.loaded_employee_count().await?;

    dashboard.click_add_employee().await?;
    dashboard.fill_employee_form("John", "Doe", 1).await?;
    dashboard.click_submit_button().await?;
    dashboard
        .wait_for_table_update(initial + 1, settings.wait_timeout)
        .await?;

    let now = dashboard.employee_count().await?;
    ensure!(now == initial + 1, "expected {} rows, found {}", initial + 1, now);
    Ok(())
}

/// Editing the first employee shows the new name on the page.
pub async fn edit_employee(client: &Client, settings: &Settings) -> Result<(), CheckError> {
    let dashboard = login(client, settings).await?;
    dashboard.ensure_employee_exists().await?;

    dashboard.edit_first_employee("Jane", "Updated", 2).await?;

    ensure!(
        dashboard.page_contains("Updated").await?,
        "edited last name does not appear on the page"
    );
    Ok(())
}

/// Deleting the first employee shrinks the table by one row.
pub async fn delete_employee(client: &Client, settings: &Settings) -> Result<(), CheckError> {
    let dashboard = login(client, settings).await?;

    if dashboard.loaded_employee_count().await? == 0 {
        dashboard.click_add_employee().await?;
        dashboard.fill_employee_form("Temp", "User", 0).await?;
        dashboard.click_submit_button().await?;
        dashboard
            .wait_for_rows(|n| n >= 1, settings.wait_timeout)
            .await?;
    }

    let initial = dashboard.employee_count().await?;
    ensure!(initial > 0, "no employee left to delete");
    let expected = initial - 1;
    dashboard.delete_first_employee().await?;
    dashboard
        .wait_for_table_update(expected, settings.wait_timeout)
        .await?;

    let now = dashboard.employee_count().await?;
    ensure!(now == expected, "expected {} rows, found {}", expected, now);
    Ok(())
}

/// Submitting the same first name, last name and dependants twice must not add a second row.
pub async fn no_duplicate_employees(
    client: &Client,
    settings: &Settings,
) -> Result<(), CheckError> {
    let dashboard = login(client, settings).await?;
    let initial = dashboard.loaded_employee_count().await?;

    dashboard.click_add_employee().await?;
    dashboard.fill_employee_form("John", "Doe", 1).await?;
    dashboard.click_submit_button().await?;
    let rows_after_first = dashboard
        .wait_for_rows(|n| n > initial, settings.wait_timeout)
        .await?;

    dashboard.click_add_employee().await?;
    dashboard.fill_employee_form("John", "Doe", 1).await?;
    dashboard.click_submit_button().await?;

    match dashboard
        .wait_for_rows(|n| n > rows_after_first, KNOWN_BUG_TIMEOUT)
        .await
    {
        Ok(n) => Err(CheckError::Assertion(format!(
            "Duplicate employee should not be allowed ({} rows, expected {})",
            n, rows_after_first
        ))),
        Err(CmdError::WaitTimeout) => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Entering negative dependants shows a visible validation message.
pub async fn invalid_dependants_shows_error(
    client: &Client,
    settings: &Settings,
) -> Result<(), CheckError> {
    let dashboard = login(client, settings).await?;

    dashboard.click_add_employee().await?;
    dashboard.fill_employee_form("Invalid", "Deps", "-1").await?;
    dashboard.click_submit_button().await?;

    let message = match dashboard.wait_for_validation_error(KNOWN_BUG_TIMEOUT).await {
        Ok(message) => message,
        Err(CmdError::WaitTimeout) => {
            return Err(CheckError::Assertion(format!(
                "no validation message within {:?}",
                KNOWN_BUG_TIMEOUT
            )))
        }
        Err(e) => return Err(e.into()),
    };
    ensure!(
        message.is_displayed().await?,
        "validation message exists but is hidden"
    );
    Ok(())
}
