//! The verification scenarios.
//!
//! API checks share one [`EmployeesApi`](crate::EmployeesApi) session. UI checks each get their
//! own browser session. Checks documenting a known defect are run through
//! [`xfail::known_bug`](crate::xfail::known_bug) and never fail the run.

use crate::xfail::Outcome;
use std::fmt;
use std::str::FromStr;

pub mod api;
pub mod ui;

pub use self::api::ApiCheck;
pub use self::ui::UiCheck;

/// Which surface of the application to exercise.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Suite {
    /// The REST API only.
    Api,
    /// The dashboard UI only.
    Ui,
    /// Both.
    #[default]
    All,
}

impl Suite {
    /// Whether this suite includes the API checks.
    pub fn includes_api(self) -> bool {
        matches!(self, Suite::Api | Suite::All)
    }

    /// Whether this suite includes the UI checks.
    pub fn includes_ui(self) -> bool {
        matches!(self, Suite::Ui | Suite::All)
    }
}

impl FromStr for Suite {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "api" => Ok(Suite::Api),
            "ui" => Ok(Suite::Ui),
            "all" => Ok(Suite::All),
            other => Err(format!("unknown suite `{}` (expected api, ui or all)", other)),
        }
    }
}

/// A check selected for a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Check {
    #[allow(missing_docs)]
    Api(ApiCheck),
    #[allow(missing_docs)]
    Ui(UiCheck),
}

impl Check {
    /// The check's name.
    pub fn name(self) -> &'static str {
        match self {
            Check::Api(c) => c.name(),
            Check::Ui(c) => c.name(),
        }
    }

    /// The defect this check documents, if any.
    pub fn known_bug(self) -> Option<&'static str> {
        match self {
            Check::Api(c) => c.known_bug(),
            Check::Ui(c) => c.known_bug(),
        }
    }
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The checks in `suite` whose name contains `filter`, in run order.
pub fn select(suite: Suite, filter: Option<&str>) -> Vec<Check> {
    let api = ApiCheck::ALL
        .into_iter()
        .filter(|_| suite.includes_api())
        .map(Check::Api);
    let ui = UiCheck::ALL
        .into_iter()
        .filter(|_| suite.includes_ui())
        .map(Check::Ui);
    api.chain(ui)
        .filter(|c| filter.map_or(true, |f| c.name().contains(f)))
        .collect()
}

/// Outcomes of a run, in the order the checks ran.
#[derive(Debug, Default)]
pub struct Report {
    results: Vec<(Check, Outcome)>,
}

impl Report {
    /// Record the outcome of one check.
    pub fn record(&mut self, check: Check, outcome: Outcome) {
        if let Outcome::Fail(ref e) = outcome {
            tracing::error!(check = check.name(), error = %e, "check failed");
        } else {
            tracing::info!(check = check.name(), outcome = outcome.label(), "check finished");
        }
        self.results.push((check, outcome));
    }

    /// Every recorded outcome.
    pub fn results(&self) -> &[(Check, Outcome)] {
        &self.results
    }

    /// How many outcomes carry `label` (`PASS`, `FAIL`, `XFAIL` or `XPASS`).
    pub fn count(&self, label: &str) -> usize {
        self.results
            .iter()
            .filter(|(_, o)| o.label() == label)
            .count()
    }

    /// Whether every check either passed or was a known bug.
    pub fn is_success(&self) -> bool {
        !self.results.iter().any(|(_, o)| o.is_failure())
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (check, outcome) in &self.results {
            writeln!(f, "{:<40} {}", check.name(), outcome)?;
        }
        write!(
            f,
            "{} passed, {} failed, {} xfailed, {} xpassed",
            self.count("PASS"),
            self.count("FAIL"),
            self.count("XFAIL"),
            self.count("XPASS"),
        )
    }
}
