//! Known-defect markers.
//!
//! A check wrapped in [`known_bug`] documents a defect in the application: it is expected to
//! fail, and its failure does not fail the run. If it unexpectedly passes, that is reported but
//! tolerated too, so a fix in the application never breaks the suite.
//!
//! Only a violated expectation counts as the defect reproducing. A check that could not reach
//! the API or start a browser still fails.

use crate::error::CheckError;
use futures_util::FutureExt;
use std::any::Any;
use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;

/// How a check ended.
#[derive(Debug)]
pub enum Outcome {
    /// The check held.
    Pass,
    /// The check did not hold.
    Fail(CheckError),
    /// A known-bug check failed, as expected.
    XFail {
        /// Why the check is expected to fail.
        reason: &'static str,
        /// How it failed.
        error: CheckError,
    },
    /// A known-bug check passed; the defect may have been fixed.
    XPass {
        /// Why the check was expected to fail.
        reason: &'static str,
    },
}

impl Outcome {
    /// Whether this outcome should fail the run.
    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Fail(..))
    }

    /// The short label for this outcome.
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Pass => "PASS",
            Outcome::Fail(..) => "FAIL",
            Outcome::XFail { .. } => "XFAIL",
            Outcome::XPass { .. } => "XPASS",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Pass => f.write_str("PASS"),
            Outcome::Fail(e) => write!(f, "FAIL ({})", e),
            Outcome::XFail { reason, error } => write!(f, "XFAIL [{}] ({})", reason, error),
            Outcome::XPass { reason } => write!(f, "XPASS [{}]", reason),
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "check panicked; an assertion probably failed".to_string()
    }
}

/// Run `check`, turning a panic inside it into a [`CheckError::Assertion`].
pub async fn run<F>(check: F) -> Result<(), CheckError>
where
    F: Future<Output = Result<(), CheckError>>,
{
    match AssertUnwindSafe(check).catch_unwind().await {
        Ok(res) => res,
        Err(payload) => Err(CheckError::Assertion(panic_message(payload))),
    }
}

/// Run a check that is expected to pass.
pub async fn expect_pass<F>(check: F) -> Outcome
where
    F: Future<Output = Result<(), CheckError>>,
{
    match run(check).await {
        Ok(()) => Outcome::Pass,
        Err(e) => Outcome::Fail(e),
    }
}

/// Run a check that documents a known defect.
///
/// An assertion failure of `check` yields [`Outcome::XFail`]; success yields [`Outcome::XPass`].
/// Neither is a failure of the run. Any other error is an ordinary [`Outcome::Fail`].
pub async fn known_bug<F>(reason: &'static str, check: F) -> Outcome
where
    F: Future<Output = Result<(), CheckError>>,
{
    match run(check).await {
        Ok(()) => {
            tracing::warn!(reason, "known bug did not reproduce");
            Outcome::XPass { reason }
        }
        Err(error) if error.is_assertion() => {
            tracing::warn!(reason, %error, "known bug reproduced");
            Outcome::XFail { reason, error }
        }
        Err(error) => Outcome::Fail(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn failing_known_bug_is_xfail() {
        let o = known_bug("BUG: broken", async {
            Err(CheckError::Assertion("still broken".into()))
        })
        .await;
        assert!(matches!(o, Outcome::XFail { reason: "BUG: broken", .. }));
        assert!(!o.is_failure());
    }

    #[tokio::test]
    async fn panicking_known_bug_is_xfail() {
        let o = known_bug("BUG: panics", async {
            assert_eq!(1, 2, "boom");
            Ok(())
        })
        .await;
        match o {
            Outcome::XFail { error, .. } => assert!(error.to_string().contains("boom")),
            other => panic!("unexpected outcome: {}", other),
        }
    }

    #[tokio::test]
    async fn infrastructure_errors_are_not_the_known_bug() {
        let o = known_bug("BUG: broken", async {
            Err(CheckError::Ui(fantoccini::error::CmdError::WaitTimeout))
        })
        .await;
        assert!(o.is_failure());
        assert_eq!(o.label(), "FAIL");
    }

    #[tokio::test]
    async fn passing_known_bug_is_xpass() {
        let o = known_bug("BUG: fixed", async { Ok(()) }).await;
        assert_eq!(o.label(), "XPASS");
        assert!(!o.is_failure());
    }

    #[tokio::test]
    async fn ordinary_checks() {
        assert_eq!(expect_pass(async { Ok(()) }).await.label(), "PASS");
        let o = expect_pass(async { Err(CheckError::Assertion("nope".into())) }).await;
        assert!(o.is_failure());
        assert_eq!(o.to_string(), "FAIL (check failed: nope)");
    }
}
