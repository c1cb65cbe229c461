use clap::Parser;
use employees_e2e::checks::{self, Check, Report, Suite};
use employees_e2e::{EmployeesApi, Settings};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Run the employee-management checks against a live environment.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// TOML settings file; `EMPLOYEES_*` environment variables override its values.
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Which checks to run: api, ui or all.
    #[arg(long, default_value = "all")]
    suite: Suite,

    /// Only run checks whose name contains this string.
    #[arg(long)]
    filter: Option<String>,

    /// List the selected checks instead of running them.
    #[arg(long)]
    list: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let selected = checks::select(args.suite, args.filter.as_deref());

    if args.list {
        for check in &selected {
            match check.known_bug() {
                Some(reason) => println!("{} (known bug: {})", check, reason),
                None => println!("{}", check),
            }
        }
        return ExitCode::SUCCESS;
    }

    let settings = match Settings::load(args.config.as_deref()) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "invalid settings");
            return ExitCode::from(2);
        }
    };

    let api = match EmployeesApi::from_settings(&settings) {
        Ok(api) => api,
        Err(e) => {
            tracing::error!(error = %e, "could not set up the api session");
            return ExitCode::from(2);
        }
    };

    let mut report = Report::default();
    for check in selected {
        tracing::info!(check = check.name(), "running");
        let outcome = match check {
            Check::Api(c) => c.run(&api).await,
            Check::Ui(c) => c.run(&settings).await,
        };
        report.record(check, outcome);
    }

    println!("{}", report);
    if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
