//! Loading settings from the process environment and from a file.

use employees_e2e::error::ConfigError;
use employees_e2e::{BrowserKind, Settings};
use serial_test::serial;
use std::io::Write;
use std::time::Duration;

const VARS: [&str; 9] = [
    "EMPLOYEES_API_URL",
    "EMPLOYEES_UI_URL",
    "EMPLOYEES_USERNAME",
    "EMPLOYEES_PASSWORD",
    "EMPLOYEES_AUTH_TOKEN",
    "EMPLOYEES_WEBDRIVER_URL",
    "EMPLOYEES_BROWSER",
    "EMPLOYEES_HEADLESS",
    "EMPLOYEES_WAIT_TIMEOUT_SECS",
];

fn clear_env() {
    for var in VARS {
        std::env::remove_var(var);
    }
}

fn set_required_env() {
    std::env::set_var("EMPLOYEES_API_URL", "https://env.example.com/Prod");
    std::env::set_var("EMPLOYEES_UI_URL", "https://env.example.com/Prod/Account/Login");
    std::env::set_var("EMPLOYEES_USERNAME", "EnvUser");
    std::env::set_var("EMPLOYEES_PASSWORD", "EnvPass");
}

fn settings_file(contents: &str) -> tempfile::NamedTempFile {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    f.write_all(contents.as_bytes()).unwrap();
    f
}

#[test]
#[serial]
fn from_env_reads_every_variable() {
    clear_env();
    set_required_env();
    std::env::set_var("EMPLOYEES_WEBDRIVER_URL", "http://localhost:4444");
    std::env::set_var("EMPLOYEES_BROWSER", "Firefox");
    std::env::set_var("EMPLOYEES_HEADLESS", "yes");
    std::env::set_var("EMPLOYEES_WAIT_TIMEOUT_SECS", "4");

    let s = Settings::from_env().unwrap();
    assert_eq!(s.api_base_url.as_str(), "https://env.example.com/Prod");
    assert_eq!(s.username, "EnvUser");
    assert_eq!(s.webdriver_url.as_str(), "http://localhost:4444/");
    assert_eq!(s.browser, BrowserKind::Firefox);
    assert!(s.headless);
    assert_eq!(s.wait_timeout, Duration::from_secs(4));
    clear_env();
}

#[test]
#[serial]
fn from_env_without_variables_names_the_first_missing_one() {
    clear_env();
    match Settings::from_env() {
        Err(ConfigError::Missing(var)) => assert_eq!(var, "EMPLOYEES_API_URL"),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
#[serial]
fn bad_timeout_is_rejected() {
    clear_env();
    set_required_env();
    std::env::set_var("EMPLOYEES_WAIT_TIMEOUT_SECS", "soon");
    assert!(matches!(
        Settings::from_env(),
        Err(ConfigError::Invalid("EMPLOYEES_WAIT_TIMEOUT_SECS", _))
    ));
    clear_env();
}

#[test]
#[serial]
fn load_reads_the_file() {
    clear_env();
    let f = settings_file(
        r#"
        api_url = "https://file.example.com/Prod"
        ui_url = "https://file.example.com/Prod/Account/Login"
        username = "FileUser"
        password = "FilePass"
        auth_token = "Basic ZmlsZQ=="
        "#,
    );

    let s = Settings::load(Some(f.path())).unwrap();
    assert_eq!(s.api_base_url.host_str(), Some("file.example.com"));
    assert_eq!(s.authorization(), "Basic ZmlsZQ==");
    assert_eq!(s.browser, BrowserKind::Chrome);
}

#[test]
#[serial]
fn environment_overrides_the_file() {
    clear_env();
    let f = settings_file(
        r#"
        api_url = "https://file.example.com/Prod"
        ui_url = "https://file.example.com/Prod/Account/Login"
        username = "FileUser"
        password = "FilePass"
        browser = "firefox"
        "#,
    );
    std::env::set_var("EMPLOYEES_USERNAME", "EnvUser");
    std::env::set_var("EMPLOYEES_BROWSER", "chrome");

    let s = Settings::load(Some(f.path())).unwrap();
    assert_eq!(s.username, "EnvUser");
    assert_eq!(s.password, "FilePass");
    assert_eq!(s.browser, BrowserKind::Chrome);
    assert_eq!(
        s.employees_url().unwrap().as_str(),
        "https://file.example.com/Prod/api/Employees"
    );
    clear_env();
}

#[test]
#[serial]
fn load_without_a_file_uses_the_environment() {
    clear_env();
    set_required_env();
    let s = Settings::load(None).unwrap();
    assert_eq!(s.password, "EnvPass");
    clear_env();
}

#[test]
#[serial]
fn missing_file_is_an_io_error() {
    clear_env();
    let e = Settings::load(Some("/nonexistent/employees.toml".as_ref())).unwrap_err();
    assert!(matches!(e, ConfigError::Io(_)));
}
