#![allow(dead_code)]

//! An in-process stand-in for the Employees API.

use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::header::{AUTHORIZATION, CONTENT_TYPE};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use serde_json::{json, Map, Value as Json};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

use employees_e2e::{EmployeesApi, Settings};

pub const FIXTURE_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/test_html");

pub const TOKEN: &str = "Basic dGVzdDp0ZXN0";
pub const BASE_PATH: &str = "/Prod";

const ANNUAL_SALARY: f64 = 52000.0;
const PAYCHECKS: f64 = 26.0;

/// How faithfully the stand-in behaves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flavor {
    /// Validates input and computes benefits correctly.
    Correct,
    /// Reproduces the application's known defects: non-numeric dependants are stored as 0,
    /// and listed employees carry no pay breakdown.
    Buggy,
}

#[derive(Debug, Default)]
pub struct State {
    pub employees: Vec<Map<String, Json>>,
    pub requests: Vec<(Method, String, Option<String>, Option<String>)>,
}

pub struct MockApi {
    pub addr: SocketAddr,
    pub state: Arc<Mutex<State>>,
}

impl MockApi {
    pub fn base_url(&self) -> url::Url {
        url::Url::parse(&format!("http://{}{}", self.addr, BASE_PATH)).unwrap()
    }

    pub fn settings(&self) -> Settings {
        Settings::from_toml_str(&format!(
            r#"
            api_url = "{}"
            ui_url = "http://{}/Prod/Account/LogIn"
            username = "test"
            password = "test"
            auth_token = "{}"
            "#,
            self.base_url(),
            self.addr,
            TOKEN
        ))
        .unwrap()
    }

    pub fn api(&self) -> EmployeesApi {
        EmployeesApi::from_settings(&self.settings()).unwrap()
    }

    pub fn employee_count(&self) -> usize {
        self.state.lock().unwrap().employees.len()
    }
}

/// Start the stand-in on an ephemeral local port.
pub async fn start(flavor: Flavor) -> MockApi {
    let listener = TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
    let addr = listener.local_addr().unwrap();
    let state = Arc::new(Mutex::new(State::default()));

    let st = state.clone();
    tokio::spawn(async move {
        loop {
            let (stream, _) = match listener.accept().await {
                Ok(s) => s,
                Err(_) => break,
            };
            let st = st.clone();
            tokio::spawn(async move {
                let svc = service_fn(move |req| handle(flavor, st.clone(), req));
                let _ = http1::Builder::new()
                    .serve_connection(TokioIo::new(stream), svc)
                    .await;
            });
        }
    });

    MockApi { addr, state }
}

fn reply(status: StatusCode, body: Json) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "application/json")
        .body(Full::new(Bytes::from(body.to_string())))
        .unwrap()
}

fn dependants_of(flavor: Flavor, v: Option<&Json>) -> Option<i64> {
    match (flavor, v) {
        (_, Some(Json::Number(n))) => n.as_i64(),
        (Flavor::Buggy, _) => Some(0),
        (Flavor::Correct, _) => None,
    }
}

fn id_of(e: &Map<String, Json>) -> Option<&str> {
    e.get("id").and_then(Json::as_str)
}

fn with_pay(mut e: Map<String, Json>) -> Map<String, Json> {
    let dependants = e.get("dependants").and_then(Json::as_i64).unwrap_or(0) as f64;
    let gross = ANNUAL_SALARY / PAYCHECKS;
    let benefits = ((1000.0 + 500.0 * dependants) / PAYCHECKS * 100.0).round() / 100.0;
    e.insert("salary".into(), json!(ANNUAL_SALARY));
    e.insert("gross".into(), json!(gross));
    e.insert("benefitsCost".into(), json!(benefits));
    e.insert("net".into(), json!(gross - benefits));
    e
}

async fn handle(
    flavor: Flavor,
    state: Arc<Mutex<State>>,
    req: Request<Incoming>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let header = |name: hyper::header::HeaderName| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(String::from)
    };
    let auth = header(AUTHORIZATION);
    let content_type = header(CONTENT_TYPE);
    state
        .lock()
        .unwrap()
        .requests
        .push((method.clone(), path.clone(), auth.clone(), content_type));

    if auth.as_deref() != Some(TOKEN) {
        return Ok(reply(StatusCode::UNAUTHORIZED, json!({ "message": "Unauthorized" })));
    }

    let rest = match path.strip_prefix(BASE_PATH).and_then(|p| p.strip_prefix("/api/Employees")) {
        Some(rest) => rest.to_string(),
        None => return Ok(reply(StatusCode::NOT_FOUND, Json::Null)),
    };

    let body = match req.into_body().collect().await {
        Ok(b) => b.to_bytes(),
        Err(_) => return Ok(reply(StatusCode::BAD_REQUEST, Json::Null)),
    };

    let mut st = state.lock().unwrap();
    let rsp = match (method, rest.trim_start_matches('/')) {
        (Method::GET, "") => {
            let list: Vec<Json> = st
                .employees
                .iter()
                .cloned()
                .map(|e| match flavor {
                    Flavor::Correct => Json::Object(with_pay(e)),
                    Flavor::Buggy => Json::Object(e),
                })
                .collect();
            reply(StatusCode::OK, Json::Array(list))
        }
        (Method::GET, id) => match st.employees.iter().find(|e| id_of(e) == Some(id)) {
            Some(e) => reply(StatusCode::OK, Json::Object(with_pay(e.clone()))),
            None => reply(StatusCode::NOT_FOUND, Json::Null),
        },
        (Method::DELETE, id) if !id.is_empty() => {
            let before = st.employees.len();
            st.employees.retain(|e| id_of(e) != Some(id));
            if st.employees.len() < before {
                reply(StatusCode::OK, Json::Null)
            } else {
                reply(StatusCode::NOT_FOUND, Json::Null)
            }
        }
        (m @ (Method::POST | Method::PUT), "") => {
            let mut e: Map<String, Json> = match serde_json::from_slice(&body) {
                Ok(e) => e,
                Err(_) => return Ok(reply(StatusCode::BAD_REQUEST, Json::Null)),
            };
            let dependants = match dependants_of(flavor, e.get("dependants")) {
                Some(d) => d,
                None => {
                    return Ok(reply(
                        StatusCode::BAD_REQUEST,
                        json!({ "errors": { "dependants": ["must be a number"] } }),
                    ))
                }
            };
            e.insert("dependants".into(), json!(dependants));
            let existing = st
                .employees
                .iter()
                .position(|x| id_of(x).is_some() && id_of(x) == id_of(&e));
            match (m, existing) {
                (Method::POST, _) => {
                    st.employees.push(e.clone());
                    reply(StatusCode::OK, Json::Object(e))
                }
                (_, Some(i)) => {
                    st.employees[i] = e.clone();
                    reply(StatusCode::OK, Json::Object(e))
                }
                (_, None) => reply(StatusCode::NOT_FOUND, Json::Null),
            }
        }
        _ => reply(StatusCode::METHOD_NOT_ALLOWED, Json::Null),
    };
    Ok(rsp)
}

/// Serve the static login and dashboard pages under `tests/test_html` on an ephemeral port.
pub async fn start_fixture_server() -> SocketAddr {
    let listener = TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            let (stream, _) = match listener.accept().await {
                Ok(s) => s,
                Err(_) => break,
            };
            tokio::spawn(async move {
                let _ = http1::Builder::new()
                    .serve_connection(TokioIo::new(stream), service_fn(fileserver))
                    .await;
            });
        }
    });

    addr
}

async fn fileserver(req: Request<Incoming>) -> Result<Response<Full<Bytes>>, Infallible> {
    let name = req.uri().path().trim_start_matches('/');
    if name.is_empty() || name.contains("..") || name.contains('/') {
        return Ok(reply(StatusCode::NOT_FOUND, Json::Null));
    }

    let path: PathBuf = [FIXTURE_DIR, name].iter().collect();
    let rsp = match tokio::fs::read(&path).await {
        Ok(page) => Response::builder()
            .status(StatusCode::OK)
            .header(CONTENT_TYPE, "text/html; charset=utf-8")
            .body(Full::new(Bytes::from(page)))
            .unwrap(),
        Err(_) => reply(StatusCode::NOT_FOUND, Json::Null),
    };
    Ok(rsp)
}

/// Settings that point the UI at the fixture pages and at a local WebDriver server.
///
/// `EMPLOYEES_WEBDRIVER_URL` and `EMPLOYEES_BROWSER` pick the driver, as they do for a real run.
pub fn fixture_settings(addr: SocketAddr) -> Settings {
    let webdriver = std::env::var("EMPLOYEES_WEBDRIVER_URL")
        .unwrap_or_else(|_| "http://localhost:9515".to_string());
    let browser = std::env::var("EMPLOYEES_BROWSER").unwrap_or_else(|_| "chrome".to_string());
    Settings::from_toml_str(&format!(
        r#"
        api_url = "http://{addr}/Prod"
        ui_url = "http://{addr}/login.html"
        username = "test"
        password = "test"
        webdriver_url = "{webdriver}"
        browser = "{browser}"
        headless = true
        wait_timeout_secs = 5
        "#,
    ))
    .unwrap()
}
