//! Employee records as the API returns them, and request payloads as the checks send them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as Json};
use uuid::Uuid;

/// Annual cost of benefits for the employee themself.
pub const BASE_ANNUAL_COST: f64 = 1000.0;
/// Annual cost of benefits per dependant.
pub const DEPENDANT_ANNUAL_COST: f64 = 500.0;
/// Paychecks per year.
pub const PAYCHECKS_PER_YEAR: u32 = 26;

/// An employee record as returned by `GET /api/Employees`.
///
/// The server-computed pay fields are optional since the API does not always return them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    /// Unique identifier.
    pub id: String,
    /// Given name.
    #[serde(default)]
    pub first_name: String,
    /// Family name.
    #[serde(default)]
    pub last_name: String,
    /// Login of the record's owner.
    #[serde(default)]
    pub username: Option<String>,
    /// Number of dependants.
    #[serde(default)]
    pub dependants: i64,
    /// Annual salary.
    #[serde(default)]
    pub salary: Option<f64>,
    /// Gross pay per paycheck.
    #[serde(default)]
    pub gross: Option<f64>,
    /// Benefits deduction per paycheck.
    #[serde(default)]
    pub benefits_cost: Option<f64>,
    /// Net pay per paycheck.
    #[serde(default)]
    pub net: Option<f64>,
    #[allow(missing_docs)]
    #[serde(default)]
    pub partition_key: Option<String>,
    #[allow(missing_docs)]
    #[serde(default)]
    pub sort_key: Option<String>,
    #[allow(missing_docs)]
    #[serde(default)]
    pub expiration: Option<String>,
}

/// Find the employee with the given id.
pub fn find_employee<'a>(employees: &'a [Employee], id: &str) -> Option<&'a Employee> {
    employees.iter().find(|e| e.id == id)
}

/// A request body for creating or updating an employee.
///
/// This is a plain JSON object rather than a typed struct so that deliberately malformed values
/// (such as `"dependants": "02"`) can be sent.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(transparent)]
pub struct EmployeePayload(Map<String, Json>);

impl Default for EmployeePayload {
    fn default() -> Self {
        Self::new()
    }
}

impl EmployeePayload {
    /// A valid payload with fresh identifiers: John Doe with two dependants.
    ///
    /// Both `id` and `username` embed a new v4 UUID so repeated runs never collide.
    pub fn new() -> Self {
        let mut m = Map::new();
        m.insert("id".into(), Json::String(Uuid::new_v4().to_string()));
        m.insert("firstName".into(), Json::String("John".into()));
        m.insert("lastName".into(), Json::String("Doe".into()));
        m.insert(
            "username".into(),
            Json::String(format!("user_{}", Uuid::new_v4())),
        );
        m.insert("dependants".into(), Json::from(2));
        EmployeePayload(m)
    }

    /// Override one field.
    pub fn with<V: Into<Json>>(mut self, key: &str, value: V) -> Self {
        self.set(key, value);
        self
    }

    /// Override every field present in `overrides`.
    pub fn with_overrides(mut self, overrides: Map<String, Json>) -> Self {
        self.0.extend(overrides);
        self
    }

    /// Set one field in place.
    pub fn set<V: Into<Json>>(&mut self, key: &str, value: V) {
        self.0.insert(key.to_string(), value.into());
    }

    /// Look up a field.
    pub fn get(&self, key: &str) -> Option<&Json> {
        self.0.get(key)
    }

    /// The payload's `id`, or the empty string if it was overridden with a non-string.
    pub fn id(&self) -> &str {
        self.0.get("id").and_then(Json::as_str).unwrap_or_default()
    }

    /// The payload as a JSON value.
    pub fn as_json(&self) -> Json {
        Json::Object(self.0.clone())
    }
}

/// What benefits should cost, given a number of dependants.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BenefitsBreakdown {
    /// Annual cost of benefits.
    pub annual_cost: f64,
    /// Cost per paycheck, rounded to cents.
    pub per_paycheck: f64,
}

impl BenefitsBreakdown {
    /// Expected costs for an employee with `dependants` dependants.
    pub fn for_dependants(dependants: u32) -> Self {
        let annual_cost = BASE_ANNUAL_COST + DEPENDANT_ANNUAL_COST * f64::from(dependants);
        let per_paycheck = (annual_cost / f64::from(PAYCHECKS_PER_YEAR) * 100.0).round() / 100.0;
        BenefitsBreakdown {
            annual_cost,
            per_paycheck,
        }
    }
}
