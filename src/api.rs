//! Client for the Employees REST API.

use crate::config::join_path;
use crate::error::ApiError;
use crate::session::{ApiResponse, ApiSession};
use crate::{EmployeePayload, Settings};
use url::Url;

/// The five calls the Employees API offers.
///
/// Every method hands back the raw [`ApiResponse`] regardless of its status, so callers can
/// assert on the status code themselves. Only transport failures are errors.
#[derive(Clone, Debug)]
pub struct EmployeesApi {
    session: ApiSession,
    employees: Url,
}

impl EmployeesApi {
    /// Use `session` against the API rooted at `api_base_url`.
    pub fn new(session: ApiSession, api_base_url: &Url) -> Result<Self, ApiError> {
        Ok(EmployeesApi {
            session,
            employees: join_path(api_base_url, "api/Employees")?,
        })
    }

    /// Build a session from `settings` and point it at the configured API.
    pub fn from_settings(settings: &Settings) -> Result<Self, ApiError> {
        Self::new(ApiSession::new(settings)?, &settings.api_base_url)
    }

    /// The collection endpoint, `/api/Employees`.
    pub fn employees_url(&self) -> &Url {
        &self.employees
    }

    fn employee_url(&self, id: &str) -> Result<Url, ApiError> {
        let mut u = self.employees.clone();
        u.path_segments_mut()
            .map_err(|_| ApiError::BadUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .push(id);
        Ok(u)
    }

    /// `POST /api/Employees`: create an employee.
    pub async fn create_employee(
        &self,
        payload: &EmployeePayload,
    ) -> Result<ApiResponse, ApiError> {
        tracing::info!(id = payload.id(), "creating employee");
        self.session.post(&self.employees, payload).await
    }

    /// `GET /api/Employees`: list all employees.
    pub async fn get_employees(&self) -> Result<ApiResponse, ApiError> {
        self.session.get(&self.employees).await
    }

    /// `GET /api/Employees/{id}`: fetch one employee.
    pub async fn get_employee(&self, id: &str) -> Result<ApiResponse, ApiError> {
        let url = self.employee_url(id)?;
        self.session.get(&url).await
    }

    /// `PUT /api/Employees`: replace an employee with the full `payload`.
    pub async fn update_employee(
        &self,
        payload: &EmployeePayload,
    ) -> Result<ApiResponse, ApiError> {
        tracing::info!(id = payload.id(), "updating employee");
        self.session.put(&self.employees, payload).await
    }

    /// `DELETE /api/Employees/{id}`: remove an employee.
    pub async fn delete_employee(&self, id: &str) -> Result<ApiResponse, ApiError> {
        tracing::info!(id, "deleting employee");
        let url = self.employee_url(id)?;
        self.session.delete(&url).await
    }
}
