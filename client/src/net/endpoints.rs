//! `CaptureEndpoint` implementations backed by `ApiClient`.
//!
//! Each one owns the form fields that travel with the photo and turns the
//! backend's answer into the confirmation text the flow presents.

#[cfg(test)]
#[path = "endpoints_test.rs"]
mod tests;

use async_trait::async_trait;

use super::api::ApiClient;
use crate::capture::CapturedImage;
use crate::capture::flow::CaptureEndpoint;
use crate::error::ApiError;
use crate::validate::{self, ValidationError};

pub const CLOCK_IN_FALLBACK: &str = "Employee not recognized.";
pub const REGISTER_FALLBACK: &str = "Failed to register employee.";
pub const UPDATE_FALLBACK: &str = "Failed to update employee.";
pub const UPDATE_SUCCESS: &str = "Employee updated.";

/// Camera punch: `POST /registrar_ponto`.
#[derive(Clone, Debug)]
pub struct ClockInEndpoint {
    api: ApiClient,
}

impl ClockInEndpoint {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl CaptureEndpoint for ClockInEndpoint {
    fn failure_fallback(&self) -> &'static str {
        CLOCK_IN_FALLBACK
    }

    async fn submit(&self, image: CapturedImage) -> Result<String, ApiError> {
        self.api.clock_in(image).await.map(|receipt| receipt.notice_text())
    }
}

/// New employee with their reference photo: `POST /cadastrar_funcionario`.
#[derive(Clone, Debug)]
pub struct RegisterEmployeeEndpoint {
    api: ApiClient,
    name: String,
    role: String,
}

impl RegisterEmployeeEndpoint {
    #[must_use]
    pub fn new(api: ApiClient, name: impl Into<String>, role: impl Into<String>) -> Self {
        Self { api, name: name.into(), role: role.into() }
    }
}

#[async_trait]
impl CaptureEndpoint for RegisterEmployeeEndpoint {
    fn validate(&self) -> Result<(), ValidationError> {
        validate::require("name", &self.name)?;
        validate::require("role", &self.role)
    }

    fn failure_fallback(&self) -> &'static str {
        REGISTER_FALLBACK
    }

    async fn submit(&self, image: CapturedImage) -> Result<String, ApiError> {
        let created = self
            .api
            .register_employee(self.name.trim(), self.role.trim(), image)
            .await?;
        let name = created.name.unwrap_or_else(|| self.name.trim().to_owned());
        Ok(match created.id {
            Some(id) => format!("Employee {name} registered (id {id})."),
            None => format!("Employee {name} registered."),
        })
    }
}

/// Replace an employee's photo while keeping or editing name and role:
/// `PUT /funcionarios/{id}`.
#[derive(Clone, Debug)]
pub struct EmployeePhotoEndpoint {
    api: ApiClient,
    id: String,
    name: String,
    role: String,
}

impl EmployeePhotoEndpoint {
    #[must_use]
    pub fn new(
        api: ApiClient,
        id: impl Into<String>,
        name: impl Into<String>,
        role: impl Into<String>,
    ) -> Self {
        Self { api, id: id.into(), name: name.into(), role: role.into() }
    }
}

#[async_trait]
impl CaptureEndpoint for EmployeePhotoEndpoint {
    fn validate(&self) -> Result<(), ValidationError> {
        validate::require("employee", &self.id)?;
        validate::require("name", &self.name)?;
        validate::require("role", &self.role)
    }

    fn failure_fallback(&self) -> &'static str {
        UPDATE_FALLBACK
    }

    async fn submit(&self, image: CapturedImage) -> Result<String, ApiError> {
        let ack = self
            .api
            .update_employee(&self.id, self.name.trim(), self.role.trim(), Some(image))
            .await?;
        Ok(ack.text().unwrap_or(UPDATE_SUCCESS).to_owned())
    }
}
