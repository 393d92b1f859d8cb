//! Employee list, registration, and edit screens.
//!
//! SYSTEM CONTEXT
//! ==============
//! Registration and photo replacement go through `CaptureFlow`, so a photo is
//! taken and posted at most once per submit. Editing only name and role is a
//! plain multipart `PUT` without a photo part.

#[cfg(test)]
#[path = "employees_test.rs"]
mod tests;

use std::time::Duration;

use super::Notice;
use crate::capture::PhotoSource;
use crate::capture::flow::{CaptureFlow, FlowError, Presented, SubmitGate};
use crate::config::DEFAULT_DISMISS_SECS;
use crate::net::api::ApiClient;
use crate::net::endpoints::{EmployeePhotoEndpoint, RegisterEmployeeEndpoint, UPDATE_FALLBACK, UPDATE_SUCCESS};
use crate::net::types::Employee;
use crate::validate::{self, ValidationError};

pub const LOAD_FALLBACK: &str = "Failed to load employees.";
pub const DELETE_FALLBACK: &str = "Failed to delete employee.";
pub const DELETE_SUCCESS: &str = "Employee deleted successfully!";

// =============================================================================
// LIST
// =============================================================================

#[derive(Clone, Debug, Default)]
pub struct EmployeeList {
    pub employees: Vec<Employee>,
    /// Case-insensitive name filter applied by `visible`.
    pub filter: String,
    pub loading: bool,
    pub notice: Option<Notice>,
}

impl EmployeeList {
    pub async fn load(&mut self, api: &ApiClient) {
        self.loading = true;
        match api.employees().await {
            Ok(employees) => self.employees = employees,
            Err(error) => self.notice = Some(Notice::from_api(&error, LOAD_FALLBACK)),
        }
        self.loading = false;
    }

    #[must_use]
    pub fn visible(&self) -> Vec<&Employee> {
        let needle = self.filter.trim().to_lowercase();
        self.employees
            .iter()
            .filter(|employee| needle.is_empty() || employee.name.to_lowercase().contains(&needle))
            .collect()
    }

    /// Delete one employee and drop it from the list on success.
    pub async fn delete(&mut self, api: &ApiClient, id: &str) -> bool {
        if let Err(error) = validate::require("employee", id) {
            self.notice = Some(Notice::error(error.to_string()));
            return false;
        }
        self.loading = true;
        let result = api.delete_employee(id).await;
        self.loading = false;
        match result {
            Ok(_) => {
                self.employees.retain(|employee| employee.id != id);
                self.notice = Some(Notice::success(DELETE_SUCCESS));
                true
            }
            Err(error) => {
                self.notice = Some(Notice::from_api(&error, DELETE_FALLBACK));
                false
            }
        }
    }
}

/// Name suggestions for autocomplete. Failures just mean no suggestions.
pub async fn suggest_names(api: &ApiClient, partial: &str) -> Vec<String> {
    if partial.trim().is_empty() {
        return Vec::new();
    }
    api.search_employee_names(partial.trim()).await.unwrap_or_else(|error| {
        tracing::warn!(%error, "name search failed");
        Vec::new()
    })
}

// =============================================================================
// REGISTER
// =============================================================================

#[derive(Clone, Debug)]
pub struct RegisterEmployeeForm {
    pub name: String,
    pub role: String,
    pub photo: Option<PhotoSource>,
    pub dismiss_after: Duration,
    pub notice: Option<Notice>,
    gate: SubmitGate,
}

impl Default for RegisterEmployeeForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            role: String::new(),
            photo: None,
            dismiss_after: Duration::from_secs(DEFAULT_DISMISS_SECS),
            notice: None,
            gate: SubmitGate::new(),
        }
    }
}

impl RegisterEmployeeForm {
    #[must_use]
    pub fn new(name: impl Into<String>, role: impl Into<String>, photo: Option<PhotoSource>, dismiss_after: Duration) -> Self {
        Self { name: name.into(), role: role.into(), photo, dismiss_after, ..Self::default() }
    }

    /// # Errors
    ///
    /// Returns the first blank field, or `MissingPhoto` when no photo source
    /// has been chosen.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate::require("name", &self.name)?;
        validate::require("role", &self.role)?;
        if self.photo.is_none() {
            return Err(ValidationError::MissingPhoto);
        }
        Ok(())
    }

    /// Whether submitting is currently possible.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.validate().is_ok() && !self.gate.is_busy()
    }

    /// Capture the photo and register the employee in one request.
    ///
    /// The form resets after an accepted registration; the returned
    /// `Presented` keeps further submits disabled until it is dismissed.
    pub async fn submit(&mut self, api: &ApiClient) -> Option<Presented> {
        if let Err(error) = self.validate() {
            self.notice = Some(Notice::error(error.to_string()));
            return None;
        }
        let photo = self.photo.clone()?;
        let endpoint = RegisterEmployeeEndpoint::new(api.clone(), self.name.clone(), self.role.clone());
        let flow = CaptureFlow::new(photo, endpoint, self.dismiss_after).with_gate(self.gate.clone());

        match flow.trigger().await {
            Ok(presented) => {
                self.notice = Some(Notice::from_presented(&presented));
                if presented.outcome.is_accepted() {
                    self.name.clear();
                    self.role.clear();
                    self.photo = None;
                }
                Some(presented)
            }
            Err(error) => {
                self.notice = Some(flow_notice(&error));
                None
            }
        }
    }
}

// =============================================================================
// EDIT
// =============================================================================

#[derive(Clone, Debug, Default)]
pub struct EditEmployeeForm {
    pub id: String,
    pub name: String,
    pub role: String,
    pub photo_url: Option<String>,
    /// A new photo to replace the stored one; `None` keeps it.
    pub new_photo: Option<PhotoSource>,
    pub loading: bool,
    pub notice: Option<Notice>,
    gate: SubmitGate,
}

impl EditEmployeeForm {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), ..Self::default() }
    }

    /// Fill the form with the stored employee.
    pub async fn load(&mut self, api: &ApiClient) -> bool {
        self.loading = true;
        let result = api.employee(&self.id).await;
        self.loading = false;
        match result {
            Ok(employee) => {
                self.name = employee.name;
                self.role = employee.role;
                self.photo_url = employee.photo_url;
                true
            }
            Err(error) => {
                self.notice = Some(Notice::from_api(&error, LOAD_FALLBACK));
                false
            }
        }
    }

    /// # Errors
    ///
    /// Returns the first blank field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate::require("employee", &self.id)?;
        validate::require("name", &self.name)?;
        validate::require("role", &self.role)
    }

    /// Save name and role, plus the new photo when one was chosen.
    pub async fn submit(&mut self, api: &ApiClient) -> bool {
        if let Err(error) = self.validate() {
            self.notice = Some(Notice::error(error.to_string()));
            return false;
        }
        match self.new_photo.clone() {
            Some(photo) => self.submit_with_photo(api, photo).await,
            None => self.submit_fields(api).await,
        }
    }

    async fn submit_fields(&mut self, api: &ApiClient) -> bool {
        self.loading = true;
        let result = api
            .update_employee(&self.id, self.name.trim(), self.role.trim(), None)
            .await;
        self.loading = false;
        match result {
            Ok(ack) => {
                self.notice = Some(Notice::success(ack.text().unwrap_or(UPDATE_SUCCESS)));
                true
            }
            Err(error) => {
                self.notice = Some(Notice::from_api(&error, UPDATE_FALLBACK));
                false
            }
        }
    }

    async fn submit_with_photo(&mut self, api: &ApiClient, photo: PhotoSource) -> bool {
        let endpoint =
            EmployeePhotoEndpoint::new(api.clone(), self.id.clone(), self.name.clone(), self.role.clone());
        let flow = CaptureFlow::new(photo, endpoint, Duration::ZERO).with_gate(self.gate.clone());
        self.loading = true;
        let result = flow.trigger().await;
        self.loading = false;
        match result {
            Ok(presented) => {
                self.notice = Some(Notice::from_presented(&presented));
                let accepted = presented.outcome.is_accepted();
                if accepted {
                    self.new_photo = None;
                }
                accepted
            }
            Err(error) => {
                self.notice = Some(flow_notice(&error));
                false
            }
        }
    }
}

fn flow_notice(error: &FlowError) -> Notice {
    match error {
        FlowError::Busy => Notice::info(error.to_string()),
        FlowError::Invalid(_) => Notice::error(error.to_string()),
    }
}
