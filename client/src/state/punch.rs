//! Manual punch entry and the camera clock-in screen.

#[cfg(test)]
#[path = "punch_test.rs"]
mod tests;

use std::time::Duration;

use time::macros::format_description;

use super::Notice;
use crate::capture::PhotoSource;
use crate::capture::flow::{CaptureFlow, FlowError, Presented, SubmitGate};
use crate::net::api::ApiClient;
use crate::net::endpoints::ClockInEndpoint;
use crate::net::types::{ManualPunchRequest, PunchKind};
use crate::validate::{self, ValidationError};

pub const MANUAL_SUCCESS: &str = "Punch recorded successfully!";
pub const MANUAL_FALLBACK: &str = "Failed to record manual punch.";
pub const FILL_ALL_FIELDS: &str = "Fill in all fields!";

// =============================================================================
// MANUAL PUNCH
// =============================================================================

#[derive(Clone, Debug, Default)]
pub struct ManualPunchForm {
    pub employee_id: String,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM`
    pub time: String,
    pub kind: PunchKind,
    pub loading: bool,
    pub notice: Option<Notice>,
}

impl ManualPunchForm {
    /// Check fields and build the backend's `YYYY-MM-DD HH:MM` timestamp.
    ///
    /// # Errors
    ///
    /// Returns the first blank field, or a malformed date or time.
    pub fn timestamp(&self) -> Result<String, ValidationError> {
        validate::require("employee", &self.employee_id)?;
        validate::require("date", &self.date)?;
        validate::require("time", &self.time)?;
        let date = validate::parse_date("date", &self.date)?;
        let time = validate::parse_time("time", &self.time)?;
        let date = date
            .format(format_description!("[year]-[month]-[day]"))
            .map_err(|_| ValidationError::BadDate { field: "date", value: self.date.clone() })?;
        let time = time
            .format(format_description!("[hour]:[minute]"))
            .map_err(|_| ValidationError::BadTime { field: "time", value: self.time.clone() })?;
        Ok(format!("{date} {time}"))
    }

    /// Record the punch. The form resets after success.
    pub async fn submit(&mut self, api: &ApiClient) -> bool {
        let data_hora = match self.timestamp() {
            Ok(data_hora) => data_hora,
            Err(ValidationError::Missing(_)) => {
                self.notice = Some(Notice::info(FILL_ALL_FIELDS));
                return false;
            }
            Err(error) => {
                self.notice = Some(Notice::error(error.to_string()));
                return false;
            }
        };
        self.loading = true;
        let punch = ManualPunchRequest { funcionario_id: self.employee_id.trim(), data_hora, tipo: self.kind };
        let result = api.manual_punch(&punch).await;
        self.loading = false;

        match result {
            Ok(ack) => {
                let message = ack.text().unwrap_or(MANUAL_SUCCESS).to_owned();
                *self = Self { notice: Some(Notice::success(message)), ..Self::default() };
                true
            }
            Err(error) => {
                self.notice = Some(Notice::from_api(&error, MANUAL_FALLBACK));
                false
            }
        }
    }
}

// =============================================================================
// CAMERA CLOCK-IN
// =============================================================================

/// The always-on clock-in screen: one photo per trigger, result shown for the
/// dismissal window.
pub struct ClockInScreen {
    flow: CaptureFlow<PhotoSource, ClockInEndpoint>,
    pub notice: Option<Notice>,
}

impl ClockInScreen {
    #[must_use]
    pub fn new(api: ApiClient, camera: PhotoSource, dismiss_after: Duration) -> Self {
        Self { flow: CaptureFlow::new(camera, ClockInEndpoint::new(api), dismiss_after), notice: None }
    }

    #[must_use]
    pub fn gate(&self) -> &SubmitGate {
        self.flow.gate()
    }

    /// Take one photo and punch.
    ///
    /// # Errors
    ///
    /// Returns `Busy` while the previous result is still on screen.
    pub async fn trigger(&mut self) -> Result<Presented, FlowError> {
        let presented = self.flow.trigger().await?;
        self.notice = Some(Notice::from_presented(&presented));
        Ok(presented)
    }

    /// Clear the notice once the dismissal window has passed.
    pub async fn settle(&mut self, presented: Presented) {
        presented.dismiss().await;
        self.notice = None;
    }
}
