//! Record and worked-hours queries, with deletion, export, and email.
//!
//! DESIGN
//! ======
//! Two screens share one period filter. `EmployeeRecords` shows one
//! employee's punches and totals them client-side; `HoursOverview` shows the
//! backend's per-employee totals. Both export exactly what is loaded, so the
//! spreadsheet always matches the screen.
//!
//! ERROR HANDLING
//! ==============
//! An inverted or malformed period is rejected before any request. Load,
//! delete, and email failures become notices; export failures become the one
//! generic export message.

#[cfg(test)]
#[path = "records_test.rs"]
mod tests;

use std::path::{Path, PathBuf};

use super::{Notice, non_blank};
use crate::net::api::ApiClient;
use crate::net::types::{AttendanceRecord, EmailHoursReport, EmailRecordsReport, HoursSummary, Period, RecordQuery};
use crate::report::{export, hours};
use crate::validate::{self, ValidationError};

pub const LOAD_FALLBACK: &str = "Failed to load records. Please try again.";
pub const DELETE_FALLBACK: &str = "Failed to delete record.";
pub const DELETE_SUCCESS: &str = "Record deleted successfully!";
pub const EMAIL_FALLBACK: &str = "Failed to send email.";
pub const EMAIL_SUCCESS: &str = "Report sent by email successfully!";
pub const NOTHING_TO_SEND: &str = "No records loaded.";
pub const UNKNOWN_EMPLOYEE: &str = "Unknown employee";

/// Start/end filter shared by both screens. Blank bounds mean open-ended.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PeriodFilter {
    pub start: String,
    pub end: String,
}

impl PeriodFilter {
    #[must_use]
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self { start: start.into(), end: end.into() }
    }

    /// # Errors
    ///
    /// Returns `BadDate` or `RangeInverted`.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate::date_range(&self.start, &self.end)
    }

    #[must_use]
    pub fn period(&self) -> Period {
        Period { start: self.start.trim().to_owned(), end: self.end.trim().to_owned() }
    }

    fn query(&self) -> RecordQuery {
        RecordQuery { start: non_blank(&self.start), end: non_blank(&self.end), ..RecordQuery::default() }
    }
}

fn export_notice(result: &Result<PathBuf, export::ExportError>) -> Notice {
    match result {
        Ok(path) => {
            let name = path.file_name().map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
            Notice::success(format!("Report \"{name}\" generated successfully!"))
        }
        Err(error) => Notice::error(error.user_message()),
    }
}

// =============================================================================
// ONE EMPLOYEE'S RECORDS
// =============================================================================

#[derive(Clone, Debug, Default)]
pub struct EmployeeRecords {
    pub employee_id: String,
    pub employee_name: String,
    pub period: PeriodFilter,
    pub records: Vec<AttendanceRecord>,
    pub email_to: String,
    pub loading: bool,
    pub notice: Option<Notice>,
}

impl EmployeeRecords {
    #[must_use]
    pub fn new(employee_id: impl Into<String>, period: PeriodFilter) -> Self {
        Self { employee_id: employee_id.into(), period, ..Self::default() }
    }

    /// Look up the employee's name, then load their punches for the period.
    pub async fn load(&mut self, api: &ApiClient) -> bool {
        if let Err(error) = validate::require("employee", &self.employee_id).and_then(|()| self.period.validate()) {
            self.notice = Some(Notice::error(error.to_string()));
            return false;
        }
        self.loading = true;
        self.employee_name = match api.employee(self.employee_id.trim()).await {
            Ok(employee) if !employee.name.trim().is_empty() => employee.name,
            Ok(_) => UNKNOWN_EMPLOYEE.to_owned(),
            Err(error) => {
                tracing::warn!(%error, "employee lookup failed");
                UNKNOWN_EMPLOYEE.to_owned()
            }
        };
        let query = RecordQuery { employee_id: non_blank(&self.employee_id), ..self.period.query() };
        let result = api.records(&query).await;
        self.loading = false;
        match result {
            Ok(records) => {
                self.records = records;
                true
            }
            Err(error) => {
                self.notice = Some(Notice::from_api(&error, LOAD_FALLBACK));
                false
            }
        }
    }

    /// Sum of closed entry/exit pairs, as `HH:MM`.
    #[must_use]
    pub fn total_hours(&self) -> String {
        hours::format_hhmm(hours::total_worked(&self.records))
    }

    pub async fn delete(&mut self, api: &ApiClient, record_id: &str) -> bool {
        if let Err(error) = validate::require("record", record_id) {
            self.notice = Some(Notice::error(error.to_string()));
            return false;
        }
        self.loading = true;
        let result = api.delete_record(record_id).await;
        self.loading = false;
        match result {
            Ok(_) => {
                self.records.retain(|record| record.id != record_id);
                self.notice = Some(Notice::success(DELETE_SUCCESS));
                true
            }
            Err(error) => {
                self.notice = Some(Notice::from_api(&error, DELETE_FALLBACK));
                false
            }
        }
    }

    /// Write the loaded records to an `.xlsx` file in `dir`.
    pub fn export(&mut self, dir: &Path) -> Option<PathBuf> {
        let layout = export::records_report(&self.employee_name, &self.period.period(), &self.records);
        let result = export::write_report(&layout, dir);
        self.notice = Some(export_notice(&result));
        result.ok()
    }

    /// Ask the backend to email the loaded records.
    pub async fn email(&mut self, api: &ApiClient) -> bool {
        if let Err(error) = validate::email(self.email_to.trim()) {
            self.notice = Some(Notice::error(error.to_string()));
            return false;
        }
        if self.records.is_empty() {
            self.notice = Some(Notice::info(NOTHING_TO_SEND));
            return false;
        }
        self.loading = true;
        let period = self.period.period();
        let report = EmailRecordsReport {
            funcionario: &self.employee_name,
            funcionario_id: self.employee_id.trim(),
            periodo: &period,
            registros: &self.records,
            email: self.email_to.trim(),
        };
        let result = api.email_records_report(&report).await;
        self.loading = false;
        self.notice = Some(match result {
            Ok(ack) => Notice::success(ack.text().unwrap_or(EMAIL_SUCCESS)),
            Err(error) => Notice::from_api(&error, EMAIL_FALLBACK),
        });
        self.notice.as_ref().is_some_and(|notice| !notice.is_error())
    }
}

// =============================================================================
// CONSOLIDATED HOURS
// =============================================================================

#[derive(Clone, Debug, Default)]
pub struct HoursOverview {
    /// Optional employee-name filter.
    pub name: String,
    pub period: PeriodFilter,
    pub rows: Vec<HoursSummary>,
    pub email_to: String,
    pub loading: bool,
    pub notice: Option<Notice>,
}

impl HoursOverview {
    #[must_use]
    pub fn new(period: PeriodFilter) -> Self {
        Self { period, ..Self::default() }
    }

    pub async fn load(&mut self, api: &ApiClient) -> bool {
        if let Err(error) = self.period.validate() {
            self.notice = Some(Notice::error(error.to_string()));
            return false;
        }
        self.loading = true;
        let query = RecordQuery { name: non_blank(&self.name), ..self.period.query() };
        let result = api.hours(&query).await;
        self.loading = false;
        match result {
            Ok(rows) => {
                self.rows = rows;
                true
            }
            Err(error) => {
                self.notice = Some(Notice::from_api(&error, LOAD_FALLBACK));
                false
            }
        }
    }

    pub fn export(&mut self, dir: &Path) -> Option<PathBuf> {
        let layout = export::hours_report(&self.period.period(), &self.rows);
        let result = export::write_report(&layout, dir);
        self.notice = Some(export_notice(&result));
        result.ok()
    }

    pub async fn email(&mut self, api: &ApiClient) -> bool {
        if let Err(error) = validate::email(self.email_to.trim()) {
            self.notice = Some(Notice::error(error.to_string()));
            return false;
        }
        if self.rows.is_empty() {
            self.notice = Some(Notice::info(NOTHING_TO_SEND));
            return false;
        }
        self.loading = true;
        let period = self.period.period();
        let report = EmailHoursReport { registros: &self.rows, email: self.email_to.trim(), periodo: &period };
        let result = api.email_hours_report(&report).await;
        self.loading = false;
        self.notice = Some(match result {
            Ok(ack) => Notice::success(ack.text().unwrap_or(EMAIL_SUCCESS)),
            Err(error) => Notice::from_api(&error, EMAIL_FALLBACK),
        });
        self.notice.as_ref().is_some_and(|notice| !notice.is_error())
    }
}
