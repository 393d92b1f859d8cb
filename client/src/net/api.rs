//! Typed HTTP client for the attendance backend.
//!
//! DESIGN
//! ======
//! One `reqwest::Client` built from `ClientConfig` carries the base URL and
//! both timeouts. Every endpoint goes through `send`, which is the single
//! place where transport failures, non-2xx statuses, and body decoding are
//! normalized into `ApiError`. Screens never see a raw `reqwest::Error`.
//!
//! SYSTEM CONTEXT
//! ==============
//! The bearer token comes from `login` and is attached to every request once
//! set. Endpoints the backend guards fail fast with `ApiError::MissingToken`
//! when no token is held, so nothing is sent that is bound to be rejected.
//!
//! ERROR HANDLING
//! ==============
//! Error bodies are parsed leniently: a non-JSON or empty body just means the
//! screen's fallback text is used. A success body that does not match the
//! expected shape is a `Decode` error.

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;

use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::types::{
    Account, AccountRegistration, AccountUpdate, Acknowledgement, AttendanceRecord, ClockInReceipt,
    ClockInResponse, EmailHoursReport, EmailRecordsReport, Employee, EmployeeCreated, HoursSummary,
    LoginRequest, LoginResponse, ManualPunchRequest, RecordQuery,
};
use crate::capture::CapturedImage;
use crate::config::ClientConfig;
use crate::error::ApiError;

/// Multipart part name the backend reads photos from.
const PHOTO_FIELD: &str = "foto";

// =============================================================================
// CLIENT
// =============================================================================

#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Build a client with the configured base URL and timeouts.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Build` if the TLS backend cannot be initialized.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| ApiError::Build(e.to_string()))?;
        Ok(Self { http, base_url: config.base_url.clone(), token: None })
    }

    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        debug!(%method, path, "api request");
        let builder = self.http.request(method, format!("{}{path}", self.base_url));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    fn authorized(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        if self.token.is_none() {
            warn!(path, "authenticated endpoint called without a token");
            return Err(ApiError::MissingToken);
        }
        Ok(self.request(method, path))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder, path: &str) -> Result<T, ApiError> {
        let response = request.send().await.map_err(|e| {
            let err = ApiError::from_transport(&e);
            warn!(path, error = %err, "request failed");
            err
        })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::from_transport(&e))?;

        if !status.is_success() {
            let body = serde_json::from_str(&text).unwrap_or(Value::Null);
            let err = ApiError::from_response(status.as_u16(), &body);
            warn!(path, status = status.as_u16(), error = %err, "server rejected request");
            return Err(err);
        }

        parse_body(&text)
    }

    async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.send(request.json(body), path).await
    }

    // -------------------------------------------------------------------------
    // Health and authentication
    // -------------------------------------------------------------------------

    /// `GET /teste`
    ///
    /// # Errors
    ///
    /// Returns any transport or server failure.
    pub async fn ping(&self) -> Result<Acknowledgement, ApiError> {
        let path = "/teste";
        self.send(self.request(Method::GET, path), path).await
    }

    /// `POST /login`; returns the bearer token without storing it.
    ///
    /// # Errors
    ///
    /// A 2xx answer that carries no token is reported as a server failure
    /// without a message.
    pub async fn login(&self, user_id: &str, password: &str) -> Result<String, ApiError> {
        let path = "/login";
        let body = LoginRequest { usuario_id: user_id, senha: password };
        let response: LoginResponse = self
            .send_json(self.request(Method::POST, path), path, &body)
            .await?;
        match response.token.filter(|token| !token.trim().is_empty()) {
            Some(token) => {
                info!(user_id, "logged in");
                Ok(token)
            }
            None => Err(ApiError::Server { status: 200, message: None }),
        }
    }

    /// `POST /cadastrar_usuario_empresa`
    ///
    /// # Errors
    ///
    /// Returns any transport or server failure.
    pub async fn register_account(
        &self,
        registration: &AccountRegistration<'_>,
    ) -> Result<Acknowledgement, ApiError> {
        let path = "/cadastrar_usuario_empresa";
        let ack = self
            .send_json(self.request(Method::POST, path), path, registration)
            .await?;
        info!(user_id = registration.usuario_id, "account registered");
        Ok(ack)
    }

    // -------------------------------------------------------------------------
    // Accounts
    // -------------------------------------------------------------------------

    /// `GET /usuario_empresa/{id}`
    ///
    /// # Errors
    ///
    /// Returns `MissingToken` before sending when logged out.
    pub async fn account(&self, user_id: &str) -> Result<Account, ApiError> {
        let path = format!("/usuario_empresa/{user_id}");
        self.send(self.authorized(Method::GET, &path)?, &path).await
    }

    /// `GET /usuarios_empresa?empresa_id=`
    ///
    /// # Errors
    ///
    /// Returns `MissingToken` before sending when logged out.
    pub async fn company_accounts(&self, company_id: &str) -> Result<Vec<Account>, ApiError> {
        let path = "/usuarios_empresa";
        let request = self
            .authorized(Method::GET, path)?
            .query(&[("empresa_id", company_id)]);
        self.send(request, path).await
    }

    /// `PUT /usuario_empresa/{id}`
    ///
    /// # Errors
    ///
    /// Returns `MissingToken` before sending when logged out.
    pub async fn update_account(
        &self,
        user_id: &str,
        update: &AccountUpdate<'_>,
    ) -> Result<Acknowledgement, ApiError> {
        let path = format!("/usuario_empresa/{user_id}");
        let ack = self
            .send_json(self.authorized(Method::PUT, &path)?, &path, update)
            .await?;
        info!(user_id, "account updated");
        Ok(ack)
    }

    // -------------------------------------------------------------------------
    // Employees
    // -------------------------------------------------------------------------

    /// `GET /funcionarios`
    ///
    /// # Errors
    ///
    /// Returns `MissingToken` before sending when logged out.
    pub async fn employees(&self) -> Result<Vec<Employee>, ApiError> {
        let path = "/funcionarios";
        self.send(self.authorized(Method::GET, path)?, path).await
    }

    /// `GET /funcionarios/{id}`
    ///
    /// # Errors
    ///
    /// Returns `MissingToken` before sending when logged out.
    pub async fn employee(&self, id: &str) -> Result<Employee, ApiError> {
        let path = format!("/funcionarios/{id}");
        self.send(self.authorized(Method::GET, &path)?, &path).await
    }

    /// `GET /funcionarios/nome?nome=`; names containing `partial`.
    ///
    /// # Errors
    ///
    /// Returns `MissingToken` before sending when logged out.
    pub async fn search_employee_names(&self, partial: &str) -> Result<Vec<String>, ApiError> {
        let path = "/funcionarios/nome";
        let request = self
            .authorized(Method::GET, path)?
            .query(&[("nome", partial)]);
        self.send(request, path).await
    }

    /// `POST /cadastrar_funcionario` as multipart `nome`, `cargo`, `foto`.
    ///
    /// # Errors
    ///
    /// Returns `Build` if the photo's content type is rejected.
    pub async fn register_employee(
        &self,
        name: &str,
        role: &str,
        photo: CapturedImage,
    ) -> Result<EmployeeCreated, ApiError> {
        let path = "/cadastrar_funcionario";
        let form = Form::new()
            .text("nome", name.to_owned())
            .text("cargo", role.to_owned())
            .part(PHOTO_FIELD, photo_part(photo)?);
        let created: EmployeeCreated = self
            .send(self.authorized(Method::POST, path)?.multipart(form), path)
            .await?;
        info!(name, id = created.id.as_deref().unwrap_or("?"), "employee registered");
        Ok(created)
    }

    /// `PUT /funcionarios/{id}` as multipart; the photo part is optional.
    ///
    /// # Errors
    ///
    /// Returns `MissingToken` before sending when logged out.
    pub async fn update_employee(
        &self,
        id: &str,
        name: &str,
        role: &str,
        photo: Option<CapturedImage>,
    ) -> Result<Acknowledgement, ApiError> {
        let path = format!("/funcionarios/{id}");
        let mut form = Form::new()
            .text("nome", name.to_owned())
            .text("cargo", role.to_owned());
        if let Some(photo) = photo {
            form = form.part(PHOTO_FIELD, photo_part(photo)?);
        }
        let ack = self
            .send(self.authorized(Method::PUT, &path)?.multipart(form), &path)
            .await?;
        info!(id, "employee updated");
        Ok(ack)
    }

    /// `DELETE /funcionarios/{id}`
    ///
    /// # Errors
    ///
    /// Returns `MissingToken` before sending when logged out.
    pub async fn delete_employee(&self, id: &str) -> Result<Acknowledgement, ApiError> {
        let path = format!("/funcionarios/{id}");
        let ack = self.send(self.authorized(Method::DELETE, &path)?, &path).await?;
        info!(id, "employee deleted");
        Ok(ack)
    }

    // -------------------------------------------------------------------------
    // Punches
    // -------------------------------------------------------------------------

    /// `POST /registrar_ponto` with a single `foto` part.
    ///
    /// The backend recognizes the face and decides the punch kind itself.
    ///
    /// # Errors
    ///
    /// A 2xx answer with `success: false` is reported as a server failure
    /// carrying the backend's message, if any.
    pub async fn clock_in(&self, photo: CapturedImage) -> Result<ClockInReceipt, ApiError> {
        let path = "/registrar_ponto";
        let form = Form::new().part(PHOTO_FIELD, photo_part(photo)?);
        let response: ClockInResponse = self
            .send(self.request(Method::POST, path).multipart(form), path)
            .await?;
        if !response.success {
            return Err(ApiError::Server { status: 200, message: response.message });
        }
        let receipt = ClockInReceipt {
            employee_name: response.employee_name.unwrap_or_default(),
            punched_at: response.punched_at.unwrap_or_default(),
            kind: response.kind,
        };
        info!(employee = %receipt.employee_name, at = %receipt.punched_at, "clock-in accepted");
        Ok(receipt)
    }

    /// `POST /registrar_ponto_manual`
    ///
    /// # Errors
    ///
    /// Returns `MissingToken` before sending when logged out.
    pub async fn manual_punch(&self, punch: &ManualPunchRequest<'_>) -> Result<Acknowledgement, ApiError> {
        let path = "/registrar_ponto_manual";
        let ack = self
            .send_json(self.authorized(Method::POST, path)?, path, punch)
            .await?;
        info!(employee_id = punch.funcionario_id, at = %punch.data_hora, kind = %punch.tipo, "manual punch recorded");
        Ok(ack)
    }

    // -------------------------------------------------------------------------
    // Records
    // -------------------------------------------------------------------------

    /// `GET /registros` filtered by period and employee id.
    ///
    /// # Errors
    ///
    /// Returns `MissingToken` before sending when logged out.
    pub async fn records(&self, query: &RecordQuery) -> Result<Vec<AttendanceRecord>, ApiError> {
        let path = "/registros";
        self.send(self.authorized(Method::GET, path)?.query(query), path).await
    }

    /// `GET /registros` filtered by period and name; per-employee totals.
    ///
    /// # Errors
    ///
    /// Returns `MissingToken` before sending when logged out.
    pub async fn hours(&self, query: &RecordQuery) -> Result<Vec<HoursSummary>, ApiError> {
        let path = "/registros";
        self.send(self.authorized(Method::GET, path)?.query(query), path).await
    }

    /// `DELETE /registros/{id}`
    ///
    /// # Errors
    ///
    /// Returns `MissingToken` before sending when logged out.
    pub async fn delete_record(&self, id: &str) -> Result<Acknowledgement, ApiError> {
        let path = format!("/registros/{id}");
        let ack = self.send(self.authorized(Method::DELETE, &path)?, &path).await?;
        info!(id, "record deleted");
        Ok(ack)
    }

    /// `POST /enviar-email-registros`
    ///
    /// # Errors
    ///
    /// Returns `MissingToken` before sending when logged out.
    pub async fn email_records_report(
        &self,
        report: &EmailRecordsReport<'_>,
    ) -> Result<Acknowledgement, ApiError> {
        let path = "/enviar-email-registros";
        let ack = self
            .send_json(self.authorized(Method::POST, path)?, path, report)
            .await?;
        info!(to = report.email, records = report.registros.len(), "records report emailed");
        Ok(ack)
    }

    /// `POST /enviar-email-consolidado`
    ///
    /// # Errors
    ///
    /// Returns `MissingToken` before sending when logged out.
    pub async fn email_hours_report(
        &self,
        report: &EmailHoursReport<'_>,
    ) -> Result<Acknowledgement, ApiError> {
        let path = "/enviar-email-consolidado";
        let ack = self
            .send_json(self.authorized(Method::POST, path)?, path, report)
            .await?;
        info!(to = report.email, rows = report.registros.len(), "hours report emailed");
        Ok(ack)
    }
}

// =============================================================================
// HELPERS
// =============================================================================

fn photo_part(photo: CapturedImage) -> Result<Part, ApiError> {
    Part::bytes(photo.bytes)
        .file_name(photo.file_name)
        .mime_str(photo.content_type)
        .map_err(|e| ApiError::Build(e.to_string()))
}

/// Decode a 2xx body; an empty body decodes as `{}`.
fn parse_body<T: DeserializeOwned>(text: &str) -> Result<T, ApiError> {
    let text = if text.trim().is_empty() { "{}" } else { text };
    serde_json::from_str(text).map_err(|e| ApiError::Decode(e.to_string()))
}
