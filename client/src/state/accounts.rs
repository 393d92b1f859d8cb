//! Login, account registration, and account editing screens.
//!
//! SYSTEM CONTEXT
//! ==============
//! `LoginForm` yields the `Session` the CLI persists. `AccountEditor` starts
//! from the decoded token claims and keeps the logged-in user in the company
//! account list even when the backend leaves them out.

#[cfg(test)]
#[path = "accounts_test.rs"]
mod tests;

use super::{Notice, non_blank};
use crate::net::api::ApiClient;
use crate::net::types::{Account, AccountRegistration, AccountUpdate};
use crate::session::{Session, TokenClaims};
use crate::validate::{self, ValidationError};

pub const LOGIN_FALLBACK: &str = "Invalid credentials.";
pub const LOGIN_SUCCESS: &str = "Logged in successfully!";
pub const REGISTER_FALLBACK: &str = "Failed to register account.";
pub const REGISTER_SUCCESS: &str = "Account registered successfully!";
pub const UPDATE_FALLBACK: &str = "Failed to update account.";
pub const UPDATE_SUCCESS: &str = "Account updated successfully!";

// =============================================================================
// LOGIN
// =============================================================================

#[derive(Clone, Debug, Default)]
pub struct LoginForm {
    pub user_id: String,
    pub password: String,
    pub loading: bool,
    pub notice: Option<Notice>,
}

impl LoginForm {
    #[must_use]
    pub fn new(user_id: impl Into<String>, password: impl Into<String>) -> Self {
        Self { user_id: user_id.into(), password: password.into(), ..Self::default() }
    }

    /// # Errors
    ///
    /// Returns the first blank field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate::require("user id", &self.user_id)?;
        validate::require("password", &self.password)
    }

    /// Log in and return the session to persist.
    pub async fn submit(&mut self, api: &ApiClient) -> Option<Session> {
        if let Err(error) = self.validate() {
            self.notice = Some(Notice::error(error.to_string()));
            return None;
        }
        self.loading = true;
        let result = api.login(self.user_id.trim(), &self.password).await;
        self.loading = false;
        match result {
            Ok(token) => {
                self.password.clear();
                self.notice = Some(Notice::success(LOGIN_SUCCESS));
                Some(Session { token })
            }
            Err(error) => {
                self.notice = Some(Notice::from_api(&error, LOGIN_FALLBACK));
                None
            }
        }
    }
}

// =============================================================================
// REGISTER ACCOUNT
// =============================================================================

#[derive(Clone, Debug, Default)]
pub struct RegisterAccountForm {
    pub user_id: String,
    pub email: String,
    pub company_name: String,
    pub password: String,
    pub loading: bool,
    pub notice: Option<Notice>,
}

impl RegisterAccountForm {
    /// # Errors
    ///
    /// Returns the first blank field or a malformed email.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate::require("user id", &self.user_id)?;
        validate::require("email", &self.email)?;
        validate::require("company name", &self.company_name)?;
        validate::require("password", &self.password)?;
        validate::email(self.email.trim())
    }

    /// Create the account. Returns whether it was accepted.
    pub async fn submit(&mut self, api: &ApiClient) -> bool {
        if let Err(error) = self.validate() {
            self.notice = Some(Notice::error(error.to_string()));
            return false;
        }
        self.loading = true;
        let registration = AccountRegistration {
            usuario_id: self.user_id.trim(),
            email: self.email.trim(),
            empresa_nome: self.company_name.trim(),
            senha: &self.password,
        };
        let result = api.register_account(&registration).await;
        self.loading = false;

        match result {
            // The backend can answer 200 with `success: false` and an `error`.
            Ok(ack) if ack.success == Some(false) => {
                let message = ack.error.or(ack.message).unwrap_or_else(|| REGISTER_FALLBACK.to_owned());
                self.notice = Some(Notice::error(message));
                false
            }
            Ok(_) => {
                *self = Self { notice: Some(Notice::success(REGISTER_SUCCESS)), ..Self::default() };
                true
            }
            Err(error) => {
                self.notice = Some(Notice::from_api(&error, REGISTER_FALLBACK));
                false
            }
        }
    }
}

// =============================================================================
// EDIT ACCOUNT
// =============================================================================

/// Edit the logged-in account or another account of the same company.
#[derive(Clone, Debug, Default)]
pub struct AccountEditor {
    pub current_user_id: String,
    pub accounts: Vec<Account>,
    /// Account whose fields are loaded below.
    pub user_id: String,
    pub company_name: String,
    pub company_id: Option<String>,
    pub email: String,
    /// Blank keeps the current password.
    pub new_password: String,
    pub loading: bool,
    pub notice: Option<Notice>,
}

impl AccountEditor {
    /// Seed the editor from token claims; nothing is fetched yet.
    #[must_use]
    pub fn from_claims(claims: &TokenClaims) -> Self {
        Self {
            current_user_id: claims.usuario_id.clone(),
            user_id: claims.usuario_id.clone(),
            company_name: claims.empresa_nome.clone(),
            company_id: claims.empresa_id.clone(),
            ..Self::default()
        }
    }

    fn current_account(&self) -> Account {
        Account {
            user_id: self.current_user_id.clone(),
            email: self.email.clone(),
            company_name: self.company_name.clone(),
            company_id: self.company_id.clone(),
        }
    }

    /// Fetch the current account's email and the company account list.
    ///
    /// Either request may fail independently; the list always ends up
    /// containing at least the current user.
    pub async fn load(&mut self, api: &ApiClient) {
        self.loading = true;
        match api.account(&self.current_user_id).await {
            Ok(account) => self.email = account.email,
            Err(error) => {
                tracing::warn!(%error, "could not load current account");
                self.notice = Some(Notice::from_api(&error, UPDATE_FALLBACK));
            }
        }
        let listed = match self.company_id.as_deref() {
            Some(company_id) => api.company_accounts(company_id).await,
            None => Ok(Vec::new()),
        };
        self.accounts = match listed {
            Ok(list) => with_current_first(list, self.current_account()),
            Err(error) => {
                tracing::warn!(%error, "could not list company accounts");
                vec![self.current_account()]
            }
        };
        self.loading = false;
    }

    /// Load another listed account into the form.
    ///
    /// # Errors
    ///
    /// Returns `Missing` when `user_id` is not in the list.
    pub fn select(&mut self, user_id: &str) -> Result<(), ValidationError> {
        let account = self
            .accounts
            .iter()
            .find(|account| account.user_id == user_id)
            .cloned()
            .ok_or(ValidationError::Missing("listed account"))?;
        self.user_id = account.user_id;
        self.email = account.email;
        self.company_name = account.company_name;
        self.company_id = account.company_id;
        self.new_password.clear();
        Ok(())
    }

    /// # Errors
    ///
    /// Returns the first blank field or a malformed email.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate::require("user id", &self.user_id)?;
        validate::require("company name", &self.company_name)?;
        validate::require("email", &self.email)?;
        validate::email(self.email.trim())
    }

    /// Save the form. The password is only sent when a new one was typed.
    pub async fn save(&mut self, api: &ApiClient) -> bool {
        if let Err(error) = self.validate() {
            self.notice = Some(Notice::error(error.to_string()));
            return false;
        }
        self.loading = true;
        let new_password = non_blank(&self.new_password);
        let update = AccountUpdate {
            empresa_nome: self.company_name.trim(),
            empresa_id: self.company_id.as_deref(),
            email: self.email.trim(),
            senha: new_password.as_deref(),
        };
        let result = api.update_account(&self.user_id, &update).await;
        self.loading = false;

        match result {
            Ok(_) => {
                self.new_password.clear();
                self.notice = Some(Notice::success(UPDATE_SUCCESS));
                self.remember_saved();
                true
            }
            Err(error) => {
                self.notice = Some(Notice::from_api(&error, UPDATE_FALLBACK));
                false
            }
        }
    }

    fn remember_saved(&mut self) {
        let saved = Account {
            user_id: self.user_id.clone(),
            email: self.email.trim().to_owned(),
            company_name: self.company_name.trim().to_owned(),
            company_id: self.company_id.clone(),
        };
        match self.accounts.iter_mut().find(|account| account.user_id == saved.user_id) {
            Some(slot) => *slot = saved,
            None => self.accounts.insert(0, saved),
        }
    }
}

/// Put `current` at the front unless the list already has that user.
#[must_use]
pub fn with_current_first(mut accounts: Vec<Account>, current: Account) -> Vec<Account> {
    if !accounts.iter().any(|account| account.user_id == current.user_id) {
        accounts.insert(0, current);
    }
    accounts
}
