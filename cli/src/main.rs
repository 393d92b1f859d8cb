//! `ponto`: command-line front end for the time-clock backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! Each subcommand drives one screen from `client::state` and prints its
//! notice. The session token lives in a small JSON file written by `login`;
//! every other command loads it on start, and an unreadable file
//! counts as logged out. `kiosk` keeps the camera clock-in
//! screen running, one photo per Enter key.

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::{Args, Parser, Subcommand};
use client::capture::flow::FlowError;
use client::capture::{CommandCamera, PhotoSource};
use client::config::{ClientConfig, ConfigError};
use client::error::ApiError;
use client::net::api::ApiClient;
use client::net::types::PunchKind;
use client::session::{Session, SessionError, SessionStore, TokenClaims};
use client::state::accounts::{AccountEditor, LoginForm, RegisterAccountForm};
use client::state::employees::{EditEmployeeForm, EmployeeList, RegisterEmployeeForm, suggest_names};
use client::state::punch::{ClockInScreen, ManualPunchForm};
use client::state::records::{EmployeeRecords, HoursOverview, PeriodFilter};
use client::state::{Notice, Severity};
use serde::Serialize;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Flow(#[from] FlowError),
    #[error("not logged in; run `ponto login` first")]
    NotLoggedIn,
    #[error("no photo given; pass --photo or --camera")]
    MissingPhoto,
    #[error("{0}")]
    Rejected(String),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
}

#[derive(Parser, Debug)]
#[command(name = "ponto", about = "Time-clock client: employees, punches, and attendance reports")]
struct Cli {
    #[arg(long, env = "PONTO_BASE_URL")]
    base_url: Option<String>,

    #[arg(long, env = "PONTO_SESSION_FILE")]
    session_file: Option<PathBuf>,

    /// Log requests to stderr.
    #[arg(short, long, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

struct CliContext {
    config: ClientConfig,
    store: SessionStore,
    api: ApiClient,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that the backend answers.
    Ping,
    Login {
        user_id: String,
        #[arg(long, env = "PONTO_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Logout,
    /// Show who the stored token belongs to.
    Whoami,
    Account(AccountCommand),
    Employee(EmployeeCommand),
    Punch(PunchCommand),
    /// Repeated camera clock-in; press Enter to punch, `q` to quit.
    Kiosk(PhotoArgs),
    Records(RecordsCommand),
}

#[derive(Args, Debug)]
struct AccountCommand {
    #[command(subcommand)]
    command: AccountSubcommand,
}

#[derive(Subcommand, Debug)]
enum AccountSubcommand {
    Register {
        user_id: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        company: String,
        #[arg(long, env = "PONTO_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Show,
    /// Accounts of the logged-in company.
    List,
    Update {
        /// Edit another account of the same company.
        #[arg(long)]
        user: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        company: Option<String>,
        #[arg(long)]
        new_password: Option<String>,
    },
}

#[derive(Args, Debug)]
struct EmployeeCommand {
    #[command(subcommand)]
    command: EmployeeSubcommand,
}

#[derive(Subcommand, Debug)]
enum EmployeeSubcommand {
    List {
        #[arg(long)]
        filter: Option<String>,
    },
    Show {
        id: String,
    },
    /// Name suggestions for a partial name.
    Search {
        partial: String,
    },
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        role: String,
        #[command(flatten)]
        photo: PhotoArgs,
    },
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        role: Option<String>,
        #[command(flatten)]
        photo: PhotoArgs,
    },
    Delete {
        id: String,
    },
}

#[derive(Args, Debug)]
struct PunchCommand {
    #[command(subcommand)]
    command: PunchSubcommand,
}

#[derive(Subcommand, Debug)]
enum PunchSubcommand {
    Manual {
        employee_id: String,
        /// YYYY-MM-DD
        #[arg(long)]
        date: String,
        /// HH:MM
        #[arg(long)]
        time: String,
        #[arg(long, default_value = "entry")]
        kind: PunchKind,
    },
    /// One camera punch.
    Camera(PhotoArgs),
}

#[derive(Args, Debug)]
struct RecordsCommand {
    #[command(subcommand)]
    command: RecordsSubcommand,
}

#[derive(Subcommand, Debug)]
enum RecordsSubcommand {
    /// One employee's punches and total worked hours.
    Query {
        employee_id: String,
        #[command(flatten)]
        period: PeriodArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Worked hours per employee.
    Hours {
        #[arg(long)]
        name: Option<String>,
        #[command(flatten)]
        period: PeriodArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    Delete {
        record_id: String,
    },
}

#[derive(Args, Debug, Default)]
struct PhotoArgs {
    /// Image file to send.
    #[arg(long)]
    photo: Option<PathBuf>,

    /// Capture program writing one image to stdout, e.g. `fswebcam --no-banner -`.
    #[arg(long, env = "PONTO_CAMERA_COMMAND")]
    camera: Option<String>,
}

impl PhotoArgs {
    fn source(&self) -> Option<PhotoSource> {
        if let Some(path) = &self.photo {
            return Some(PhotoSource::file(path));
        }
        self.camera
            .as_deref()
            .and_then(CommandCamera::from_command_line)
            .map(PhotoSource::Command)
    }
}

#[derive(Args, Debug, Default)]
struct PeriodArgs {
    /// YYYY-MM-DD
    #[arg(long, default_value = "")]
    start: String,
    /// YYYY-MM-DD
    #[arg(long, default_value = "")]
    end: String,
}

impl PeriodArgs {
    fn filter(&self) -> PeriodFilter {
        PeriodFilter::new(self.start.clone(), self.end.clone())
    }
}

#[derive(Args, Debug, Default)]
struct OutputArgs {
    /// Write an .xlsx report into this directory.
    #[arg(long)]
    export: Option<PathBuf>,
    /// Ask the backend to email the report to this address.
    #[arg(long)]
    email: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    let level = if cli.verbose { tracing::Level::DEBUG } else { tracing::Level::WARN };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(level)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let ctx = build_context(&cli)?;
    match cli.command {
        Command::Ping => run_ping(&ctx).await,
        Command::Login { user_id, password } => run_login(&ctx, &user_id, &password).await,
        Command::Logout => {
            ctx.store.clear()?;
            println!("logged out");
            Ok(())
        }
        Command::Whoami => run_whoami(&ctx),
        Command::Account(account) => run_account(&ctx, account).await,
        Command::Employee(employee) => run_employee(&ctx, employee).await,
        Command::Punch(punch) => run_punch(&ctx, punch).await,
        Command::Kiosk(photo) => run_kiosk(&ctx, &photo).await,
        Command::Records(records) => run_records(&ctx, records).await,
    }
}

fn build_context(cli: &Cli) -> Result<CliContext, CliError> {
    let mut config = ClientConfig::from_env()?;
    if let Some(base_url) = &cli.base_url {
        config = config.with_base_url(base_url)?;
    }
    if let Some(session_file) = &cli.session_file {
        config.session_file.clone_from(session_file);
    }
    let store = SessionStore::new(&config.session_file);
    let mut api = ApiClient::new(&config)?;
    api.set_token(stored_token(&store));
    Ok(CliContext { config, store, api })
}

/// An unreadable session file counts as logged out; `login` or `logout`
/// replaces it.
fn stored_token(store: &SessionStore) -> Option<String> {
    match store.load() {
        Ok(session) => session.map(|session| session.token),
        Err(error) => {
            tracing::warn!(%error, path = %store.path().display(), "ignoring unreadable session file");
            None
        }
    }
}

// =============================================================================
// SESSION
// =============================================================================

async fn run_ping(ctx: &CliContext) -> Result<(), CliError> {
    let ack = ctx.api.ping().await?;
    println!("{}", ack.text().unwrap_or("ok"));
    Ok(())
}

async fn run_login(ctx: &CliContext, user_id: &str, password: &str) -> Result<(), CliError> {
    let mut form = LoginForm::new(user_id, password);
    let session = form.submit(&ctx.api).await;
    if let Some(session) = session {
        ctx.store.save(&session)?;
        tracing::info!(path = %ctx.store.path().display(), "session saved");
    }
    report(form.notice.as_ref())
}

fn current_claims(ctx: &CliContext) -> Result<TokenClaims, CliError> {
    let token = ctx.api.token().ok_or(CliError::NotLoggedIn)?;
    Ok(Session { token: token.to_owned() }.claims()?)
}

fn run_whoami(ctx: &CliContext) -> Result<(), CliError> {
    let claims = current_claims(ctx)?;
    print_json(&json!({
        "usuario_id": claims.usuario_id,
        "empresa_nome": claims.empresa_nome,
        "empresa_id": claims.empresa_id,
        "exp": claims.exp,
        "expired": claims.is_expired_at(now_secs()),
    }))
}

// =============================================================================
// ACCOUNTS
// =============================================================================

async fn run_account(ctx: &CliContext, account: AccountCommand) -> Result<(), CliError> {
    match account.command {
        AccountSubcommand::Register { user_id, email, company, password } => {
            let mut form = RegisterAccountForm {
                user_id,
                email,
                company_name: company,
                password,
                ..RegisterAccountForm::default()
            };
            form.submit(&ctx.api).await;
            report(form.notice.as_ref())
        }
        AccountSubcommand::Show => {
            let claims = current_claims(ctx)?;
            let account = ctx.api.account(&claims.usuario_id).await?;
            print_json(&account)
        }
        AccountSubcommand::List => {
            let mut editor = AccountEditor::from_claims(&current_claims(ctx)?);
            editor.load(&ctx.api).await;
            print_json(&editor.accounts)
        }
        AccountSubcommand::Update { user, email, company, new_password } => {
            let mut editor = AccountEditor::from_claims(&current_claims(ctx)?);
            editor.load(&ctx.api).await;
            if let Some(user) = user {
                editor.select(&user).map_err(|e| CliError::Rejected(e.to_string()))?;
            }
            if let Some(email) = email {
                editor.email = email;
            }
            if let Some(company) = company {
                editor.company_name = company;
            }
            editor.new_password = new_password.unwrap_or_default();
            editor.save(&ctx.api).await;
            report(editor.notice.as_ref())
        }
    }
}

// =============================================================================
// EMPLOYEES
// =============================================================================

async fn run_employee(ctx: &CliContext, employee: EmployeeCommand) -> Result<(), CliError> {
    match employee.command {
        EmployeeSubcommand::List { filter } => {
            let mut list = EmployeeList { filter: filter.unwrap_or_default(), ..EmployeeList::default() };
            list.load(&ctx.api).await;
            report(list.notice.as_ref())?;
            print_json(&list.visible())
        }
        EmployeeSubcommand::Show { id } => {
            let employee = ctx.api.employee(&id).await?;
            print_json(&employee)
        }
        EmployeeSubcommand::Search { partial } => print_json(&suggest_names(&ctx.api, &partial).await),
        EmployeeSubcommand::Register { name, role, photo } => {
            let mut form = RegisterEmployeeForm::new(name, role, photo.source(), ctx.config.dismiss_after);
            // The presented outcome is dropped on exit; there is no second trigger to hold off.
            let _presented = form.submit(&ctx.api).await;
            report(form.notice.as_ref())
        }
        EmployeeSubcommand::Update { id, name, role, photo } => {
            let mut form = EditEmployeeForm::new(id);
            if !form.load(&ctx.api).await {
                return report(form.notice.as_ref());
            }
            if let Some(name) = name {
                form.name = name;
            }
            if let Some(role) = role {
                form.role = role;
            }
            form.new_photo = photo.source();
            form.submit(&ctx.api).await;
            report(form.notice.as_ref())
        }
        EmployeeSubcommand::Delete { id } => {
            let mut list = EmployeeList::default();
            list.delete(&ctx.api, &id).await;
            report(list.notice.as_ref())
        }
    }
}

// =============================================================================
// PUNCHES
// =============================================================================

async fn run_punch(ctx: &CliContext, punch: PunchCommand) -> Result<(), CliError> {
    match punch.command {
        PunchSubcommand::Manual { employee_id, date, time, kind } => {
            let mut form = ManualPunchForm { employee_id, date, time, kind, ..ManualPunchForm::default() };
            form.submit(&ctx.api).await;
            report(form.notice.as_ref())
        }
        PunchSubcommand::Camera(photo) => {
            let source = photo.source().ok_or(CliError::MissingPhoto)?;
            let mut screen = ClockInScreen::new(ctx.api.clone(), source, ctx.config.dismiss_after);
            let _presented = screen.trigger().await?;
            report(screen.notice.as_ref())
        }
    }
}

async fn run_kiosk(ctx: &CliContext, photo: &PhotoArgs) -> Result<(), CliError> {
    let source = photo.source().ok_or(CliError::MissingPhoto)?;
    let mut screen = ClockInScreen::new(ctx.api.clone(), source, ctx.config.dismiss_after);
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("Press Enter to punch (q to quit): ");
        io::stdout().flush()?;
        let Some(line) = lines.next().transpose()? else {
            return Ok(());
        };
        if line.trim().eq_ignore_ascii_case("q") {
            return Ok(());
        }
        match screen.trigger().await {
            Ok(presented) => {
                if let Some(notice) = &screen.notice {
                    print_notice(notice);
                }
                screen.settle(presented).await;
            }
            Err(FlowError::Busy) => println!("Still processing, please wait."),
            Err(error) => return Err(error.into()),
        }
    }
}

// =============================================================================
// RECORDS
// =============================================================================

async fn run_records(ctx: &CliContext, records: RecordsCommand) -> Result<(), CliError> {
    match records.command {
        RecordsSubcommand::Query { employee_id, period, output } => {
            let mut screen = EmployeeRecords::new(employee_id, period.filter());
            if !screen.load(&ctx.api).await {
                return report(screen.notice.as_ref());
            }
            print_json(&json!({
                "funcionario": screen.employee_name,
                "total_horas": screen.total_hours(),
                "registros": &screen.records,
            }))?;
            if let Some(dir) = output.export {
                screen.export(&dir);
                report(screen.notice.as_ref())?;
            }
            if let Some(email) = output.email {
                screen.email_to = email;
                screen.email(&ctx.api).await;
                report(screen.notice.as_ref())?;
            }
            Ok(())
        }
        RecordsSubcommand::Hours { name, period, output } => {
            let mut screen = HoursOverview { name: name.unwrap_or_default(), ..HoursOverview::new(period.filter()) };
            if !screen.load(&ctx.api).await {
                return report(screen.notice.as_ref());
            }
            print_json(&screen.rows)?;
            if let Some(dir) = output.export {
                screen.export(&dir);
                report(screen.notice.as_ref())?;
            }
            if let Some(email) = output.email {
                screen.email_to = email;
                screen.email(&ctx.api).await;
                report(screen.notice.as_ref())?;
            }
            Ok(())
        }
        RecordsSubcommand::Delete { record_id } => {
            let mut screen = EmployeeRecords::default();
            screen.delete(&ctx.api, &record_id).await;
            report(screen.notice.as_ref())
        }
    }
}

// =============================================================================
// OUTPUT
// =============================================================================

/// Print a non-error notice; turn an error notice into a failing exit.
fn report(notice: Option<&Notice>) -> Result<(), CliError> {
    match notice {
        Some(notice) if notice.is_error() => Err(CliError::Rejected(notice.message.clone())),
        Some(notice) => {
            print_notice(notice);
            Ok(())
        }
        None => Ok(()),
    }
}

fn print_notice(notice: &Notice) {
    match notice.severity {
        Severity::Success | Severity::Info => println!("{}", notice.message),
        Severity::Error => eprintln!("{}", notice.message),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}

fn now_secs() -> i64 {
    let Ok(duration) = SystemTime::now().duration_since(UNIX_EPOCH) else {
        return 0;
    };
    i64::try_from(duration.as_secs()).unwrap_or(0)
}
