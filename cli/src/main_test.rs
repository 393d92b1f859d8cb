use super::*;

use clap::CommandFactory;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("ponto").chain(args.iter().copied())).unwrap()
}

#[test]
fn command_tree_is_consistent() {
    Cli::command().debug_assert();
}

#[test]
fn manual_punch_defaults_to_entry() {
    let cli = parse(&["punch", "manual", "f1", "--date", "2024-03-01", "--time", "08:00"]);
    let Command::Punch(PunchCommand { command: PunchSubcommand::Manual { kind, .. } }) = cli.command else {
        panic!("expected punch manual");
    };
    assert_eq!(kind, PunchKind::Entry);
}

#[test]
fn manual_punch_accepts_exit_alias() {
    let cli = parse(&["punch", "manual", "f1", "--date", "2024-03-01", "--time", "17:00", "--kind", "saida"]);
    let Command::Punch(PunchCommand { command: PunchSubcommand::Manual { kind, .. } }) = cli.command else {
        panic!("expected punch manual");
    };
    assert_eq!(kind, PunchKind::Exit);
}

#[test]
fn manual_punch_rejects_unknown_kind() {
    let result = Cli::try_parse_from(["ponto", "punch", "manual", "f1", "--date", "d", "--time", "t", "--kind", "lunch"]);
    assert!(result.is_err());
}

#[test]
fn photo_file_wins_over_camera_command() {
    let args = PhotoArgs { photo: Some("ana.jpg".into()), camera: Some("fswebcam -".into()) };
    assert!(matches!(args.source(), Some(PhotoSource::File(_))));
}

#[test]
fn camera_command_becomes_command_source() {
    let args = PhotoArgs { photo: None, camera: Some("fswebcam --no-banner -".into()) };
    assert!(matches!(args.source(), Some(PhotoSource::Command(_))));
    assert!(PhotoArgs::default().source().is_none());
}

#[test]
fn records_query_reads_period_and_outputs() {
    let cli = parse(&[
        "records", "query", "f1", "--start", "2024-01-01", "--end", "2024-01-31", "--export", "/tmp", "--email",
        "rh@empresa.com",
    ]);
    let Command::Records(RecordsCommand { command: RecordsSubcommand::Query { employee_id, period, output } }) =
        cli.command
    else {
        panic!("expected records query");
    };
    assert_eq!(employee_id, "f1");
    assert_eq!(period.filter(), PeriodFilter::new("2024-01-01", "2024-01-31"));
    assert_eq!(output.export, Some(PathBuf::from("/tmp")));
    assert_eq!(output.email.as_deref(), Some("rh@empresa.com"));
}

#[test]
fn error_notice_becomes_failure() {
    let err = report(Some(&Notice::error("Connection error."))).unwrap_err();
    assert_eq!(err.to_string(), "Connection error.");
    assert!(report(Some(&Notice::success("ok"))).is_ok());
    assert!(report(None).is_ok());
}

fn garbled_session_file() -> PathBuf {
    let path = std::env::temp_dir().join(format!("ponto-cli-session-{}.json", uuid::Uuid::new_v4()));
    std::fs::write(&path, "not json").unwrap();
    path
}

#[test]
fn unreadable_session_counts_as_logged_out() {
    let path = garbled_session_file();
    assert_eq!(stored_token(&SessionStore::new(&path)), None);
    std::fs::remove_file(&path).unwrap();
}

#[tokio::test]
async fn logout_clears_unreadable_session() {
    let path = garbled_session_file();
    let cli = parse(&["--session-file", path.to_str().unwrap(), "logout"]);

    run(cli).await.unwrap();

    assert!(!path.exists());
}

#[tokio::test]
async fn whoami_with_unreadable_session_asks_for_login() {
    let path = garbled_session_file();
    let cli = parse(&["--session-file", path.to_str().unwrap(), "whoami"]);

    assert!(matches!(run(cli).await, Err(CliError::NotLoggedIn)));
    std::fs::remove_file(&path).unwrap();
}
