use assert_cmd::Command;
use predicates::prelude::*;
use std::fs::write;
use tempfile::NamedTempFile;

/// Minimal config with one league and one remote file.
fn create_minimal_config() -> NamedTempFile {
    let config = NamedTempFile::new().expect("Creating temp config file failed");
    write(
        config.path(),
        b"download:\n  base_url: \"http://127.0.0.1:1/export\"\n  session_key: key\n  output_dir: ./tmp\nleagues:\n  - name: U12\n    league_id: \"51502\"\nremote:\n  connection_env: LEAGUE_TABLE_CLI_TEST_URL\n  files: [Tabelle_U12.html]\n",
    )
    .expect("Writing temp config failed");
    config
}

#[test]
fn help_lists_all_subcommands() {
    let mut cmd = Command::cargo_bin("league-table").expect("Binary exists");
    cmd.arg("--help");
    cmd.assert().success().stdout(
        predicate::str::contains("standings")
            .and(predicate::str::contains("upload"))
            .and(predicate::str::contains("list")),
    );
}

#[test]
fn missing_config_file_fails() {
    let mut cmd = Command::cargo_bin("league-table").expect("Binary exists");
    cmd.arg("standings").arg("--config").arg("does-not-exist.yaml");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read config file"));
}

#[test]
fn upload_without_connection_string_fails() {
    let config = create_minimal_config();
    let mut cmd = Command::cargo_bin("league-table").expect("Binary exists");
    cmd.arg("upload")
        .arg("--config")
        .arg(config.path())
        .env_remove("LEAGUE_TABLE_CLI_TEST_URL");
    cmd.assert().failure().stderr(predicate::str::contains(
        "please set environment variable LEAGUE_TABLE_CLI_TEST_URL",
    ));
}

#[test]
fn keep_and_remove_flags_conflict() {
    let config = create_minimal_config();
    let mut cmd = Command::cargo_bin("league-table").expect("Binary exists");
    cmd.arg("upload")
        .arg("--config")
        .arg(config.path())
        .arg("--keep-downloads")
        .arg("--remove-downloads");
    cmd.assert().failure();
}

#[test]
fn unreachable_results_portal_fails_naming_the_league() {
    let config = create_minimal_config();
    let mut cmd = Command::cargo_bin("league-table").expect("Binary exists");
    cmd.arg("standings").arg("--config").arg(config.path());
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("league U12"));
}

use std::sync::{Arc, Mutex};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{layer::Context, Layer, Registry};

/// Custom Layer to collect emitted event messages.
struct EventCollector {
    events: Arc<Mutex<Vec<String>>>,
}

impl<S> Layer<S> for EventCollector
where
    S: tracing::Subscriber,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        self.events.lock().unwrap().push(format!("{:?}", event));
    }
}

#[tokio::test]
async fn emits_trace_initialised_event() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let collector = EventCollector {
        events: events.clone(),
    };
    let subscriber = Registry::default().with(collector);
    let _guard = tracing::subscriber::set_default(subscriber);

    use league_table::cli::{run, Cli, Commands};

    let cli = Cli {
        command: Commands::Standings {
            config: std::path::PathBuf::from("dummy.yaml"),
            json: false,
        },
    };

    let _ = run(cli).await;

    let event_msgs = events.lock().unwrap();
    assert!(
        event_msgs.iter().any(|msg| msg.contains("trace_initialised")),
        "Expected a 'trace_initialised' trace event, got: {:?}",
        event_msgs
    );
}
