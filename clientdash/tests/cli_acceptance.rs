use std::ffi::OsString;
use std::fs;
use std::net::TcpListener;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

struct CliTestEnv {
    _temp_dir: TempDir,
    home: PathBuf,
    xdg_config: PathBuf,
    xdg_state: PathBuf,
}

impl CliTestEnv {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let base = temp_dir.path().to_path_buf();
        let home = base.join("home");
        let xdg_config = base.join("xdg-config");
        let xdg_state = base.join("xdg-state");

        fs::create_dir_all(&home).expect("failed to create HOME");
        fs::create_dir_all(&xdg_config).expect("failed to create XDG_CONFIG_HOME");
        fs::create_dir_all(&xdg_state).expect("failed to create XDG_STATE_HOME");

        Self {
            _temp_dir: temp_dir,
            home,
            xdg_config,
            xdg_state,
        }
    }

    fn config_path(&self) -> PathBuf {
        self.xdg_config.join("clientdash/config.toml")
    }

    fn write_config(&self, contents: &str) {
        let path = self.config_path();
        fs::create_dir_all(path.parent().expect("missing config parent"))
            .expect("failed to create config directory");
        fs::write(path, contents).expect("failed to write config");
    }
}

fn fixture_path() -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../clientdash-core/tests/fixtures/clients.csv")
        .to_string_lossy()
        .into_owned()
}

fn run_ctl(env: &CliTestEnv, args: &[&str]) -> Output {
    let bin_path = PathBuf::from(assert_cmd::cargo::cargo_bin!("clientdash-ctl"));

    Command::new(bin_path)
        .args(args)
        .env("HOME", &env.home)
        .env("XDG_CONFIG_HOME", &env.xdg_config)
        .env("XDG_STATE_HOME", &env.xdg_state)
        .env_remove("RUST_LOG")
        .output()
        .unwrap_or_else(|e| panic!("failed to execute clientdash-ctl: {e}"))
}

fn assert_success(args: &[&str], output: &Output) {
    if output.status.success() {
        return;
    }

    let rendered_args = args
        .iter()
        .map(|arg| OsString::from(arg).to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ");
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    panic!(
        "clientdash-ctl {rendered_args} failed\nstatus: {}\nstdout:\n{}\nstderr:\n{}",
        output.status, stdout, stderr
    );
}

#[test]
fn summary_prints_dashboard_figures_for_local_file() {
    let env = CliTestEnv::new();
    let fixture = fixture_path();
    let args = ["summary", "--file", fixture.as_str()];

    let output = run_ctl(&env, &args);
    assert_success(&args, &output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Rows:            7 (1 skipped)"), "{stdout}");
    assert!(stdout.contains("Total Revenue:   ₹32,499.5"), "{stdout}");
    assert!(stdout.contains("Total Clients:   6"), "{stdout}");
    assert!(stdout.contains("Total Headshots: 32"), "{stdout}");
    assert!(
        stdout.contains("Completion Rate: 33.3% (2 delivered, 1 in progress)"),
        "{stdout}"
    );
    assert!(stdout.contains("Avg Order Value: ₹5,416.583"), "{stdout}");
    assert!(stdout.contains("Shah, Neha"), "{stdout}");
    assert!(stdout.contains("(none)"), "{stdout}");
}

#[test]
fn summary_json_contains_metrics_and_clients() {
    let env = CliTestEnv::new();
    let fixture = fixture_path();
    let args = ["summary", "--file", fixture.as_str(), "--json"];

    let output = run_ctl(&env, &args);
    assert_success(&args, &output);

    let report: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("summary --json should print JSON");

    assert_eq!(report["rows_seen"], 7);
    assert_eq!(report["rows_skipped"], 1);
    assert_eq!(report["metrics"]["total_clients"], 6);
    assert_eq!(report["metrics"]["total_headshots"], 32);
    assert_eq!(report["metrics"]["delivered_count"], 2);

    let clients = report["clients"].as_array().expect("clients array");
    assert_eq!(clients.len(), 6);
    assert_eq!(clients[2]["client_name"], "Shah, Neha");
    assert_eq!(clients[0]["price"], 12500.0);

    let statuses: Vec<&str> = report["status_breakdown"]
        .as_array()
        .expect("status_breakdown array")
        .iter()
        .map(|share| share["status"].as_str().expect("status string"))
        .collect();
    assert_eq!(
        statuses,
        vec!["Delivered", "In Progress", "Pending", "Cancelled", ""]
    );
}

#[test]
fn summary_uses_configured_currency_symbol() {
    let env = CliTestEnv::new();
    env.write_config("[display]\ncurrency_symbol = \"Rs \"\n");
    let fixture = fixture_path();
    let args = ["summary", "--file", fixture.as_str()];

    let output = run_ctl(&env, &args);
    assert_success(&args, &output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Total Revenue:   Rs 32,499.5"), "{stdout}");
}

#[test]
fn summary_fails_for_missing_file() {
    let env = CliTestEnv::new();
    let output = run_ctl(&env, &["summary", "--file", "/nonexistent/clients.csv"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("failed to fetch client sheet"),
        "unexpected stderr:\n{stderr}"
    );
}

#[test]
fn config_shows_paths_and_defaults() {
    let env = CliTestEnv::new();
    let output = run_ctl(&env, &["config"]);
    assert_success(&["config"], &output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("not found, using defaults"), "{stdout}");
    assert!(stdout.contains("clientdash/config.toml"), "{stdout}");
    assert!(stdout.contains("clientdash.log"), "{stdout}");
    assert!(stdout.contains("[sheet]"), "{stdout}");
    assert!(stdout.contains("docs.google.com"), "{stdout}");
    assert!(stdout.contains("[chat]"), "{stdout}");
}

#[test]
fn config_rejects_invalid_webhook_url() {
    let env = CliTestEnv::new();
    env.write_config("[chat]\nwebhook_url = \"not-a-url\"\n");

    let output = run_ctl(&env, &["config"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("chat.webhook_url"), "{stderr}");
}

#[test]
fn ask_reports_connection_failure() {
    let env = CliTestEnv::new();

    // Reserve a port, then free it so nothing is listening there.
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").expect("failed to bind");
        listener.local_addr().expect("no local addr").port()
    };
    env.write_config(&format!(
        "[chat]\nwebhook_url = \"http://127.0.0.1:{port}/hook\"\ntimeout_secs = 5\n"
    ));

    let output = run_ctl(&env, &["ask", "how", "many", "clients?"]);
    assert!(!output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("Failed to connect to the server. Please try again."),
        "{stdout}"
    );
}
