use assert_cmd::Command;
use std::ffi::OsStr;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[derive(Debug)]
pub struct JrRun {
    pub stdout: String,
    pub stderr: String,
    pub status: std::process::ExitStatus,
}

/// Isolated HOME so no real configuration leaks into a run.
pub struct JrWorkspace {
    pub temp_dir: TempDir,
    pub home: PathBuf,
}

impl JrWorkspace {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("temp dir");
        let home = temp_dir.path().to_path_buf();
        Self { temp_dir, home }
    }

    pub fn config_path(&self) -> PathBuf {
        self.home.join(".config").join("jrquery.json")
    }

    /// Write a complete config pointing at `base_url`.
    pub fn write_config(&self, base_url: &str) {
        let path = self.config_path();
        fs::create_dir_all(path.parent().expect("parent")).expect("config dir");
        let body = serde_json::json!({
            "jira": {
                "base_url": base_url,
                "api_token": "t0k",
                "user_email": "ana@example.com",
                "timeout_secs": 5
            }
        });
        fs::write(&path, body.to_string()).expect("write config");
    }
}

pub fn run_jrquery<I, S>(workspace: &JrWorkspace, args: I) -> JrRun
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    run_jrquery_with_env(workspace, args, std::iter::empty::<(String, String)>())
}

pub fn run_jrquery_with_env<I, S, E, K, V>(workspace: &JrWorkspace, args: I, env_vars: E) -> JrRun
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
    E: IntoIterator<Item = (K, V)>,
    K: AsRef<OsStr>,
    V: AsRef<OsStr>,
{
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("jrquery"));
    cmd.current_dir(&workspace.home);
    for key in [
        "JIRA_BASE_URL",
        "JIRA_API_TOKEN",
        "JIRA_USER_EMAIL",
        "JIRA_TIMEOUT_SECS",
        "JRQUERY_CONFIG",
        "COLUMNS",
    ] {
        cmd.env_remove(key);
    }
    cmd.env("HOME", &workspace.home);
    cmd.env("NO_COLOR", "1");
    cmd.env("RUST_LOG", "jrquery=debug");
    cmd.args(args);
    cmd.envs(env_vars);
    cmd.write_stdin("");

    let output = cmd.output().expect("run jrquery");
    JrRun {
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        status: output.status,
    }
}

/// The JSON object printed to stderr on failure, skipping log lines.
pub fn extract_error_json(stderr: &str) -> serde_json::Value {
    let start = stderr.find("{\n").expect("error json in stderr");
    serde_json::from_str(&stderr[start..]).expect("parse error json")
}
