//! Configuration management for `jrquery`.
//!
//! Configuration sources and precedence (highest wins):
//! 1. CLI overrides
//! 2. Environment variables (`JIRA_BASE_URL`, `JIRA_API_TOKEN`, `JIRA_USER_EMAIL`)
//! 3. User config file (`~/.config/jrquery.json`, or `JRQUERY_CONFIG`)
//! 4. Defaults
//!
//! The result is an explicit [`Config`] value handed to the service client;
//! nothing is kept in process-wide state.

use crate::error::{JrqueryError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs::{self, OpenOptions};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Config file name under `~/.config`.
const CONFIG_FILENAME: &str = "jrquery.json";

/// Environment variable that overrides the config file path.
const CONFIG_PATH_ENV: &str = "JRQUERY_CONFIG";

/// Where users create API tokens; shown by the first-run prompt.
const API_TOKEN_URL: &str = "https://id.atlassian.com/manage-profile/security/api-tokens";

/// Resolved configuration for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub base_url: String,
    pub api_token: String,
    pub user_email: String,
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_token: String::new(),
            user_email: String::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Check that the credentials needed to talk to the service are present.
    ///
    /// # Errors
    ///
    /// Returns [`JrqueryError::InvalidConfiguration`] naming the missing keys.
    pub fn validate(&self) -> Result<()> {
        let missing: Vec<&str> = [
            ("base_url", &self.base_url),
            ("user_email", &self.user_email),
            ("api_token", &self.api_token),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(key, _)| key)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(JrqueryError::invalid_configuration(format!(
                "missing {}",
                missing.join(", ")
            )))
        }
    }

    /// Web URL of an issue.
    #[must_use]
    pub fn browse_url(&self, key: &str) -> String {
        format!("{}/browse/{key}", self.base_url.trim_end_matches('/'))
    }

    /// Layer form, used when saving.
    #[must_use]
    pub fn to_layer(&self) -> ConfigLayer {
        ConfigLayer {
            base_url: Some(self.base_url.clone()),
            api_token: Some(self.api_token.clone()),
            user_email: Some(self.user_email.clone()),
            timeout_secs: Some(self.timeout_secs),
        }
    }
}

/// One configuration source. Unset keys defer to lower layers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigLayer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

/// On-disk layout: `{"jira": {"base_url": ..., ...}}`.
#[derive(Debug, Default, Serialize, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    jira: ConfigLayer,
}

impl ConfigLayer {
    /// Merge another layer on top of this one (higher precedence wins).
    pub fn merge_from(&mut self, other: &Self) {
        if other.base_url.is_some() {
            self.base_url.clone_from(&other.base_url);
        }
        if other.api_token.is_some() {
            self.api_token.clone_from(&other.api_token);
        }
        if other.user_email.is_some() {
            self.user_email.clone_from(&other.user_email);
        }
        if other.timeout_secs.is_some() {
            self.timeout_secs = other.timeout_secs;
        }
    }

    /// Merge multiple layers in precedence order (lowest to highest).
    #[must_use]
    pub fn merge_layers(layers: &[Self]) -> Self {
        let mut merged = Self::default();
        for layer in layers {
            merged.merge_from(layer);
        }
        merged
    }

    /// Build a layer from a JSON file path. Missing files return empty config.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn from_json(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)?;
        let file: ConfigFile = serde_json::from_str(&contents).map_err(|err| {
            JrqueryError::Config(format!("cannot parse {}: {err}", path.display()))
        })?;
        Ok(file.jira)
    }

    /// Build a layer from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_with(|key| env::var(key).ok())
    }

    /// Build a layer from an environment lookup. Blank values are ignored.
    #[must_use]
    pub fn from_env_with<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Self {
            base_url: non_blank("JIRA_BASE_URL"),
            api_token: non_blank("JIRA_API_TOKEN"),
            user_email: non_blank("JIRA_USER_EMAIL"),
            timeout_secs: non_blank("JIRA_TIMEOUT_SECS").and_then(|value| value.trim().parse().ok()),
        }
    }

    /// Resolve into a [`Config`], applying defaults for optional keys.
    ///
    /// # Errors
    ///
    /// Returns [`JrqueryError::InvalidConfiguration`] if a credential is missing.
    pub fn into_config(self) -> Result<Config> {
        let config = Config {
            base_url: self.base_url.unwrap_or_default(),
            api_token: self.api_token.unwrap_or_default(),
            user_email: self.user_email.unwrap_or_default(),
            timeout_secs: self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
        };
        config.validate()?;
        Ok(config)
    }
}

/// CLI overrides for config loading (optional).
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub config_path: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
    pub no_color: bool,
}

impl CliOverrides {
    #[must_use]
    pub fn as_layer(&self) -> ConfigLayer {
        ConfigLayer {
            timeout_secs: self.timeout_secs,
            ..ConfigLayer::default()
        }
    }
}

/// Resolve the config file path: CLI flag, then `JRQUERY_CONFIG`, then
/// `~/.config/jrquery.json`.
///
/// # Errors
///
/// Returns [`JrqueryError::Config`] if no home directory can be determined.
pub fn config_path(cli: &CliOverrides) -> Result<PathBuf> {
    config_path_with(cli, |key| env::var(key).ok())
}

fn config_path_with<F>(cli: &CliOverrides, lookup: F) -> Result<PathBuf>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(path) = &cli.config_path {
        return Ok(path.clone());
    }
    if let Some(path) = lookup(CONFIG_PATH_ENV).filter(|value| !value.trim().is_empty()) {
        return Ok(PathBuf::from(path));
    }
    let home = lookup("HOME")
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| JrqueryError::Config("could not determine the home directory".to_string()))?;
    Ok(Path::new(&home).join(".config").join(CONFIG_FILENAME))
}

/// Merge every source without requiring credentials.
///
/// Used by paths that only need optional values, such as `--dry-run`.
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be read or parsed.
pub fn load_layer(cli: &CliOverrides) -> Result<ConfigLayer> {
    let file = ConfigLayer::from_json(&config_path(cli)?)?;
    Ok(ConfigLayer::merge_layers(&[
        file,
        ConfigLayer::from_env(),
        cli.as_layer(),
    ]))
}

/// Load configuration with classic precedence order.
///
/// # Errors
///
/// Returns [`JrqueryError::InvalidConfiguration`] if credentials are missing,
/// or an error if the config file cannot be read or parsed.
pub fn load_config(cli: &CliOverrides) -> Result<Config> {
    load_layer(cli)?.into_config()
}

/// Write `config` to `path` as `{"jira": {...}}`, creating parent directories.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be written.
pub fn save_config(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|err| {
            JrqueryError::Config(format!(
                "could not create configuration directory {}: {err}",
                parent.display()
            ))
        })?;
    }
    let file = ConfigFile {
        jira: config.to_layer(),
    };
    let contents = serde_json::to_string_pretty(&file)?;

    // The file holds the API token: owner read/write only.
    let mut options = OpenOptions::new();
    options.create(true).write(true).truncate(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut handle = options.open(path)?;
    writeln!(handle, "{contents}")?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    }
    Ok(())
}

/// Ask for base URL, e-mail and API token on `output`, reading `input`.
///
/// # Errors
///
/// Returns an I/O error if reading or writing fails, or
/// [`JrqueryError::InvalidConfiguration`] if an answer is left blank.
pub fn prompt_config<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<Config> {
    writeln!(output, "You need a Jira API token to use jrquery.")?;
    writeln!(output)?;
    writeln!(output, "{API_TOKEN_URL}")?;
    writeln!(output)?;

    let base_url = ask(input, output, "Enter Jira base URL: ")?;
    let user_email = ask(input, output, "Enter your email: ")?;
    let api_token = ask(input, output, "Enter your API token: ")?;

    ConfigLayer {
        base_url: Some(base_url),
        api_token: Some(api_token),
        user_email: Some(user_email),
        timeout_secs: None,
    }
    .into_config()
}

fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> Result<String> {
    write!(output, "{question}")?;
    output.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Replace the `me` shorthand with the configured user's e-mail.
///
/// Without a known e-mail the value is passed through unchanged.
#[must_use]
pub fn resolve_assignee(user: Option<&str>, user_email: Option<&str>) -> Option<String> {
    match (user, user_email) {
        (Some("me"), Some(email)) if !email.trim().is_empty() => Some(email.to_string()),
        (Some(user), _) => Some(user.to_string()),
        (None, _) => None,
    }
}

/// Determine whether terminal output should be colored.
#[must_use]
pub fn should_use_color(cli: &CliOverrides) -> bool {
    use std::io::IsTerminal;

    !cli.no_color && env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn missing_file_is_empty_layer() {
        let temp = TempDir::new().expect("tempdir");
        let layer = ConfigLayer::from_json(&temp.path().join("nope.json")).expect("layer");
        assert_eq!(layer, ConfigLayer::default());
    }

    #[test]
    fn file_layer_reads_nested_jira_section() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("jrquery.json");
        fs::write(
            &path,
            r#"{"jira": {"base_url": "https://acme.atlassian.net", "api_token": "t0k", "user_email": "ana@acme.io"}}"#,
        )
        .expect("write");

        let config = ConfigLayer::from_json(&path)
            .expect("layer")
            .into_config()
            .expect("config");
        assert_eq!(config.base_url, "https://acme.atlassian.net");
        assert_eq!(config.user_email, "ana@acme.io");
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn malformed_file_is_config_error() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("jrquery.json");
        fs::write(&path, "{not json").expect("write");
        let err = ConfigLayer::from_json(&path).expect_err("parse error");
        assert!(matches!(err, JrqueryError::Config(_)));
    }

    #[test]
    fn env_overrides_file() {
        let file = ConfigLayer {
            base_url: Some("https://file.example".to_string()),
            api_token: Some("file-token".to_string()),
            user_email: Some("file@example.com".to_string()),
            timeout_secs: Some(10),
        };
        let env_layer = ConfigLayer::from_env_with(env_from(&[
            ("JIRA_API_TOKEN", "env-token"),
            ("JIRA_BASE_URL", "   "),
        ]));

        let merged = ConfigLayer::merge_layers(&[file, env_layer]);
        assert_eq!(merged.api_token.as_deref(), Some("env-token"));
        assert_eq!(merged.base_url.as_deref(), Some("https://file.example"));
        assert_eq!(merged.timeout_secs, Some(10));
    }

    #[test]
    fn cli_timeout_wins() {
        let env_layer = ConfigLayer::from_env_with(env_from(&[("JIRA_TIMEOUT_SECS", "5")]));
        let cli = CliOverrides {
            timeout_secs: Some(90),
            ..CliOverrides::default()
        };
        let merged = ConfigLayer::merge_layers(&[env_layer, cli.as_layer()]);
        assert_eq!(merged.timeout_secs, Some(90));
    }

    #[test]
    fn missing_credentials_are_reported() {
        let err = ConfigLayer {
            base_url: Some("https://acme.atlassian.net".to_string()),
            ..ConfigLayer::default()
        }
        .into_config()
        .expect_err("incomplete");
        assert_eq!(
            err.to_string(),
            "Invalid configuration: missing user_email, api_token"
        );
    }

    #[test]
    fn config_path_precedence() {
        let cli = CliOverrides {
            config_path: Some(PathBuf::from("/tmp/explicit.json")),
            ..CliOverrides::default()
        };
        let lookup = env_from(&[("JRQUERY_CONFIG", "/tmp/env.json"), ("HOME", "/home/ana")]);
        assert_eq!(
            config_path_with(&cli, &lookup).expect("path"),
            PathBuf::from("/tmp/explicit.json")
        );
        assert_eq!(
            config_path_with(&CliOverrides::default(), &lookup).expect("path"),
            PathBuf::from("/tmp/env.json")
        );

        let home_only = env_from(&[("HOME", "/home/ana")]);
        assert_eq!(
            config_path_with(&CliOverrides::default(), home_only).expect("path"),
            PathBuf::from("/home/ana/.config/jrquery.json")
        );
        assert!(config_path_with(&CliOverrides::default(), env_from(&[])).is_err());
    }

    #[test]
    fn save_then_load_round_trip() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("nested").join("jrquery.json");
        let config = Config {
            base_url: "https://acme.atlassian.net".to_string(),
            api_token: "t0k".to_string(),
            user_email: "ana@acme.io".to_string(),
            timeout_secs: 45,
        };

        save_config(&config, &path).expect("save");
        let loaded = ConfigLayer::from_json(&path)
            .expect("layer")
            .into_config()
            .expect("config");
        assert_eq!(loaded, config);
    }

    #[cfg(unix)]
    #[test]
    fn saved_config_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("jrquery.json");
        fs::write(&path, "{}").expect("seed");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).expect("chmod");

        let config = Config {
            base_url: "https://acme.atlassian.net".to_string(),
            api_token: "t0k".to_string(),
            user_email: "ana@acme.io".to_string(),
            timeout_secs: 30,
        };
        save_config(&config, &path).expect("save");

        let metadata = fs::metadata(&path).expect("metadata");
        assert_eq!(metadata.permissions().mode() & 0o777, 0o600);
    }

    #[test]
    fn prompt_reads_three_answers() {
        let mut input = Cursor::new("https://acme.atlassian.net\nana@acme.io\n  t0k  \n");
        let mut output = Vec::new();

        let config = prompt_config(&mut input, &mut output).expect("config");

        assert_eq!(config.api_token, "t0k");
        let shown = String::from_utf8(output).expect("utf8");
        assert!(shown.contains(API_TOKEN_URL));
        assert!(shown.contains("Enter your API token: "));
    }

    #[test]
    fn prompt_rejects_blank_answers() {
        let mut input = Cursor::new("https://acme.atlassian.net\n\n\n");
        let err = prompt_config(&mut input, &mut Vec::new()).expect_err("blank");
        assert!(matches!(err, JrqueryError::InvalidConfiguration { .. }));
    }

    #[test]
    fn resolve_me_to_email() {
        assert_eq!(
            resolve_assignee(Some("me"), Some("ana@acme.io")).as_deref(),
            Some("ana@acme.io")
        );
        assert_eq!(
            resolve_assignee(Some("bob@acme.io"), Some("ana@acme.io")).as_deref(),
            Some("bob@acme.io")
        );
        assert_eq!(resolve_assignee(Some("me"), None).as_deref(), Some("me"));
        assert_eq!(resolve_assignee(None, Some("ana@acme.io")), None);
    }

    #[test]
    fn browse_url_joins_cleanly() {
        let config = Config {
            base_url: "https://acme.atlassian.net/".to_string(),
            ..Config::default()
        };
        assert_eq!(
            config.browse_url("OPS-1"),
            "https://acme.atlassian.net/browse/OPS-1"
        );
    }
}
