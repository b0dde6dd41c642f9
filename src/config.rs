use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::SessionError;

pub const DEFAULT_IMAP_PORT: u16 = 993;
pub const DEFAULT_MAILBOX: &str = "INBOX";
pub const DEFAULT_SEARCH: &str = "ALL";
pub const DEFAULT_FETCH_LIMIT: usize = 10;
pub const DEFAULT_LABEL: &str = "Ihre E-Mail-Adresse";
pub const DEFAULT_TASK_PROGRAM: &str = "npm";
pub const DEFAULT_TASK_ARGS: &[&str] = &["run", "go"];

/// Non-secret settings that may live in `config.toml`. Environment wins.
#[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct FileConfig {
    pub imap_mailbox: Option<String>,
    pub imap_search: Option<String>,
    pub fetch_limit: Option<usize>,
    pub candidate_label: Option<String>,
    pub task_dir: Option<String>,
    pub task_program: Option<String>,
    pub task_args: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImapSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub mailbox: String,
    /// Raw IMAP SEARCH criteria, e.g. `FROM "Abodaten Eingang"`.
    pub search: String,
    pub limit: usize,
}

/// The external task, spawned without a shell.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskCommand {
    pub program: String,
    pub args: Vec<String>,
    pub working_dir: PathBuf,
}

/// Locations under the application-data directory.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionPaths {
    pub app_data_dir: PathBuf,
}

impl SessionPaths {
    pub fn new(app_data_dir: impl Into<PathBuf>) -> Self {
        Self {
            app_data_dir: app_data_dir.into(),
        }
    }

    pub fn output_root(&self) -> PathBuf {
        self.app_data_dir.join("output")
    }

    pub fn descriptor_path(&self) -> PathBuf {
        self.app_data_dir.join("communicate.json")
    }

    /// Resolve from `APP_DATA_DIR`, or from `APPNAME`/`APPAUTHOR`.
    pub fn from_lookup<F>(lookup: &F) -> Result<Self, SessionError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup("APP_DATA_DIR") {
            return Ok(Self::new(dir));
        }
        let (name, author) = app_identity(lookup)?;
        Ok(Self::new(resolve_app_data_dir(&name, &author)?))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub imap: ImapSettings,
    pub candidate_label: String,
    pub task: TaskCommand,
    pub paths: SessionPaths,
}

impl Config {
    /// Load `.env`, the optional config file and the process environment.
    pub fn load(config_file: Option<&Path>) -> Result<Self, SessionError> {
        load_dotenv();
        let lookup = env_lookup;
        let file = match config_file {
            Some(p) => read_file_config(p)?,
            None => match lookup("APPNAME").and_then(|n| default_config_path(&n)) {
                Some(p) if p.exists() => read_file_config(&p)?,
                _ => FileConfig::default(),
            },
        };
        Self::from_sources(&lookup, file)
    }

    /// Build from an arbitrary key lookup and no config file.
    pub fn from_lookup<F>(lookup: &F) -> Result<Self, SessionError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::from_sources(lookup, FileConfig::default())
    }

    pub fn from_sources<F>(lookup: &F, file: FileConfig) -> Result<Self, SessionError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut missing = Vec::new();
        let mut required = |key: &str| {
            let v = lookup(key);
            if v.is_none() {
                missing.push(key.to_string());
            }
            v.unwrap_or_default()
        };
        // SessionPaths resolves the identity; it is required here so all gaps show up at once
        let _app_name = required("APPNAME");
        let _app_author = required("APPAUTHOR");
        let host = required("IMAP_HOST");
        let username = required("IMAP_USERNAME");
        let password = required("IMAP_PASSWORD");
        if !missing.is_empty() {
            return Err(SessionError::ConfigMissing { keys: missing });
        }

        let port = match lookup("IMAP_PORT") {
            Some(p) => parse_value("IMAP_PORT", &p)?,
            None => DEFAULT_IMAP_PORT,
        };
        let limit = match lookup("FETCH_LIMIT") {
            Some(n) => parse_value("FETCH_LIMIT", &n)?,
            None => file.fetch_limit.unwrap_or(DEFAULT_FETCH_LIMIT),
        };

        let imap = ImapSettings {
            host,
            port,
            username,
            password,
            mailbox: lookup("IMAP_MAILBOX")
                .or(file.imap_mailbox)
                .unwrap_or_else(|| DEFAULT_MAILBOX.to_string()),
            search: lookup("IMAP_SEARCH")
                .or(file.imap_search)
                .unwrap_or_else(|| DEFAULT_SEARCH.to_string()),
            limit,
        };

        let working_dir = match lookup("TASK_DIR").or(file.task_dir) {
            Some(d) => PathBuf::from(d),
            None => default_task_dir()?,
        };
        let args = match lookup("TASK_ARGS") {
            Some(a) => a.split_whitespace().map(str::to_string).collect(),
            None => file
                .task_args
                .unwrap_or_else(|| DEFAULT_TASK_ARGS.iter().map(|s| s.to_string()).collect()),
        };
        let task = TaskCommand {
            program: lookup("TASK_PROGRAM")
                .or(file.task_program)
                .unwrap_or_else(|| DEFAULT_TASK_PROGRAM.to_string()),
            args,
            working_dir,
        };

        Ok(Self {
            imap,
            candidate_label: lookup("CANDIDATE_LABEL")
                .or(file.candidate_label)
                .unwrap_or_else(|| DEFAULT_LABEL.to_string()),
            task,
            paths: SessionPaths::from_lookup(lookup)?,
        })
    }
}

/// Merge a `.env` from the working directory (or a parent) into the environment.
/// Variables already set are left alone.
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => log::debug!("loaded {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => log::warn!("ignoring unreadable .env: {e}"),
    }
}

/// Process environment, treating empty values as unset.
pub fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn app_identity<F>(lookup: &F) -> Result<(String, String), SessionError>
where
    F: Fn(&str) -> Option<String>,
{
    match (lookup("APPNAME"), lookup("APPAUTHOR")) {
        (Some(n), Some(a)) => Ok((n, a)),
        (n, a) => {
            let mut keys = Vec::new();
            if n.is_none() {
                keys.push("APPNAME".to_string());
            }
            if a.is_none() {
                keys.push("APPAUTHOR".to_string());
            }
            Err(SessionError::ConfigMissing { keys })
        }
    }
}

/// Per-user data directory, laid out the way `appdirs.user_data_dir` does it.
pub fn resolve_app_data_dir(app_name: &str, app_author: &str) -> Result<PathBuf, SessionError> {
    let no_dir = || SessionError::ConfigInvalid {
        key: "APPNAME".into(),
        reason: "no user data directory available on this platform".into(),
    };
    if cfg!(windows) {
        let base = dirs::data_local_dir().ok_or_else(no_dir)?;
        Ok(base.join(app_author).join(app_name))
    } else {
        let base = dirs::data_dir().ok_or_else(no_dir)?;
        Ok(base.join(app_name))
    }
}

pub fn default_config_path(app_name: &str) -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(app_name).join("config.toml"))
}

fn read_file_config(path: &Path) -> Result<FileConfig, SessionError> {
    let invalid = |reason: String| SessionError::ConfigInvalid {
        key: path.display().to_string(),
        reason,
    };
    let s = fs::read_to_string(path).map_err(|e| invalid(e.to_string()))?;
    toml::from_str(&s).map_err(|e| invalid(e.to_string()))
}

fn default_task_dir() -> Result<PathBuf, SessionError> {
    let exe = std::env::current_exe().map_err(|e| SessionError::ConfigInvalid {
        key: "TASK_DIR".into(),
        reason: format!("cannot locate executable: {e}"),
    })?;
    Ok(exe
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(".")))
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, SessionError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| SessionError::ConfigInvalid {
        key: key.to_string(),
        reason: e.to_string(),
    })
}
