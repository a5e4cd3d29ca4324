use std::path::{Path, PathBuf};

use tracing::debug;

use crate::client::{ClientConfig, DEFAULT_BASE_URL};
use crate::error::{Error, Result};

#[derive(Debug, Default, PartialEq)]
struct RcConfig {
    url: Option<String>,
    account_id: Option<String>,
    licence_key: Option<String>,
    verify: Option<bool>,
}

#[derive(Debug, Clone, Copy)]
enum RcKey {
    Url,
    Account,
    Key,
}

/// Resolves a [`ClientConfig`] from, in order of precedence:
/// - explicit arguments
/// - `AIRMONITORS_URL` / `AIRMONITORS_ACCOUNT_ID` / `AIRMONITORS_LICENCE_KEY`
/// - the first rc file found by [`rc_candidates`]
pub fn load_config(
    url: Option<String>,
    account_id: Option<String>,
    licence_key: Option<String>,
    verify: Option<bool>,
) -> Result<ClientConfig> {
    resolve(
        url,
        account_id,
        licence_key,
        verify,
        |name| std::env::var(name).ok(),
        &rc_candidates(),
    )
}

fn resolve(
    url: Option<String>,
    account_id: Option<String>,
    licence_key: Option<String>,
    verify: Option<bool>,
    env: impl Fn(&str) -> Option<String>,
    rc_candidates: &[PathBuf],
) -> Result<ClientConfig> {
    let mut url = url.or_else(|| env("AIRMONITORS_URL"));
    let mut account_id = account_id.or_else(|| env("AIRMONITORS_ACCOUNT_ID"));
    let mut licence_key = licence_key.or_else(|| env("AIRMONITORS_LICENCE_KEY"));
    let mut file_verify: Option<bool> = None;

    if url.is_none() || account_id.is_none() || licence_key.is_none() || verify.is_none() {
        if let Some(rc_path) = rc_candidates.iter().find(|p| p.exists()) {
            debug!(path = %rc_path.display(), "reading rc file");
            let cfg = read_rc(rc_path)?;
            url = url.or(cfg.url);
            account_id = account_id.or(cfg.account_id);
            licence_key = licence_key.or(cfg.licence_key);
            file_verify = cfg.verify;
        }
    }

    let account_id = account_id.ok_or_else(|| {
        missing("account id", "AIRMONITORS_ACCOUNT_ID", "account", rc_candidates)
    })?;
    let licence_key = licence_key
        .ok_or_else(|| missing("licence key", "AIRMONITORS_LICENCE_KEY", "key", rc_candidates))?;

    Ok(ClientConfig {
        url: url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        account_id,
        licence_key,
        verify: verify.or(file_verify).unwrap_or(true),
    })
}

fn missing(what: &str, env_var: &str, rc_key: &str, rc_candidates: &[PathBuf]) -> Error {
    if rc_candidates.is_empty() {
        return Error::Config(format!(
            "missing {what} (set {env_var} or create .airmonitorsrc)"
        ));
    }
    Error::Config(format!(
        "missing {what} (set {env_var} or put `{rc_key}:` in one of: {})",
        rc_candidates
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    ))
}

fn read_rc(path: &Path) -> Result<RcConfig> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!(
            "failed to read configuration file {}: {e}",
            path.display()
        ))
    })?;
    Ok(parse_rc(&text))
}

fn parse_rc(text: &str) -> RcConfig {
    let mut cfg = RcConfig::default();

    // A key may have its value on the following line.
    let mut pending: Option<RcKey> = None;

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(key) = pending.take() {
            if !is_key_line(line) {
                cfg.set(key, strip_quotes(line));
                continue;
            }
        }

        let Some((k, v)) = line.split_once(':') else {
            continue;
        };
        let v = strip_quotes(v);
        let key = match k.trim() {
            "url" => RcKey::Url,
            "account" | "account_id" => RcKey::Account,
            "key" | "licence_key" => RcKey::Key,
            "verify" => {
                if !v.is_empty() {
                    cfg.verify = Some(v != "0");
                }
                continue;
            }
            _ => continue,
        };
        if v.is_empty() {
            pending = Some(key);
        } else {
            cfg.set(key, v);
        }
    }

    cfg
}

const RC_KEYS: &[&str] = &["url", "account", "account_id", "key", "licence_key", "verify"];

/// Whether `line` starts a new `key:` entry rather than continuing a value,
/// e.g. a URL on the line after `url:`.
fn is_key_line(line: &str) -> bool {
    line.split_once(':')
        .is_some_and(|(k, _)| RC_KEYS.contains(&k.trim()))
}

impl RcConfig {
    fn set(&mut self, key: RcKey, value: &str) {
        let value = Some(value.to_string());
        match key {
            RcKey::Url => self.url = value,
            RcKey::Account => self.account_id = value,
            RcKey::Key => self.licence_key = value,
        }
    }
}

fn strip_quotes(s: &str) -> &str {
    let s = s.trim();
    if (s.starts_with('"') && s.ends_with('"') && s.len() >= 2)
        || (s.starts_with('\'') && s.ends_with('\'') && s.len() >= 2)
    {
        &s[1..s.len() - 1]
    } else {
        s
    }
}

/// Search order:
/// 1) `AIRMONITORS_RC` (explicit)
/// 2) `./.airmonitorsrc`
/// 3) `~/.airmonitorsrc`
fn rc_candidates() -> Vec<PathBuf> {
    if let Ok(p) = std::env::var("AIRMONITORS_RC") {
        return vec![PathBuf::from(p)];
    }

    let mut v = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        v.push(cwd.join(".airmonitorsrc"));
    }
    if let Some(home) = dirs::home_dir() {
        v.push(home.join(".airmonitorsrc"));
    }
    v
}
