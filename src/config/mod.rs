use std::env;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    #[serde(alias = "api_base")]
    pub base_url: Option<String>,
    pub timeout: Option<usize>,
    pub proxy: Option<String>,
    pub user_agent: Option<String>,
    pub workers: Option<usize>,
    pub output: Option<String>,
    pub output_format: Option<String>,
    pub no_color: Option<bool>,
}

fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(|| env::var_os("USERPROFILE").map(PathBuf::from))
        .or_else(|| {
            let drive = env::var_os("HOMEDRIVE")?;
            let path = env::var_os("HOMEPATH")?;
            Some(PathBuf::from(drive).join(path))
        })
}

pub fn default_config_path() -> Option<PathBuf> {
    Some(home_dir()?.join(".holocron").join("config.yml"))
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/").or_else(|| path.strip_prefix("~\\")) {
        if let Some(home) = home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

pub fn expand_tilde_string(path: &str) -> String {
    expand_tilde(path).to_string_lossy().to_string()
}

pub fn parse_config(contents: &str, origin: &Path) -> Result<ConfigFile, String> {
    // an empty or comment-only file deserializes as unit
    if contents
        .lines()
        .all(|l| l.trim().is_empty() || l.trim_start().starts_with('#'))
    {
        return Ok(ConfigFile::default());
    }
    serde_yaml::from_str::<ConfigFile>(contents)
        .map_err(|e| format!("failed to parse config '{}': {e}", origin.display()))
}

pub fn load_config(path: &Path, allow_missing: bool) -> Result<ConfigFile, String> {
    match std::fs::read_to_string(path) {
        Ok(contents) => parse_config(&contents, path),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && allow_missing => {
            Ok(ConfigFile::default())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(format!("config file not found '{}'", path.display()))
        }
        Err(e) => Err(format!("failed to read config '{}': {e}", path.display())),
    }
}

fn default_config_yaml() -> String {
    r#"# Holocron config
#
# Location (default):
#   ~/.holocron/config.yml

# Catalog API
base_url: https://swapi.py4e.com/api

# HTTP
timeout: 10
# proxy: http://127.0.0.1:8080
# user_agent: holocron

# Runtime
workers: 2

# Output (optional)
# output: ./people.json
# output_format: json

# Output styling
no_color: false
"#
    .to_string()
}

pub fn ensure_default_config_file(path: &Path) -> Result<bool, String> {
    if path.exists() {
        return Ok(false);
    }
    let parent = path
        .parent()
        .ok_or_else(|| format!("invalid config path '{}'", path.display()))?;
    std::fs::create_dir_all(parent).map_err(|e| {
        format!(
            "failed to create config directory '{}': {e}",
            parent.display()
        )
    })?;
    std::fs::write(path, default_config_yaml())
        .map_err(|e| format!("failed to write config file '{}': {e}", path.display()))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_parses() {
        let cfg = parse_config(&default_config_yaml(), Path::new("default")).unwrap();
        assert_eq!(cfg.base_url.as_deref(), Some("https://swapi.py4e.com/api"));
        assert_eq!(cfg.timeout, Some(10));
        assert_eq!(cfg.workers, Some(2));
        assert_eq!(cfg.no_color, Some(false));
        assert!(cfg.proxy.is_none());
    }

    #[test]
    fn comment_only_config_is_default() {
        let cfg = parse_config("# nothing here\n\n", Path::new("x")).unwrap();
        assert_eq!(cfg, ConfigFile::default());
    }

    #[test]
    fn api_base_alias_and_bad_types() {
        let cfg = parse_config("api_base: http://localhost:8000/api\n", Path::new("x")).unwrap();
        assert_eq!(cfg.base_url.as_deref(), Some("http://localhost:8000/api"));
        assert!(parse_config("timeout: soon\n", Path::new("x")).is_err());
    }

    #[test]
    fn missing_file_handling() {
        let path = std::env::temp_dir().join("holocron-missing-config").join("config.yml");
        assert_eq!(load_config(&path, true).unwrap(), ConfigFile::default());
        assert!(load_config(&path, false).is_err());
    }

    #[test]
    fn ensure_default_writes_once() {
        let dir = std::env::temp_dir().join(format!("holocron-cfg-{}", std::process::id()));
        let path = dir.join("config.yml");
        let _ = std::fs::remove_dir_all(&dir);
        assert!(ensure_default_config_file(&path).unwrap());
        assert!(!ensure_default_config_file(&path).unwrap());
        let cfg = load_config(&path, false).unwrap();
        assert_eq!(cfg.timeout, Some(10));
        let _ = std::fs::remove_dir_all(&dir);
    }
}
