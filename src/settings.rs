use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::categorizer::RuleSet;
use crate::error::{Result, TaxprepError};

/// Optional defaults read from `~/.config/taxprep/settings.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Directory under which timestamped run folders are created.
    #[serde(default)]
    pub output_root: Option<String>,
    /// JSON rules file replacing the built-in keyword table.
    #[serde(default)]
    pub rules_file: Option<String>,
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("taxprep")
}

pub fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

/// Missing file means defaults; a file that exists but does not parse is an error.
pub fn load_settings_from(path: &Path) -> Result<Settings> {
    if !path.exists() {
        return Ok(Settings::default());
    }
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content)
        .map_err(|e| TaxprepError::Settings(format!("{}: {e}", path.display())))
}

pub fn load_settings() -> Result<Settings> {
    load_settings_from(&settings_path())
}

pub fn shellexpand_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix('~') {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest.trim_start_matches('/'));
        }
    }
    PathBuf::from(path)
}

impl Settings {
    /// The rule set to use: `--rules` flag, then settings, then built-ins.
    pub fn resolve_rules(&self, flag: Option<&str>) -> Result<RuleSet> {
        match flag.or(self.rules_file.as_deref()) {
            Some(path) => RuleSet::from_json_file(&shellexpand_path(path)),
            None => Ok(RuleSet::builtin()),
        }
    }

    /// Where a run writes: `--output-dir` flag, else a timestamped folder under
    /// `output_root`, else a timestamped folder in the working directory.
    pub fn resolve_output_dir(&self, flag: Option<&str>) -> PathBuf {
        if let Some(dir) = flag {
            return shellexpand_path(dir);
        }
        let run_dir = crate::pipeline::default_output_dir();
        match &self.output_root {
            Some(root) => shellexpand_path(root).join(run_dir),
            None => run_dir,
        }
    }
}
