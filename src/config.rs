use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Ok, Result};
use glob::Pattern;
use serde::{Deserialize, Serialize};

use crate::flags::FlagTable;
use crate::keywords::{KeywordTableBuilder, parse_keyword_spec};
use crate::scan::ExtractorConfig;

pub const CONFIG_FILE_NAME: &str = ".armatextrc.json";

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_includes")]
    pub includes: Vec<String>,
    #[serde(default)]
    pub ignores: Vec<String>,
    /// Extra keyword specs, e.g. `"BIS_fnc_localize:1"`.
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default = "default_true")]
    pub default_keywords: bool,
    /// Extra flag specs, e.g. `"myFormat:1:arma-format"`.
    #[serde(default)]
    pub flags: Vec<String>,
    #[serde(default)]
    pub extract_all: bool,
    /// Comment tag selecting translator comments; `""` keeps all comments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub add_comments: Option<String>,
    #[serde(default = "default_output")]
    pub output: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_name: Option<String>,
}

fn default_includes() -> Vec<String> {
    vec![".".to_string()]
}

fn default_true() -> bool {
    true
}

fn default_output() -> String {
    "messages.pot".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            includes: default_includes(),
            ignores: Vec::new(),
            keywords: Vec::new(),
            default_keywords: default_true(),
            flags: Vec::new(),
            extract_all: false,
            add_comments: None,
            output: default_output(),
            package_name: None,
        }
    }
}

impl Config {
    /// Validate configuration values.
    ///
    /// Returns an error for invalid glob patterns, keyword specs or flag specs.
    pub fn validate(&self) -> Result<()> {
        for pattern in &self.ignores {
            Pattern::new(pattern)
                .with_context(|| format!("Invalid glob pattern in 'ignores': \"{}\"", pattern))?;
        }

        // Patterns without wildcards are literal directory paths.
        for pattern in &self.includes {
            if pattern.contains('*') || pattern.contains('?') {
                Pattern::new(pattern).with_context(|| {
                    format!("Invalid glob pattern in 'includes': \"{}\"", pattern)
                })?;
            }
        }

        for spec in self.keywords.iter().filter(|spec| !spec.is_empty()) {
            parse_keyword_spec(spec)
                .with_context(|| format!("Invalid keyword in 'keywords': \"{}\"", spec))?;
        }

        let mut flags = FlagTable::new();
        for spec in &self.flags {
            flags
                .add_spec(spec)
                .with_context(|| format!("Invalid flag in 'flags': \"{}\"", spec))?;
        }

        Ok(())
    }

    /// Build the keyword and flag tables of a scan from this config.
    pub fn extractor_config(&self) -> Result<ExtractorConfig> {
        let mut keywords = KeywordTableBuilder::new();
        if !self.default_keywords {
            keywords.disable_defaults();
        }
        for spec in &self.keywords {
            keywords
                .register(spec)
                .with_context(|| format!("Invalid keyword: \"{}\"", spec))?;
        }

        let mut flags = FlagTable::with_defaults();
        for spec in &self.flags {
            flags
                .add_spec(spec)
                .with_context(|| format!("Invalid flag: \"{}\"", spec))?;
        }

        Ok(ExtractorConfig {
            keywords: keywords.build(),
            flags,
            extract_all: self.extract_all,
        })
    }
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// Directory of the config file; paths in the config are relative to it.
    pub root: PathBuf,
    /// True if config was loaded from a file, false if using defaults.
    pub from_file: bool,
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            config.validate()?;
            tracing::debug!(path = %path.display(), "loaded config");
            let root = path
                .parent()
                .map_or_else(|| start_dir.to_path_buf(), Path::to_path_buf);
            Ok(ConfigLoadResult {
                config,
                root,
                from_file: true,
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            root: start_dir.to_path_buf(),
            from_file: false,
        }),
    }
}
