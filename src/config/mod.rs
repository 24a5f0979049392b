use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::domain::ContractAddress;
use crate::export::OutputFormat;

/// A contract whose ABI is known ahead of time
#[derive(Debug, Clone, Deserialize)]
pub struct ContractSpec {
    pub address: String,
    /// Path to an ABI JSON file or compiler artifact
    pub abi: PathBuf,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Default tracing filter, e.g. "info" or "abiscope=debug"
    #[serde(default)]
    pub log_level: Option<String>,

    #[serde(default)]
    pub output: Option<OutputFormat>,

    #[serde(default)]
    pub contracts: Vec<ContractSpec>,
}

impl ContractSpec {
    pub fn normalized_address(&self) -> ContractAddress {
        ContractAddress::new(&self.address)
    }

    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| short_addr(&self.address))
    }
}

impl Config {
    /// Parse configuration text, resolving relative ABI paths against `base_dir`
    pub fn parse(content: &str, base_dir: Option<&Path>) -> Result<Self> {
        let mut config: Config = toml::from_str(content)?;
        if let Some(base_dir) = base_dir {
            for contract in &mut config.contracts {
                if contract.abi.is_relative() {
                    contract.abi = base_dir.join(&contract.abi);
                }
            }
        }
        Ok(config)
    }

    /// Find the configured contract for an address
    pub fn contract(&self, address: &ContractAddress) -> Option<&ContractSpec> {
        self.contracts
            .iter()
            .find(|contract| &contract.normalized_address() == address)
    }
}

/// Load the configuration file, falling back to defaults if it is missing or invalid
pub fn load() -> Config {
    let Some(path) = config_path() else {
        return Config::default();
    };
    load_from(&path).unwrap_or_default()
}

pub fn load_from(path: &Path) -> Result<Config> {
    let content =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    Config::parse(&content, path.parent())
        .with_context(|| format!("parse config {}", path.display()))
}

pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("ABISCOPE_CONFIG").map(PathBuf::from) {
        return Some(path);
    }
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from) {
        return Some(xdg.join("abiscope").join("config.toml"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".config").join("abiscope").join("config.toml"));
    }

    directories::ProjectDirs::from("io", "abiscope", "abiscope")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

fn short_addr(value: &str) -> String {
    let value = value.trim();
    if value.len() <= 10 {
        return value.to_string();
    }
    let start: String = value.chars().take(6).collect();
    let end: String = value
        .chars()
        .rev()
        .take(4)
        .collect::<String>()
        .chars()
        .rev()
        .collect();
    format!("{}..{}", start, end)
}
