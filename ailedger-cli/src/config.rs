use ailedger_core::ParseContext;
use ailedger_parse::{KeywordBackend, ParseBackend, ParserConfig};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use crate::state::ensure_ailedger_home;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub parser: ParserSection,
    #[serde(default)]
    pub output: OutputSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserSection {
    /// "offchain" or "onchain"
    pub context: String,
    /// IANA timezone used for "today"
    pub timezone: String,
    pub placeholder_amounts: bool,
    /// On-chain backend: "keyword" or "none" (program table only)
    pub backend: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSection {
    /// "text" or "json"
    pub format: String,
}

impl Default for ParserSection {
    fn default() -> Self {
        Self {
            context: "offchain".to_string(),
            timezone: "UTC".to_string(),
            placeholder_amounts: true,
            backend: "keyword".to_string(),
        }
    }
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            format: "text".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl Config {
    pub fn context(&self) -> Result<ParseContext> {
        self.parser
            .context
            .parse()
            .with_context(|| format!("[parser] context = {:?}", self.parser.context))
    }

    pub fn backend(&self) -> Result<Option<Arc<dyn ParseBackend>>> {
        match self.parser.backend.trim().to_lowercase().as_str() {
            "keyword" => {
                let backend: Arc<dyn ParseBackend> = Arc::new(KeywordBackend);
                Ok(Some(backend))
            }
            "none" => Ok(None),
            other => bail!("[parser] backend = {other:?}: expected \"keyword\" or \"none\""),
        }
    }

    pub fn output_format(&self) -> Result<OutputFormat> {
        match self.output.format.trim().to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => bail!("[output] format = {other:?}: expected \"text\" or \"json\""),
        }
    }

    /// Reject bad names up front instead of defaulting them later.
    pub fn validate(&self) -> Result<()> {
        self.context()?;
        self.backend()?;
        self.output_format()?;
        ailedger_core::time::today_in(&self.parser.timezone)?;
        Ok(())
    }

    pub fn parser_config(&self) -> Result<ParserConfig> {
        let today = ailedger_core::time::today_in(&self.parser.timezone)?;
        let mut cfg =
            ParserConfig::new(today).with_placeholder_amounts(self.parser.placeholder_amounts);
        if let Some(backend) = self.backend()? {
            cfg = cfg.with_backend(backend);
        }
        Ok(cfg)
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_ailedger_home()?.join("config.toml"))
}

pub fn parse_config(s: &str) -> Result<Config> {
    let cfg: Config = toml::from_str(s).context("parse config.toml")?;
    cfg.validate()?;
    Ok(cfg)
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    parse_config(&s).with_context(|| format!("invalid config {}", p.display()))
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = config_path()?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}
