use crate::error::{OcmtError, Result};
use ocmt_common::request::DEFAULT_TOP_K;
use ocmt_common::Weights;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// APIベースURLを上書きする環境変数
pub const API_BASE_ENV: &str = "OCMT_API_BASE";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base: String,
    pub default_top_k: u32,
    pub default_weights: Weights,
    /// 未設定ならクライアント側でタイムアウトしない
    pub timeout_seconds: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: "http://localhost:8000".into(),
            default_top_k: DEFAULT_TOP_K,
            default_weights: Weights::SERVICE_DEFAULT,
            timeout_seconds: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| OcmtError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("ocmt").join("config.json"))
    }

    /// 実際に使うAPIベースURL
    ///
    /// 優先順位: 引数 > 環境変数 > 設定ファイル。末尾の `/` は除去する。
    pub fn effective_api_base(&self, override_base: Option<&str>) -> String {
        let base = match override_base {
            Some(base) if !base.trim().is_empty() => base.to_string(),
            _ => match std::env::var(API_BASE_ENV) {
                Ok(base) if !base.trim().is_empty() => base,
                _ => self.api_base.clone(),
            },
        };
        base.trim().trim_end_matches('/').to_string()
    }

    pub fn set_api_base(&mut self, base: String) -> Result<()> {
        let trimmed = base.trim();
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(OcmtError::Config(format!(
                "APIベースURLは http:// または https:// で始めてください: {}",
                base
            )));
        }
        self.api_base = trimmed.trim_end_matches('/').to_string();
        self.save()
    }
}
