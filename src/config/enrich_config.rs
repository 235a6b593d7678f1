// ==========================================
// 管材库存流水 - 补全配置
// ==========================================
// 职责: 参数键 / 长度兜底 / 解码层数 的配置加载
// 来源: JSON 文本 或 环境变量; 缺省字段使用默认值
// ==========================================

use crate::domain::parameter::DEFAULT_PARAMETER_KEYS;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const ENV_PARAMETER_KEYS: &str = "PIPE_INVENTORY_PARAMETER_KEYS";
pub const ENV_STORED_LENGTH_FALLBACK: &str = "PIPE_INVENTORY_STORED_LENGTH_FALLBACK";
pub const ENV_MAX_DECODE_DEPTH: &str = "PIPE_INVENTORY_MAX_DECODE_DEPTH";

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置 JSON 解析失败: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("配置值非法 (key: {key}, value: {value}): {message}")]
    InvalidValue {
        key: String,
        value: String,
        message: String,
    },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// 补全配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichConfig {
    /// 筛选选项关注的参数键（按此顺序输出）
    #[serde(default = "default_parameter_keys")]
    pub parameter_keys: Vec<String>,

    /// 快照算出的长度为 0 时，是否回退到记录上存储的 roll_length_meters
    #[serde(default = "default_true")]
    pub fallback_to_stored_length: bool,

    /// JSON 文本最多解码层数（处理被重复序列化的字段）
    #[serde(default = "default_max_decode_depth")]
    pub max_decode_depth: u8,
}

fn default_parameter_keys() -> Vec<String> {
    DEFAULT_PARAMETER_KEYS.iter().map(|k| k.to_string()).collect()
}

fn default_true() -> bool {
    true
}

fn default_max_decode_depth() -> u8 {
    2
}

impl Default for EnrichConfig {
    fn default() -> Self {
        Self {
            parameter_keys: default_parameter_keys(),
            fallback_to_stored_length: default_true(),
            max_decode_depth: default_max_decode_depth(),
        }
    }
}

fn is_true(v: &str) -> bool {
    matches!(
        v.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "y" | "on"
    )
}

impl EnrichConfig {
    /// 从 JSON 文本加载
    pub fn from_json_str(text: &str) -> ConfigResult<Self> {
        let config: EnrichConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// 从环境变量加载; 非法值记录告警后沿用默认值
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从任意键值来源加载（便于测试，不依赖进程环境）
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = EnrichConfig::default();

        if let Some(raw) = lookup(ENV_PARAMETER_KEYS) {
            let keys: Vec<String> = raw
                .split(',')
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty())
                .collect();
            if keys.is_empty() {
                tracing::warn!("{} 为空, 使用默认参数键", ENV_PARAMETER_KEYS);
            } else {
                config.parameter_keys = keys;
            }
        }

        if let Some(raw) = lookup(ENV_STORED_LENGTH_FALLBACK) {
            config.fallback_to_stored_length = is_true(&raw);
        }

        if let Some(raw) = lookup(ENV_MAX_DECODE_DEPTH) {
            match raw.trim().parse::<u8>() {
                Ok(depth) if depth >= 1 => config.max_decode_depth = depth,
                _ => tracing::warn!(
                    "{} 非法: {}, 使用默认值 {}",
                    ENV_MAX_DECODE_DEPTH,
                    raw,
                    config.max_decode_depth
                ),
            }
        }

        config
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.max_decode_depth == 0 {
            return Err(ConfigError::InvalidValue {
                key: "max_decode_depth".to_string(),
                value: "0".to_string(),
                message: "至少需要 1 层".to_string(),
            });
        }
        if let Some(blank) = self.parameter_keys.iter().find(|k| k.trim().is_empty()) {
            return Err(ConfigError::InvalidValue {
                key: "parameter_keys".to_string(),
                value: blank.clone(),
                message: "参数键不能为空".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = EnrichConfig::default();
        assert_eq!(config.parameter_keys, vec!["OD", "PN", "PE", "Type"]);
        assert!(config.fallback_to_stored_length);
        assert_eq!(config.max_decode_depth, 2);
    }

    #[test]
    fn test_from_json_partial() {
        let config = EnrichConfig::from_json_str(r#"{"parameter_keys": ["OD", "SDR"]}"#).unwrap();
        assert_eq!(config.parameter_keys, vec!["OD", "SDR"]);
        assert!(config.fallback_to_stored_length);
        assert_eq!(config.max_decode_depth, 2);
    }

    #[test]
    fn test_from_json_invalid() {
        assert!(matches!(
            EnrichConfig::from_json_str("{not json"),
            Err(ConfigError::InvalidJson(_))
        ));
        assert!(matches!(
            EnrichConfig::from_json_str(r#"{"max_decode_depth": 0}"#),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_from_lookup() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_PARAMETER_KEYS, " OD, PN ,,"),
            (ENV_STORED_LENGTH_FALLBACK, "off"),
            (ENV_MAX_DECODE_DEPTH, "abc"),
        ]);
        let config = EnrichConfig::from_lookup(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(config.parameter_keys, vec!["OD", "PN"]);
        assert!(!config.fallback_to_stored_length);
        assert_eq!(config.max_decode_depth, 2);
    }
}
