//! 配置模块 - 处理 JSON 配置文件的加载和解析

use crate::error::{CribError, Result};
use crate::search::MIN_CRIB_LEN;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// 主配置结构
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// 密文文件路径, 每行一条
    #[serde(default = "default_ciphertexts", alias = "ciphertext_file")]
    pub ciphertexts: PathBuf,

    /// 词典分级文件, 按常见程度从高到低
    #[serde(default = "default_dictionary_tiers", alias = "tiers", alias = "dictionaries")]
    pub dictionary_tiers: Vec<PathBuf>,

    /// worker 数量, 0 表示按 CPU 数
    #[serde(default, alias = "num_processes", alias = "threads")]
    workers: usize,

    /// 最短候选词长度
    #[serde(default = "default_min_crib_len", alias = "min_crib_length")]
    min_crib_len: usize,

    /// 报告中展示的匹配数
    #[serde(default = "default_report_limit", alias = "top")]
    pub report_limit: usize,
}

fn default_ciphertexts() -> PathBuf {
    PathBuf::from("ciphertexts.txt")
}

fn default_dictionary_tiers() -> Vec<PathBuf> {
    ["10", "20", "35", "50", "70", "95"]
        .iter()
        .map(|level| PathBuf::from(format!("dictionary/english-words.{}", level)))
        .collect()
}

fn default_min_crib_len() -> usize {
    MIN_CRIB_LEN
}

fn default_report_limit() -> usize {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ciphertexts: default_ciphertexts(),
            dictionary_tiers: default_dictionary_tiers(),
            workers: 0,
            min_crib_len: default_min_crib_len(),
            report_limit: default_report_limit(),
        }
    }
}

impl Config {
    /// 从 JSON 文件加载配置
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// 从 JSON 字符串解析配置
    pub fn from_json(content: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// 检查配置是否可用
    pub fn validate(&self) -> Result<()> {
        if self.dictionary_tiers.is_empty() {
            return Err(CribError::Config("at least one dictionary tier is required".into()));
        }
        Ok(())
    }

    pub fn set_workers(&mut self, workers: usize) {
        self.workers = workers;
    }

    pub fn set_min_crib_len(&mut self, len: usize) {
        self.min_crib_len = len;
    }

    /// 实际使用的 worker 数
    pub fn workers(&self) -> usize {
        if self.workers > 0 {
            return self.workers;
        }
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    }

    /// 最短候选词长度, 不低于 3
    pub fn min_crib_len(&self) -> usize {
        self.min_crib_len.max(MIN_CRIB_LEN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::from_json("{}").unwrap();
        assert_eq!(config.ciphertexts, PathBuf::from("ciphertexts.txt"));
        assert_eq!(config.dictionary_tiers.len(), 6);
        assert_eq!(
            config.dictionary_tiers[0],
            PathBuf::from("dictionary/english-words.10")
        );
        assert_eq!(config.min_crib_len(), 3);
        assert_eq!(config.report_limit, 10);
        assert!(config.workers() >= 1);
    }

    #[test]
    fn test_aliases_and_overrides() {
        let config = Config::from_json(
            r#"{
                "ciphertext_file": "ct.txt",
                "tiers": ["a.txt", "b.txt"],
                "num_processes": 4,
                "min_crib_length": 5,
                "top": 3
            }"#,
        )
        .unwrap();
        assert_eq!(config.ciphertexts, PathBuf::from("ct.txt"));
        assert_eq!(config.dictionary_tiers, vec![PathBuf::from("a.txt"), PathBuf::from("b.txt")]);
        assert_eq!(config.workers(), 4);
        assert_eq!(config.min_crib_len(), 5);
        assert_eq!(config.report_limit, 3);
    }

    #[test]
    fn test_min_crib_len_floor() {
        let mut config = Config::default();
        config.set_min_crib_len(1);
        assert_eq!(config.min_crib_len(), 3);
    }

    #[test]
    fn test_rejects_empty_tiers() {
        assert!(matches!(
            Config::from_json(r#"{"dictionary_tiers": []}"#),
            Err(CribError::Config(_))
        ));
        assert!(matches!(Config::from_json("not json"), Err(CribError::Json(_))));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cribdrag.json");
        fs::write(&path, r#"{"workers": 2}"#).unwrap();
        let config = Config::load_from_file(&path).unwrap();
        assert_eq!(config.workers(), 2);
        assert!(Config::load_from_file(dir.path().join("missing.json")).is_err());
    }
}
