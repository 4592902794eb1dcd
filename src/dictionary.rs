//! 词典模块 - 分级词表的加载与去重

use crate::error::Result;
use log::{info, warn};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// 一个词典分级 (按词频/罕见度)
#[derive(Debug, Clone, Default)]
pub struct Tier {
    /// 分级名称 (通常为文件名)
    pub name: String,
    /// 保留原始大小写的单词
    pub words: Vec<String>,
}

impl Tier {
    pub fn new(name: impl Into<String>, words: Vec<String>) -> Self {
        Self {
            name: name.into(),
            words,
        }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// 跨分级去重的加载器
///
/// 已在前面分级 (或同一分级) 出现过的单词 (忽略大小写) 会被跳过.
#[derive(Debug, Default)]
pub struct TierLoader {
    seen: HashSet<String>,
}

impl TierLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从字节内容解析一个分级, 跳过非 UTF-8 行
    ///
    /// 返回分级和被跳过的行数.
    pub fn parse(&mut self, name: &str, content: &[u8]) -> (Tier, usize) {
        let mut words = Vec::new();
        let mut skipped = 0;

        for line in content.split(|&b| b == b'\n') {
            let Ok(line) = std::str::from_utf8(line) else {
                skipped += 1;
                continue;
            };
            let word = line.trim();
            if word.is_empty() {
                continue;
            }
            if self.seen.insert(word.to_lowercase()) {
                words.push(word.to_string());
            }
        }

        (Tier::new(name, words), skipped)
    }

    /// 从文件加载一个分级
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<Tier> {
        let path = path.as_ref();
        let content = fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let (tier, skipped) = self.parse(&name, &content);
        if skipped > 0 {
            warn!("{}: skipped {} lines that are not valid UTF-8", name, skipped);
        }
        info!("Loaded tier {} with {} new words", tier.name, tier.len());
        Ok(tier)
    }
}

/// 按顺序加载所有分级
pub fn load_tiers<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<Tier>> {
    let mut loader = TierLoader::new();
    paths.iter().map(|p| loader.load(p)).collect()
}

/// 将切片分成 `n` 个连续块, 块大小相差不超过 1
///
/// 前 `len % n` 个块多分一个元素. `n` 为 0 时按 1 处理.
pub fn split_even<T>(items: &[T], n: usize) -> Vec<&[T]> {
    let n = n.max(1);
    let base = items.len() / n;
    let remainder = items.len() % n;

    let mut chunks = Vec::with_capacity(n);
    let mut start = 0;
    for i in 0..n {
        let end = start + base + usize::from(i < remainder);
        chunks.push(&items[start..end]);
        start = end;
    }
    chunks
}
