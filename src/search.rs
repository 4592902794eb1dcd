//! 拖拽搜索模块 - 对每个候选词在每个偏移、每条密文上做 crib-dragging
//!
//! 假设候选词 `w` 是第 `anchor` 条密文在 `offset` 处的明文, 则
//! `X[anchor][j][offset..offset + len] ^ w` 就是第 `j` 条密文在同一位置的明文.
//! 只有全部其他密文的推断明文都通过校验时才记录匹配.

use crate::dictionary::{split_even, Tier};
use crate::trie::{normalize, AffixIndex};
use crate::validator::{Edges, Validator};
use crate::xor::{xor_into, PairId, XorMatrix};
use log::debug;
use rayon::prelude::*;
use rayon::ThreadPool;
use serde::Serialize;
use std::collections::BTreeSet;

/// 候选词最短长度, 配置无法低于此值
pub const MIN_CRIB_LEN: usize = 3;

/// 一个配对密文上的推断明文
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Decryption {
    /// 对方密文下标
    pub partner: usize,
    /// 异或对名称, 如 x1_2
    pub pair: String,
    /// 推断出的明文窗口
    pub plaintext: String,
    /// 以空格切分的片段
    pub fragments: Vec<String>,
}

/// 通过全部校验的一次候选词放置
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchRecord {
    pub crib: String,
    /// 假设包含该候选词的密文下标
    pub anchor: usize,
    pub start: usize,
    pub end: usize,
    pub length: usize,
    pub decryptions: Vec<Decryption>,
}

/// 一次扫描的结果: 匹配列表与命中过的候选词集合
#[derive(Debug, Clone, Default)]
pub struct SweepResult {
    pub matches: Vec<MatchRecord>,
    pub cribs: BTreeSet<String>,
}

impl SweepResult {
    /// 合并另一个 worker 的结果
    pub fn merge(&mut self, other: SweepResult) {
        self.matches.extend(other.matches);
        self.cribs.extend(other.cribs);
    }
}

/// 拖拽引擎, 借用只读的异或矩阵和字典索引
#[derive(Debug, Clone, Copy)]
pub struct CribDragger<'a> {
    matrix: &'a XorMatrix,
    validator: Validator<'a>,
    min_len: usize,
}

impl<'a> CribDragger<'a> {
    pub fn new(matrix: &'a XorMatrix, oracle: &'a AffixIndex) -> Self {
        Self {
            matrix,
            validator: Validator::new(oracle),
            min_len: MIN_CRIB_LEN,
        }
    }

    /// 设置最短候选词长度 (不低于 [`MIN_CRIB_LEN`])
    pub fn with_min_len(mut self, min_len: usize) -> Self {
        self.min_len = min_len.max(MIN_CRIB_LEN);
        self
    }

    /// 在单个偏移上以 `anchor` 为假设检验候选词
    ///
    /// 用小写形式做异或, 记录中保留词典里的原始拼写.
    pub fn try_placement(
        &self,
        crib: &str,
        anchor: usize,
        offset: usize,
        scratch: &mut Vec<u8>,
    ) -> Option<MatchRecord> {
        let key = normalize(crib);
        self.place(crib, key.as_bytes(), anchor, offset, scratch)
    }

    /// 任一配对窗口校验失败即放弃该假设.
    /// 窗口两侧一律视为不可见, 即使窗口贴着密文首尾.
    fn place(
        &self,
        crib: &str,
        key: &[u8],
        anchor: usize,
        offset: usize,
        scratch: &mut Vec<u8>,
    ) -> Option<MatchRecord> {
        let end = offset + key.len();
        if key.len() < self.min_len || end > self.matrix.ciphertext_len() {
            return None;
        }

        let mut decryptions = Vec::with_capacity(self.matrix.count() - 1);
        for (partner, xored) in self.matrix.partners(anchor) {
            scratch.clear();
            scratch.resize(key.len(), 0);
            xor_into(scratch, &xored[offset..end], key);

            let fragments = self.validator.check(&scratch[..], Edges::NONE)?;
            let fragments = fragments.iter().map(|f| f.raw.to_string()).collect();
            // the validator only admits ASCII
            let plaintext = String::from_utf8_lossy(&scratch[..]).into_owned();
            let pair = PairId::new(anchor, partner)
                .map(|p| p.to_string())
                .unwrap_or_default();

            decryptions.push(Decryption {
                partner,
                pair,
                plaintext,
                fragments,
            });
        }

        Some(MatchRecord {
            crib: crib.to_string(),
            anchor,
            start: offset,
            end,
            length: key.len(),
            decryptions,
        })
    }

    /// 对一个候选词做完整拖拽
    pub fn drag(&self, crib: &str) -> Vec<MatchRecord> {
        let key = normalize(crib);
        let len = key.len();
        let total = self.matrix.ciphertext_len();
        if len < self.min_len || len > total {
            return Vec::new();
        }

        let mut scratch = Vec::with_capacity(len);
        let mut found = Vec::new();
        for offset in 0..=(total - len) {
            for anchor in 0..self.matrix.count() {
                if let Some(record) = self.place(crib, key.as_bytes(), anchor, offset, &mut scratch) {
                    found.push(record);
                }
            }
        }
        found
    }

    /// 顺序扫描一组候选词 (单个 worker 的工作)
    pub fn sweep_words(&self, words: &[String]) -> SweepResult {
        let mut result = SweepResult::default();
        for word in words {
            let found = self.drag(word);
            if !found.is_empty() {
                debug!("Crib {:?}: {} placements", word, found.len());
                result.cribs.insert(word.clone());
                result.matches.extend(found);
            }
        }
        result
    }

    /// 在线程池上并行扫描一个分级
    ///
    /// 词表按 `workers` 等分, 各 worker 独立扫描, 结束后单线程归并.
    pub fn sweep_tier(&self, tier: &Tier, pool: &ThreadPool, workers: usize) -> SweepResult {
        let chunks = split_even(&tier.words, workers);
        debug!(
            "Tier {}: {} words over {} chunks (largest {})",
            tier.name,
            tier.len(),
            chunks.len(),
            chunks.first().map_or(0, |c| c.len())
        );

        let partials: Vec<SweepResult> =
            pool.install(|| chunks.par_iter().map(|chunk| self.sweep_words(chunk)).collect());

        let mut merged = SweepResult::default();
        for partial in partials {
            merged.merge(partial);
        }
        merged
    }
}
