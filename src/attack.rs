//! 攻击编排模块 - 逐级扫描词典, 归并结果并精炼
//!
//! 异或矩阵和字典索引在任何 worker 启动前构建完成, 之后只读共享.
//! 每个分级扫描结束是一个同步点, 全局累加器只在这里被修改.

use crate::dictionary::Tier;
use crate::error::Result;
use crate::refine::refine;
use crate::search::{CribDragger, MatchRecord, SweepResult, MIN_CRIB_LEN};
use crate::trie::AffixIndex;
use crate::xor::XorMatrix;
use log::info;
use serde::Serialize;
use std::collections::BTreeSet;
use std::time::{Duration, Instant};

/// 运行参数
#[derive(Debug, Clone, Copy)]
pub struct AttackOptions {
    pub workers: usize,
    pub min_crib_len: usize,
}

impl Default for AttackOptions {
    fn default() -> Self {
        Self {
            workers: 1,
            min_crib_len: MIN_CRIB_LEN,
        }
    }
}

/// 单个分级的扫描摘要
#[derive(Debug, Clone, Serialize)]
pub struct TierSummary {
    pub name: String,
    pub words: usize,
    pub matches: usize,
    pub cribs: usize,
    #[serde(serialize_with = "serialize_secs")]
    pub elapsed: Duration,
}

fn serialize_secs<S: serde::Serializer>(d: &Duration, s: S) -> std::result::Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_secs_f64())
}

/// 一次完整运行的结果
#[derive(Debug, Clone, Serialize)]
pub struct AttackOutcome {
    pub ciphertexts: usize,
    pub ciphertext_len: usize,
    pub tiers: Vec<TierSummary>,
    /// 精炼前的匹配总数
    pub raw_matches: usize,
    pub corroborated: BTreeSet<String>,
    pub refined: Vec<MatchRecord>,
}

/// 一次多次一密攻击
#[derive(Debug)]
pub struct Attack {
    matrix: XorMatrix,
    oracle: AffixIndex,
    tiers: Vec<Tier>,
    options: AttackOptions,
}

impl Attack {
    /// 构建异或矩阵和字典索引 (索引覆盖所有分级的并集)
    pub fn new(ciphertexts: &[Vec<u8>], tiers: Vec<Tier>, options: AttackOptions) -> Result<Self> {
        let matrix = XorMatrix::build(ciphertexts)?;
        info!(
            "Built XOR matrix for {} ciphertexts of {} bytes",
            matrix.count(),
            matrix.ciphertext_len()
        );

        let oracle = AffixIndex::build(tiers.iter().flat_map(|t| t.words.iter()))?;
        info!("Built affix index over {} words", oracle.len());

        Ok(Self {
            matrix,
            oracle,
            tiers,
            options,
        })
    }

    pub fn matrix(&self) -> &XorMatrix {
        &self.matrix
    }

    pub fn oracle(&self) -> &AffixIndex {
        &self.oracle
    }

    /// 逐级扫描并精炼
    pub fn run(&self) -> Result<AttackOutcome> {
        let workers = self.options.workers.max(1);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("cribdrag-{}", i))
            .build()?;

        let dragger =
            CribDragger::new(&self.matrix, &self.oracle).with_min_len(self.options.min_crib_len);

        let mut global = SweepResult::default();
        let mut summaries = Vec::with_capacity(self.tiers.len());
        let started = Instant::now();

        for tier in &self.tiers {
            info!("Sweeping tier {} ({} words, {} workers)", tier.name, tier.len(), workers);
            let tier_start = Instant::now();
            let result = dragger.sweep_tier(tier, &pool, workers);
            let elapsed = tier_start.elapsed();

            info!(
                "Tier {} done in {:.3}s: {} matches from {} cribs",
                tier.name,
                elapsed.as_secs_f64(),
                result.matches.len(),
                result.cribs.len()
            );
            summaries.push(TierSummary {
                name: tier.name.clone(),
                words: tier.len(),
                matches: result.matches.len(),
                cribs: result.cribs.len(),
                elapsed,
            });
            global.merge(result);
        }

        let raw_matches = global.matches.len();
        let refined = refine(global.matches, &global.cribs);
        info!(
            "Refined {} raw matches down to {} in {:.3}s total",
            raw_matches,
            refined.len(),
            started.elapsed().as_secs_f64()
        );

        Ok(AttackOutcome {
            ciphertexts: self.matrix.count(),
            ciphertext_len: self.matrix.ciphertext_len(),
            tiers: summaries,
            raw_matches,
            corroborated: global.cribs,
            refined,
        })
    }
}
