//! XOR 模块 - 密文两两异或矩阵
//!
//! 同一密钥流加密的两条密文异或后, 密钥流被抵消, 得到两条明文的异或.

use crate::error::{CribError, Result};
use serde::Serialize;
use std::fmt;

/// 逐字节异或两个等长序列
pub fn xor_bytes(a: &[u8], b: &[u8]) -> Result<Vec<u8>> {
    if a.len() != b.len() {
        return Err(CribError::LengthMismatch {
            index: 1,
            expected: a.len(),
            found: b.len(),
        });
    }
    Ok(a.iter().zip(b).map(|(x, y)| x ^ y).collect())
}

/// 将 `src ^ key` 写入 `out`, 三者长度须一致
#[inline]
pub fn xor_into(out: &mut [u8], src: &[u8], key: &[u8]) {
    for ((o, s), k) in out.iter_mut().zip(src).zip(key) {
        *o = s ^ k;
    }
}

/// 无序密文对标识, 始终满足 `lo < hi`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PairId {
    pub lo: usize,
    pub hi: usize,
}

impl PairId {
    /// 构造无序对, 自身配对返回 None
    pub fn new(i: usize, j: usize) -> Option<Self> {
        match i.cmp(&j) {
            std::cmp::Ordering::Less => Some(Self { lo: i, hi: j }),
            std::cmp::Ordering::Greater => Some(Self { lo: j, hi: i }),
            std::cmp::Ordering::Equal => None,
        }
    }
}

impl fmt::Display for PairId {
    // 1-based, e.g. x1_2 = p1 ^ p2
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}_{}", self.lo + 1, self.hi + 1)
    }
}

/// 两两异或表
///
/// 只保存上三角 (i < j) 的条目, 按对称方式寻址.
#[derive(Debug, Clone)]
pub struct XorMatrix {
    count: usize,
    len: usize,
    entries: Vec<Vec<u8>>,
}

impl XorMatrix {
    /// 从至少两条等长密文构建矩阵
    ///
    /// 任何长度不一致都会在构建前报错, 不会生成部分结果.
    pub fn build(ciphertexts: &[Vec<u8>]) -> Result<Self> {
        if ciphertexts.len() < 2 {
            return Err(CribError::InsufficientCiphertexts {
                found: ciphertexts.len(),
            });
        }

        let len = ciphertexts[0].len();
        if let Some((index, ct)) = ciphertexts
            .iter()
            .enumerate()
            .find(|(_, ct)| ct.len() != len)
        {
            return Err(CribError::LengthMismatch {
                index,
                expected: len,
                found: ct.len(),
            });
        }

        let count = ciphertexts.len();
        let mut entries = Vec::with_capacity(count * (count - 1) / 2);
        for i in 0..count {
            for j in (i + 1)..count {
                entries.push(xor_bytes(&ciphertexts[i], &ciphertexts[j])?);
            }
        }

        Ok(Self {
            count,
            len,
            entries,
        })
    }

    /// 密文条数
    pub fn count(&self) -> usize {
        self.count
    }

    /// 每条密文的字节长度
    pub fn ciphertext_len(&self) -> usize {
        self.len
    }

    fn slot(&self, pair: PairId) -> usize {
        // row-major upper triangle without the diagonal
        pair.lo * (2 * self.count - pair.lo - 1) / 2 + (pair.hi - pair.lo - 1)
    }

    /// 查询 (i, j) 的异或结果, 与 (j, i) 相同
    pub fn get(&self, i: usize, j: usize) -> Option<&[u8]> {
        let pair = PairId::new(i, j)?;
        if pair.hi >= self.count {
            return None;
        }
        self.entries.get(self.slot(pair)).map(Vec::as_slice)
    }

    /// 以 `anchor` 为一方的所有配对, 按对方下标升序
    pub fn partners(&self, anchor: usize) -> impl Iterator<Item = (usize, &[u8])> + '_ {
        (0..self.count)
            .filter(move |&other| other != anchor)
            .filter_map(move |other| self.get(anchor, other).map(|bytes| (other, bytes)))
    }
}
