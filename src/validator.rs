//! 合理性校验模块 - 判断解密窗口是否像自然语言
//!
//! 窗口按空格切分为片段, 根据片段两侧是否紧邻真实空格选择一种字典检查.
//! 校验只看窗口自身的字节, 窗口边缘处的片段默认不算紧邻空格.

use crate::trie::AffixIndex;

/// 允许出现的标点
pub const ALLOWED_PUNCTUATION: &[u8] = b"!,.:;'\"?";

#[inline]
fn is_punctuation(b: u8) -> bool {
    ALLOWED_PUNCTUATION.contains(&b)
}

/// 字节是否在允许字符集内: 字母, 空格, 受限标点
#[inline]
pub fn is_allowed_byte(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b' ' || is_punctuation(b)
}

/// 窗口边缘是否为真实的单词边界
///
/// 拖拽搜索始终使用 [`Edges::NONE`]; 只有确知边缘就是单词边界的调用方才应设置.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Edges {
    pub leading: bool,
    pub trailing: bool,
}

impl Edges {
    /// 窗口两侧都不可见
    pub const NONE: Edges = Edges {
        leading: false,
        trailing: false,
    };
}

/// 片段的边界情况, 对应 (precedes, follows)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryCase {
    /// (false, false): 两侧都可能延续到窗口外
    Unbounded,
    /// (false, true): 尾部是真实边界, 头部延续自窗口前
    TailBounded,
    /// (true, true): 完整的单词
    Enclosed,
    /// (true, false): 头部是真实边界, 尾部延续到窗口后
    HeadBounded,
}

impl BoundaryCase {
    pub fn classify(precedes: bool, follows: bool) -> Self {
        match (precedes, follows) {
            (false, false) => BoundaryCase::Unbounded,
            (false, true) => BoundaryCase::TailBounded,
            (true, true) => BoundaryCase::Enclosed,
            (true, false) => BoundaryCase::HeadBounded,
        }
    }
}

/// 窗口中以空格分隔的一个片段
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment<'w> {
    /// 原始片段 (含标点)
    pub raw: &'w str,
    /// 在窗口中的起始位置
    pub start: usize,
    pub precedes: bool,
    pub follows: bool,
}

impl<'w> Fragment<'w> {
    pub fn case(&self) -> BoundaryCase {
        BoundaryCase::classify(self.precedes, self.follows)
    }

    /// 去掉首尾标点后用于查字典的部分
    pub fn word(&self) -> &'w str {
        strip_punctuation(self.raw)
    }
}

/// 去掉首尾的允许标点
pub fn strip_punctuation(s: &str) -> &str {
    s.trim_matches(|c: char| c.is_ascii() && is_punctuation(c as u8))
}

/// 检查字符集并切分片段, 含非法字节时返回 None
pub fn fragments(window: &[u8], edges: Edges) -> Option<Vec<Fragment<'_>>> {
    if !window.iter().all(|&b| is_allowed_byte(b)) {
        return None;
    }
    let text = std::str::from_utf8(window).ok()?;

    let mut found = Vec::new();
    let mut offset = 0;
    for raw in text.split(' ') {
        let start = offset;
        let end = start + raw.len();
        offset = end + 1;
        if raw.is_empty() {
            continue;
        }

        let precedes = if start == 0 { edges.leading } else { window[start - 1] == b' ' };
        let follows = if end == window.len() {
            edges.trailing
        } else {
            window[end] == b' '
        };
        found.push(Fragment {
            raw,
            start,
            precedes,
            follows,
        });
    }
    Some(found)
}

/// 窗口校验器, 借用只读字典索引
#[derive(Debug, Clone, Copy)]
pub struct Validator<'a> {
    oracle: &'a AffixIndex,
}

impl<'a> Validator<'a> {
    pub fn new(oracle: &'a AffixIndex) -> Self {
        Self { oracle }
    }

    /// 单个片段是否通过其边界情况对应的检查
    pub fn fragment_passes(&self, fragment: &Fragment<'_>) -> bool {
        let word = fragment.word();
        if word.is_empty() {
            // pure punctuation
            return true;
        }
        match fragment.case() {
            BoundaryCase::Unbounded => self.oracle.suffix_count(word) > 0,
            BoundaryCase::TailBounded => self.oracle.reverse_suffix_count(word) > 0,
            BoundaryCase::Enclosed => self.oracle.contains_word(word),
            BoundaryCase::HeadBounded => self.oracle.prefix_count(word) > 0,
        }
    }

    /// 校验窗口, 通过时返回切分出的片段
    pub fn check<'w>(&self, window: &'w [u8], edges: Edges) -> Option<Vec<Fragment<'w>>> {
        let found = fragments(window, edges)?;
        found
            .iter()
            .all(|f| self.fragment_passes(f))
            .then_some(found)
    }

    /// 只关心是否通过
    pub fn is_plausible(&self, window: &[u8], edges: Edges) -> bool {
        self.check(window, edges).is_some()
    }
}
