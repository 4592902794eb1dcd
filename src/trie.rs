//! 字典索引模块 - 前缀/后缀/子串查询
//!
//! 正向字典树回答前缀查询, 反向字典树 (单词倒序插入) 回答后缀查询.
//! 所有字符串在建树和查询时都先转为小写.

use crate::error::{CribError, Result};
use std::borrow::Cow;

/// 字典树节点
#[derive(Debug, Default, Clone)]
struct Node {
    /// 子节点, 按字节升序排列
    children: Vec<(u8, u32)>,
    /// 经过该节点的单词数
    words: u32,
    /// 是否为某个单词的结尾
    terminal: bool,
}

impl Node {
    fn child(&self, byte: u8) -> Option<usize> {
        self.children
            .binary_search_by_key(&byte, |&(b, _)| b)
            .ok()
            .map(|pos| self.children[pos].1 as usize)
    }
}

/// 基于数组存储的字节字典树
#[derive(Debug, Clone)]
pub(crate) struct Trie {
    nodes: Vec<Node>,
}

impl Default for Trie {
    fn default() -> Self {
        Self::new()
    }
}

impl Trie {
    pub(crate) fn new() -> Self {
        Self {
            nodes: vec![Node::default()],
        }
    }

    /// 插入一个键, 已存在时返回 false 且不改变计数
    pub(crate) fn insert<I>(&mut self, key: I) -> bool
    where
        I: IntoIterator<Item = u8>,
        I::IntoIter: Clone,
    {
        let key = key.into_iter();
        if self.walk(key.clone()).is_some_and(|idx| self.nodes[idx].terminal) {
            return false;
        }

        let mut current = 0;
        for byte in key {
            current = match self.nodes[current].child(byte) {
                Some(next) => next,
                None => {
                    let next = self.nodes.len();
                    self.nodes.push(Node::default());
                    let children = &mut self.nodes[current].children;
                    let pos = children.partition_point(|&(b, _)| b < byte);
                    children.insert(pos, (byte, next as u32));
                    next
                }
            };
            self.nodes[current].words += 1;
        }
        self.nodes[current].terminal = true;
        true
    }

    /// 沿键走到对应节点
    fn walk<I: IntoIterator<Item = u8>>(&self, key: I) -> Option<usize> {
        let mut current = 0;
        for byte in key {
            current = self.nodes[current].child(byte)?;
        }
        Some(current)
    }

    /// 以该键为路径前缀的单词数, 空键返回 0
    pub(crate) fn count<I: IntoIterator<Item = u8>>(&self, key: I) -> usize {
        match self.walk(key) {
            Some(0) | None => 0,
            Some(idx) => self.nodes[idx].words as usize,
        }
    }

    pub(crate) fn contains<I: IntoIterator<Item = u8>>(&self, key: I) -> bool {
        matches!(self.walk(key), Some(idx) if idx != 0 && self.nodes[idx].terminal)
    }

    /// 路径是否存在 (不要求是单词结尾)
    pub(crate) fn has_path<I: IntoIterator<Item = u8>>(&self, key: I) -> bool {
        self.walk(key).is_some()
    }

    /// 收集以 `key` 开头的最多 `limit` 个完整键 (按字节序)
    pub(crate) fn collect<I: IntoIterator<Item = u8>>(&self, key: I, limit: usize) -> Vec<Vec<u8>> {
        let mut path: Vec<u8> = Vec::new();
        let mut start = 0;
        for byte in key {
            match self.nodes[start].child(byte) {
                Some(next) => {
                    path.push(byte);
                    start = next;
                }
                None => return Vec::new(),
            }
        }
        if start == 0 {
            return Vec::new();
        }

        let mut found = Vec::new();
        self.collect_from(start, &mut path, limit, &mut found);
        found
    }

    fn collect_from(&self, idx: usize, path: &mut Vec<u8>, limit: usize, found: &mut Vec<Vec<u8>>) {
        if found.len() >= limit {
            return;
        }
        let node = &self.nodes[idx];
        if node.terminal {
            found.push(path.clone());
        }
        for &(byte, child) in &node.children {
            if found.len() >= limit {
                return;
            }
            path.push(byte);
            self.collect_from(child as usize, path, limit, found);
            path.pop();
        }
    }

    pub(crate) fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

/// 小写归一化, 已是小写时不分配
pub(crate) fn normalize(s: &str) -> Cow<'_, str> {
    if s.chars().any(char::is_uppercase) {
        Cow::Owned(s.to_lowercase())
    } else {
        Cow::Borrowed(s)
    }
}

/// 字典词缀索引 (Dictionary Oracle)
///
/// 构建完成后只读, 可在多个 worker 之间共享引用.
#[derive(Debug, Clone)]
pub struct AffixIndex {
    forward: Trie,
    backward: Trie,
    words: usize,
}

impl AffixIndex {
    /// 从词表构建索引, 重复 (忽略大小写) 的单词只计一次
    pub fn build<I, S>(words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut forward = Trie::new();
        let mut backward = Trie::new();
        let mut count = 0;

        for word in words {
            let word = normalize(word.as_ref().trim()).into_owned();
            if word.is_empty() {
                continue;
            }
            if forward.insert(word.bytes()) {
                backward.insert(word.bytes().rev());
                count += 1;
            }
        }

        if count == 0 {
            return Err(CribError::Oracle("cannot build an index from an empty word list".into()));
        }

        log::debug!(
            "Affix index: {} words, {} forward nodes, {} backward nodes",
            count,
            forward.node_count(),
            backward.node_count()
        );

        Ok(Self {
            forward,
            backward,
            words: count,
        })
    }

    /// 索引中的单词数
    pub fn len(&self) -> usize {
        self.words
    }

    pub fn is_empty(&self) -> bool {
        self.words == 0
    }

    /// 精确匹配 (忽略大小写)
    pub fn contains_word(&self, s: &str) -> bool {
        let s = normalize(s);
        self.forward.contains(s.bytes())
    }

    /// 以 `s` 开头的单词数
    pub fn prefix_count(&self, s: &str) -> usize {
        let s = normalize(s);
        self.forward.count(s.bytes())
    }

    /// 以 `s` 结尾的单词数
    pub fn suffix_count(&self, s: &str) -> usize {
        let s = normalize(s);
        self.backward.count(s.bytes().rev())
    }

    /// 窗口尾部片段的结尾检查: `s` 能否作为某个单词的结尾
    ///
    /// 与 [`suffix_count`](Self::suffix_count) 走同一棵反向树.
    pub fn reverse_suffix_count(&self, s: &str) -> usize {
        self.suffix_count(s)
    }

    /// 列出最多 `limit` 个以 `s` 开头的单词
    pub fn words_with_prefix(&self, s: &str, limit: usize) -> Vec<String> {
        let s = normalize(s);
        self.forward
            .collect(s.bytes(), limit)
            .into_iter()
            .filter_map(|bytes| String::from_utf8(bytes).ok())
            .collect()
    }

    /// 列出最多 `limit` 个以 `s` 结尾的单词
    pub fn words_with_suffix(&self, s: &str, limit: usize) -> Vec<String> {
        let s = normalize(s);
        self.backward
            .collect(s.bytes().rev(), limit)
            .into_iter()
            .filter_map(|mut bytes| {
                bytes.reverse();
                String::from_utf8(bytes).ok()
            })
            .collect()
    }
}

/// 子串索引: 插入每个字符串的全部后缀
///
/// `contains_substring(s)` 为真当且仅当 `s` 是某个已插入字符串的子串.
#[derive(Debug, Clone, Default)]
pub struct SubstringIndex {
    suffixes: Trie,
}

impl SubstringIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, s: &str) {
        let s = normalize(s);
        let bytes = s.as_bytes();
        for start in 0..bytes.len() {
            self.suffixes.insert(bytes[start..].iter().copied());
        }
    }

    /// 空串总是任意字符串的子串
    pub fn contains_substring(&self, s: &str) -> bool {
        let s = normalize(s);
        self.suffixes.has_path(s.bytes())
    }
}

impl<S: AsRef<str>> FromIterator<S> for SubstringIndex {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        let mut index = Self::new();
        for s in iter {
            index.insert(s.as_ref());
        }
        index
    }
}
