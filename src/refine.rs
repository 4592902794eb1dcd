//! 匹配精炼模块 - 用其他命中的候选词佐证片段
//!
//! 前缀/后缀检查会放过一些偶然的短串. 一条匹配只有在每个窗口的每个片段
//! 都是某个已命中候选词的子串时才保留.

use crate::search::MatchRecord;
use crate::trie::SubstringIndex;
use crate::validator::strip_punctuation;
use std::collections::BTreeSet;

/// 用已命中候选词集合构建的佐证器
#[derive(Debug, Clone, Default)]
pub struct Refiner {
    index: SubstringIndex,
}

impl Refiner {
    pub fn new(cribs: &BTreeSet<String>) -> Self {
        Self {
            index: cribs.iter().collect(),
        }
    }

    /// 片段是否为某个候选词的子串 (忽略大小写和首尾标点)
    pub fn is_supported(&self, fragment: &str) -> bool {
        let word = strip_punctuation(fragment);
        word.is_empty() || self.index.contains_substring(word)
    }

    /// 匹配的所有片段是否都得到佐证
    pub fn keeps(&self, record: &MatchRecord) -> bool {
        record
            .decryptions
            .iter()
            .all(|d| d.fragments.iter().all(|f| self.is_supported(f)))
    }
}

/// 最终排序: 候选词越长越靠前, 其余字段保证结果确定
pub fn sort_matches(matches: &mut [MatchRecord]) {
    matches.sort_by(|a, b| {
        b.length
            .cmp(&a.length)
            .then_with(|| a.crib.cmp(&b.crib))
            .then_with(|| a.anchor.cmp(&b.anchor))
            .then_with(|| a.start.cmp(&b.start))
    });
}

/// 过滤匹配列表并排序
pub fn refine(matches: Vec<MatchRecord>, cribs: &BTreeSet<String>) -> Vec<MatchRecord> {
    let refiner = Refiner::new(cribs);
    let mut kept: Vec<MatchRecord> = matches.into_iter().filter(|m| refiner.keeps(m)).collect();
    sort_matches(&mut kept);
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::Decryption;

    fn record(crib: &str, anchor: usize, start: usize, windows: &[&str]) -> MatchRecord {
        MatchRecord {
            crib: crib.to_string(),
            anchor,
            start,
            end: start + crib.len(),
            length: crib.len(),
            decryptions: windows
                .iter()
                .enumerate()
                .map(|(i, w)| Decryption {
                    partner: i + 1,
                    pair: format!("x1_{}", i + 2),
                    plaintext: w.to_string(),
                    fragments: w.split_whitespace().map(str::to_string).collect(),
                })
                .collect(),
        }
    }

    fn cribs(words: &[&str]) -> BTreeSet<String> {
        words.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_supported_fragments() {
        let refiner = Refiner::new(&cribs(&["there", "world"]));
        assert!(refiner.is_supported("orl"));
        assert!(refiner.is_supported("Here,"));
        assert!(refiner.is_supported("?"));
        assert!(!refiner.is_supported("xyz"));
    }

    #[test]
    fn test_unsupported_fragment_voids_record() {
        let set = cribs(&["there", "world", "other"]);
        let matches = vec![
            record("there", 0, 3, &["world"]),
            // "qu" is in no corroborated crib
            record("other", 0, 0, &["e qu"]),
            // second window fails even though the first is fine
            record("world", 1, 3, &["there", "zz"]),
        ];

        let refined = refine(matches, &set);
        assert_eq!(refined.len(), 1);
        assert_eq!(refined[0].crib, "there");
        assert_eq!(refined[0].length, 5);
    }

    #[test]
    fn test_refinement_monotonic_and_keeps_exact_cribs() {
        let set = cribs(&["cat", "sat", "there"]);
        let matches = vec![
            record("there", 0, 0, &["cat sat"]),
            record("there", 1, 2, &["cat", "sat"]),
            record("sat", 0, 5, &["qqq"]),
        ];
        let total = matches.len();
        let refined = refine(matches, &set);
        assert!(refined.len() <= total);
        assert_eq!(refined.len(), 2);
    }

    #[test]
    fn test_sorted_by_length_descending() {
        let set = cribs(&["ab", "abc", "abcd"]);
        let matches = vec![
            record("abc", 1, 0, &["ab"]),
            record("abcd", 0, 2, &["abc"]),
            record("abc", 0, 4, &["b"]),
            record("abcde", 0, 0, &["bcd"]),
        ];
        let refined = refine(matches, &set);
        let order: Vec<(&str, usize)> = refined.iter().map(|m| (m.crib.as_str(), m.anchor)).collect();
        assert_eq!(order, vec![("abcde", 0), ("abcd", 0), ("abc", 0), ("abc", 1)]);
    }

    #[test]
    fn test_empty_inputs() {
        assert!(refine(Vec::new(), &BTreeSet::new()).is_empty());
        let refined = refine(vec![record("there", 0, 0, &["the"])], &BTreeSet::new());
        assert!(refined.is_empty());
    }
}
