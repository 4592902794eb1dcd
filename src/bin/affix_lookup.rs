//! 查看词缀索引对某些片段的判断, 用于调试校验结果
//!
//! 用法: affix_lookup <word-list>[,<word-list>...] <fragment>...

use cribdrag::dictionary::load_tiers;
use cribdrag::trie::AffixIndex;
use std::fmt::Write;
use std::process;

const LISTING_LIMIT: usize = 50;

/// 一个片段的四种查询结果, 以及示例单词
fn describe(index: &AffixIndex, fragment: &str) -> String {
    let mut out = format!("== {:?}\n", fragment);
    let _ = writeln!(out, "word:           {}", index.contains_word(fragment));
    let _ = writeln!(out, "prefix:         {}", index.prefix_count(fragment));
    let _ = writeln!(out, "suffix:         {}", index.suffix_count(fragment));
    let _ = writeln!(out, "reverse suffix: {}", index.reverse_suffix_count(fragment));

    let starting = index.words_with_prefix(fragment, LISTING_LIMIT);
    if !starting.is_empty() {
        let _ = writeln!(out, "starting with:  {}", starting.join(" "));
    }
    let ending = index.words_with_suffix(fragment, LISTING_LIMIT);
    if !ending.is_empty() {
        let _ = writeln!(out, "ending with:    {}", ending.join(" "));
    }
    out
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < 2 {
        eprintln!("usage: affix_lookup <word-list>[,<word-list>...] <fragment>...");
        process::exit(2);
    }

    let paths: Vec<&str> = args[0].split(',').filter(|p| !p.is_empty()).collect();
    let tiers = load_tiers(&paths).expect("Failed to load word lists");
    let index = AffixIndex::build(tiers.iter().flat_map(|t| t.words.iter()))
        .expect("Failed to build affix index");
    println!("Loaded {} words from {} lists", index.len(), tiers.len());

    for fragment in &args[1..] {
        println!("\n{}", describe(&index, fragment).trim_end());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_prints_all_four_queries() {
        let index = AffixIndex::build(["sat", "sample", "to", "into"]).unwrap();

        let out = describe(&index, "to");
        assert!(out.contains("word:           true"));
        assert!(out.contains("prefix:         1"));
        assert!(out.contains("suffix:         2"));
        assert!(out.contains("reverse suffix: 2"));
        assert!(out.contains("ending with:"));

        let out = describe(&index, "sa");
        assert!(out.contains("word:           false"));
        assert!(out.contains("prefix:         2"));
        assert!(out.contains("reverse suffix: 0"));
        let starting = out.lines().find(|l| l.starts_with("starting with:")).unwrap();
        assert!(starting.contains("sample") && starting.contains("sat"));
        assert!(!out.contains("ending with:"));
    }
}
