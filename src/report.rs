//! 报告模块 - 将运行结果格式化为文本

use crate::attack::AttackOutcome;
use crate::search::MatchRecord;
use std::fmt::Write;
use std::time::Duration;

/// 格式化持续时间为可读格式
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, secs % 60)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, secs % 60)
    } else {
        format!("{:.2}s", d.as_secs_f64())
    }
}

/// 格式化单条匹配
pub fn format_match(record: &MatchRecord) -> String {
    let mut out = format!(
        "{:?} (len {}) in p{} at [{}:{}]",
        record.crib,
        record.length,
        record.anchor + 1,
        record.start,
        record.end
    );
    for d in &record.decryptions {
        let _ = write!(out, "\n    {} -> p{}: {:?}", d.pair, d.partner + 1, d.plaintext);
    }
    out
}

/// 格式化整体报告, 只展示前 `limit` 条精炼匹配
pub fn format_report(outcome: &AttackOutcome, limit: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Ciphertexts: {} x {} bytes",
        outcome.ciphertexts, outcome.ciphertext_len
    );

    let mut total = Duration::ZERO;
    for tier in &outcome.tiers {
        total += tier.elapsed;
        let _ = writeln!(
            out,
            "Tier {:<20} {:>8} words {:>8} matches {:>6} cribs  {}",
            tier.name,
            tier.words,
            tier.matches,
            tier.cribs,
            format_duration(tier.elapsed)
        );
    }

    let _ = writeln!(
        out,
        "Matches: {} raw, {} refined, {} corroborated cribs ({})",
        outcome.raw_matches,
        outcome.refined.len(),
        outcome.corroborated.len(),
        format_duration(total)
    );

    if outcome.refined.is_empty() {
        out.push_str("No refined matches.");
        return out;
    }

    let shown = limit.min(outcome.refined.len());
    let _ = writeln!(out, "Top {} matches:", shown);
    for (i, record) in outcome.refined.iter().take(shown).enumerate() {
        let _ = writeln!(out, "{:>3}. {}", i + 1, format_match(record));
    }
    out.truncate(out.trim_end().len());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attack::TierSummary;
    use crate::search::Decryption;
    use std::collections::BTreeSet;

    fn sample_match() -> MatchRecord {
        MatchRecord {
            crib: "there".into(),
            anchor: 0,
            start: 3,
            end: 8,
            length: 5,
            decryptions: vec![Decryption {
                partner: 1,
                pair: "x1_2".into(),
                plaintext: "world".into(),
                fragments: vec!["world".into()],
            }],
        }
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(0)), "0.00s");
        assert_eq!(format_duration(Duration::from_millis(2410)), "2.41s");
        assert_eq!(format_duration(Duration::from_secs(63)), "1m 3s");
        assert_eq!(format_duration(Duration::from_secs(3661)), "1h 1m 1s");
    }

    #[test]
    fn test_format_match() {
        assert_eq!(
            format_match(&sample_match()),
            "\"there\" (len 5) in p1 at [3:8]\n    x1_2 -> p2: \"world\""
        );
    }

    #[test]
    fn test_format_report() {
        let outcome = AttackOutcome {
            ciphertexts: 2,
            ciphertext_len: 8,
            tiers: vec![TierSummary {
                name: "english-words.10".into(),
                words: 4,
                matches: 3,
                cribs: 2,
                elapsed: Duration::from_millis(1500),
            }],
            raw_matches: 3,
            corroborated: ["there", "world"].iter().map(|s| s.to_string()).collect(),
            refined: vec![sample_match(), sample_match()],
        };

        let report = format_report(&outcome, 1);
        assert!(report.starts_with("Ciphertexts: 2 x 8 bytes\n"));
        assert!(report.contains("english-words.10"));
        assert!(report.contains("Matches: 3 raw, 2 refined, 2 corroborated cribs (1.50s)"));
        assert!(report.contains("Top 1 matches:"));
        assert_eq!(report.matches("\"there\"").count(), 1);
        assert!(report.ends_with("x1_2 -> p2: \"world\""));
    }

    #[test]
    fn test_format_report_without_matches() {
        let outcome = AttackOutcome {
            ciphertexts: 3,
            ciphertext_len: 10,
            tiers: Vec::new(),
            raw_matches: 0,
            corroborated: BTreeSet::new(),
            refined: Vec::new(),
        };
        assert!(format_report(&outcome, 10).ends_with("No refined matches."));
    }
}
