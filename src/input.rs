//! 密文读取模块 - 每行一条十六进制或二进制密文

use crate::error::{CribError, Result};
use std::fs;
use std::path::Path;

fn format_error(line: usize, reason: impl Into<String>) -> CribError {
    CribError::InputFormat {
        line,
        reason: reason.into(),
    }
}

/// 是否为二进制串: 仅含 0/1 且位数为 8 的倍数
fn binary_digits(s: &str) -> Option<&str> {
    let digits = s
        .strip_prefix("0b")
        .or_else(|| s.strip_prefix("0B"))
        .unwrap_or(s);
    let is_binary = !digits.is_empty()
        && digits.len() % 8 == 0
        && digits.bytes().all(|b| b == b'0' || b == b'1');
    is_binary.then_some(digits)
}

fn decode_binary(digits: &str) -> Vec<u8> {
    digits
        .as_bytes()
        .chunks(8)
        .map(|group| group.iter().fold(0u8, |acc, &bit| (acc << 1) | (bit - b'0')))
        .collect()
}

/// 解析一行密文 (`line_no` 从 1 开始, 仅用于报错)
///
/// 纯 0/1 且长度为 8 的倍数的行按二进制处理, 其余按十六进制 (可带 `0x` 前缀).
pub fn parse_ciphertext_line(line: &str, line_no: usize) -> Result<Vec<u8>> {
    let line = line.trim();
    if line.is_empty() {
        return Err(format_error(line_no, "empty line"));
    }

    if let Some(digits) = binary_digits(line) {
        return Ok(decode_binary(digits));
    }

    let digits = line
        .strip_prefix("0x")
        .or_else(|| line.strip_prefix("0X"))
        .unwrap_or(line);
    if digits.is_empty() {
        return Err(format_error(line_no, "no hex digits after prefix"));
    }
    hex::decode(digits).map_err(|e| format_error(line_no, e.to_string()))
}

/// 解析整个密文文件内容, 跳过空行
pub fn parse_ciphertexts(content: &str) -> Result<Vec<Vec<u8>>> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| parse_ciphertext_line(line, idx + 1))
        .collect()
}

/// 从文件读取密文
pub fn read_ciphertexts<P: AsRef<Path>>(path: P) -> Result<Vec<Vec<u8>>> {
    let content = fs::read_to_string(path)?;
    parse_ciphertexts(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_ciphertext_line("48656c6c6f", 1).unwrap(), b"Hello");
        assert_eq!(parse_ciphertext_line("0x48656C6C6F", 1).unwrap(), b"Hello");
        assert_eq!(parse_ciphertext_line("  0Xff00  ", 1).unwrap(), vec![0xff, 0x00]);
    }

    #[test]
    fn test_parse_binary() {
        assert_eq!(
            parse_ciphertext_line("0100100001101001", 1).unwrap(),
            b"Hi"
        );
        assert_eq!(parse_ciphertext_line("0b11111111", 1).unwrap(), vec![0xff]);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for (bad, line) in [("hello", 4), ("abc", 5), ("0x", 6), ("12g4", 7)] {
            match parse_ciphertext_line(bad, line) {
                Err(CribError::InputFormat { line: got, .. }) => assert_eq!(got, line),
                other => panic!("{:?} should be rejected, got {:?}", bad, other),
            }
        }
    }

    #[test]
    fn test_parse_file_skips_blank_lines() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "6869").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "0110111101101011").unwrap();
        writeln!(file, "   ").unwrap();

        let cts = read_ciphertexts(file.path()).unwrap();
        assert_eq!(cts, vec![b"hi".to_vec(), b"ok".to_vec()]);
    }

    #[test]
    fn test_parse_file_reports_line_number() {
        let err = parse_ciphertexts("6869\n\nzz\n").unwrap_err();
        assert!(matches!(err, CribError::InputFormat { line: 3, .. }));
    }
}
