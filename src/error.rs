//! 错误类型定义 - 统一的错误处理

use thiserror::Error;

/// cribdrag 统一错误类型
#[derive(Error, Debug)]
pub enum CribError {
    /// IO 错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// 配置错误
    #[error("Config error: {0}")]
    Config(String),

    /// JSON 解析错误
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// 密文格式错误 (行号从 1 开始)
    #[error("Invalid ciphertext on line {line}: {reason}")]
    InputFormat { line: usize, reason: String },

    /// 密文数量不足
    #[error("Need at least two ciphertexts, found {found}")]
    InsufficientCiphertexts { found: usize },

    /// 密文长度不一致
    #[error("Ciphertext #{index} is {found} bytes long, expected {expected}")]
    LengthMismatch {
        index: usize,
        expected: usize,
        found: usize,
    },

    /// 字典索引内部错误
    #[error("Dictionary oracle error: {0}")]
    Oracle(String),

    /// 线程池创建失败
    #[error("Worker pool error: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

impl CribError {
    /// 是否只是提示性错误 (不应以失败状态退出)
    pub fn is_informational(&self) -> bool {
        matches!(self, CribError::InsufficientCiphertexts { .. })
    }
}

/// cribdrag Result 类型别名
pub type Result<T> = std::result::Result<T, CribError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_informational_errors() {
        assert!(CribError::InsufficientCiphertexts { found: 1 }.is_informational());
        assert!(!CribError::Config("bad".into()).is_informational());
        assert!(!CribError::LengthMismatch {
            index: 1,
            expected: 8,
            found: 7
        }
        .is_informational());
    }

    #[test]
    fn test_error_messages() {
        let err = CribError::LengthMismatch {
            index: 2,
            expected: 10,
            found: 9,
        };
        assert_eq!(err.to_string(), "Ciphertext #2 is 9 bytes long, expected 10");

        let err = CribError::InputFormat {
            line: 3,
            reason: "odd number of hex digits".into(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid ciphertext on line 3: odd number of hex digits"
        );
    }
}
