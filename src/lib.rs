//! cribdrag - 多次一密 (many-time pad) 自动 crib-dragging
//!
//! 对同一密钥流加密的多条密文, 用分级词典中的每个单词在每个偏移处
//! 做假设, 只保留使其余所有密文都解出合理文本的放置.

pub mod attack;
pub mod config;
pub mod dictionary;
pub mod error;
pub mod input;
pub mod refine;
pub mod report;
pub mod search;
pub mod trie;
pub mod validator;
pub mod xor;

pub use attack::{Attack, AttackOptions, AttackOutcome};
pub use config::Config;
pub use error::{CribError, Result};
