//! cribdrag - 主程序入口

use clap::Parser;
use cribdrag::dictionary::load_tiers;
use cribdrag::input::read_ciphertexts;
use cribdrag::report::format_report;
use cribdrag::{Attack, AttackOptions, Config, CribError};
use log::{error, info};
use std::path::PathBuf;
use std::process;

/// Many-time-pad crib dragger
#[derive(Parser, Debug)]
#[command(name = "cribdrag")]
#[command(version)]
#[command(about = "Recover plaintext fragments from ciphertexts that share a keystream", long_about = None)]
struct Args {
    /// JSON 配置文件路径
    #[arg(short, long, alias = "json-config")]
    config: Option<PathBuf>,

    /// 密文文件 (每行一条 hex 或二进制)
    #[arg(short = 'i', long)]
    ciphertexts: Option<PathBuf>,

    /// 词典分级文件, 可重复, 按顺序扫描
    #[arg(short, long = "tier")]
    tiers: Vec<PathBuf>,

    /// worker 数量, 0 表示按 CPU 数
    #[arg(short, long)]
    workers: Option<usize>,

    /// 最短候选词长度 (不低于 3)
    #[arg(long)]
    min_len: Option<usize>,

    /// 报告中展示的匹配数
    #[arg(long)]
    top: Option<usize>,

    /// 以 JSON 输出全部结果
    #[arg(long, default_value_t = false)]
    json: bool,
}

impl Args {
    fn into_config(self) -> cribdrag::Result<(Config, bool)> {
        let mut config = match &self.config {
            Some(path) => Config::load_from_file(path)?,
            None => Config::default(),
        };
        if let Some(path) = self.ciphertexts {
            config.ciphertexts = path;
        }
        if !self.tiers.is_empty() {
            config.dictionary_tiers = self.tiers;
        }
        if let Some(workers) = self.workers {
            config.set_workers(workers);
        }
        if let Some(len) = self.min_len {
            config.set_min_crib_len(len);
        }
        if let Some(top) = self.top {
            config.report_limit = top;
        }
        config.validate()?;
        Ok((config, self.json))
    }
}

fn run(config: &Config, json: bool) -> cribdrag::Result<()> {
    let ciphertexts = read_ciphertexts(&config.ciphertexts)?;
    if ciphertexts.len() < 2 {
        return Err(CribError::InsufficientCiphertexts {
            found: ciphertexts.len(),
        });
    }

    info!(
        "Loaded {} ciphertexts from {}",
        ciphertexts.len(),
        config.ciphertexts.display()
    );
    for (idx, ct) in ciphertexts.iter().enumerate() {
        info!("   {}. Ciphertext #{}, length={} bytes", idx + 1, idx + 1, ct.len());
    }

    let tiers = load_tiers(&config.dictionary_tiers)?;
    let options = AttackOptions {
        workers: config.workers(),
        min_crib_len: config.min_crib_len(),
    };
    let outcome = Attack::new(&ciphertexts, tiers, options)?.run()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        println!("{}", format_report(&outcome, config.report_limit));
    }
    Ok(())
}

fn main() {
    // 初始化日志
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(Some(env_logger::TimestampPrecision::Seconds))
        .init();

    let (config, json) = match Args::parse().into_config() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load config: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run(&config, json) {
        if e.is_informational() {
            info!("{}. Exiting.", e);
            return;
        }
        error!("{}", e);
        process::exit(1);
    }
}
