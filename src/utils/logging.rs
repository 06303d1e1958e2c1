//! 日志工具模块
//!
//! 提供日志初始化、格式化和输出的辅助函数

use anyhow::Result;
use std::fs;
use std::io::Write;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化 tracing 订阅者
///
/// 优先使用 `RUST_LOG`；未设置时为 `info`，`verbose` 为 true 时为 `debug`。
/// 重复调用不会报错。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 初始化日志文件（写入带时间戳的表头）
pub fn init_log_file(log_file_path: &str) -> Result<()> {
    let log_header = format!(
        "{}\n题目生成日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)?;
    Ok(())
}

/// 文档处理统计（整次运行或单个批次）
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    pub total: usize,
    pub success: usize,
    pub failed: usize,
    pub questions: usize,
}

impl RunStats {
    pub fn record_success(&mut self, questions: usize) {
        self.total += 1;
        self.success += 1;
        self.questions += questions;
    }

    pub fn record_failure(&mut self) {
        self.total += 1;
        self.failed += 1;
    }

    pub fn absorb(&mut self, batch: RunStats) {
        self.total += batch.total;
        self.success += batch.success;
        self.failed += batch.failed;
        self.questions += batch.questions;
    }
}

/// 一个批次覆盖的文档范围（编号从 1 开始）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchWindow {
    pub number: usize,
    pub total_batches: usize,
    pub first_document: usize,
    pub last_document: usize,
    pub total_documents: usize,
}

impl BatchWindow {
    /// 第 `batch_start` 个文档（从 0 开始）起、大小为 `batch_len` 的批次
    pub fn new(
        batch_start: usize,
        batch_len: usize,
        batch_size: usize,
        total_documents: usize,
    ) -> Self {
        let batch_size = batch_size.max(1);
        Self {
            number: batch_start / batch_size + 1,
            total_batches: total_documents.div_ceil(batch_size),
            first_document: batch_start + 1,
            last_document: batch_start + batch_len,
            total_documents,
        }
    }
}

/// 记录本次运行计划
pub fn log_run_plan(generator_mode: &str, documents: usize, max_concurrent: usize) {
    info!("{}", "=".repeat(60));
    info!("🚀 批量文档出题 | 生成模式: {}", generator_mode);
    info!("📋 共 {} 个文档，每批最多 {} 个", documents, max_concurrent);
    info!("{}", "=".repeat(60));
}

pub fn log_batch_start(window: &BatchWindow) {
    info!(
        "📦 第 {}/{} 批: 文档 {}-{} / 共 {} 个",
        window.number,
        window.total_batches,
        window.first_document,
        window.last_document,
        window.total_documents
    );
}

pub fn log_batch_complete(window: &BatchWindow, stats: &RunStats) {
    info!(
        "✓ 第 {} 批完成: 成功 {}/{}，生成 {} 道题",
        window.number, stats.success, stats.total, stats.questions
    );
}

/// 汇总行，同时用于控制台和日志文件
fn summary_lines(stats: &RunStats) -> Vec<String> {
    vec![
        format!(
            "完成时间: {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        ),
        format!("✅ 成功: {}/{}", stats.success, stats.total),
        format!("❌ 失败: {}", stats.failed),
        format!("📝 共生成题目: {}", stats.questions),
    ]
}

/// 输出最终统计，并追加到日志文件末尾
pub fn finish_run(stats: &RunStats, log_file_path: &str) -> Result<()> {
    let lines = summary_lines(stats);

    info!("{}", "=".repeat(60));
    for line in &lines {
        info!("{}", line);
    }
    info!("日志已保存至: {}", log_file_path);

    let mut file = fs::OpenOptions::new().append(true).create(true).open(log_file_path)?;
    writeln!(file, "{}", lines.join("\n"))?;
    Ok(())
}

/// 截断长文本用于日志显示
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
