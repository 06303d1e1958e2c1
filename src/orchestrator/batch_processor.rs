//! 批量文档处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责批量文档的处理和资源管理。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：写日志文件表头、加载生成配置、创建题目生成器
//! 2. **批量加载**：扫描输入目录中的所有文档
//! 3. **并发控制**：使用 Semaphore 限制并发数量
//! 4. **分批处理**：每批完成后再开始下一批
//! 5. **结果输出**：每个文档写一个 `<文件名>.json`
//! 6. **全局统计**：汇总所有文档的处理结果
//!
//! 单个文档的失败（格式不支持、无法解析、写文件失败）只影响它自己。

use crate::config::Config;
use crate::error::AppError;
use crate::models::{
    AnswerKeyEntry, GeneratedQuestion, GenerationConfig, GenerationMetadata, SourceDocument,
};
use crate::orchestrator::question_orchestrator::Orchestrator;
use crate::services::{GeneratorInfo, Ingestor, QuestionGenerator};
use crate::utils::logging::{
    finish_run, init_log_file, log_batch_complete, log_batch_start, log_run_plan, BatchWindow,
    RunStats,
};
use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

/// 应用主结构
pub struct App {
    config: Config,
    ingestor: Ingestor,
    orchestrator: Arc<Orchestrator<QuestionGenerator>>,
    generation_config: Arc<GenerationConfig>,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        // 初始化日志文件
        init_log_file(&config.output_log_file)
            .with_context(|| format!("无法创建日志文件: {}", config.output_log_file))?;

        let generator = QuestionGenerator::from_config(&config);
        info!("🧠 生成模式: {}", generator.mode().as_str());

        let generation_config =
            crate::models::load_generation_config(Path::new(&config.generation_config_path))
                .await?;

        if generation_config.total_requested() == 0 {
            warn!("⚠️ 生成配置中所有题型数量均为 0，只会输出摄取结果");
        }

        Ok(Self {
            ingestor: Ingestor::from_config(&config),
            orchestrator: Arc::new(
                Orchestrator::new(generator).with_verbose_logging(config.verbose_logging),
            ),
            generation_config: Arc::new(generation_config),
            config,
        })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<()> {
        let all_documents = self.load_documents().await?;

        if all_documents.is_empty() {
            warn!("⚠️ 没有找到待处理的文档，程序结束");
            return Ok(());
        }

        tokio::fs::create_dir_all(&self.config.output_folder)
            .await
            .with_context(|| format!("无法创建输出目录: {}", self.config.output_folder))?;

        log_run_plan(
            self.orchestrator.source().mode().as_str(),
            all_documents.len(),
            self.max_concurrent(),
        );

        let stats = self.process_all_documents(all_documents).await?;

        finish_run(&stats, &self.config.output_log_file)
            .with_context(|| format!("无法写入日志文件: {}", self.config.output_log_file))?;

        Ok(())
    }

    /// 加载文档
    async fn load_documents(&self) -> Result<Vec<SourceDocument>> {
        info!("\n📁 正在扫描待处理的文档...");
        crate::models::load_all_documents(&self.config.input_folder).await
    }

    fn max_concurrent(&self) -> usize {
        self.config.max_concurrent_files.max(1)
    }

    /// 处理所有文档
    async fn process_all_documents(
        &self,
        all_documents: Vec<SourceDocument>,
    ) -> Result<RunStats> {
        let max_concurrent = self.max_concurrent();
        let semaphore = Arc::new(Semaphore::new(max_concurrent));
        let total_documents = all_documents.len();
        let mut stats = RunStats::default();

        let mut remaining = all_documents.into_iter().peekable();
        let mut batch_start = 0;

        // 分批处理
        while remaining.peek().is_some() {
            let batch: Vec<SourceDocument> = remaining.by_ref().take(max_concurrent).collect();
            let window =
                BatchWindow::new(batch_start, batch.len(), max_concurrent, total_documents);
            log_batch_start(&window);

            let batch_stats = self
                .process_batch(batch, batch_start, semaphore.clone())
                .await?;

            log_batch_complete(&window, &batch_stats);
            stats.absorb(batch_stats);
            batch_start = window.last_document;
        }

        Ok(stats)
    }

    /// 处理单个批次
    async fn process_batch(
        &self,
        batch: Vec<SourceDocument>,
        batch_start: usize,
        semaphore: Arc<Semaphore>,
    ) -> Result<RunStats> {
        let mut batch_handles = Vec::new();

        for (idx, document) in batch.into_iter().enumerate() {
            let document_index = batch_start + idx + 1;
            let permit = semaphore.clone().acquire_owned().await?;

            let ingestor = self.ingestor.clone();
            let orchestrator = self.orchestrator.clone();
            let generation_config = self.generation_config.clone();
            let output_folder = PathBuf::from(&self.config.output_folder);

            let handle = tokio::spawn(async move {
                let _permit = permit;
                let filename = document.filename.clone();
                match process_document(
                    document,
                    ingestor,
                    &orchestrator,
                    &generation_config,
                    &output_folder,
                )
                .await
                {
                    Ok(count) => {
                        info!("[文档 {}] ✓ {} 完成，生成 {} 道题", document_index, filename, count);
                        Ok(count)
                    }
                    Err(e) => {
                        error!("[文档 {}] ❌ {} 处理失败: {:#}", document_index, filename, e);
                        Err(e)
                    }
                }
            });
            batch_handles.push((document_index, handle));
        }

        // 等待本批所有任务完成
        let mut stats = RunStats::default();

        for (document_index, handle) in batch_handles {
            match handle.await {
                Ok(Ok(count)) => stats.record_success(count),
                Ok(Err(_)) => stats.record_failure(),
                Err(e) => {
                    error!("[文档 {}] 任务执行失败: {}", document_index, e);
                    stats.record_failure();
                }
            }
        }

        Ok(stats)
    }
}

/// 写入 `<文件名>.json` 的内容
#[derive(Debug, Serialize)]
struct QuestionBank<'a> {
    source_file: &'a str,
    #[serde(flatten)]
    metadata: &'a GenerationMetadata,
    difficulty: u8,
    key_concepts: &'a [String],
    generator: GeneratorInfo,
    questions: &'a [GeneratedQuestion],
    answer_key: &'a [AnswerKeyEntry],
}

/// 处理单个文档：摄取 → 出题 → 写 JSON，返回生成的题目数
async fn process_document(
    document: SourceDocument,
    ingestor: Ingestor,
    orchestrator: &Orchestrator<QuestionGenerator>,
    generation_config: &GenerationConfig,
    output_folder: &Path,
) -> Result<usize> {
    let output_path = output_path_for(output_folder, &document.filename);
    let filename = document.filename.clone();

    // 解析 PDF / DOCX 是 CPU 密集型操作
    let processed = tokio::task::spawn_blocking(move || {
        ingestor.process_file(&document.bytes, &document.filename)
    })
    .await
    .context("摄取任务异常退出")??;

    info!(
        "📄 {}: {} 个文本块，关键概念: {}",
        filename,
        processed.chunks.len(),
        processed.key_concepts.join(", ")
    );

    let mut rng = StdRng::from_entropy();
    let result = orchestrator
        .generate_questions(&processed.chunks, generation_config, &mut rng)
        .await;

    let bank = QuestionBank {
        source_file: &filename,
        metadata: &generation_config.metadata,
        difficulty: generation_config.difficulty,
        key_concepts: &processed.key_concepts,
        generator: orchestrator.source().info(),
        questions: result.questions(),
        answer_key: result.answer_key(),
    };
    let json = serde_json::to_string_pretty(&bank)?;

    tokio::fs::write(&output_path, json)
        .await
        .map_err(|e| AppError::file_write_failed(output_path.display().to_string(), e))?;

    Ok(result.len())
}

/// `notes.pdf` → `<输出目录>/notes.json`
fn output_path_for(output_folder: &Path, filename: &str) -> PathBuf {
    let stem = Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(filename);
    output_folder.join(format!("{}.json", stem))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GeneratorMode, QuestionType};
    use docx_rs::{Docx, Paragraph, Run};
    use std::io::Cursor;

    fn docx_bytes(text: &str) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        Docx::new()
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text(text)))
            .build()
            .pack(&mut cursor)
            .unwrap();
        cursor.into_inner()
    }

    #[test]
    fn test_output_path_for() {
        let folder = Path::new("out");
        assert_eq!(output_path_for(folder, "notes.pdf"), folder.join("notes.json"));
        assert_eq!(output_path_for(folder, "a.b.docx"), folder.join("a.b.json"));
    }

    #[tokio::test]
    async fn test_app_processes_folder_and_isolates_failures() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let work = tempfile::tempdir().unwrap();

        std::fs::write(
            input.path().join("planets.docx"),
            docx_bytes("Mars is the fourth planet from the Sun. Jupiter is the largest planet."),
        )
        .unwrap();
        std::fs::write(input.path().join("broken.docx"), b"not a docx").unwrap();
        std::fs::write(input.path().join("notes.txt"), b"plain text").unwrap();

        let generation_config_path = work.path().join("generation.toml");
        std::fs::write(&generation_config_path, "num_mcq = 2\nnum_true_false = 1\ntitle = \"Planets\"\n")
            .unwrap();

        let config = Config {
            generator_mode: GeneratorMode::RuleBased,
            input_folder: input.path().to_string_lossy().into_owned(),
            output_folder: output.path().to_string_lossy().into_owned(),
            generation_config_path: generation_config_path.to_string_lossy().into_owned(),
            output_log_file: work.path().join("run.log").to_string_lossy().into_owned(),
            max_concurrent_files: 2,
            ..Config::default()
        };

        let app = App::initialize(config).await.unwrap();
        app.run().await.unwrap();

        let written = std::fs::read_to_string(output.path().join("planets.json")).unwrap();
        let bank: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(bank["title"], "Planets");
        assert_eq!(bank["generator"]["mode"], "rule-based");
        assert_eq!(bank["questions"].as_array().unwrap().len(), 3);
        assert_eq!(bank["answer_key"].as_array().unwrap().len(), 3);
        assert_eq!(bank["questions"][0]["type"], QuestionType::Mcq.as_str());

        assert!(!output.path().join("broken.json").exists());
        assert!(!output.path().join("notes.json").exists());

        let log = std::fs::read_to_string(work.path().join("run.log")).unwrap();
        assert!(log.contains("✅ 成功: 1/3"));
        assert!(log.contains("📝 共生成题目: 3"));
    }
}
