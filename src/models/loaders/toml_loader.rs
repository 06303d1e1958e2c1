use crate::error::ConfigError;
use crate::models::generation_config::GenerationConfig;
use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs;

/// 从 TOML 文件加载题目数量配置
///
/// 文件不存在时返回默认配置（所有题型数量为 0）
pub async fn load_generation_config(toml_file_path: &Path) -> Result<GenerationConfig> {
    if !toml_file_path.exists() {
        tracing::warn!(
            "生成配置文件不存在: {}，使用默认配置",
            toml_file_path.display()
        );
        return Ok(GenerationConfig::default());
    }

    let content = fs::read_to_string(toml_file_path)
        .await
        .with_context(|| format!("无法读取TOML文件: {}", toml_file_path.display()))?;

    let config = parse_generation_config(&content)
        .with_context(|| format!("无法解析TOML文件: {}", toml_file_path.display()))?;

    tracing::info!(
        "成功加载生成配置: 共请求 {} 道题，难度 {}",
        config.total_requested(),
        config.difficulty
    );

    Ok(config)
}

/// 解析 TOML 文本
pub fn parse_generation_config(content: &str) -> Result<GenerationConfig, ConfigError> {
    let config: GenerationConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}
