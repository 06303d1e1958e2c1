use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

/// 从目录读取的待处理文档
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// 从文件夹中加载所有文件（不过滤扩展名，交给摄取层校验）
///
/// 单个文件读取失败只记录警告，不影响其他文件
pub async fn load_all_documents(folder_path: &str) -> Result<Vec<SourceDocument>> {
    let folder = PathBuf::from(folder_path);

    if !folder.exists() {
        anyhow::bail!("文件夹不存在: {}", folder_path);
    }

    let mut documents = Vec::new();
    let mut entries = fs::read_dir(&folder)
        .await
        .with_context(|| format!("无法读取文件夹: {}", folder_path))?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let filename = file_name_of(&path);
        tracing::info!("正在加载: {}", filename);

        match fs::read(&path).await {
            Ok(bytes) => {
                tracing::debug!("{} 大小: {} 字节", filename, bytes.len());
                documents.push(SourceDocument { filename, bytes });
            }
            Err(e) => {
                tracing::warn!("加载文件失败 {}: {}", path.display(), e);
            }
        }
    }

    // read_dir 的顺序不稳定
    documents.sort_by(|a, b| a.filename.cmp(&b.filename));

    Ok(documents)
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string()
}
