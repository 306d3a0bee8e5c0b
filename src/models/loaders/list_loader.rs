use crate::error::{AppResult, FileError};
use std::path::Path;
use tokio::fs;

/// 解析题目列表文本：每行一个别名，忽略空行和 `#` 开头的注释行
pub fn parse_problem_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// 从文件加载题目列表
pub async fn load_problem_list(path: &Path) -> AppResult<Vec<String>> {
    if !path.exists() {
        return Err(FileError::NotFound {
            path: path.display().to_string(),
        }
        .into());
    }

    let content = fs::read_to_string(path)
        .await
        .map_err(|e| FileError::read_failed(path.display().to_string(), e))?;

    let aliases = parse_problem_list(&content);
    tracing::info!(
        "从 {} 加载了 {} 道题目",
        path.file_name().unwrap_or_default().to_string_lossy(),
        aliases.len()
    );

    Ok(aliases)
}

/// 保存题目列表，`header` 中每行会以 `# ` 写在文件开头
pub async fn save_problem_list(path: &Path, header: &[String], aliases: &[String]) -> AppResult<()> {
    let mut content = String::new();
    for line in header {
        content.push_str("# ");
        content.push_str(line);
        content.push('\n');
    }
    if !header.is_empty() {
        content.push('\n');
    }
    for alias in aliases {
        content.push_str(alias);
        content.push('\n');
    }

    fs::write(path, content)
        .await
        .map_err(|e| FileError::write_failed(path.display().to_string(), e))?;

    tracing::info!("已保存 {} 道题目到 {}", aliases.len(), path.display());
    Ok(())
}
