/// 日志工具模块
///
/// 提供日志初始化、日志文件和格式化输出的辅助函数
use crate::error::FileError;
use std::fs::{self, OpenOptions};
use std::io::Write;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// 初始化 tracing
///
/// 优先使用 `RUST_LOG`，否则 verbose 时为 debug，默认 info
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .try_init();
}

/// 初始化日志文件（覆盖旧文件）
///
/// # 参数
/// - `log_file_path`: 日志文件路径
/// - `title`: 本次运行的标题
pub fn init_log_file(log_file_path: &str, title: &str) -> Result<(), FileError> {
    let log_header = format!(
        "{}\n{} - {}\n{}\n\n",
        "=".repeat(60),
        title,
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header).map_err(|e| FileError::write_failed(log_file_path, e))
}

/// 向日志文件追加一行
pub fn append_log_line(log_file_path: &str, line: &str) -> Result<(), FileError> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)
        .map_err(|e| FileError::write_failed(log_file_path, e))?;
    writeln!(file, "{}", line).map_err(|e| FileError::write_failed(log_file_path, e))
}

/// 记录程序启动信息
///
/// # 参数
/// - `mode`: 运行模式说明
/// - `language`: 默认语言
pub fn log_startup(mode: &str, language: &str) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - {}", mode);
    info!("💻 默认语言: {}", language);
    info!("{}", "=".repeat(60));
}

/// 记录题目加载信息
pub fn log_problems_loaded(total: usize, delay_secs: u64) {
    info!("✓ 找到 {} 道待处理的题目", total);
    if total > 1 {
        info!("💡 逐题顺序处理，每题之间间隔 {} 秒\n", delay_secs);
    }
}

/// 记录单题开始信息
pub fn log_item_start(index: usize, total: usize, label: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📦 开始处理第 {}/{} 题: {}", index, total, label);
    info!("{}", "=".repeat(60));
}

/// 记录单题完成信息
pub fn log_item_complete(index: usize, total: usize, summary: &str) {
    info!("\n{}", "─".repeat(60));
    info!("✓ 进度 {}/{}: {}", index, total, summary);
    info!("{}", "─".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度（按字符计）
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("短文本", 10), "短文本");
        assert_eq!(truncate_text("Límites de tiempo", 6), "Límite...");
    }

    #[test]
    fn test_log_file_header_and_append() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output.txt");
        let path = path.to_str().unwrap();

        init_log_file(path, "题解流水线日志").unwrap();
        append_log_line(path, "aplusb | accepted-first-try").unwrap();

        let content = fs::read_to_string(path).unwrap();
        assert!(content.starts_with(&"=".repeat(60)));
        assert!(content.contains("题解流水线日志 - "));
        assert!(content.ends_with("aplusb | accepted-first-try\n"));
    }
}
