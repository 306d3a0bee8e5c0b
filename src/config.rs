use crate::error::{AppResult, ConfigError, FileError};
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// 默认配置文件
pub const DEFAULT_CONFIG_FILE: &str = "editorial.toml";

/// 程序配置
///
/// 加载顺序：默认值 → TOML 配置文件（可选）→ 环境变量（含 `.env`）
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    // --- 评测平台配置 ---
    /// API 根地址，例如 `https://omegaup.com/api`
    pub omegaup_api_url: String,
    pub omegaup_username: String,
    pub omegaup_password: String,
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    pub llm_temperature: f32,
    pub llm_max_tokens: u32,
    // --- 流程配置 ---
    /// 默认提交语言
    pub default_language: String,
    /// 两次查询评测结果之间的间隔（秒）
    pub poll_interval_secs: u64,
    /// 最多查询多少次评测结果
    pub max_poll_attempts: u32,
    /// 第二次提交前等待（秒），平台对同一题目的提交有频率限制
    pub retry_submit_delay_secs: u64,
    /// 批量模式下两道题之间的最小间隔（秒）
    pub batch_delay_secs: u64,
    // --- 题目发现 ---
    pub discovery_page_size: usize,
    pub discovery_max_pages: usize,
    // --- 输出 ---
    /// 运行日志文件
    pub output_log_file: String,
    /// 批量报告文件
    pub report_file: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            omegaup_api_url: "https://omegaup.com/api".to_string(),
            omegaup_username: String::new(),
            omegaup_password: String::new(),
            llm_api_key: String::new(),
            llm_api_base_url: "https://api.openai.com/v1".to_string(),
            llm_model_name: "gpt-4o".to_string(),
            llm_temperature: 0.1,
            llm_max_tokens: 4096,
            default_language: "cpp17-gcc".to_string(),
            poll_interval_secs: 3,
            max_poll_attempts: 20,
            retry_submit_delay_secs: 60,
            batch_delay_secs: 60,
            discovery_page_size: 100,
            discovery_max_pages: 20,
            output_log_file: "output.txt".to_string(),
            report_file: "batch_report.txt".to_string(),
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 加载完整配置
    pub fn load() -> AppResult<Self> {
        // .env 不存在不算错误
        let _ = dotenvy::dotenv();

        let path =
            std::env::var("EDITORIAL_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        let base = if Path::new(&path).exists() {
            Self::from_file(&path)?
        } else {
            Self::default()
        };

        Ok(base.with_env_overrides()?)
    }

    /// 从 TOML 文件读取，未出现的字段使用默认值
    pub fn from_file(path: &str) -> AppResult<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| FileError::read_failed(path, e))?;
        let config = toml::from_str(&content).map_err(|source| FileError::TomlParseFailed {
            path: path.to_string(),
            source,
        })?;
        Ok(config)
    }

    /// 用环境变量覆盖
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        Ok(Self {
            omegaup_api_url: env_string("OMEGAUP_API_URL", self.omegaup_api_url),
            omegaup_username: env_string("OMEGAUP_USERNAME", self.omegaup_username),
            omegaup_password: env_string("OMEGAUP_PASSWORD", self.omegaup_password),
            llm_api_key: env_string("LLM_API_KEY", self.llm_api_key),
            llm_api_base_url: env_string("LLM_API_BASE_URL", self.llm_api_base_url),
            llm_model_name: env_string("LLM_MODEL_NAME", self.llm_model_name),
            llm_temperature: env_parse("LLM_TEMPERATURE", self.llm_temperature)?,
            llm_max_tokens: env_parse("LLM_MAX_TOKENS", self.llm_max_tokens)?,
            default_language: env_string("DEFAULT_LANGUAGE", self.default_language),
            poll_interval_secs: env_parse("POLL_INTERVAL_SECS", self.poll_interval_secs)?,
            max_poll_attempts: env_parse("MAX_POLL_ATTEMPTS", self.max_poll_attempts)?,
            retry_submit_delay_secs: env_parse(
                "RETRY_SUBMIT_DELAY_SECS",
                self.retry_submit_delay_secs,
            )?,
            batch_delay_secs: env_parse("BATCH_DELAY_SECS", self.batch_delay_secs)?,
            discovery_page_size: env_parse("DISCOVERY_PAGE_SIZE", self.discovery_page_size)?,
            discovery_max_pages: env_parse("DISCOVERY_MAX_PAGES", self.discovery_max_pages)?,
            output_log_file: env_string("OUTPUT_LOG_FILE", self.output_log_file),
            report_file: env_string("REPORT_FILE", self.report_file),
            verbose_logging: env_parse("VERBOSE_LOGGING", self.verbose_logging)?,
        })
    }

    /// 检查必填项
    pub fn validate(&self) -> Result<(), ConfigError> {
        require("OMEGAUP_USERNAME", &self.omegaup_username)?;
        require("OMEGAUP_PASSWORD", &self.omegaup_password)
    }

    /// 生成代码和题解时额外需要 LLM 密钥
    pub fn validate_llm(&self) -> Result<(), ConfigError> {
        require("LLM_API_KEY", &self.llm_api_key)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn retry_submit_delay(&self) -> Duration {
        Duration::from_secs(self.retry_submit_delay_secs)
    }

    pub fn batch_delay(&self) -> Duration {
        Duration::from_secs(self.batch_delay_secs)
    }
}

fn require(var_name: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Missing {
            var_name: var_name.to_string(),
        });
    }
    Ok(())
}

fn env_string(name: &str, default: String) -> String {
    std::env::var(name).unwrap_or(default)
}

fn env_parse<T: FromStr>(name: &str, default: T) -> Result<T, ConfigError> {
    match std::env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::EnvVarParseFailed {
                var_name: name.to_string(),
                value,
                expected_type: std::any::type_name::<T>().to_string(),
            }),
        Err(_) => Ok(default),
    }
}
