//! 错误类型
//!
//! 分两类：
//! - 系统/API 错误（本文件中的所有类型）
//! - 评测机返回的非 AC 结果不是错误，而是正常的业务结果（见 `models::Verdict`）

use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 评测平台 API 错误
    #[error("评测平台错误: {0}")]
    Judge(#[from] JudgeError),
    /// LLM 服务错误
    #[error("LLM错误: {0}")]
    Llm(#[from] LlmError),
    /// 单题流程错误
    #[error("流程错误: {0}")]
    Pipeline(#[from] PipelineError),
    /// 题目列表拉取错误
    #[error("题目发现错误: {0}")]
    Listing(#[from] ListingError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// 评测平台 API 错误
#[derive(Debug, Error)]
pub enum JudgeError {
    /// 网络请求失败
    #[error("API请求失败 ({endpoint}): {source}")]
    RequestFailed {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    /// 平台返回 status != ok
    #[error("API返回错误响应 ({endpoint}): status={status:?}, error={message:?}")]
    BadResponse {
        endpoint: String,
        status: Option<u16>,
        message: Option<String>,
    },
    /// 登录失效且重新登录后仍被拒绝
    #[error("认证失败 ({endpoint}): {message}")]
    Unauthorized { endpoint: String, message: String },
    /// 题目不支持所选语言
    #[error("题目不支持语言 {language}，可用语言: {allowed}")]
    LanguageNotSupported { language: String, allowed: String },
    /// JSON 解析失败
    #[error("JSON解析失败 ({endpoint}): {source}")]
    JsonParseFailed {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
    /// 响应缺少必要字段
    #[error("响应缺少字段 ({endpoint}): {field}")]
    MissingField { endpoint: String, field: String },
}

impl JudgeError {
    /// 是否为凭证失效
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, JudgeError::Unauthorized { .. })
    }
}

/// LLM 服务错误
#[derive(Debug, Error)]
pub enum LlmError {
    /// 请求构建失败
    #[error("LLM 请求构建失败: {0}")]
    RequestBuild(String),
    /// API 调用失败
    #[error("LLM API调用失败 (模型: {model}): {message}")]
    ApiCallFailed { model: String, message: String },
    /// 返回内容为空
    #[error("LLM返回内容为空 (模型: {model})")]
    EmptyContent { model: String },
}

/// 单题流程中的系统错误，每个阶段一种
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("获取题目失败: {0}")]
    Fetch(#[source] JudgeError),
    #[error("生成代码失败: {0}")]
    Generation(#[source] LlmError),
    #[error("提交代码失败: {0}")]
    Submit(#[source] JudgeError),
    #[error("查询评测结果失败: {0}")]
    Poll(#[source] JudgeError),
    #[error("评测超时: 已轮询 {attempts} 次仍未出结果")]
    PollExhausted { attempts: u32 },
    #[error("上传题解失败: {0}")]
    Upload(#[source] JudgeError),
}

impl PipelineError {
    /// 是否为凭证失效（决定批量任务是否提前终止）
    pub fn is_auth_failure(&self) -> bool {
        match self {
            PipelineError::Fetch(e)
            | PipelineError::Submit(e)
            | PipelineError::Poll(e)
            | PipelineError::Upload(e) => e.is_unauthorized(),
            _ => false,
        }
    }
}

/// 题目列表拉取错误，对题目发现是终止性的
#[derive(Debug, Error)]
pub enum ListingError {
    #[error("拉取第 {page} 页失败: {source}")]
    PageFailed {
        page: usize,
        #[source]
        source: JudgeError,
    },
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    #[error("文件不存在: {path}")]
    NotFound { path: String },
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 必填配置缺失
    #[error("缺少必填配置 {var_name}")]
    Missing { var_name: String },
}

// ========== 便捷构造函数 ==========

impl JudgeError {
    /// 创建请求失败错误
    pub fn request_failed(endpoint: impl Into<String>, source: reqwest::Error) -> Self {
        JudgeError::RequestFailed {
            endpoint: endpoint.into(),
            source,
        }
    }

    /// 创建错误响应
    pub fn bad_response(
        endpoint: impl Into<String>,
        status: Option<u16>,
        message: Option<String>,
    ) -> Self {
        JudgeError::BadResponse {
            endpoint: endpoint.into(),
            status,
            message,
        }
    }

    /// 创建字段缺失错误
    pub fn missing_field(endpoint: impl Into<String>, field: impl Into<String>) -> Self {
        JudgeError::MissingField {
            endpoint: endpoint.into(),
            field: field.into(),
        }
    }
}

impl FileError {
    /// 创建文件读取错误
    pub fn read_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        FileError::ReadFailed {
            path: path.into(),
            source,
        }
    }

    /// 创建文件写入错误
    pub fn write_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        FileError::WriteFailed {
            path: path.into(),
            source,
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
