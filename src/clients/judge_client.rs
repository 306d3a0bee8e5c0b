//! 评测平台 API 客户端
//!
//! 封装所有与评测平台（omegaUp 兼容接口）相关的调用：
//! 拉题、提交、查询评测结果、上传题解、拉取精选题目列表。
//! 登录凭证的生命周期也由这里负责。

use crate::clients::statement_parser::parse_problem_details;
use crate::config::Config;
use crate::error::JudgeError;
use crate::models::{ProblemStatement, Verdict};
use async_trait::async_trait;
use reqwest::{header, Method, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// 提交后的句柄
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionHandle {
    pub guid: String,
    pub language: String,
}

/// 一次查询的结果
#[derive(Debug, Clone, PartialEq)]
pub enum PollStatus {
    /// 还在排队或评测中
    Pending,
    /// 评测结束
    Finished {
        verdict: Verdict,
        feedback: String,
        score: f64,
    },
}

/// 分页游标
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageToken {
    /// 第几页（从 1 开始，仅用于日志）
    pub page: usize,
    pub offset: usize,
    pub page_size: usize,
}

impl PageToken {
    pub fn first(page_size: usize) -> Self {
        Self {
            page: 1,
            offset: 0,
            page_size,
        }
    }

    pub fn next(self) -> Self {
        Self {
            page: self.page + 1,
            offset: self.offset + self.page_size,
            page_size: self.page_size,
        }
    }
}

/// 一页题目列表，`next` 为 None 表示已到末尾
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingPage {
    pub aliases: Vec<String>,
    pub next: Option<PageToken>,
}

/// 评测平台能力
#[async_trait]
pub trait JudgeApi: Send + Sync {
    async fn fetch_problem(&self, alias: &str) -> Result<ProblemStatement, JudgeError>;

    async fn submit_solution(
        &self,
        alias: &str,
        language: &str,
        source: &str,
    ) -> Result<SubmissionHandle, JudgeError>;

    async fn poll_verdict(&self, handle: &SubmissionHandle) -> Result<PollStatus, JudgeError>;

    /// 返回平台是否接受了题解
    async fn upload_editorial(&self, alias: &str, editorial: &str) -> Result<bool, JudgeError>;

    async fn list_quality_problems(&self, token: PageToken) -> Result<ListingPage, JudgeError>;
}

/// omegaUp 客户端
pub struct OmegaUpClient {
    http: reqwest::Client,
    api_url: String,
    username: String,
    password: String,
    /// 登录后拿到的 auth_token，作为 `ouat` cookie 发送
    auth_token: RwLock<Option<String>>,
}

impl OmegaUpClient {
    /// 创建新的客户端（不会立即登录）
    pub fn new(config: &Config) -> Result<Self, JudgeError> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(60))
            .user_agent(concat!("ai-editorial/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| JudgeError::request_failed("client", e))?;

        Ok(Self {
            http,
            api_url: config.omegaup_api_url.trim_end_matches('/').to_string(),
            username: config.omegaup_username.clone(),
            password: config.omegaup_password.clone(),
            auth_token: RwLock::new(None),
        })
    }

    /// 登录并保存 auth_token
    pub async fn login(&self) -> Result<(), JudgeError> {
        let endpoint = "user/login";
        info!("🔐 正在登录评测平台: {}", self.username);

        let params = [
            ("usernameOrEmail", self.username.as_str()),
            ("password", self.password.as_str()),
        ];
        let (status, body) = self.send(Method::POST, endpoint, &params, None).await?;

        if body.get("status").and_then(Value::as_str) != Some("ok") {
            return Err(JudgeError::Unauthorized {
                endpoint: endpoint.to_string(),
                message: error_message(&body).unwrap_or_else(|| format!("HTTP {}", status)),
            });
        }

        let token = body
            .get("auth_token")
            .and_then(Value::as_str)
            .ok_or_else(|| JudgeError::missing_field(endpoint, "auth_token"))?;

        *self.auth_token.write().await = Some(token.to_string());
        info!("✓ 登录成功");
        Ok(())
    }

    /// 带登录态调用并检查接口状态
    async fn call(
        &self,
        method: Method,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<Value, JudgeError> {
        let (status, body) = self.call_raw(method, endpoint, params).await?;
        check_ok(endpoint, status, body)
    }

    /// 带登录态调用，凭证失效时重新登录一次再重试，不检查接口状态
    async fn call_raw(
        &self,
        method: Method,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<(StatusCode, Value), JudgeError> {
        if self.auth_token.read().await.is_none() {
            self.login().await?;
        }

        let token = self.auth_token.read().await.clone();
        let (status, body) = self
            .send(method.clone(), endpoint, params, token.as_deref())
            .await?;
        if !is_unauthorized(status, &body) {
            return Ok((status, body));
        }

        warn!("⚠️ 登录已失效 ({}), 正在重新登录...", endpoint);
        *self.auth_token.write().await = None;
        self.login().await?;

        let token = self.auth_token.read().await.clone();
        let (status, body) = self.send(method, endpoint, params, token.as_deref()).await?;
        if is_unauthorized(status, &body) {
            return Err(JudgeError::Unauthorized {
                endpoint: endpoint.to_string(),
                message: error_message(&body).unwrap_or_else(|| format!("HTTP {}", status)),
            });
        }
        Ok((status, body))
    }

    /// 发送一次请求，返回 HTTP 状态码和 JSON
    async fn send(
        &self,
        method: Method,
        endpoint: &str,
        params: &[(&str, &str)],
        token: Option<&str>,
    ) -> Result<(StatusCode, Value), JudgeError> {
        let url = format!("{}/{}", self.api_url, endpoint);
        debug!("{} {}", method, url);

        let mut request = self.http.request(method.clone(), &url);
        request = if method == Method::GET {
            request.query(params)
        } else {
            request.form(params)
        };
        if let Some(token) = token {
            request = request.header(header::COOKIE, format!("ouat={}", token));
        }

        let response = request
            .send()
            .await
            .map_err(|e| JudgeError::request_failed(endpoint, e))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| JudgeError::request_failed(endpoint, e))?;

        let body = serde_json::from_str(&text).map_err(|source| JudgeError::JsonParseFailed {
            endpoint: endpoint.to_string(),
            source,
        })?;

        Ok((status, body))
    }
}

#[async_trait]
impl JudgeApi for OmegaUpClient {
    async fn fetch_problem(&self, alias: &str) -> Result<ProblemStatement, JudgeError> {
        let body = self
            .call(Method::GET, "problem/details", &[("problem_alias", alias)])
            .await?;
        parse_problem_details(alias, &body)
    }

    async fn submit_solution(
        &self,
        alias: &str,
        language: &str,
        source: &str,
    ) -> Result<SubmissionHandle, JudgeError> {
        let params = [
            ("problem_alias", alias),
            ("language", language),
            ("source", source),
        ];

        let (status, body) = self.call_raw(Method::POST, "run/create", &params).await?;
        parse_submission(language, status, body)
    }

    async fn poll_verdict(&self, handle: &SubmissionHandle) -> Result<PollStatus, JudgeError> {
        let body = self
            .call(Method::GET, "run/status", &[("run_alias", handle.guid.as_str())])
            .await?;
        parse_run_status(&handle.guid, &body)
    }

    async fn upload_editorial(&self, alias: &str, editorial: &str) -> Result<bool, JudgeError> {
        let message = format!(
            "Updated editorial via AI editorial pipeline on {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        );
        let params = [
            ("problem_alias", alias),
            ("solution", editorial),
            ("message", message.as_str()),
            ("lang", "markdown"),
        ];

        match self.call(Method::POST, "problem/updateSolution", &params).await {
            Ok(_) => Ok(true),
            Err(JudgeError::BadResponse { message, .. }) => {
                warn!("[题目 {}] 平台拒绝了题解: {:?}", alias, message);
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    async fn list_quality_problems(&self, token: PageToken) -> Result<ListingPage, JudgeError> {
        let offset = token.offset.to_string();
        let rowcount = token.page_size.to_string();
        let params = [
            ("only_quality_seal", "true"),
            ("offset", offset.as_str()),
            ("rowcount", rowcount.as_str()),
            ("order_by", "problem_id"),
            ("sort_order", "asc"),
        ];

        let body = self.call(Method::GET, "problem/list", &params).await?;
        parse_listing(&body, token)
    }
}

// ========== 响应解析 ==========

/// 解析 `run/status` 响应
pub fn parse_run_status(guid: &str, body: &Value) -> Result<PollStatus, JudgeError> {
    let endpoint = "run/status";
    let returned = body
        .get("guid")
        .and_then(Value::as_str)
        .ok_or_else(|| JudgeError::missing_field(endpoint, "guid"))?;
    if returned != guid {
        return Err(JudgeError::bad_response(
            endpoint,
            None,
            Some(format!("guid 不匹配: 期望 {}, 实际 {}", guid, returned)),
        ));
    }

    let status = body.get("status").and_then(Value::as_str).unwrap_or("unknown");
    match status {
        "ready" | "done" | "error" | "compile_error" => {
            let code = body.get("verdict").and_then(Value::as_str).unwrap_or_default();
            let verdict = if status == "compile_error" && code.is_empty() {
                Verdict::CompileError
            } else {
                Verdict::from_judge_code(code)
            };
            let feedback = ["execution", "output", "compile_error"]
                .iter()
                .filter_map(|key| body.get(*key).and_then(Value::as_str))
                .find(|text| !text.trim().is_empty())
                .unwrap_or_default()
                .to_string();
            let score = body.get("score").and_then(Value::as_f64).unwrap_or(0.0);

            Ok(PollStatus::Finished {
                verdict,
                feedback,
                score,
            })
        }
        _ => Ok(PollStatus::Pending),
    }
}

/// 解析 `run/create` 响应，语言不被接受时返回 `LanguageNotSupported`
pub fn parse_submission(
    language: &str,
    status: StatusCode,
    body: Value,
) -> Result<SubmissionHandle, JudgeError> {
    let endpoint = "run/create";
    if let Some(err) = language_rejection(language, &body) {
        return Err(err);
    }
    let body = check_ok(endpoint, status, body)?;

    let guid = body
        .get("guid")
        .and_then(Value::as_str)
        .ok_or_else(|| JudgeError::missing_field(endpoint, "guid"))?;

    if let Some(delay) = body.get("submit_delay").and_then(Value::as_u64) {
        if delay > 0 {
            info!("平台提示提交间隔: {} 分钟", delay);
        }
    }

    Ok(SubmissionHandle {
        guid: guid.to_string(),
        language: language.to_string(),
    })
}

/// 解析 `problem/list` 响应
pub fn parse_listing(body: &Value, token: PageToken) -> Result<ListingPage, JudgeError> {
    let results = body
        .get("results")
        .and_then(Value::as_array)
        .ok_or_else(|| JudgeError::missing_field("problem/list", "results"))?;

    let aliases: Vec<String> = results
        .iter()
        .filter_map(|item| item.get("alias").and_then(Value::as_str))
        .map(str::to_string)
        .collect();

    let next = if results.is_empty() || results.len() < token.page_size {
        None
    } else {
        Some(token.next())
    };

    Ok(ListingPage { aliases, next })
}

fn check_ok(endpoint: &str, status: StatusCode, body: Value) -> Result<Value, JudgeError> {
    // run/status 的 status 字段是评测状态，带错误信息的 "error" 才是接口失败
    let api_failed = body.get("status").and_then(Value::as_str) == Some("error")
        && (body.get("error").is_some() || body.get("errorcode").is_some());
    if status.is_success() && !api_failed {
        return Ok(body);
    }
    Err(JudgeError::bad_response(
        endpoint,
        Some(status.as_u16()),
        error_message(&body),
    ))
}

fn is_unauthorized(status: StatusCode, body: &Value) -> bool {
    status == StatusCode::UNAUTHORIZED
        || body.get("errorcode").and_then(Value::as_u64) == Some(401)
        || body.get("errorname").and_then(Value::as_str) == Some("loginRequired")
}

fn error_message(body: &Value) -> Option<String> {
    let error = body.get("error").and_then(Value::as_str);
    let name = body.get("errorname").and_then(Value::as_str);
    match (name, error) {
        (Some(name), Some(error)) => Some(format!("{}: {}", name, error)),
        (None, Some(error)) => Some(error.to_string()),
        (Some(name), None) => Some(name.to_string()),
        (None, None) => None,
    }
}

/// 平台用 `parameter` 字段指出被拒绝的参数
fn language_rejection(language: &str, body: &Value) -> Option<JudgeError> {
    let rejected = body.get("errorname").and_then(Value::as_str) == Some("parameterNotInExpectedSet")
        && body.get("parameter").and_then(Value::as_str) == Some("language");
    rejected.then(|| JudgeError::LanguageNotSupported {
        language: language.to_string(),
        allowed: body
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
    })
}
