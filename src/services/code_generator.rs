//! 代码生成服务 - 业务能力层
//!
//! 只负责"根据题面写代码"能力，不关心提交和评测

use crate::clients::CompletionClient;
use crate::error::LlmError;
use crate::models::{Attempt, ProblemStatement};
use crate::services::prompts;
use async_trait::async_trait;
use regex::Regex;
use tracing::{debug, info};

/// 代码生成能力
#[async_trait]
pub trait SolutionGenerator: Send + Sync {
    /// `prior` 为上一次失败的尝试（重试时提供）
    async fn generate_code(
        &self,
        statement: &ProblemStatement,
        language: &str,
        prior: Option<&Attempt>,
    ) -> Result<String, LlmError>;
}

/// 基于 LLM 的代码生成
pub struct CodeGenService<C> {
    client: C,
}

impl<C: CompletionClient> CodeGenService<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }
}

#[async_trait]
impl<C: CompletionClient> SolutionGenerator for CodeGenService<C> {
    async fn generate_code(
        &self,
        statement: &ProblemStatement,
        language: &str,
        prior: Option<&Attempt>,
    ) -> Result<String, LlmError> {
        let ordinal = prior.map_or(1, |p| p.ordinal + 1);
        info!(
            "[题目 {}] 🤖 正在生成 {} 代码 (第 {} 次)...",
            statement.alias,
            prompts::language_name(language),
            ordinal
        );

        let prompt = prompts::code_generation_prompt(statement, language, prior);
        debug!("[题目 {}] 提示词:\n{}", statement.alias, prompt);

        let reply = self
            .client
            .complete(prompts::CODE_SYSTEM_PROMPT, &prompt)
            .await?;
        let code = strip_code_fences(&reply);

        if code.trim().is_empty() {
            return Err(LlmError::EmptyContent {
                model: "code".to_string(),
            });
        }

        info!("[题目 {}] ✓ 代码已生成 ({} 字符)", statement.alias, code.len());
        debug!("[题目 {}] 生成的代码:\n{}", statement.alias, code);
        Ok(code)
    }
}

/// 去掉 LLM 回复中的 markdown 代码块标记
pub fn strip_code_fences(reply: &str) -> String {
    let trimmed = reply.trim();

    if let Ok(re) = Regex::new(r"(?s)```[\w+#.-]*[ \t]*\r?\n(.*?)```") {
        if let Some(code) = re.captures(trimmed).and_then(|cap| cap.get(1)) {
            return code.as_str().trim_end().to_string();
        }
    }

    // 只有开头没有结尾的代码块
    if let Some(rest) = trimmed.strip_prefix("```") {
        let body = rest.split_once('\n').map_or("", |(_, body)| body);
        return body.trim_end().to_string();
    }

    trimmed.to_string()
}
