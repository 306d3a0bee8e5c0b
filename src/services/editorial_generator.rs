//! 题解生成服务 - 业务能力层

use crate::clients::CompletionClient;
use crate::error::LlmError;
use crate::models::{Attempt, ProblemStatement};
use crate::services::prompts;
use async_trait::async_trait;
use tracing::info;

/// 题解生成能力，基于已通过的代码
#[async_trait]
pub trait EditorialGenerator: Send + Sync {
    async fn generate_editorial(
        &self,
        statement: &ProblemStatement,
        accepted: &Attempt,
        language: &str,
    ) -> Result<String, LlmError>;
}

pub struct EditorialService<C> {
    client: C,
}

impl<C: CompletionClient> EditorialService<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }
}

#[async_trait]
impl<C: CompletionClient> EditorialGenerator for EditorialService<C> {
    async fn generate_editorial(
        &self,
        statement: &ProblemStatement,
        accepted: &Attempt,
        language: &str,
    ) -> Result<String, LlmError> {
        info!("[题目 {}] 📝 正在生成题解...", statement.alias);

        let prompt = prompts::editorial_prompt(statement, accepted, language);
        let editorial = self
            .client
            .complete(prompts::EDITORIAL_SYSTEM_PROMPT, &prompt)
            .await?
            .trim()
            .to_string();

        if editorial.is_empty() {
            return Err(LlmError::EmptyContent {
                model: "editorial".to_string(),
            });
        }

        info!(
            "[题目 {}] ✓ 题解已生成 ({} 字符)",
            statement.alias,
            editorial.len()
        );
        Ok(editorial)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Verdict;
    use std::sync::Mutex;

    struct RecordingClient {
        systems: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl CompletionClient for RecordingClient {
        async fn complete(&self, system: &str, _user: &str) -> Result<String, LlmError> {
            self.systems.lock().unwrap().push(system.to_string());
            Ok("  # Problem Understanding\n...\n".to_string())
        }
    }

    #[tokio::test]
    async fn test_generate_editorial_uses_editorial_prompt() {
        let service = EditorialService::new(RecordingClient {
            systems: Mutex::new(Vec::new()),
        });
        let accepted = Attempt {
            ordinal: 1,
            source: "print(1)".into(),
            verdict: Verdict::Accepted,
            feedback: String::new(),
            score: 1.0,
        };

        let editorial = service
            .generate_editorial(&ProblemStatement::default(), &accepted, "py3")
            .await
            .unwrap();

        assert!(editorial.starts_with("# Problem Understanding"));
        assert_eq!(
            service.client.systems.lock().unwrap().as_slice(),
            [prompts::EDITORIAL_SYSTEM_PROMPT.to_string()]
        );
    }
}
