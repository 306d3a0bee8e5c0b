//! 单题流程的产物

use super::verdict::Verdict;
use std::fmt;

/// 一次提交尝试，评测结果确定后不再修改
#[derive(Debug, Clone)]
pub struct Attempt {
    /// 第几次尝试（1 或 2）
    pub ordinal: u8,
    pub source: String,
    pub verdict: Verdict,
    /// 评测机反馈（执行信息、编译错误等），重试时提供给 LLM
    pub feedback: String,
    pub score: f64,
}

/// 结果分类，每个 `PipelineOutcome` 恰好属于其中一类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutcomeCategory {
    AcceptedFirstTry,
    AcceptedSecondTry,
    NoAccept,
    SystemError,
}

impl fmt::Display for OutcomeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            OutcomeCategory::AcceptedFirstTry => "accepted-first-try",
            OutcomeCategory::AcceptedSecondTry => "accepted-second-try",
            OutcomeCategory::NoAccept => "no-accept",
            OutcomeCategory::SystemError => "system-error",
        };
        f.write_str(label)
    }
}

/// 单题流程的最终结果，每次调用恰好产生一个
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub alias: String,
    pub language: String,
    /// 最后一次确定的评测结果，没有任何评测结果时为 None
    pub final_verdict: Option<Verdict>,
    pub accepted: bool,
    /// 已开始的尝试次数（0、1 或 2）
    pub attempt_count: u8,
    /// 已拿到评测结果的尝试
    pub attempts: Vec<Attempt>,
    /// 最后一次生成的代码
    pub source: Option<String>,
    /// 仅在 AC 且题解生成成功时存在
    pub editorial: Option<String>,
    pub editorial_uploaded: bool,
    /// 系统/API 错误原因
    pub error: Option<String>,
    /// 错误是否由凭证失效引起
    pub auth_failure: bool,
}

impl PipelineOutcome {
    pub fn category(&self) -> OutcomeCategory {
        if self.error.is_some() {
            OutcomeCategory::SystemError
        } else if self.accepted && self.attempt_count <= 1 {
            OutcomeCategory::AcceptedFirstTry
        } else if self.accepted {
            OutcomeCategory::AcceptedSecondTry
        } else {
            OutcomeCategory::NoAccept
        }
    }

    /// 一行摘要，用于日志和报告
    pub fn summary_line(&self) -> String {
        let verdict = self
            .final_verdict
            .map(|v| v.to_string())
            .unwrap_or_else(|| "-".to_string());
        let mut line = format!(
            "{} | {} | attempts={} | verdict={} | editorial_uploaded={}",
            self.alias,
            self.category(),
            self.attempt_count,
            verdict,
            self.editorial_uploaded
        );
        if let Some(err) = &self.error {
            line.push_str(&format!(" | cause={}", err));
        }
        line
    }
}
