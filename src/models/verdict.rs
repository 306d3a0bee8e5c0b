//! 评测结果

use std::fmt;

/// 评测机给出的结果
///
/// 非 `Accepted` 的结果是正常的业务结果，不是错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    Accepted,
    /// 部分通过，不算 AC
    PartiallyAccepted,
    WrongAnswer,
    TimeLimitExceeded,
    RuntimeError,
    CompileError,
    SystemError,
    /// 仍在评测中
    Pending,
}

impl Verdict {
    /// 从平台返回的缩写解析
    pub fn from_judge_code(code: &str) -> Self {
        match code.trim().to_ascii_uppercase().as_str() {
            "AC" => Verdict::Accepted,
            "PA" => Verdict::PartiallyAccepted,
            "WA" | "PE" => Verdict::WrongAnswer,
            "TLE" => Verdict::TimeLimitExceeded,
            "RTE" | "MLE" | "OLE" | "RFE" => Verdict::RuntimeError,
            "CE" => Verdict::CompileError,
            _ => Verdict::SystemError,
        }
    }

    /// 平台使用的缩写
    pub fn code(self) -> &'static str {
        match self {
            Verdict::Accepted => "AC",
            Verdict::PartiallyAccepted => "PA",
            Verdict::WrongAnswer => "WA",
            Verdict::TimeLimitExceeded => "TLE",
            Verdict::RuntimeError => "RTE",
            Verdict::CompileError => "CE",
            Verdict::SystemError => "JE",
            Verdict::Pending => "PENDING",
        }
    }

    pub fn is_accepted(self) -> bool {
        self == Verdict::Accepted
    }

    pub fn is_terminal(self) -> bool {
        self != Verdict::Pending
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
