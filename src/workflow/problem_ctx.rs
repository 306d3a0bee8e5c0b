//! 题目处理上下文
//!
//! 封装"我正在处理第几道题、哪道题"这一信息

use std::fmt::Display;

/// 题目处理上下文
#[derive(Debug, Clone)]
pub struct ProblemCtx {
    /// 题目别名
    pub alias: String,

    /// 本次使用的语言
    pub language: String,

    /// 在本批中的序号（从1开始，仅用于日志显示）
    pub index: usize,

    /// 本批题目总数
    pub total: usize,
}

impl ProblemCtx {
    pub fn new(alias: impl Into<String>, language: impl Into<String>, index: usize, total: usize) -> Self {
        Self {
            alias: alias.into(),
            language: language.into(),
            index,
            total,
        }
    }

    /// 单题运行时的上下文
    pub fn single(alias: impl Into<String>, language: impl Into<String>) -> Self {
        Self::new(alias, language, 1, 1)
    }
}

impl Display for ProblemCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[题目 {} #{}/{}]", self.alias, self.index, self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let ctx = ProblemCtx::new("sumas", "py3", 2, 5);
        assert_eq!(ctx.to_string(), "[题目 sumas #2/5]");
        assert_eq!(ProblemCtx::single("aplusb", "py3").to_string(), "[题目 aplusb #1/1]");
    }
}
