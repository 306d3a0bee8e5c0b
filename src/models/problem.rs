use std::fmt;

/// 待处理的题目引用
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProblemRef {
    /// 平台上的题目别名
    pub alias: String,
    /// 指定语言，None 时使用配置中的默认语言
    pub language: Option<String>,
}

impl ProblemRef {
    pub fn new(alias: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            language: None,
        }
    }

    pub fn with_language(alias: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            language: Some(language.into()),
        }
    }

    /// 实际使用的语言
    pub fn language_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.language.as_deref().unwrap_or(default)
    }
}

impl fmt::Display for ProblemRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.language {
            Some(lang) => write!(f, "{} ({})", self.alias, lang),
            None => write!(f, "{}", self.alias),
        }
    }
}

/// 样例输入输出
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SamplePair {
    pub input: String,
    pub output: String,
}

/// 题目详情，每次流程只拉取一次，之后只读
#[derive(Debug, Clone, Default)]
pub struct ProblemStatement {
    pub alias: String,
    pub title: String,
    /// 完整题面（markdown）
    pub statement: String,
    /// 输入格式说明
    pub input_format: String,
    /// 输出格式说明
    pub output_format: String,
    /// 数据范围与时空限制
    pub constraints: String,
    pub samples: Vec<SamplePair>,
}
