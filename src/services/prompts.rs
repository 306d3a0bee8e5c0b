//! 提示词模板
//!
//! 代码生成（首次 / 带反馈重试）和题解生成的提示词都在这里

use crate::models::{Attempt, ProblemStatement};
use phf::phf_map;
use std::fmt::Write;

/// 平台语言标识 → 可读名称
static LANGUAGE_NAMES: phf::Map<&'static str, &'static str> = phf_map! {
    "py3" => "Python 3",
    "cpp17-gcc" => "C++17",
    "cpp17-clang" => "C++17",
    "cpp20-gcc" => "C++20",
    "cpp14-gcc" => "C++14",
    "cpp11-gcc" => "C++11",
    "c11-gcc" => "C11",
    "java" => "Java",
    "cs" => "C#",
    "rb" => "Ruby",
    "go" => "Go",
    "rs" => "Rust",
    "js" => "JavaScript",
    "kt" => "Kotlin",
    "pas" => "Pascal",
    "kj" => "Karel (Java)",
    "kp" => "Karel (Pascal)",
};

/// 语言的可读名称，未知语言原样返回
pub fn language_name(language: &str) -> &str {
    LANGUAGE_NAMES.get(language).copied().unwrap_or(language)
}

/// 是否为已知的语言标识（命令行用来判断最后一个参数是不是语言）
pub fn is_known_language(tag: &str) -> bool {
    LANGUAGE_NAMES.contains_key(tag)
}

pub const CODE_SYSTEM_PROMPT: &str = "You are an expert competitive programmer with extensive \
experience in algorithmic problem solving: data structures, dynamic programming, graph theory, \
number theory, geometry, string algorithms, greedy algorithms and divide and conquer. \
You write correct, efficient solutions that read from standard input and write to standard output.";

pub const EDITORIAL_SYSTEM_PROMPT: &str = "You are an experienced competitive programming coach \
who writes clear, educational editorials. You explain the key insight first, then the algorithm, \
then the implementation, always grounded in the accepted solution you are given.";

/// 代码生成提示词，`prior` 为上一次失败的尝试
pub fn code_generation_prompt(
    statement: &ProblemStatement,
    language: &str,
    prior: Option<&Attempt>,
) -> String {
    let lang = language_name(language);
    let mut prompt = String::new();

    let _ = writeln!(prompt, "Generate a working solution for this programming problem.\n");
    push_statement(&mut prompt, statement);

    let _ = writeln!(prompt, "Requirements:");
    let _ = writeln!(prompt, "- Language: {} ({})", lang, language);
    let _ = writeln!(prompt, "- The solution must be correct and efficient; mind the time and memory limits");
    let _ = writeln!(prompt, "- Handle every edge case mentioned in the statement");
    let _ = writeln!(prompt, "- Read input and print output exactly as specified");
    let _ = writeln!(prompt, "- Use appropriate data structures and algorithms");

    if let Some(prior) = prior {
        let _ = writeln!(prompt);
        let _ = writeln!(prompt, "IMPORTANT: your previous solution failed.");
        let _ = writeln!(
            prompt,
            "Previous verdict: {}, Score: {}",
            prior.verdict, prior.score
        );
        if !prior.feedback.trim().is_empty() {
            let _ = writeln!(prompt, "Feedback: {}", prior.feedback.trim());
        }
        let _ = writeln!(prompt, "\nPrevious code that failed (fix this code):");
        let _ = writeln!(prompt, "```{}\n{}\n```", language, prior.source.trim_end());
        let _ = writeln!(prompt, "\nAnalyze why it failed before rewriting:");
        let _ = writeln!(prompt, "- TLE: use a faster algorithm or faster I/O");
        let _ = writeln!(prompt, "- WA: re-check the logic, overflow, edge cases and output format");
        let _ = writeln!(prompt, "- RTE: check array bounds, recursion depth and division by zero");
        let _ = writeln!(prompt, "- CE: make sure the code compiles for {}", lang);
    }

    let _ = writeln!(
        prompt,
        "\nProvide ONLY the complete source code, without explanations or markdown formatting."
    );
    prompt
}

/// 题解生成提示词
pub fn editorial_prompt(statement: &ProblemStatement, accepted: &Attempt, language: &str) -> String {
    let mut prompt = String::new();

    let _ = writeln!(prompt, "Write an editorial for this programming problem.\n");
    push_statement(&mut prompt, statement);

    let _ = writeln!(
        prompt,
        "Working solution in {} (verdict: {}):",
        language_name(language),
        accepted.verdict
    );
    let _ = writeln!(prompt, "```{}\n{}\n```\n", language, accepted.source.trim_end());

    prompt.push_str(
        "The editorial must contain these sections:\n\
         1. **Problem Understanding**: what is asked, key constraints, input/output format\n\
         2. **Solution Approach**: the main algorithm or technique and why it works\n\
         3. **Implementation Details**: key points, edge cases, common pitfalls\n\
         4. **Complexity Analysis**: time and space complexity against the constraints\n\
         5. **Code Walkthrough**: how each part of the working solution contributes\n\
         6. **Alternative Approaches** (if applicable): other ways and their trade-offs\n\n\
         Format it as clear markdown with headers, written to help contestants learn.\n",
    );
    prompt
}

fn push_statement(prompt: &mut String, statement: &ProblemStatement) {
    let _ = writeln!(prompt, "Problem: {}\n", statement.title);
    let _ = writeln!(prompt, "Statement:\n{}\n", statement.statement.trim());
    if !statement.input_format.is_empty() {
        let _ = writeln!(prompt, "Input format:\n{}\n", statement.input_format);
    }
    if !statement.output_format.is_empty() {
        let _ = writeln!(prompt, "Output format:\n{}\n", statement.output_format);
    }
    if !statement.constraints.is_empty() {
        let _ = writeln!(prompt, "Constraints:\n{}\n", statement.constraints);
    }
    for (i, sample) in statement.samples.iter().enumerate() {
        let _ = writeln!(
            prompt,
            "Sample {} input:\n{}\nSample {} output:\n{}\n",
            i + 1,
            sample.input,
            i + 1,
            sample.output
        );
    }
}
