//! 题面解析
//!
//! 把 `problem/details` 返回的 JSON 和 markdown 题面拆成 `ProblemStatement`

use crate::error::JudgeError;
use crate::models::{ProblemStatement, SamplePair};
use serde_json::Value;

const INPUT_HEADINGS: &[&str] = &["entrada", "input"];
const OUTPUT_HEADINGS: &[&str] = &["salida", "output"];
const CONSTRAINT_HEADINGS: &[&str] = &[
    "límites",
    "limites",
    "limits",
    "restricciones",
    "constraints",
    "subtareas",
    "subtasks",
];

/// 解析题目详情
pub fn parse_problem_details(alias: &str, details: &Value) -> Result<ProblemStatement, JudgeError> {
    let markdown = details
        .pointer("/statement/markdown")
        .and_then(Value::as_str)
        .unwrap_or_default();

    if markdown.trim().is_empty() {
        return Err(JudgeError::missing_field("problem/details", "statement.markdown"));
    }

    let title = details
        .get("title")
        .and_then(Value::as_str)
        .unwrap_or(alias)
        .to_string();

    let sections = split_sections(markdown);
    let mut constraints = find_section(&sections, CONSTRAINT_HEADINGS);
    if let Some(limits) = details.pointer("/settings/limits") {
        let limits_text = describe_limits(limits);
        if !limits_text.is_empty() {
            if !constraints.is_empty() {
                constraints.push('\n');
            }
            constraints.push_str(&limits_text);
        }
    }

    Ok(ProblemStatement {
        alias: alias.to_string(),
        title,
        statement: markdown.to_string(),
        input_format: find_section(&sections, INPUT_HEADINGS),
        output_format: find_section(&sections, OUTPUT_HEADINGS),
        constraints,
        samples: parse_samples(markdown),
    })
}

/// 按 markdown 标题切分，返回 (小写标题, 内容)
///
/// 代码块内的行和 `#..#` 这样的网格行不算标题
fn split_sections(markdown: &str) -> Vec<(String, String)> {
    let mut sections = Vec::new();
    let mut heading = String::new();
    let mut body = String::new();
    let mut in_fence = false;

    for line in markdown.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            in_fence = !in_fence;
        }

        match heading_text(trimmed).filter(|_| !in_fence) {
            Some(text) => {
                if !heading.is_empty() || !body.trim().is_empty() {
                    sections.push((heading.clone(), body.trim().to_string()));
                }
                heading = text.to_lowercase();
                body.clear();
            }
            None => {
                body.push_str(line);
                body.push('\n');
            }
        }
    }
    if !heading.is_empty() || !body.trim().is_empty() {
        sections.push((heading, body.trim().to_string()));
    }

    sections
}

/// `#` 到 `######` 后面跟空白才是标题
fn heading_text(line: &str) -> Option<&str> {
    let rest = line.trim_start_matches('#');
    let level = line.len() - rest.len();
    if (1..=6).contains(&level) && rest.starts_with([' ', '\t']) {
        Some(rest.trim().trim_end_matches('#').trim_end())
    } else {
        None
    }
}

fn find_section(sections: &[(String, String)], names: &[&str]) -> String {
    sections
        .iter()
        .filter(|(heading, _)| names.iter().any(|name| heading.starts_with(name)))
        .map(|(_, body)| body.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

/// 解析 `||input ... ||output ... ||end` 样例表
fn parse_samples(markdown: &str) -> Vec<SamplePair> {
    enum Slot {
        Outside,
        Input,
        Output,
        Other,
    }

    let mut samples = Vec::new();
    let mut slot = Slot::Outside;
    let mut input = String::new();
    let mut output = String::new();

    let mut flush = |input: &mut String, output: &mut String| {
        if !input.trim().is_empty() || !output.trim().is_empty() {
            samples.push(SamplePair {
                input: input.trim_end().to_string(),
                output: output.trim_end().to_string(),
            });
        }
        input.clear();
        output.clear();
    };

    for line in markdown.lines() {
        let marker = line.trim();
        if let Some(tag) = marker.strip_prefix("||") {
            match tag.trim().to_lowercase().as_str() {
                "input" => {
                    flush(&mut input, &mut output);
                    slot = Slot::Input;
                }
                "output" => slot = Slot::Output,
                "end" => {
                    flush(&mut input, &mut output);
                    slot = Slot::Outside;
                }
                _ => slot = Slot::Other,
            }
            continue;
        }

        match slot {
            Slot::Input => {
                input.push_str(line);
                input.push('\n');
            }
            Slot::Output => {
                output.push_str(line);
                output.push('\n');
            }
            Slot::Outside | Slot::Other => {}
        }
    }

    samples
}

fn describe_limits(limits: &Value) -> String {
    let mut parts = Vec::new();

    if let Some(time) = limits.get("TimeLimit").and_then(value_as_text) {
        parts.push(format!("Time limit: {}", time));
    }
    if let Some(memory) = limits.get("MemoryLimit") {
        let text = match memory.as_u64() {
            Some(bytes) => format!("{} MiB", bytes / (1024 * 1024)),
            None => value_as_text(memory).unwrap_or_default(),
        };
        if !text.is_empty() {
            parts.push(format!("Memory limit: {}", text));
        }
    }

    parts.join("; ")
}

fn value_as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const MARKDOWN: &str = "# Descripción\n\nSuma dos números.\n\n# Entrada\n\nDos enteros A y B.\n\n# Salida\n\nLa suma.\n\n# Ejemplo\n\n||input\n1 2\n||output\n3\n||input\n5 5\n||output\n10\n||end\n\n# Límites\n\n* 0 ≤ A, B ≤ 10^9\n";

    #[test]
    fn test_parse_sections_and_samples() {
        let details = json!({
            "status": "ok",
            "title": "A más B",
            "statement": { "markdown": MARKDOWN },
            "settings": { "limits": { "TimeLimit": "1s", "MemoryLimit": 33554432 } }
        });

        let statement = parse_problem_details("aplusb", &details).unwrap();
        assert_eq!(statement.title, "A más B");
        assert_eq!(statement.input_format, "Dos enteros A y B.");
        assert_eq!(statement.output_format, "La suma.");
        assert!(statement.constraints.contains("0 ≤ A, B ≤ 10^9"));
        assert!(statement.constraints.contains("Time limit: 1s"));
        assert!(statement.constraints.contains("Memory limit: 32 MiB"));
        assert_eq!(
            statement.samples,
            vec![
                SamplePair {
                    input: "1 2".into(),
                    output: "3".into()
                },
                SamplePair {
                    input: "5 5".into(),
                    output: "10".into()
                },
            ]
        );
    }

    #[test]
    fn test_missing_markdown_is_an_error() {
        let details = json!({ "status": "ok", "title": "x", "statement": {} });
        assert!(matches!(
            parse_problem_details("x", &details),
            Err(JudgeError::MissingField { .. })
        ));
    }

    #[test]
    fn test_grid_and_code_lines_are_not_headings() {
        let markdown = "# Entrada\n\nUna cuadrícula:\n\n#..#\n.##.\n\n```cpp\n#include <cstdio>\n# dentro del bloque\n```\n\n## Salida ##\n\nLa suma.\n";
        let details = json!({ "statement": { "markdown": markdown } });

        let statement = parse_problem_details("grid", &details).unwrap();
        assert!(statement.input_format.contains("#..#"));
        assert!(statement.input_format.contains(".##."));
        assert!(statement.input_format.contains("#include <cstdio>"));
        assert!(statement.input_format.contains("# dentro del bloque"));
        assert_eq!(statement.output_format, "La suma.");
    }

    #[test]
    fn test_heading_detection() {
        assert_eq!(heading_text("# Entrada"), Some("Entrada"));
        assert_eq!(heading_text("### Salida ###"), Some("Salida"));
        assert_eq!(heading_text("#..#"), None);
        assert_eq!(heading_text("#include <bits/stdc++.h>"), None);
        assert_eq!(heading_text("####### demasiados"), None);
    }

    #[test]
    fn test_title_falls_back_to_alias() {
        let details = json!({ "statement": { "markdown": "Just text" } });
        let statement = parse_problem_details("plain", &details).unwrap();
        assert_eq!(statement.title, "plain");
        assert!(statement.samples.is_empty());
        assert!(statement.input_format.is_empty());
    }
}
