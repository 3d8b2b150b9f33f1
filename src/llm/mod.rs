//! Summarization boundary.
//!
//! The pipeline consumes text generation through a single capability:
//! summarize one enterprise's product and service offering as an HTML
//! list. Providers must be failure-tolerant collaborators: the importer
//! degrades a failed summarization to an empty string and carries on.

mod qwen;

pub use qwen::QwenClient;

use crate::Result;

/// Trait for summarization providers.
pub trait Summarizer: Send + Sync {
    /// The provider name.
    fn name(&self) -> &'static str;

    /// Summarizes an enterprise's core products and services.
    ///
    /// Returns an HTML unordered list, or empty string when the source
    /// material is too thin to summarize.
    ///
    /// # Errors
    ///
    /// Returns an error if the summarization call fails. Callers on the
    /// import path must contain this error per record.
    fn summarize(
        &self,
        company_name: &str,
        tech_text: &str,
        scope_text: &str,
        intro_text: &str,
    ) -> Result<String>;
}

/// Summarizer that always returns an empty summary.
///
/// Used when enrichment is disabled and in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSummarizer;

impl NoopSummarizer {
    /// Creates a new no-op summarizer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Summarizer for NoopSummarizer {
    fn name(&self) -> &'static str {
        "noop"
    }

    fn summarize(&self, _: &str, _: &str, _: &str, _: &str) -> Result<String> {
        Ok(String::new())
    }
}

/// Builds the summarization prompt for one enterprise.
pub(crate) fn build_prompt(
    company_name: &str,
    tech_text: &str,
    scope_text: &str,
    intro_text: &str,
) -> String {
    format!(
        "你是一名智慧养老行业的资深分析师。请根据以下企业信息，总结该企业的【核心产品与具体服务】。\n\
         \n\
         【输入信息】\n\
         企业名称：{company_name}\n\
         核心技术/产品字段：{tech_text}\n\
         经营范围：{scope_text}\n\
         简介：{intro_text}\n\
         \n\
         【要求】\n\
         1. 输出格式必须是 HTML 的无序列表 (<ul><li>...</li></ul>)。\n\
         2. 提炼出 3-5 个最具代表性的产品或服务项。\n\
         3. 去除废话，语言简练、专业。\n\
         4. 如果信息太少无法总结，请直接返回空字符串。\n\
         5. 不要包含 ```html 这种代码块标记，直接返回 HTML 代码。"
    )
}

/// Strips markdown code-fence markers a model may wrap around its output.
pub(crate) fn strip_code_fences(text: &str) -> String {
    text.replace("```html", "").replace("```", "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_returns_empty() {
        let summarizer = NoopSummarizer::new();
        let result = summarizer.summarize("示例公司", "技术", "范围", "简介");
        assert_eq!(result.ok(), Some(String::new()));
    }

    #[test]
    fn test_prompt_includes_inputs() {
        let prompt = build_prompt("示例公司", "毫米波雷达", "照护服务", "一家公司");
        assert!(prompt.contains("示例公司"));
        assert!(prompt.contains("毫米波雷达"));
        assert!(prompt.contains("<ul><li>"));
    }

    #[test]
    fn test_strip_code_fences() {
        let raw = "```html\n<ul><li>护理</li></ul>\n```";
        assert_eq!(strip_code_fences(raw), "<ul><li>护理</li></ul>");
        assert_eq!(strip_code_fences("plain"), "plain");
    }
}
