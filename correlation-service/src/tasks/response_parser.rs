use async_trait::async_trait;
use task_flow::{Context, NextAction, Result, Task, TaskResult};

use super::context_keys;
use crate::models::AnalysisResult;

/// Parse `Key: value` lines into a normalized mapping.
///
/// Only the first colon splits a line, lines without a colon are dropped,
/// and a repeated key keeps its last value.
pub fn parse_analysis(text: &str) -> AnalysisResult {
    let mut result = AnalysisResult::new();

    for line in text.split('\n') {
        if let Some((key, value)) = line.split_once(':') {
            result.insert(normalize_key(key), value.trim().to_string());
        }
    }

    result
}

fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase().replace(' ', "_")
}

pub struct ParseResponseTask;

#[async_trait]
impl Task for ParseResponseTask {
    async fn run(&self, context: Context) -> Result<TaskResult> {
        let response_text: String = context.require(context_keys::RESPONSE_TEXT).await?;
        let analysis = parse_analysis(&response_text);

        let status = format!("Parsed {} analysis fields", analysis.len());
        context.set(context_keys::ANALYSIS_RESULT, analysis).await?;

        Ok(TaskResult::new_with_status(None, NextAction::End, Some(status)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(result: &AnalysisResult, key: &str) -> Option<String> {
        result.get(key).cloned()
    }

    #[test]
    fn parses_the_standard_reply() {
        let result =
            parse_analysis("Discrepancy: Yes\nSummary: X\nDiagnostic Explanation: Y");

        let expected: AnalysisResult = [
            ("discrepancy", "Yes"),
            ("summary", "X"),
            ("diagnostic_explanation", "Y"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        assert_eq!(result, expected);
    }

    #[test]
    fn colon_free_lines_yield_nothing() {
        assert!(parse_analysis("").is_empty());
        assert!(parse_analysis("no colon here\nnor here\n\n").is_empty());
    }

    #[test]
    fn only_the_first_colon_splits() {
        let result = parse_analysis("Note: ratio 3:2 observed\nTime: 10:30");

        assert_eq!(entry(&result, "note").as_deref(), Some("ratio 3:2 observed"));
        assert_eq!(entry(&result, "time").as_deref(), Some("10:30"));
    }

    #[test]
    fn later_duplicate_wins() {
        let result = parse_analysis("Summary: first\nsummary: second");

        assert_eq!(result.len(), 1);
        assert_eq!(entry(&result, "summary").as_deref(), Some("second"));
    }

    #[test]
    fn keys_and_values_are_normalized() {
        let result = parse_analysis("  Follow Up Plan  :   repeat CT in 3 months \r\nignored");

        assert_eq!(
            entry(&result, "follow_up_plan").as_deref(),
            Some("repeat CT in 3 months")
        );
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn keys_keep_reply_order() {
        let result = parse_analysis("Summary: a\nDiscrepancy: No\nSummary: b\nAction: none");

        let keys: Vec<&str> = result.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["summary", "discrepancy", "action"]);
        assert_eq!(entry(&result, "summary").as_deref(), Some("b"));
    }

    #[test]
    fn blank_key_is_kept() {
        let result = parse_analysis(": orphan value");

        assert_eq!(entry(&result, "").as_deref(), Some("orphan value"));
    }

    #[tokio::test]
    async fn task_stores_mapping_and_ends_pipeline() {
        let context = Context::new();
        context
            .set(context_keys::RESPONSE_TEXT, "Discrepancy: No")
            .await
            .unwrap();

        let result = ParseResponseTask.run(context.clone()).await.unwrap();

        assert_eq!(result.next_action, NextAction::End);
        let analysis: AnalysisResult = context.require(context_keys::ANALYSIS_RESULT).await.unwrap();
        assert_eq!(entry(&analysis, "discrepancy").as_deref(), Some("No"));
    }

    #[tokio::test]
    async fn order_survives_the_context() {
        let context = Context::new();
        context
            .set(context_keys::RESPONSE_TEXT, "Zeta: 1\nAlpha: 2\nMid: 3")
            .await
            .unwrap();

        ParseResponseTask.run(context.clone()).await.unwrap();

        let analysis: AnalysisResult = context.require(context_keys::ANALYSIS_RESULT).await.unwrap();
        let keys: Vec<&str> = analysis.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }
}
