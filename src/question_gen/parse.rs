use serde_json::Value;

use crate::error::{QuestionGenError, Result};

use super::SubQuestionList;

/// 截取最后一个输出标记之后的文本
pub fn extract_output<'a>(text: &'a str, marker: &str) -> Result<&'a str> {
    text.rsplit_once(marker)
        .map(|(_, output)| output)
        .ok_or_else(|| QuestionGenError::MarkerNotFound {
            marker: marker.to_string(),
        })
}

/// 从可能带 markdown 代码块的文本中解析 JSON
///
/// 有 ```` ```json ```` 时取其后到下一个 ```` ``` ```` 之间的内容，否则取整段文本。
/// 只解析第一个完整的 JSON 值，之后的内容忽略。
pub fn parse_json_markdown(text: &str) -> Result<Value> {
    let json_str = match text.split_once("```json") {
        Some((_, fenced)) => fenced.split("```").next().unwrap_or(fenced),
        None => text,
    }
    .trim();

    serde_json::Deserializer::from_str(json_str)
        .into_iter::<Value>()
        .next()
        .unwrap_or_else(|| serde_json::from_str::<Value>(json_str))
        .map_err(|source| QuestionGenError::Parse {
            source,
            text: json_str.to_string(),
        })
}

/// 完整解析流程：截取 → JSON → SubQuestionList
pub fn parse_sub_question_list(text: &str, marker: &str) -> Result<SubQuestionList> {
    let output = extract_output(text, marker)?;
    let json = parse_json_markdown(output)?;
    serde_json::from_value(json).map_err(QuestionGenError::Validation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use qgen_types::SubQuestion;

    const MARKER: &str = "<Output>";

    #[test]
    fn test_extract_uses_last_marker() {
        let output = extract_output("<Output>A<Output>{\"x\": 1}", MARKER).unwrap();
        assert_eq!(output, "{\"x\": 1}");
    }

    #[test]
    fn test_extract_missing_marker() {
        let err = extract_output("{\"x\": 1}", MARKER).unwrap_err();
        assert!(matches!(err, QuestionGenError::MarkerNotFound { ref marker } if marker == MARKER));
    }

    #[test]
    fn test_parse_fenced_json() {
        let value = parse_json_markdown("noise\n```json\n{\"a\": [1, 2]}\n```\ntrailing").unwrap();
        assert_eq!(value["a"][1], 2);
    }

    #[test]
    fn test_parse_bare_json_with_trailing_text() {
        let value = parse_json_markdown("\n{\"a\": true}\n\n# Example 3\n<Tools>").unwrap();
        assert_eq!(value["a"], true);
    }

    #[test]
    fn test_parse_trailing_comma() {
        let err = parse_json_markdown("{\"sub_questions\": [],}").unwrap_err();
        assert!(matches!(err, QuestionGenError::Parse { .. }));
    }

    #[test]
    fn test_parse_unterminated_brace() {
        let err = parse_json_markdown("```json\n{\"sub_questions\": [\n```").unwrap_err();
        assert!(matches!(err, QuestionGenError::Parse { .. }));
    }

    #[test]
    fn test_parse_empty() {
        let err = parse_json_markdown("   ").unwrap_err();
        assert!(matches!(err, QuestionGenError::Parse { .. }));
    }

    #[test]
    fn test_parse_sub_question_list() {
        let text = "preamble <Output>```json\n{\"sub_questions\": [{\"sub_question\": \"What is X?\", \"tool_name\": \"t1\"}]}\n```";
        let list = parse_sub_question_list(text, MARKER).unwrap();
        assert_eq!(list.sub_questions, vec![SubQuestion::new("What is X?", "t1")]);
    }

    #[test]
    fn test_missing_field_is_validation_error() {
        let err = parse_sub_question_list("<Output>{\"items\": []}", MARKER).unwrap_err();
        assert!(matches!(err, QuestionGenError::Validation(_)));
    }

    #[test]
    fn test_wrong_item_shape_is_validation_error() {
        let text = "<Output>{\"sub_questions\": [{\"sub_question\": \"q\"}]}";
        let err = parse_sub_question_list(text, MARKER).unwrap_err();
        assert!(matches!(err, QuestionGenError::Validation(_)));
    }
}
