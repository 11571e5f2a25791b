use crate::error::{QuestionGenError, Result};

use super::Variables;

/// 将 `{var}` 格式模板转换为 handlebars 风格
///
/// `{{`/`}}`（转义的字面量花括号）变为 `{`/`}`，单个 `{`/`}` 变为 `{{`/`}}`。
pub fn convert_to_handlebars(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 16);
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' | '}' => {
                if chars.peek() == Some(&c) {
                    chars.next();
                    out.push(c);
                } else {
                    out.push(c);
                    out.push(c);
                }
            }
            _ => out.push(c),
        }
    }

    out
}

/// 渲染后的前导文本
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Preamble {
    pub text: String,
    /// 前导文本之后是否还有生成指令（需要调用模型）
    pub has_command: bool,
}

/// 渲染模板直到第一个生成指令
///
/// `{{name}}` 替换为绑定的变量；其余标签（`gen`、`#geneach`、`#select` 等）
/// 视为生成指令，渲染在此停止。
pub(crate) fn render_preamble(template: &str, variables: &Variables) -> Result<Preamble> {
    let mut text = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        text.push_str(&rest[..start]);

        let after_open = &rest[start + 2..];
        let end = after_open.find("}}").ok_or_else(|| {
            QuestionGenError::InvalidTemplate(format!(
                "unclosed tag near `{}`",
                snippet(&rest[start..])
            ))
        })?;

        let tag = after_open[..end].trim();
        if !is_variable(tag) {
            return Ok(Preamble {
                text,
                has_command: true,
            });
        }

        let value = variables.get(tag).ok_or_else(|| {
            QuestionGenError::InvalidTemplate(format!("variable `{}` is not bound", tag))
        })?;
        text.push_str(value);

        rest = &after_open[end + 2..];
    }

    text.push_str(rest);
    Ok(Preamble {
        text,
        has_command: false,
    })
}

/// 检查模板是否引用了某个变量
pub(crate) fn has_variable(template: &str, name: &str) -> bool {
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        let after_open = &rest[start + 2..];
        let Some(end) = after_open.find("}}") else {
            return false;
        };
        if after_open[..end].trim() == name {
            return true;
        }
        rest = &after_open[end + 2..];
    }
    false
}

fn is_variable(tag: &str) -> bool {
    !tag.is_empty() && tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn snippet(text: &str) -> String {
    text.chars().take(24).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Variables {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_convert_to_handlebars() {
        let text = "Tools: {tools_str}\nJSON: {{\"a\": 1}}\nQuery: {query_str}";
        assert_eq!(
            convert_to_handlebars(text),
            "Tools: {{tools_str}}\nJSON: {\"a\": 1}\nQuery: {{query_str}}"
        );
    }

    #[test]
    fn test_convert_nested_escapes() {
        assert_eq!(convert_to_handlebars("{{{{}}}}"), "{{}}");
        assert_eq!(convert_to_handlebars("{{{x}}}"), "{{{x}}}");
    }

    #[test]
    fn test_render_substitutes_variables() {
        let preamble = render_preamble(
            "Q: {{query_str}}\nT: {{ tools_str }}",
            &vars(&[("query_str", "why?"), ("tools_str", "{}")]),
        )
        .unwrap();

        assert_eq!(preamble.text, "Q: why?\nT: {}");
        assert!(!preamble.has_command);
    }

    #[test]
    fn test_render_stops_at_first_command() {
        let template = "Q: {{query_str}}\n{\n  \"a\": \"{{gen 'a' stop='\"'}}\",\n  \"b\": {{query_str}}\n}";
        let preamble = render_preamble(template, &vars(&[("query_str", "x")])).unwrap();

        assert_eq!(preamble.text, "Q: x\n{\n  \"a\": \"");
        assert!(preamble.has_command);
    }

    #[test]
    fn test_render_does_not_rescan_values() {
        let preamble =
            render_preamble("{{query_str}}!", &vars(&[("query_str", "{{gen 'x'}}")])).unwrap();
        assert_eq!(preamble.text, "{{gen 'x'}}!");
        assert!(!preamble.has_command);
    }

    #[test]
    fn test_render_unbound_variable() {
        let err = render_preamble("{{missing}}", &Variables::new()).unwrap_err();
        assert!(matches!(err, QuestionGenError::InvalidTemplate(_)));
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_render_unclosed_tag() {
        let err = render_preamble("text {{query_str", &vars(&[("query_str", "x")])).unwrap_err();
        assert!(matches!(err, QuestionGenError::InvalidTemplate(_)));
    }

    #[test]
    fn test_has_variable() {
        let template = convert_to_handlebars("{tools_str} and {{literal}}");
        assert!(has_variable(&template, "tools_str"));
        assert!(!has_variable(&template, "literal"));
        assert!(!has_variable(&template, "query_str"));
    }
}
