use qgen_types::ToolMetadata;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};

use crate::error::{QuestionGenError, Result};

/// 子问题拆解的默认 prompt（`{var}` 格式，`{{`/`}}` 为字面量花括号）
///
/// 需要绑定 `tools_str` 和 `query_str` 两个变量，以 `<Output>` 结尾。
pub const DEFAULT_SUB_QUESTION_PROMPT_TMPL: &str = r#"Given a user question, and a list of tools, output a list of relevant sub-questions in json markdown that when composed can help answer the full user question:

# Example 1
<Tools>
```json
{{
    "uber_10k": "Provides information about Uber financials for year 2021",
    "lyft_10k": "Provides information about Lyft financials for year 2021"
}}
```

<User Question>
Compare and contrast the revenue growth and EBITDA of Uber and Lyft for year 2021


<Output>
```json
{{
    "sub_questions": [
        {{
            "sub_question": "What is the revenue growth of Uber",
            "tool_name": "uber_10k"
        }},
        {{
            "sub_question": "What is the EBITDA of Uber",
            "tool_name": "uber_10k"
        }},
        {{
            "sub_question": "What is the revenue growth of Lyft",
            "tool_name": "lyft_10k"
        }},
        {{
            "sub_question": "What is the EBITDA of Lyft",
            "tool_name": "lyft_10k"
        }}
    ]
}}
```

# Example 2
<Tools>
```json
{tools_str}
```

<User Question>
{query_str}

<Output>
"#;

/// 模型答案区域的起始标记
pub const DEFAULT_OUTPUT_MARKER: &str = "<Output>";

/// 下一个示例的开头；补全越过答案后在此截断
pub const EXAMPLE_BOUNDARY_STOPS: [&str; 2] = ["\n\n#", "\n<Tools>"];

/// 工具列表变量名
pub const TOOLS_STR_VAR: &str = "tools_str";

/// 查询变量名
pub const QUERY_STR_VAR: &str = "query_str";

/// 将工具列表渲染为 `{name: description}` JSON（4 空格缩进，保持顺序）
///
/// 同名工具保留首次出现的位置，描述取最后一次。
pub fn build_tools_text(tools: &[ToolMetadata]) -> Result<String> {
    let mut tools_map = Map::new();
    for tool in tools {
        tools_map.insert(tool.name.clone(), Value::String(tool.description.clone()));
    }

    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    tools_map
        .serialize(&mut ser)
        .map_err(QuestionGenError::ToolsText)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
