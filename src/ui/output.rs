use console::Style;

use question_gen::{SubQuestion, ToolMetadata};

/// 命令行输出格式化工具
/// 提供统一的 Cargo 风格输出
pub struct Output {
    green: Style,
    bold: Style,
    dim: Style,
}

impl Output {
    pub fn new() -> Self {
        Self {
            green: Style::new().green().bold(),
            bold: Style::new().bold(),
            dim: Style::new().dim(),
        }
    }

    /// 显示状态消息（如 "Loading config", "Generating sub-questions" 等）
    /// 格式: "     Loading config ..."（动词右对齐到 12 字符）
    pub fn status(&self, action: &str, target: &str) {
        eprintln!("{:>12} {}", self.green.apply_to(action), target);
    }

    /// 显示工具列表
    /// 格式: "       Tools uber_10k, lyft_10k"
    pub fn tools(&self, tools: &[ToolMetadata]) {
        let names: Vec<&str> = tools.iter().map(|t| t.name.as_str()).collect();
        let listing = if names.is_empty() {
            self.dim.apply_to("(none)".to_string()).to_string()
        } else {
            names.join(", ")
        };
        eprintln!("{:>12} {}", self.green.apply_to("Tools"), listing);
    }

    /// 显示子问题列表
    /// 格式: "[1/4] uber_10k"
    ///       "      What is the revenue growth of Uber"
    pub fn sub_questions(&self, sub_questions: &[SubQuestion]) {
        let total = sub_questions.len();
        for (i, sq) in sub_questions.iter().enumerate() {
            let index_part = format!("{}/{}", i + 1, total);
            println!(
                "[{}] {}",
                self.dim.apply_to(&index_part),
                self.bold.apply_to(&sq.tool_name)
            );

            let indent = " ".repeat(index_part.len() + 3);
            println!("{}{}", indent, sq.sub_question);
        }
    }

    /// 显示完成消息
    /// 格式: "    Finished 4 sub-questions"
    /// 自动在前面添加空行
    pub fn finish(&self, message: &str) {
        eprintln!();
        eprintln!("{:>12} {}", self.green.apply_to("Finished"), message);
    }

    /// 显示注意事项（右对齐）
    pub fn note(&self, message: &str) {
        eprintln!("{:>12} {}", self.dim.apply_to("Note"), message);
    }

    /// 显示错误（红色，右对齐）
    pub fn error(&self, message: &str) {
        eprintln!(
            "{:>12} {}",
            Style::new().red().bold().apply_to("Error"),
            message
        );
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}
