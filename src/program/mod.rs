//! LLM 程序：绑定到模型的 handlebars 风格模板
//!
//! 执行时先渲染到第一个生成指令为止的前导文本，再把前导文本作为补全
//! prompt 交给模型续写。程序文本 = 前导文本 + 模型输出。

mod output_template;
mod template;

pub use output_template::{json_schema_to_output_template, output_template_for};
pub use template::convert_to_handlebars;
pub(crate) use template::has_variable;

use std::collections::HashMap;
use std::sync::Arc;

use model_provider::{CompletionOptions, LlmProvider};

use crate::error::Result;

/// 模板变量绑定
pub type Variables = HashMap<String, String>;

/// 程序执行结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramOutput {
    text: String,
}

impl ProgramOutput {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// 完整程序文本（模板回显 + 生成内容）
    pub fn text(&self) -> &str {
        &self.text
    }

}

/// 可执行的 LLM 程序
///
/// 实现必须是不可变的：多次、并发调用 `run` 互不影响
pub trait Program: Send + Sync {
    /// 绑定变量并执行（同步，阻塞到模型返回）
    fn run(&self, variables: &Variables) -> Result<ProgramOutput>;

    /// 程序模板原文
    fn template(&self) -> &str;
}

/// 默认程序实现：前导文本补全
pub struct TemplateProgram {
    template: String,
    llm: Arc<dyn LlmProvider>,
    options: CompletionOptions,
    /// 程序边界：补全在这些序列处结束，与采样配置中的 stop 合并
    stop: Vec<String>,
}

impl TemplateProgram {
    pub fn new(template: impl Into<String>, llm: Arc<dyn LlmProvider>) -> Self {
        Self {
            template: template.into(),
            llm,
            options: CompletionOptions::default(),
            stop: Vec::new(),
        }
    }

    pub fn with_options(mut self, options: CompletionOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_stop<I, S>(mut self, stop: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stop = stop.into_iter().map(Into::into).collect();
        self
    }

    /// 实际发送的补全参数
    fn request_options(&self) -> CompletionOptions {
        let mut options = self.options.clone();
        for stop in &self.stop {
            if !options.stop.contains(stop) {
                options.stop.push(stop.clone());
            }
        }
        options
    }
}

/// 在第一个 stop 序列处截断（不是所有后端都遵守 stop 参数）
fn truncate_at_stop<'a>(text: &'a str, stop: &[String]) -> &'a str {
    stop.iter()
        .filter(|s| !s.is_empty())
        .filter_map(|s| text.find(s.as_str()))
        .min()
        .map_or(text, |end| &text[..end])
}

impl Program for TemplateProgram {
    fn run(&self, variables: &Variables) -> Result<ProgramOutput> {
        let preamble = template::render_preamble(&self.template, variables)?;

        if !preamble.has_command {
            tracing::debug!("Program has no generation command, skipping LLM call");
            return Ok(ProgramOutput::new(preamble.text));
        }

        tracing::debug!(
            "Running program: model={}, prompt_len={}",
            self.llm.model(),
            preamble.text.len()
        );

        let options = self.request_options();
        let completion = self.llm.complete(&preamble.text, &options)?;

        let mut text = preamble.text;
        text.push_str(truncate_at_stop(&completion, &options.stop));
        Ok(ProgramOutput::new(text))
    }

    fn template(&self) -> &str {
        &self.template
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// 记录收到的 prompt 并返回固定文本
    struct RecordingLlm {
        reply: String,
        prompts: Mutex<Vec<String>>,
        stops: Mutex<Vec<Vec<String>>>,
    }

    impl RecordingLlm {
        fn new(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: reply.to_string(),
                prompts: Mutex::new(Vec::new()),
                stops: Mutex::new(Vec::new()),
            })
        }
    }

    impl LlmProvider for RecordingLlm {
        fn complete(&self, prompt: &str, options: &CompletionOptions) -> anyhow::Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.stops.lock().unwrap().push(options.stop.clone());
            Ok(self.reply.clone())
        }

        fn model(&self) -> &str {
            "recording"
        }
    }

    struct FailingLlm;

    impl LlmProvider for FailingLlm {
        fn complete(&self, _prompt: &str, _options: &CompletionOptions) -> anyhow::Result<String> {
            anyhow::bail!("LLM API error (500): boom")
        }

        fn model(&self) -> &str {
            "failing"
        }
    }

    fn vars(query: &str) -> Variables {
        Variables::from([("query_str".to_string(), query.to_string())])
    }

    #[test]
    fn test_run_appends_completion_to_preamble() {
        let llm = RecordingLlm::new("x\"}");
        let program = TemplateProgram::new("Q: {{query_str}}\n{\"a\": \"{{gen 'a'}}\"}", llm.clone());

        let output = program.run(&vars("why")).unwrap();

        assert_eq!(output.text(), "Q: why\n{\"a\": \"x\"}");
        assert_eq!(llm.prompts.lock().unwrap().as_slice(), ["Q: why\n{\"a\": \""]);
    }

    #[test]
    fn test_run_without_command_skips_llm() {
        let llm = RecordingLlm::new("unused");
        let program = TemplateProgram::new("Q: {{query_str}}", llm.clone());

        let output = program.run(&vars("why")).unwrap();

        assert_eq!(output.text(), "Q: why");
        assert!(llm.prompts.lock().unwrap().is_empty());
    }

    #[test]
    fn test_run_propagates_llm_error() {
        let program = TemplateProgram::new("{{gen 'a'}}", Arc::new(FailingLlm));
        let err = program.run(&Variables::new()).unwrap_err();
        assert!(matches!(err, crate::QuestionGenError::Program(_)));
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn test_program_is_reusable() {
        let llm = RecordingLlm::new("!");
        let program = TemplateProgram::new("{{query_str}}{{gen 'a'}}", llm.clone());

        assert_eq!(program.run(&vars("a")).unwrap().text(), "a!");
        assert_eq!(program.run(&vars("b")).unwrap().text(), "b!");
        assert_eq!(program.template(), "{{query_str}}{{gen 'a'}}");
    }

    #[test]
    fn test_run_cuts_completion_at_program_stop() {
        let llm = RecordingLlm::new("x\"}\n\n# Example 3\n<Output>{\"a\": \"y\"}");
        let program = TemplateProgram::new("{\"a\": \"{{gen 'a'}}\"}", llm.clone())
            .with_stop(["\n\n#"]);

        let output = program.run(&Variables::new()).unwrap();

        assert_eq!(output.text(), "{\"a\": \"x\"}");
        assert_eq!(llm.stops.lock().unwrap()[0], vec!["\n\n#".to_string()]);
    }

    #[test]
    fn test_run_merges_configured_stop() {
        let llm = RecordingLlm::new("one|two");
        let program = TemplateProgram::new("{{gen 'a'}}", llm.clone())
            .with_stop(["\n\n#", "|"])
            .with_options(CompletionOptions {
                stop: vec!["|".to_string()],
                ..CompletionOptions::default()
            });

        assert_eq!(program.run(&Variables::new()).unwrap().text(), "one");
        assert_eq!(
            llm.stops.lock().unwrap()[0],
            vec!["|".to_string(), "\n\n#".to_string()]
        );
    }

    #[test]
    fn test_truncate_ignores_empty_stop() {
        let stop = vec![String::new(), "]".to_string()];
        assert_eq!(truncate_at_stop("a]b", &stop), "a");
        assert_eq!(truncate_at_stop("ab", &[]), "ab");
    }
}
