//! Built-in workflows and their wiring
//!
//! | Workflow | Key policy | Fast path | Cache file |
//! |---|---|---|---|
//! | translation | exact | no | `translation_cache.json` |
//! | qa | compact | yes | `qa_cache.json` |
//! | research | exact | no | `research_cache.json` |
//! | tools | exact | no | `tools_cache.json` |

pub mod qa;
pub mod research;
pub mod tools;
pub mod translation;

pub(crate) mod prompts;

pub use qa::QaWorkflow;
pub use research::ResearchWorkflow;
pub use tools::ToolAgentWorkflow;
pub use translation::TranslationWorkflow;

use crate::agent::{Controller, Responder, RunContext, Workflow};
use crate::cache::JsonFileCache;
use crate::config::PonderConfig;
use crate::error::{PonderError, PonderResult};
use crate::llm::{LlmClient, LlmMessage, stream_utils};
use crate::search::{LlmPageReader, SearxngClient};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;

/// The workflows selectable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowKind {
    Translation,
    Qa,
    Research,
    Tools,
}

impl WorkflowKind {
    pub fn all() -> [WorkflowKind; 4] {
        [Self::Translation, Self::Qa, Self::Research, Self::Tools]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Translation => "translation",
            Self::Qa => "qa",
            Self::Research => "research",
            Self::Tools => "tools",
        }
    }

    /// File name of this workflow's answer cache
    pub fn cache_file(&self) -> &'static str {
        match self {
            Self::Translation => "translation_cache.json",
            Self::Qa => "qa_cache.json",
            Self::Research => "research_cache.json",
            Self::Tools => "tools_cache.json",
        }
    }

    /// Prompt shown by the interactive chat loop
    pub fn greeting(&self) -> &'static str {
        match self {
            Self::Translation => "請輸入要翻譯的中文",
            Self::Qa => "請輸入問題",
            Self::Research => "我是全能查證 AI 助手，請問有什麼想知道的嗎？",
            Self::Tools => "我可以查詢台北、台中、高雄的天氣，想知道哪裡？",
        }
    }
}

impl std::fmt::Display for WorkflowKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for WorkflowKind {
    type Err = PonderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "translation" | "translate" => Ok(Self::Translation),
            "qa" => Ok(Self::Qa),
            "research" => Ok(Self::Research),
            "tools" | "tool" => Ok(Self::Tools),
            other => Err(PonderError::invalid_input_field(
                format!(
                    "unknown workflow '{}', expected one of: translation, qa, research, tools",
                    other
                ),
                "workflow",
            )),
        }
    }
}

/// Open the answer cache for a workflow in the configured directory
pub fn open_cache(kind: WorkflowKind, config: &PonderConfig) -> JsonFileCache {
    let cache = JsonFileCache::new(config.cache.path_for(kind.cache_file()));
    match kind {
        WorkflowKind::Qa => cache.with_seed(qa::seed_entries()),
        _ => cache,
    }
}

/// Build a workflow backed by real model and search clients
pub fn build_workflow(kind: WorkflowKind, config: &PonderConfig) -> PonderResult<Arc<dyn Workflow>> {
    let expert: Arc<dyn Responder> = Arc::new(LlmClient::new(config.expert.clone())?);

    let workflow: Arc<dyn Workflow> = match kind {
        WorkflowKind::Translation => Arc::new(TranslationWorkflow::new(expert)),
        WorkflowKind::Qa => {
            let fast: Arc<dyn Responder> = Arc::new(LlmClient::new(config.fast.clone())?);
            Arc::new(QaWorkflow::new(expert, fast).with_streaming(config.agent.stream_expert))
        }
        WorkflowKind::Research => {
            let search = Arc::new(SearxngClient::new(&config.search)?);
            let reader = Arc::new(LlmPageReader::new(&config.search, expert.clone())?);
            Arc::new(
                ResearchWorkflow::new(expert, search, reader).with_limit(config.search.limit),
            )
        }
        WorkflowKind::Tools => Arc::new(ToolAgentWorkflow::new(expert, tools::default_registry())),
    };
    Ok(workflow)
}

/// Controller for a workflow with its file cache
pub fn build_controller(kind: WorkflowKind, config: &PonderConfig) -> PonderResult<Controller> {
    let workflow = build_workflow(kind, config)?;
    let cache = Arc::new(open_cache(kind, config));
    Ok(Controller::new(workflow, cache, &config.agent))
}

/// Ask a responder, streaming fragments to the run's sink when allowed
pub(crate) async fn ask_for_display(
    responder: &dyn Responder,
    messages: &[LlmMessage],
    ctx: &RunContext,
    stream: bool,
) -> PonderResult<String> {
    if stream && ctx.is_streaming() {
        let fragments = responder.ask_stream(messages).await?;
        stream_utils::collect_with(fragments, |fragment| ctx.emit(fragment)).await
    } else {
        responder.ask(messages).await
    }
}
