//! Search-augmented research loop
//!
//! Each Act generates a search query, searches, and reads the top hit. Each
//! Evaluate asks a planner whether the evidence suffices. Finalize renders
//! the answer from everything collected.

use super::{ask_for_display, prompts};
use crate::agent::{ConversationState, Responder, RunContext, StateDecision, StateDelta, Workflow};
use crate::error::{PonderError, PonderResult};
use crate::llm::{OutputSchema, from_structured};
use crate::search::{PageReader, SearchHit, SearchProvider, truncate_chars};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Maximum characters of the hit list kept as evidence
const HIT_LIST_CHARS: usize = 500;

const NO_RESULTS: &str = "未找到搜尋結果。";

const LOOP_LIMIT_REACHED: &str = "達到迴圈限制";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Sufficiency {
    Sufficient,
    Insufficient,
}

#[derive(Debug, Deserialize)]
struct PlannerJudgment {
    reasoning: String,
    decision: Sufficiency,
}

fn planner_schema() -> OutputSchema {
    OutputSchema::new(
        "planner_decision",
        json!({
            "type": "object",
            "properties": {
                "reasoning": {
                    "type": "string",
                    "description": "分析目前資訊是否足夠回答問題"
                },
                "decision": {
                    "type": "string",
                    "enum": ["sufficient", "insufficient"],
                    "description": "決定是否回答或繼續搜尋"
                }
            },
            "required": ["reasoning", "decision"],
            "additionalProperties": false
        }),
    )
}

fn hit_list(hits: &[SearchHit]) -> String {
    let list = hits
        .iter()
        .map(|hit| format!("- {}", hit.summary()))
        .collect::<Vec<_>>()
        .join("\n");
    format!("搜尋結果:\n{}", truncate_chars(&list, HIT_LIST_CHARS))
}

fn collected(state: &ConversationState) -> String {
    if state.search_context().is_empty() {
        "無".to_string()
    } else {
        state.search_context().join("\n\n")
    }
}

/// Strip quotes and surrounding whitespace from a generated search query
fn clean_query(raw: &str) -> String {
    raw.trim().replace(['"', '“', '”'], "").trim().to_string()
}

pub struct ResearchWorkflow {
    responder: Arc<dyn Responder>,
    search: Arc<dyn SearchProvider>,
    reader: Arc<dyn PageReader>,
    limit: usize,
}

impl ResearchWorkflow {
    pub fn new(
        responder: Arc<dyn Responder>,
        search: Arc<dyn SearchProvider>,
        reader: Arc<dyn PageReader>,
    ) -> Self {
        Self {
            responder,
            search,
            reader,
            limit: 3,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit.max(1);
        self
    }
}

#[async_trait]
impl Workflow for ResearchWorkflow {
    fn name(&self) -> &str {
        "research"
    }

    async fn act(&self, state: &ConversationState, _ctx: &RunContext) -> PonderResult<StateDelta> {
        let raw = self.responder.ask(&prompts::search_query(state.query())).await?;
        let mut search_query = clean_query(&raw);
        if search_query.is_empty() {
            search_query = state.query().to_string();
        }
        info!(search_query = %search_query, "searching");

        let hits = self.search.search(&search_query, self.limit).await?;
        let delta = StateDelta::new().search_query(search_query);

        let Some(top) = hits.first() else {
            debug!("search returned no results");
            return Ok(delta.snippet(NO_RESULTS));
        };

        let title = if top.title.is_empty() {
            top.url.as_str()
        } else {
            top.title.as_str()
        };
        let content = self.reader.read_page(&top.url, title).await?;
        debug!(url = %top.url, chars = content.chars().count(), "page read");

        Ok(delta
            .snippet(hit_list(&hits))
            .snippet(format!("來源: {} ({})\n{}", title, top.url, content.trim())))
    }

    async fn evaluate(
        &self,
        state: &ConversationState,
        _ctx: &RunContext,
    ) -> PonderResult<StateDelta> {
        if state.cap_reached() {
            info!(attempts = state.attempt_count(), "attempt cap reached, skipping planner");
            return Ok(StateDelta::new()
                .decision(StateDecision::Sufficient)
                .reasoning(LOOP_LIMIT_REACHED));
        }

        let messages = prompts::plan(state.query(), &collected(state));
        let judgment = self
            .responder
            .ask_structured(&messages, &planner_schema())
            .await
            .and_then(from_structured::<PlannerJudgment>);

        match judgment {
            Ok(judgment) => {
                info!(decision = ?judgment.decision, reasoning = %judgment.reasoning, "planner judged");
                let decision = match judgment.decision {
                    Sufficiency::Sufficient => StateDecision::Sufficient,
                    Sufficiency::Insufficient => StateDecision::Continue,
                };
                Ok(StateDelta::new()
                    .decision(decision)
                    .reasoning(judgment.reasoning))
            }
            Err(PonderError::MalformedOutput { message, .. }) => {
                warn!(error = %message, "planner output malformed, treating as insufficient");
                Ok(StateDelta::new()
                    .decision(StateDecision::Continue)
                    .reasoning(format!("malformed judgment: {}", message)))
            }
            Err(e) => Err(e),
        }
    }

    async fn finalize(&self, state: &ConversationState, ctx: &RunContext) -> PonderResult<String> {
        let messages = prompts::final_answer(state.query(), &collected(state));
        ask_for_display(self.responder.as_ref(), &messages, ctx, true).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::testing::ScriptedResponder;
    use crate::agent::{AnswerSource, Controller, Router};
    use crate::cache::MemoryCache;
    use crate::search::{MockPageReader, MockSearchProvider};
    use mockall::predicate::eq;

    fn hit() -> SearchHit {
        SearchHit::new("https://example.com/101", "101 攀登", "攀登新聞")
    }

    fn controller(
        responder: Arc<ScriptedResponder>,
        search: MockSearchProvider,
        reader: MockPageReader,
        cache: Arc<MemoryCache>,
    ) -> Controller {
        capped_controller(responder, search, reader, cache, 3)
    }

    fn capped_controller(
        responder: Arc<ScriptedResponder>,
        search: MockSearchProvider,
        reader: MockPageReader,
        cache: Arc<MemoryCache>,
        cap: u32,
    ) -> Controller {
        let workflow = ResearchWorkflow::new(responder, Arc::new(search), Arc::new(reader));
        Controller::with_router(Arc::new(workflow), cache, Router::new(cap))
    }

    #[test]
    fn test_clean_query() {
        assert_eq!(clean_query("  \"台北 101 攀登\"\n"), "台北 101 攀登");
    }

    #[test]
    fn test_hit_list_is_truncated() {
        let hits = vec![SearchHit::new("u", "t", "x".repeat(2000))];
        assert!(hit_list(&hits).chars().count() <= HIT_LIST_CHARS + 10);
    }

    #[tokio::test]
    async fn test_sufficient_after_one_search() {
        let responder = Arc::new(
            ScriptedResponder::new()
                .reply("\"101 攀登\"")
                .structured(json!({"reasoning": "enough", "decision": "sufficient"}))
                .reply("最終答案"),
        );

        let mut search = MockSearchProvider::new();
        search
            .expect_search()
            .with(eq("101 攀登"), eq(3usize))
            .times(1)
            .returning(|_, _| Ok(vec![hit()]));

        let mut reader = MockPageReader::new();
        reader
            .expect_read_page()
            .with(eq("https://example.com/101"), eq("101 攀登"))
            .times(1)
            .returning(|_, _| Ok("頁面重點".to_string()));

        let cache = Arc::new(MemoryCache::new());
        let outcome = controller(responder.clone(), search, reader, cache.clone())
            .run("最近誰爬了101大樓")
            .await;

        assert_eq!(outcome.answer(), Some("最終答案"));
        assert_eq!(outcome.source(), Some(AnswerSource::Expert));
        assert_eq!(outcome.attempts(), 1);
        assert!(responder.prompt(2).contains("頁面重點"));
        assert_eq!(cache.peek("最近誰爬了101大樓").as_deref(), Some("最終答案"));
    }

    #[tokio::test]
    async fn test_empty_results_are_not_an_error() {
        let responder = Arc::new(
            ScriptedResponder::new()
                .reply("query")
                .structured(json!({"reasoning": "nothing found", "decision": "sufficient"}))
                .reply("抱歉，找不到資料"),
        );

        let mut search = MockSearchProvider::new();
        search.expect_search().returning(|_, _| Ok(vec![]));
        let mut reader = MockPageReader::new();
        reader.expect_read_page().times(0);

        let cache = Arc::new(MemoryCache::new());
        let outcome = controller(responder.clone(), search, reader, cache)
            .run("冷門問題")
            .await;

        assert!(outcome.is_success());
        assert!(responder.prompt(1).contains(NO_RESULTS));
    }

    #[tokio::test]
    async fn test_malformed_judgment_counts_as_insufficient() {
        let responder = Arc::new(
            ScriptedResponder::new()
                .reply("q1")
                .structured_error(PonderError::malformed_output("not json", "maybe?"))
                .reply("q2")
                .structured(json!({"reasoning": "ok", "decision": "sufficient"}))
                .reply("answer"),
        );

        let mut search = MockSearchProvider::new();
        search
            .expect_search()
            .times(2)
            .returning(|_, _| Ok(vec![hit()]));
        let mut reader = MockPageReader::new();
        reader
            .expect_read_page()
            .times(2)
            .returning(|_, _| Ok("content".to_string()));

        let cache = Arc::new(MemoryCache::new());
        let outcome = controller(responder, search, reader, cache).run("問題").await;

        assert_eq!(outcome.answer(), Some("answer"));
        assert_eq!(outcome.attempts(), 2);
    }

    #[tokio::test]
    async fn test_wrong_schema_counts_as_insufficient_until_cap() {
        let mut script = ScriptedResponder::new();
        for _ in 0..2 {
            script = script
                .reply("q")
                .structured(json!({"reasoning": "x", "decision": "maybe"}));
        }
        let responder = Arc::new(script.reply("q").reply("best effort"));

        let mut search = MockSearchProvider::new();
        search.expect_search().times(3).returning(|_, _| Ok(vec![]));
        let reader = MockPageReader::new();

        let cache = Arc::new(MemoryCache::new());
        let outcome = controller(responder.clone(), search, reader, cache)
            .run("問題")
            .await;

        assert_eq!(outcome.answer(), Some("best effort"));
        assert_eq!(outcome.attempts(), 3);
        // three queries, two planner calls, one final answer
        assert_eq!(responder.calls(), 6);
    }

    #[tokio::test]
    async fn test_planner_is_skipped_once_cap_is_reached() {
        let responder = Arc::new(
            ScriptedResponder::new()
                .reply("q")
                .structured_error(PonderError::llm_with_status(
                    "API error (status 400): bad request",
                    "test-model",
                    400,
                ))
                .reply("final"),
        );

        let mut search = MockSearchProvider::new();
        search.expect_search().times(1).returning(|_, _| Ok(vec![]));
        let reader = MockPageReader::new();

        let cache = Arc::new(MemoryCache::new());
        let outcome = capped_controller(responder.clone(), search, reader, cache, 1)
            .run("問題")
            .await;

        assert_eq!(outcome.answer(), Some("final"));
        assert_eq!(outcome.attempts(), 1);
        assert_eq!(responder.calls(), 2);
        assert!(responder.prompt(1).contains(NO_RESULTS));
    }

    #[tokio::test]
    async fn test_search_failure_fails_run() {
        let responder = Arc::new(ScriptedResponder::new().reply("q"));
        let mut search = MockSearchProvider::new();
        search
            .expect_search()
            .returning(|_, _| Err(PonderError::search("backend down")));
        let reader = MockPageReader::new();

        let cache = Arc::new(MemoryCache::new());
        let outcome = controller(responder, search, reader, cache.clone())
            .run("問題")
            .await;

        assert!(matches!(
            outcome.error(),
            Some(PonderError::Search { .. })
        ));
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_planner_transport_error_fails_run() {
        let responder = Arc::new(
            ScriptedResponder::new()
                .reply("q")
                .structured_error(PonderError::llm_with_status(
                    "API error (status 503): down",
                    "test-model",
                    503,
                )),
        );
        let mut search = MockSearchProvider::new();
        search.expect_search().returning(|_, _| Ok(vec![]));
        let reader = MockPageReader::new();

        let cache = Arc::new(MemoryCache::new());
        let outcome = controller(responder, search, reader, cache).run("問題").await;

        assert!(outcome.is_failed());
        assert_eq!(outcome.attempts(), 1);
    }
}
