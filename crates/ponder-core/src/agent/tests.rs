//! Controller tests: cache gating, attempt bounds, failure handling and
//! independence of concurrent runs

use super::testing::ScriptedResponder;
use super::*;
use crate::cache::{AnswerCache, JsonFileCache, KeyPolicy, MemoryCache};
use crate::config::AgentConfig;
use crate::error::{PonderError, PonderResult};
use crate::workflows::{QaWorkflow, TranslationWorkflow};
use async_trait::async_trait;
use std::fs;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::Notify;

/// Never satisfied; counts its Act calls
#[derive(Default)]
struct StubbornWorkflow {
    acts: AtomicU32,
    evaluations: AtomicU32,
}

#[async_trait]
impl Workflow for StubbornWorkflow {
    fn name(&self) -> &str {
        "stubborn"
    }

    async fn act(&self, state: &ConversationState, _ctx: &RunContext) -> PonderResult<StateDelta> {
        self.acts.fetch_add(1, Ordering::SeqCst);
        Ok(StateDelta::new().answer(format!("draft {}", state.attempt_count() + 1)))
    }

    async fn evaluate(
        &self,
        _state: &ConversationState,
        _ctx: &RunContext,
    ) -> PonderResult<StateDelta> {
        self.evaluations.fetch_add(1, Ordering::SeqCst);
        Ok(StateDelta::new()
            .critique("not yet")
            .decision(StateDecision::Continue))
    }
}

/// Finalize never produces an answer
struct SilentWorkflow;

#[async_trait]
impl Workflow for SilentWorkflow {
    fn name(&self) -> &str {
        "silent"
    }

    fn key_policy(&self) -> KeyPolicy {
        KeyPolicy::Compact
    }

    async fn act(&self, _state: &ConversationState, _ctx: &RunContext) -> PonderResult<StateDelta> {
        Ok(StateDelta::new())
    }

    async fn evaluate(
        &self,
        _state: &ConversationState,
        _ctx: &RunContext,
    ) -> PonderResult<StateDelta> {
        Ok(StateDelta::new().decision(StateDecision::Sufficient))
    }
}

/// Evaluate always errors; counts Act and Finalize calls
#[derive(Default)]
struct BrokenJudgeWorkflow {
    acts: AtomicU32,
    finalizes: AtomicU32,
}

#[async_trait]
impl Workflow for BrokenJudgeWorkflow {
    fn name(&self) -> &str {
        "broken-judge"
    }

    async fn act(&self, _state: &ConversationState, _ctx: &RunContext) -> PonderResult<StateDelta> {
        self.acts.fetch_add(1, Ordering::SeqCst);
        Ok(StateDelta::new().answer("draft"))
    }

    async fn evaluate(
        &self,
        _state: &ConversationState,
        _ctx: &RunContext,
    ) -> PonderResult<StateDelta> {
        Err(PonderError::llm_with_status("API error (status 500): judge down", "m", 500))
    }

    async fn finalize(&self, state: &ConversationState, _ctx: &RunContext) -> PonderResult<String> {
        self.finalizes.fetch_add(1, Ordering::SeqCst);
        Ok(state.current_answer().unwrap_or_default().to_string())
    }
}

fn translation(responder: Arc<ScriptedResponder>, cache: Arc<dyn AnswerCache>) -> Controller {
    Controller::new(
        Arc::new(TranslationWorkflow::new(responder)),
        cache,
        &AgentConfig::default(),
    )
}

fn qa(
    expert: Arc<ScriptedResponder>,
    fast: Arc<ScriptedResponder>,
    cache: Arc<dyn AnswerCache>,
) -> Controller {
    Controller::new(
        Arc::new(QaWorkflow::new(expert, fast)),
        cache,
        &AgentConfig::default(),
    )
}

#[tokio::test]
async fn test_cache_hit_makes_no_responder_calls() {
    let responder = Arc::new(ScriptedResponder::new());
    let cache = Arc::new(MemoryCache::with_entries([("你好", "Hello")]));

    let outcome = translation(responder.clone(), cache.clone()).run("你好").await;

    match outcome {
        RunOutcome::Answered {
            answer,
            source,
            attempts,
            key,
        } => {
            assert_eq!(answer, "Hello");
            assert_eq!(source, AnswerSource::Cache);
            assert_eq!(attempts, 0);
            assert_eq!(key, "你好");
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert_eq!(responder.calls(), 0);
    assert_eq!(cache.statistics().writes, 0);
}

#[tokio::test]
async fn test_answer_round_trips_through_cache() {
    let temp_dir = TempDir::new().unwrap();
    let cache = Arc::new(JsonFileCache::new(temp_dir.path().join("translation_cache.json")));
    let responder = Arc::new(ScriptedResponder::new().reply("Good morning").reply("PASS"));
    let controller = translation(responder.clone(), cache.clone());

    let first = controller.run("早上好").await;
    let second = controller.run("早上好").await;

    assert_eq!(first.source(), Some(AnswerSource::Expert));
    assert_eq!(second.source(), Some(AnswerSource::Cache));
    assert_eq!(second.answer(), Some("Good morning"));
    assert_eq!(responder.calls(), 2);
    assert_eq!(cache.statistics().hits, 1);
}

#[tokio::test]
async fn test_cache_consulted_exactly_once_per_run() {
    let cache = Arc::new(MemoryCache::new());
    let workflow = Arc::new(StubbornWorkflow::default());
    let controller = Controller::with_router(workflow, cache.clone(), Router::new(3));

    controller.run("anything").await;

    let stats = cache.statistics();
    assert_eq!(stats.hits + stats.misses, 1);
    assert_eq!(stats.writes, 1);
}

#[tokio::test]
async fn test_attempts_never_exceed_cap() {
    for cap in 1..=5 {
        let workflow = Arc::new(StubbornWorkflow::default());
        let cache = Arc::new(MemoryCache::new());
        let controller = Controller::with_router(workflow.clone(), cache.clone(), Router::new(cap));

        let outcome = controller.run("never good enough").await;

        assert_eq!(outcome.attempts(), cap);
        assert_eq!(workflow.acts.load(Ordering::SeqCst), cap);
        assert_eq!(workflow.evaluations.load(Ordering::SeqCst), cap);
        assert_eq!(outcome.answer(), Some(format!("draft {}", cap).as_str()));
    }
}

#[tokio::test]
async fn test_empty_query_is_rejected() {
    let workflow = Arc::new(StubbornWorkflow::default());
    let cache = Arc::new(MemoryCache::new());
    let controller = Controller::with_router(workflow.clone(), cache.clone(), Router::new(3));

    let outcome = controller.run("   ").await;

    assert!(matches!(
        outcome.error(),
        Some(PonderError::InvalidInput { .. })
    ));
    assert_eq!(workflow.acts.load(Ordering::SeqCst), 0);
    assert_eq!(cache.statistics().misses, 0);
}

#[tokio::test]
async fn test_missing_final_answer_fails_without_caching() {
    let cache = Arc::new(MemoryCache::new());
    let controller = Controller::with_router(Arc::new(SilentWorkflow), cache.clone(), Router::new(3));

    let outcome = controller.run("問題").await;

    assert!(outcome.is_failed());
    assert_eq!(outcome.attempts(), 1);
    assert!(cache.is_empty());
}

#[tokio::test]
async fn test_failed_step_is_terminal() {
    let cache = Arc::new(MemoryCache::new());
    let workflow = Arc::new(BrokenJudgeWorkflow::default());
    let controller = Controller::with_router(workflow.clone(), cache.clone(), Router::new(3));

    let outcome = controller.run("問題").await;

    assert!(outcome.is_failed());
    assert_eq!(outcome.error().and_then(|e| e.status_code()), Some(500));
    assert_eq!(outcome.attempts(), 1);
    assert_eq!(workflow.acts.load(Ordering::SeqCst), 1);
    assert_eq!(workflow.finalizes.load(Ordering::SeqCst), 0);
    assert!(cache.is_empty());
}

// Scenario A: a greeting takes one fast call and is not cached
#[tokio::test]
async fn test_scenario_greeting_fast_lane() {
    let expert = Arc::new(ScriptedResponder::new());
    let fast = Arc::new(ScriptedResponder::new().reply("你好！"));
    let cache = Arc::new(MemoryCache::new());

    let outcome = qa(expert.clone(), fast.clone(), cache.clone()).run("嗨 你好").await;

    assert_eq!(outcome.source(), Some(AnswerSource::Fast));
    assert_eq!(outcome.answer(), Some("你好！"));
    assert_eq!(fast.calls(), 1);
    assert_eq!(expert.calls(), 0);
    assert_eq!(cache.statistics().writes, 0);
}

// Scenario B: the critique loop ends at the second attempt and caches it
#[tokio::test]
async fn test_scenario_critique_loop() {
    let responder = Arc::new(
        ScriptedResponder::new()
            .reply("I am student")
            .reply("Missing article: 'a student'")
            .reply("I am a student")
            .reply("PASS"),
    );
    let temp_dir = TempDir::new().unwrap();
    let cache = Arc::new(JsonFileCache::new(temp_dir.path().join("translation_cache.json")));

    let outcome = translation(responder.clone(), cache.clone()).run("我是學生").await;

    assert_eq!(outcome.attempts(), 2);
    assert_eq!(outcome.answer(), Some("I am a student"));
    assert_eq!(responder.calls(), 4);
    assert_eq!(cache.lookup("我是學生").await.as_deref(), Some("I am a student"));
}

// Scenario C: the cache file disappears mid-run; the store recreates it
#[tokio::test]
async fn test_scenario_cache_file_deleted_mid_run() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path().join("cache");
    let path = dir.join("translation_cache.json");
    let cache = Arc::new(JsonFileCache::new(&path));
    cache.store("舊", "old").await.unwrap();

    let gate = Arc::new(Notify::new());
    let responder = Arc::new(
        ScriptedResponder::new()
            .reply("new")
            .reply("PASS")
            .gated(gate.clone()),
    );
    let controller = Arc::new(translation(responder.clone(), cache.clone()));

    let run = tokio::spawn({
        let controller = controller.clone();
        async move { controller.run("新").await }
    });

    while responder.calls() == 0 {
        tokio::task::yield_now().await;
    }
    fs::remove_dir_all(&dir).unwrap();
    gate.notify_one();
    while responder.calls() < 2 {
        tokio::task::yield_now().await;
    }
    gate.notify_one();

    let outcome = run.await.unwrap();
    assert!(outcome.is_success());
    assert!(path.exists());
    assert_eq!(cache.lookup("新").await.as_deref(), Some("new"));
    assert_eq!(cache.lookup("舊").await, None);
}

// Scenario D: a responder failure fails the run and leaves the cache alone
#[tokio::test]
async fn test_scenario_responder_failure() {
    let temp_dir = TempDir::new().unwrap();
    let cache = Arc::new(JsonFileCache::new(temp_dir.path().join("qa_cache.json")));
    let expert = Arc::new(
        ScriptedResponder::new()
            .fail(PonderError::llm("API error (status 503): unavailable"))
            .reply("recovered"),
    );
    let fast = Arc::new(ScriptedResponder::new());
    let controller = qa(expert.clone(), fast, cache.clone());

    let failed = controller.run("什麼是借用檢查").await;
    assert!(failed.is_failed());
    assert!(failed.error().is_some_and(|e| e.is_external()));
    assert!(!cache.path().exists());

    let retried = controller.run("什麼是借用檢查").await;
    assert_eq!(retried.source(), Some(AnswerSource::Expert));
    assert_eq!(cache.statistics().misses, 2);
}

#[tokio::test]
async fn test_stalled_run_does_not_block_another() {
    let gate = Arc::new(Notify::new());
    let stalled_responder = Arc::new(
        ScriptedResponder::new()
            .reply("slow")
            .reply("PASS")
            .gated(gate.clone()),
    );
    let stalled = Arc::new(translation(stalled_responder.clone(), Arc::new(MemoryCache::new())));
    let stalled_run = tokio::spawn({
        let stalled = stalled.clone();
        async move { stalled.run("慢").await }
    });

    let quick_responder = Arc::new(ScriptedResponder::new().reply("fast").reply("PASS"));
    let quick = translation(quick_responder, Arc::new(MemoryCache::new()));
    let outcome = tokio::time::timeout(Duration::from_secs(5), quick.run("快"))
        .await
        .expect("independent run should not wait for the stalled one");
    assert_eq!(outcome.answer(), Some("fast"));
    assert!(!stalled_run.is_finished());

    gate.notify_one();
    while stalled_responder.calls() < 2 {
        tokio::task::yield_now().await;
    }
    gate.notify_one();
    let stalled_outcome = stalled_run.await.unwrap();
    assert_eq!(stalled_outcome.answer(), Some("slow"));
}

#[tokio::test]
async fn test_shared_controller_serves_concurrent_runs() {
    // Replies are shared across runs in arrival order, so every reply passes
    // both as a draft and as a review
    let mut script = ScriptedResponder::new();
    for _ in 0..8 {
        script = script.reply("PASS");
    }
    let responder = Arc::new(script);
    let temp_dir = TempDir::new().unwrap();
    let cache = Arc::new(JsonFileCache::new(temp_dir.path().join("translation_cache.json")));
    let controller = Arc::new(translation(responder, cache.clone()));

    let mut handles = Vec::new();
    for i in 0..4 {
        let controller = controller.clone();
        handles.push(tokio::spawn(async move {
            controller.run(&format!("句子{}", i)).await
        }));
    }
    for handle in handles {
        assert!(handle.await.unwrap().is_success());
    }

    assert_eq!(cache.entries().await.len(), 4);
}
