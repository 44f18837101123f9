//! Bounded iteration controller
//!
//! Drives one query through the phase machine:
//!
//! ```text
//! Init -> CheckCache -> CacheHit
//!                    -> Route -> Act -> Evaluate -> Act ...
//!                                               -> Finalize -> Done
//! ```
//!
//! Each loop iteration runs the work of the current phase, asks the router
//! for a decision and applies one transition from [`transition`]. A failing
//! step ends the run in `Failed` without touching the cache.

use super::outcome::{AnswerSource, RunOutcome};
use super::phase::{Phase, transition};
use super::router::{Decision, FastPathMatcher, Router};
use super::state::{ConversationState, Lane};
use super::workflow::{RunContext, Workflow};
use crate::cache::AnswerCache;
use crate::config::AgentConfig;
use crate::error::{PonderError, PonderResult};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Runs queries for one workflow against one cache.
///
/// `run` takes `&self`, so a controller behind an `Arc` serves any number of
/// concurrent runs; each run owns its own [`ConversationState`].
pub struct Controller {
    workflow: Arc<dyn Workflow>,
    cache: Arc<dyn AnswerCache>,
    router: Router,
}

impl Controller {
    /// Build a controller whose router follows the agent configuration
    pub fn new(
        workflow: Arc<dyn Workflow>,
        cache: Arc<dyn AnswerCache>,
        agent: &AgentConfig,
    ) -> Self {
        let mut router = Router::new(agent.attempt_cap);
        if workflow.allows_fast_path() {
            router = router.with_fast_path(FastPathMatcher::new(
                agent.fast_path_keywords.iter().cloned(),
            ));
        }
        Self::with_router(workflow, cache, router)
    }

    pub fn with_router(
        workflow: Arc<dyn Workflow>,
        cache: Arc<dyn AnswerCache>,
        router: Router,
    ) -> Self {
        Self {
            workflow,
            cache,
            router,
        }
    }

    pub fn workflow_name(&self) -> &str {
        self.workflow.name()
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn cache(&self) -> &Arc<dyn AnswerCache> {
        &self.cache
    }

    /// Run a query without streaming
    pub async fn run(&self, query: &str) -> RunOutcome {
        self.run_with(query, &RunContext::new()).await
    }

    /// Run a query with the given context
    #[instrument(
        skip(self, query, ctx),
        fields(workflow = %self.workflow.name(), run_id = %ctx.run_id())
    )]
    pub async fn run_with(&self, query: &str, ctx: &RunContext) -> RunOutcome {
        let query = query.trim();
        if query.is_empty() {
            return RunOutcome::Failed {
                error: PonderError::invalid_input_field("query must not be empty", "query"),
                attempts: 0,
            };
        }

        let key = self.workflow.key_policy().normalize(query);
        let mut state = ConversationState::new(query, key);
        state.set_attempt_cap(self.router.cap());
        let mut final_answer = None;
        let mut failure = None;
        let mut phase = Phase::Init;

        loop {
            if let Err(error) = self.step(phase, &mut state, ctx, &mut final_answer).await {
                warn!(
                    phase = %phase,
                    attempts = state.attempt_count(),
                    error = %error,
                    "step failed"
                );
                debug!(from = %phase, to = %Phase::Failed, "transition");
                phase = Phase::Failed;
                failure = Some(error);
            }

            if phase.is_terminal() {
                break;
            }

            let decision = self.router.decide(&state);
            let next = transition(phase, decision);
            debug!(from = %phase, to = %next, decision = %decision, "transition");
            phase = next;
        }

        match failure {
            Some(error) => RunOutcome::Failed {
                error,
                attempts: state.attempt_count(),
            },
            None => self.outcome(phase, state, final_answer),
        }
    }

    /// Perform the work of one phase
    async fn step(
        &self,
        phase: Phase,
        state: &mut ConversationState,
        ctx: &RunContext,
        final_answer: &mut Option<String>,
    ) -> PonderResult<()> {
        match phase {
            Phase::Init => {
                debug!(key = state.key(), "run started");
            }
            Phase::CheckCache => {
                if let Some(answer) = self.cache.lookup(state.key()).await {
                    info!(key = state.key(), "cache hit");
                    state.mark_cache_hit(answer);
                } else {
                    debug!(key = state.key(), "cache miss");
                }
            }
            Phase::Route => {
                let lane = match self.router.decide(state) {
                    Decision::FastPath => Lane::Fast,
                    _ => Lane::Expert,
                };
                info!(lane = ?lane, "routed");
                state.set_lane(lane);
            }
            Phase::Act => {
                let delta = self.workflow.act(state, ctx).await?;
                state.apply(delta);
                state.record_attempt();
                debug!(attempt = state.attempt_count(), "act completed");
            }
            Phase::Evaluate => {
                let delta = self.workflow.evaluate(state, ctx).await?;
                state.apply(delta);
                debug!(
                    attempt = state.attempt_count(),
                    decision = ?state.decision(),
                    "evaluation completed"
                );
            }
            Phase::Finalize => {
                *final_answer = Some(self.workflow.finalize(state, ctx).await?);
            }
            Phase::Done => {
                let answer = final_answer
                    .as_deref()
                    .ok_or_else(|| PonderError::other("run reached done without an answer"))?;
                if state.lane() == Lane::Expert {
                    self.persist(state.key(), answer).await;
                }
            }
            Phase::CacheHit | Phase::Failed => {}
        }
        Ok(())
    }

    /// Store failures are logged and swallowed
    async fn persist(&self, key: &str, answer: &str) {
        match self.cache.store(key, answer).await {
            Ok(()) => debug!(key, "answer cached"),
            Err(e) => warn!(key, error = %e, "failed to cache answer"),
        }
    }

    fn outcome(
        &self,
        phase: Phase,
        state: ConversationState,
        final_answer: Option<String>,
    ) -> RunOutcome {
        let attempts = state.attempt_count();
        let source = match (phase, state.lane()) {
            (Phase::CacheHit, _) => AnswerSource::Cache,
            (_, Lane::Fast) => AnswerSource::Fast,
            (_, Lane::Expert) => AnswerSource::Expert,
        };
        let answer = match phase {
            Phase::CacheHit => state.current_answer().map(str::to_string),
            _ => final_answer,
        };

        match answer {
            Some(answer) => {
                info!(source = %source, attempts, "run answered");
                RunOutcome::Answered {
                    answer,
                    source,
                    attempts,
                    key: state.key().to_string(),
                }
            }
            None => RunOutcome::Failed {
                error: PonderError::other(format!("run ended in {} without an answer", phase)),
                attempts,
            },
        }
    }
}

impl std::fmt::Debug for Controller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller")
            .field("workflow", &self.workflow.name())
            .field("router", &self.router)
            .finish()
    }
}
