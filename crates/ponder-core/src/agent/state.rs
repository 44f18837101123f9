//! Per-run conversation state and the deltas steps produce

use crate::llm::LlmMessage;
use serde::{Deserialize, Serialize};

/// Judgment recorded on the state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateDecision {
    /// More work may be needed
    #[default]
    Continue,
    /// The current answer or evidence is good enough
    Sufficient,
    /// The answer was found in the cache
    CacheHit,
}

/// Which model a run is using
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lane {
    /// Cheap model, single call, never cached
    Fast,
    /// Full model, bounded critique loop
    #[default]
    Expert,
}

/// State of one query as it moves through the controller.
///
/// The controller owns the state exclusively. Workflow steps read it and
/// return a [`StateDelta`]; they never mutate it directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationState {
    query: String,
    key: String,
    current_answer: Option<String>,
    critique: Option<String>,
    search_context: Vec<String>,
    attempt_count: u32,
    #[serde(default = "unbounded")]
    attempt_cap: u32,
    decision: StateDecision,
    lane: Lane,
    search_query: Option<String>,
    reasoning: Option<String>,
    #[serde(default)]
    transcript: Vec<LlmMessage>,
}

fn unbounded() -> u32 {
    u32::MAX
}

impl ConversationState {
    /// Fresh state for a query and its cache key
    pub fn new(query: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            key: key.into(),
            current_answer: None,
            critique: None,
            search_context: Vec::new(),
            attempt_count: 0,
            attempt_cap: unbounded(),
            decision: StateDecision::Continue,
            lane: Lane::Expert,
            search_query: None,
            reasoning: None,
            transcript: Vec::new(),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn current_answer(&self) -> Option<&str> {
        self.current_answer.as_deref()
    }

    pub fn critique(&self) -> Option<&str> {
        self.critique.as_deref()
    }

    /// Snippets gathered so far, oldest first
    pub fn search_context(&self) -> &[String] {
        &self.search_context
    }

    pub fn attempt_count(&self) -> u32 {
        self.attempt_count
    }

    /// Most Act steps this run may take
    pub fn attempt_cap(&self) -> u32 {
        self.attempt_cap
    }

    /// No further Act will run, whatever the evaluation says
    pub fn cap_reached(&self) -> bool {
        self.attempt_count >= self.attempt_cap
    }

    pub fn decision(&self) -> StateDecision {
        self.decision
    }

    pub fn lane(&self) -> Lane {
        self.lane
    }

    pub fn search_query(&self) -> Option<&str> {
        self.search_query.as_deref()
    }

    pub fn reasoning(&self) -> Option<&str> {
        self.reasoning.as_deref()
    }

    /// Model and tool turns exchanged so far, oldest first
    pub fn transcript(&self) -> &[LlmMessage] {
        &self.transcript
    }

    /// Apply a delta: present fields replace, snippets and messages append
    pub fn apply(&mut self, delta: StateDelta) {
        if let Some(answer) = delta.current_answer {
            self.current_answer = Some(answer);
        }
        if let Some(critique) = delta.critique {
            self.critique = Some(critique);
        }
        if let Some(decision) = delta.decision {
            self.decision = decision;
        }
        if let Some(search_query) = delta.search_query {
            self.search_query = Some(search_query);
        }
        if let Some(reasoning) = delta.reasoning {
            self.reasoning = Some(reasoning);
        }
        self.search_context.extend(delta.new_snippets);
        self.transcript.extend(delta.new_messages);
    }

    pub(crate) fn record_attempt(&mut self) {
        self.attempt_count += 1;
    }

    pub(crate) fn set_attempt_cap(&mut self, cap: u32) {
        self.attempt_cap = cap;
    }

    pub(crate) fn set_lane(&mut self, lane: Lane) {
        self.lane = lane;
    }

    pub(crate) fn mark_cache_hit(&mut self, answer: String) {
        self.current_answer = Some(answer);
        self.decision = StateDecision::CacheHit;
    }
}

/// Partial update to a [`ConversationState`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateDelta {
    pub current_answer: Option<String>,
    pub critique: Option<String>,
    pub new_snippets: Vec<String>,
    pub decision: Option<StateDecision>,
    pub search_query: Option<String>,
    pub reasoning: Option<String>,
    pub new_messages: Vec<LlmMessage>,
}

impl StateDelta {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(mut self, answer: impl Into<String>) -> Self {
        self.current_answer = Some(answer.into());
        self
    }

    pub fn critique(mut self, critique: impl Into<String>) -> Self {
        self.critique = Some(critique.into());
        self
    }

    pub fn snippet(mut self, snippet: impl Into<String>) -> Self {
        self.new_snippets.push(snippet.into());
        self
    }

    pub fn decision(mut self, decision: StateDecision) -> Self {
        self.decision = Some(decision);
        self
    }

    pub fn search_query(mut self, query: impl Into<String>) -> Self {
        self.search_query = Some(query.into());
        self
    }

    pub fn reasoning(mut self, reasoning: impl Into<String>) -> Self {
        self.reasoning = Some(reasoning.into());
        self
    }

    pub fn message(mut self, message: LlmMessage) -> Self {
        self.new_messages.push(message);
        self
    }

    pub fn messages(mut self, messages: impl IntoIterator<Item = LlmMessage>) -> Self {
        self.new_messages.extend(messages);
        self
    }
}
