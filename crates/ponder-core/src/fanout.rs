//! Side-by-side generation
//!
//! Two responders stream concurrently. Fragments reach the caller in arrival
//! order, tagged with the side that produced them, and the full texts are
//! returned once both streams have finished. Nothing here touches a cache.

use crate::agent::Responder;
use crate::error::PonderResult;
use crate::llm::LlmMessage;
use crate::workflows::prompts;
use futures::StreamExt;
use futures::stream;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Which branch a fragment belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

/// Full texts of both branches
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideBySide {
    pub left: String,
    pub right: String,
}

impl SideBySide {
    fn push(&mut self, side: Side, fragment: &str) {
        match side {
            Side::Left => self.left.push_str(fragment),
            Side::Right => self.right.push_str(fragment),
        }
    }
}

/// Stream both prompts concurrently, calling `on_fragment` for every
/// non-empty fragment as it arrives.
///
/// The first error from either branch aborts the whole fan-out.
pub async fn side_by_side<F>(
    left: (&dyn Responder, &[LlmMessage]),
    right: (&dyn Responder, &[LlmMessage]),
    mut on_fragment: F,
) -> PonderResult<SideBySide>
where
    F: FnMut(Side, &str) + Send,
{
    let (left_stream, right_stream) =
        futures::try_join!(left.0.ask_stream(left.1), right.0.ask_stream(right.1))?;

    let mut merged = stream::select(
        left_stream.map(|chunk| (Side::Left, chunk)),
        right_stream.map(|chunk| (Side::Right, chunk)),
    );

    let mut result = SideBySide::default();
    while let Some((side, chunk)) = merged.next().await {
        let Some(fragment) = chunk?.content else {
            continue;
        };
        if fragment.is_empty() {
            continue;
        }
        on_fragment(side, &fragment);
        result.push(side, &fragment);
    }

    debug!(
        left_chars = result.left.chars().count(),
        right_chars = result.right.chars().count(),
        "fan-out complete"
    );
    Ok(result)
}

/// Two social posts on one topic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Composition {
    pub sentimental: String,
    pub rational: String,
}

/// Writes a sentimental post (left) and a rational post (right) side by side
pub struct Composer {
    responder: Arc<dyn Responder>,
}

impl Composer {
    pub fn new(responder: Arc<dyn Responder>) -> Self {
        Self { responder }
    }

    #[instrument(skip(self, on_fragment))]
    pub async fn compose<F>(&self, topic: &str, on_fragment: F) -> PonderResult<Composition>
    where
        F: FnMut(Side, &str) + Send,
    {
        let sentimental = prompts::sentimental_post(topic);
        let rational = prompts::rational_post(topic);
        let texts = side_by_side(
            (self.responder.as_ref(), &sentimental),
            (self.responder.as_ref(), &rational),
            on_fragment,
        )
        .await?;

        Ok(Composition {
            sentimental: texts.left,
            rational: texts.right,
        })
    }
}
