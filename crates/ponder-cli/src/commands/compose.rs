//! Side-by-side post generation

use crate::console::{CliConsole, side_label};
use ponder_core::fanout::Composer;
use ponder_core::{LlmClient, PonderConfig, PonderResult, Side};
use std::sync::Arc;
use std::time::Instant;

pub async fn run(topic: &str, config: &PonderConfig, console: &CliConsole) -> PonderResult<()> {
    let composer = Composer::new(Arc::new(LlmClient::new(config.expert.clone())?));

    console.print_header(&format!("compose · {}", topic));
    let started = Instant::now();
    let composition = composer
        .compose(topic, |side, fragment| console.side_fragment(side, fragment))
        .await?;

    console.print_header(side_label(Side::Left));
    println!("{}", composition.sentimental);
    console.print_header(side_label(Side::Right));
    println!("{}", composition.rational);
    console.success(&format!("done in {:.2}s", started.elapsed().as_secs_f64()));
    Ok(())
}
