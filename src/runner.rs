//! One-shot embedding smoke test.
//!
//! Calls a provider once with [`INPUT`], times the call and writes either a
//! short success report or the provider's error to the console.

use crate::embedding::EmbeddingProvider;
use std::io::{self, Write};
use tokio::time::Instant;

pub const INPUT: &str = "Hello world";
pub const PREVIEW_LEN: usize = 5;

pub const START_MARKER: &str = "Testing embedding generation...";
pub const SUCCESS_MARKER: &str = "Embedding generated successfully";
pub const FAILURE_MARKER: &str = "Embedding generation failed:";

/// Runs the smoke test against `provider`, reporting to stdout.
pub async fn run<P>(provider: &P)
where
    P: EmbeddingProvider + ?Sized,
{
    if let Err(err) = run_to(provider, &mut io::stdout()).await {
        log::error!("failed to write report: {:?}", err);
    }
}

/// Same as [`run`], writing the report to `out`. Provider failures are part of
/// the report; only failures of `out` itself are returned.
pub async fn run_to<P, W>(provider: &P, out: &mut W) -> io::Result<()>
where
    P: EmbeddingProvider + ?Sized,
    W: Write + Send,
{
    writeln!(out, "{}", START_MARKER)?;
    out.flush()?;

    let start = Instant::now();
    let result = provider.embed(INPUT).await;
    let elapsed_ms = start.elapsed().as_millis();
    log::debug!("provider returned after {}ms", elapsed_ms);

    match result {
        Ok(embedding) => {
            writeln!(out, "{}", SUCCESS_MARKER)?;
            writeln!(out, "Length: {}", embedding.len())?;
            writeln!(out, "Time taken: {}ms", elapsed_ms)?;
            writeln!(out, "First {} values: {:?}", PREVIEW_LEN, preview(&embedding))?;
        }
        Err(err) => {
            writeln!(out, "{} {:#}", FAILURE_MARKER, err)?;
        }
    }

    out.flush()
}

fn preview(embedding: &[f32]) -> &[f32] {
    &embedding[..embedding.len().min(PREVIEW_LEN)]
}
