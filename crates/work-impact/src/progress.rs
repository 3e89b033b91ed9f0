// Copyright (c) 2026 - present work-impact contributors
// SPDX-License-Identifier: MIT

//! Elapsed-time ticker for long model calls
//!
//! The model answers in one chunk with no way to estimate progress, so the
//! best we can do is show that the process is still alive.

use std::future::Future;
use std::io::Write;
use std::time::Duration;

use tokio::time::{Instant, interval_at};

/// How often the ticker prints
pub const TICK_INTERVAL: Duration = Duration::from_secs(2);

/// Await `future`, printing elapsed seconds to `out` every `every`
///
/// Write failures are ignored; the ticker is cosmetic.
pub async fn with_elapsed_ticker<F, W>(future: F, every: Duration, mut out: W) -> F::Output
where
    F: Future,
    W: Write,
{
    let start = Instant::now();
    let mut ticker = interval_at(start + every, every);
    tokio::pin!(future);

    loop {
        tokio::select! {
            output = &mut future => {
                let _ = writeln!(out, "\rLLM completed in {}s", start.elapsed().as_secs());
                let _ = out.flush();
                return output;
            }
            _ = ticker.tick() => {
                let _ = write!(
                    out,
                    "\rStill working... {}s elapsed (waiting on Gemini response, no ETA)",
                    start.elapsed().as_secs()
                );
                let _ = out.flush();
            }
        }
    }
}
