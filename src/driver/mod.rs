//! Fixed-rate load driver
//!
//! Issues `rate` calls per second against one provider for a fixed duration,
//! without waiting for individual responses: calls race independently and
//! each completion reports the elapsed milliseconds for its pre-assigned
//! tick index over a channel. After the last tick the driver drains
//! completions until every dispatched call has reported or the grace
//! deadline elapses; slower calls are counted as lost. Transport errors are
//! logged to stderr and never abort a sweep.

use crate::addresses::AddressPool;
use crate::error::Result;
use crate::provider::Provider;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;

/// The JSON-RPC call issued on every tick, with the address slot left open.
#[derive(Debug, Clone)]
pub struct CallTemplate {
    method: String,
    target: String,
    selector: String,
}

impl CallTemplate {
    /// An `eth_call` against `target` invoking the function `selector`.
    pub fn eth_call(target: &str, selector: &str) -> Self {
        Self {
            method: "eth_call".to_string(),
            target: target.to_string(),
            selector: selector.to_string(),
        }
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    /// Positional parameters with `address` substituted into the call data:
    /// selector, 12 zero bytes of padding, then the 20-byte address.
    pub fn params(&self, address: &str) -> Value {
        let data = format!("0x{}{}{}", self.selector, "0".repeat(24), address);
        json!([{ "to": self.target, "data": data }, "latest"])
    }
}

/// Outcome of one (provider, call-rate) sweep
#[derive(Debug, Clone)]
pub struct RunResult {
    /// Latencies of completed calls, in milliseconds, in tick order
    pub samples: Vec<u64>,
    /// Number of dispatch attempts, always `rate * duration_secs`
    pub dispatched: usize,
    /// Calls that completed with a transport or RPC error
    pub failed: usize,
    /// Calls still in flight when the grace deadline elapsed
    pub lost: usize,
}

impl RunResult {
    /// Fraction of dispatched calls that produced a sample
    pub fn completion_rate(&self) -> f64 {
        if self.dispatched == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.dispatched as f64
    }
}

/// Outcome of one dispatched call, tagged with its pre-assigned tick index
/// so samples land in their own slot regardless of completion order.
enum Completion {
    Sample { index: usize, ms: u64 },
    Failed,
}

/// Run one sweep: `rate` calls per second for `duration`, then settle for at
/// most `grace_period`.
pub async fn run_sweep(
    provider: Arc<Provider>,
    pool: Arc<AddressPool>,
    template: &CallTemplate,
    rate: u32,
    duration: Duration,
    grace_period: Duration,
) -> Result<RunResult> {
    let total = duration.as_secs() as usize * rate as usize;
    let (tx, rx) = mpsc::unbounded_channel();

    let mut interval = tokio::time::interval(Duration::from_secs_f64(1.0 / rate as f64));

    for index in 0..total {
        interval.tick().await;

        let params = template.params(pool.random());
        let method = template.method.clone();
        let provider = provider.clone();
        let tx = tx.clone();

        tokio::spawn(async move {
            let started = Instant::now();
            let completion = match provider.call(&method, params).await {
                Ok(_) => Completion::Sample {
                    index,
                    ms: started.elapsed().as_millis() as u64,
                },
                Err(e) => {
                    eprintln!("call failed on '{}': {}", provider.name(), e);
                    Completion::Failed
                }
            };
            // receiver may already have hit the grace deadline
            let _ = tx.send(completion);
        });
    }

    // Drop the dispatcher's sender so the channel closes once every spawned
    // call has reported.
    drop(tx);

    Ok(settle(rx, total, grace_period).await)
}

/// Drain completions until all dispatched calls have reported or the grace
/// deadline passes.
async fn settle(
    mut rx: mpsc::UnboundedReceiver<Completion>,
    dispatched: usize,
    grace_period: Duration,
) -> RunResult {
    let deadline = Instant::now() + grace_period;
    let mut slots: Vec<Option<u64>> = vec![None; dispatched];
    let mut failed = 0;

    loop {
        match tokio::time::timeout_at(deadline, rx.recv()).await {
            Ok(Some(Completion::Sample { index, ms })) => slots[index] = Some(ms),
            Ok(Some(Completion::Failed)) => failed += 1,
            // channel closed: every call reported
            Ok(None) => break,
            // grace deadline elapsed with calls still in flight
            Err(_) => break,
        }
    }

    // incomplete slots are filtered here, never fed to the summarizer
    let samples: Vec<u64> = slots.into_iter().flatten().collect();
    let lost = dispatched - samples.len() - failed;
    RunResult {
        samples,
        dispatched,
        failed,
        lost,
    }
}
