use std::time::Duration;

use tokio::time::MissedTickBehavior;

use crate::state::AppState;
use crate::usecase::projector::GraphProjector;
use crate::usecase::relay::OutboxRelay;

/// Spawns the single relay task. One task, one interval, each cycle awaited
/// to completion before the next tick, so cycles never overlap.
pub fn spawn_outbox_relay(state: AppState, interval: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let relay = OutboxRelay {
            outbox: state.outbox_store(),
            projector: GraphProjector {
                graph: state.graph_store(),
            },
        };
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tracing::info!(interval_secs = interval.as_secs(), "outbox relay started");
        loop {
            ticker.tick().await;
            match relay.run_cycle().await {
                Ok(stats) if stats.is_empty() => {}
                Ok(stats) => {
                    tracing::info!(
                        succeeded = stats.succeeded,
                        retried = stats.retried,
                        quarantined = stats.quarantined,
                        "outbox relay cycle finished"
                    );
                }
                Err(err) => {
                    // Most likely the pending query itself failed; the next
                    // tick retries from scratch.
                    tracing::error!(error = %err, "outbox relay cycle failed");
                }
            }
        }
    })
}
