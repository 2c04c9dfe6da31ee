use sqlx::PgPool;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::analysis::cache::purge_expired;

/// Periodically deletes expired analysis cache rows.
pub fn spawn_cache_cleanup(pool: PgPool, every_secs: u64) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(Duration::from_secs(every_secs.max(1)));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            match purge_expired(&pool).await {
                Ok(0) => debug!("No expired analysis cache rows"),
                Ok(count) => info!(count, "Purged expired analysis cache rows"),
                Err(e) => error!("Analysis cache cleanup failed: {e}"),
            }
        }
    })
}
