//! Mini Cache - demo workload
//!
//! Builds a cache from environment configuration, drives it from several
//! threads and reports the resulting statistics.

use std::sync::Arc;
use std::thread;
use std::time::Instant;

use anyhow::{anyhow, Context};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mini_cache::{Cache, CacheBuilder, Config};

/// Entry point for the demo.
///
/// # Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Build the cache with the configured policy and TTL
/// 4. Run the read-through workload on worker threads
/// 5. Log the final statistics as JSON
fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mini_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Mini Cache demo");

    let config = Config::from_env().context("failed to load configuration")?;
    info!(
        "Configuration loaded: capacity={}, policy={}, default_ttl={:?}, workers={}, operations={}",
        config.capacity, config.policy, config.default_ttl, config.workers, config.operations
    );

    let mut builder = CacheBuilder::<u64, String>::new(config.capacity).policy(config.policy);
    if let Some(ttl) = config.default_ttl {
        builder = builder.default_ttl(ttl);
    }
    let cache = Arc::new(builder.build().context("failed to build cache")?);

    let started = Instant::now();
    let handles: Vec<_> = (0..config.workers)
        .map(|worker| {
            let cache = Arc::clone(&cache);
            let config = config.clone();
            thread::spawn(move || run_worker(&cache, &config, worker as u64))
        })
        .collect();

    for handle in handles {
        handle
            .join()
            .map_err(|_| anyhow!("worker thread panicked"))??;
    }

    let stats = cache.stats();
    info!(
        "Workload finished in {:?}: hit_rate={:.3}",
        started.elapsed(),
        stats.hit_rate()
    );
    info!("Final stats: {}", serde_json::to_string(&stats)?);

    if stats.current_size > stats.capacity {
        warn!("Cache reported more entries than its capacity");
    }

    Ok(())
}

/// Read-through loop: look a key up, load it on a miss, occasionally drop one.
fn run_worker(cache: &Cache<u64, String>, config: &Config, worker: u64) -> mini_cache::Result<()> {
    let key_space = config.key_space.max(1);

    for i in 0..config.operations as u64 {
        // Skewed towards low keys so that policies have something to keep
        let spread = (worker * 7_919 + i * 31) % key_space;
        let key = spread.saturating_mul(spread) / key_space;

        if i % 10 == 9 {
            cache.remove(&key);
            continue;
        }
        if cache.get(&key).is_none() {
            cache.put(key, format!("value-{key}"))?;
        }
    }
    Ok(())
}
