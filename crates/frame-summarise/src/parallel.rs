#[cfg(all(feature = "parallel", not(target_arch = "wasm32")))]
use rayon::ThreadPool;
#[cfg(all(feature = "parallel", not(target_arch = "wasm32")))]
use std::sync::OnceLock;

/// Workers that evaluate the groups of one summary concurrently.
///
/// Each group owns its scope, so groups are handed out one per task and the results are read back
/// in group order. Built on first use; `None` sends every summary down the sequential path.
#[cfg(all(feature = "parallel", not(target_arch = "wasm32")))]
static GROUP_POOL: OnceLock<Option<ThreadPool>> = OnceLock::new();

#[cfg(all(feature = "parallel", not(target_arch = "wasm32")))]
fn requested_threads() -> usize {
    std::env::var("RAYON_NUM_THREADS")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .filter(|&n| n > 0)
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
}

#[cfg(all(feature = "parallel", not(target_arch = "wasm32")))]
fn build_pool() -> Option<ThreadPool> {
    let threads = requested_threads();
    let build = |n| {
        rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .thread_name(|i| format!("summarise-{i}"))
            .build()
    };

    match build(threads) {
        Ok(pool) => Some(pool),
        Err(err) if threads > 1 => {
            log::warn!("failed to start {threads} summarise threads ({err}); retrying with one");
            build(1).ok()
        }
        Err(err) => {
            log::warn!("failed to start summarise thread pool: {err}");
            None
        }
    }
}

#[cfg(all(feature = "parallel", not(target_arch = "wasm32")))]
pub(crate) fn group_pool() -> Option<&'static ThreadPool> {
    GROUP_POOL.get_or_init(build_pool).as_ref()
}
