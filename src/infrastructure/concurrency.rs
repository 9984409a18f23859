/// Concurrency management for Metricraft.
/// Configures the global thread pool used by the parsing and metric passes.

use anyhow::Result;

/// Initialize the global rayon thread pool.
/// With `workers == 0`, reserves ~50% of CPU capacity so the host stays
/// responsive, minimum 1 worker.
pub fn init_thread_pool(workers: usize) -> Result<()> {
    let cores = num_cpus::get();
    let workers = if workers == 0 {
        std::cmp::max(1, cores / 2)
    } else {
        workers
    };

    rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build_global()?;

    println!(
        "[metricraft] Initialized thread pool: {} workers (system has {} cores)",
        workers, cores
    );

    Ok(())
}
