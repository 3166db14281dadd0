//! # Threading Configuration
//!
//! ## Role
//! Configure the rayon thread pool that per-profile enumeration runs on.
//!
//! ## Design
//!
//! ### Thread Pool Builder
//! `None` uses every available core. Workers are named `dnaclad-worker-{i}`
//! so they are identifiable in profilers and panic messages.
//!
//! ### Parallel Iteration Pattern
//! Each enumerator is owned by exactly one worker for its whole drain; only
//! the atomic telemetry counters are shared:
//! ```rust,ignore
//! use rayon::prelude::*;
//!
//! profiles
//!     .par_iter()
//!     .map(|profile| {
//!         let mut state = MatchState::for_profile(profile.clone(), &params)?;
//!         let n = state.count_path_sets()?;
//!         telemetry.add_path_sets(n as u64);
//!         Ok(n)
//!     })
//!     .collect::<Result<Vec<_>>>()
//! ```

use crate::error::{DnacladError, Result};

/// Create a configured thread pool
pub fn build_thread_pool(n_threads: Option<usize>) -> Result<rayon::ThreadPool> {
    let n_threads = n_threads.unwrap_or_else(available_threads);
    rayon::ThreadPoolBuilder::new()
        .num_threads(n_threads)
        .thread_name(|i| format!("dnaclad-worker-{}", i))
        .build()
        .map_err(|e| DnacladError::config(format!("Failed to create thread pool: {}", e)))
}

pub fn available_threads() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_size() {
        let pool = build_thread_pool(Some(2)).unwrap();
        assert_eq!(pool.current_num_threads(), 2);
        assert!(available_threads() >= 1);
    }
}
