use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::trace;
use rayon::prelude::*;

/// Counters filled by the matrix-multiplication kernel.
///
/// A collector is attached to a graph through [`MatmulConfig::stats`] and only
/// sees the multiplications run for that graph's operators.
#[derive(Debug, Default)]
pub struct KernelStats {
    calls: AtomicU64,
    parallel_calls: AtomicU64,
    mul_adds: AtomicU64,
    nanos: AtomicU64,
}

impl KernelStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }

    /// Calls that were split across rayon workers.
    pub fn parallel_calls(&self) -> u64 {
        self.parallel_calls.load(Ordering::Relaxed)
    }

    /// Multiply-add count, `m·k·n` summed over all calls.
    pub fn mul_adds(&self) -> u64 {
        self.mul_adds.load(Ordering::Relaxed)
    }

    pub fn elapsed(&self) -> Duration {
        Duration::from_nanos(self.nanos.load(Ordering::Relaxed))
    }

    pub fn reset(&self) {
        self.calls.store(0, Ordering::Relaxed);
        self.parallel_calls.store(0, Ordering::Relaxed);
        self.mul_adds.store(0, Ordering::Relaxed);
        self.nanos.store(0, Ordering::Relaxed);
    }

    fn record(&self, mul_adds: u64, parallel: bool, elapsed: Duration) {
        self.calls.fetch_add(1, Ordering::Relaxed);
        if parallel {
            self.parallel_calls.fetch_add(1, Ordering::Relaxed);
        }
        self.mul_adds.fetch_add(mul_adds, Ordering::Relaxed);
        self.nanos
            .fetch_add(elapsed.as_nanos().min(u64::MAX as u128) as u64, Ordering::Relaxed);
    }
}

/// Tuning and profiling for matrix multiplication.
#[derive(Debug, Clone)]
pub struct MatmulConfig {
    /// Multiply-add count (`m·k·n`) above which output rows are computed in
    /// parallel.
    pub parallel_threshold: usize,
    /// Optional collector for call counts and timing.
    pub stats: Option<Arc<KernelStats>>,
}

impl Default for MatmulConfig {
    fn default() -> Self {
        MatmulConfig {
            parallel_threshold: 64 * 64 * 64,
            stats: None,
        }
    }
}

impl MatmulConfig {
    pub fn with_stats(mut self, stats: Arc<KernelStats>) -> Self {
        self.stats = Some(stats);
        self
    }

    pub fn with_parallel_threshold(mut self, parallel_threshold: usize) -> Self {
        self.parallel_threshold = parallel_threshold;
        self
    }
}

/// Row-major `m×k · k×n` product.
///
/// Above the threshold the output is split into rows handed to rayon; each
/// worker writes only its own row and reads the shared inputs. Every row is
/// accumulated in the same order either way, so the serial and parallel
/// paths produce identical bits.
pub(crate) fn matmul_kernel(
    a: &[f64],
    b: &[f64],
    m: usize,
    k: usize,
    n: usize,
    config: &MatmulConfig,
) -> Vec<f64> {
    let mut out = vec![0.0; m * n];
    if m == 0 || n == 0 {
        return out;
    }

    let work = m * k * n;
    let parallel = work > config.parallel_threshold && m > 1;
    trace!(
        "matmul {}x{}x{} ({})",
        m,
        k,
        n,
        if parallel { "parallel" } else { "serial" }
    );
    let start = config.stats.as_ref().map(|_| Instant::now());

    let fill_row = |(i, out_row): (usize, &mut [f64])| {
        let a_row = &a[i * k..(i + 1) * k];
        for (p, &a_ip) in a_row.iter().enumerate() {
            let b_row = &b[p * n..(p + 1) * n];
            for (o, &b_pj) in out_row.iter_mut().zip(b_row.iter()) {
                *o += a_ip * b_pj;
            }
        }
    };
    if parallel {
        out.par_chunks_mut(n).enumerate().for_each(fill_row);
    } else {
        out.chunks_mut(n).enumerate().for_each(fill_row);
    }

    if let (Some(stats), Some(start)) = (config.stats.as_ref(), start) {
        stats.record(work as u64, parallel, start.elapsed());
    }
    out
}

#[cfg(test)]
#[path = "kernel_test.rs"]
mod tests;
