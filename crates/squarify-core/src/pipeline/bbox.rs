//! Foreground bounding-box detection.
//!
//! Rows are partitioned across a request-scoped rayon pool. Each partition
//! folds its own extent; partial extents are merged in a single reduce, so
//! no accumulator is shared between threads.

use rayon::prelude::*;

use super::binarize::{BinaryMask, FOREGROUND};
use crate::types::BoundingBox;

/// Running min/max of foreground coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Extent {
    top: u32,
    bottom: u32,
    left: u32,
    right: u32,
}

impl Extent {
    fn merge(self, other: Extent) -> Extent {
        Extent {
            top: self.top.min(other.top),
            bottom: self.bottom.max(other.bottom),
            left: self.left.min(other.left),
            right: self.right.max(other.right),
        }
    }
}

fn merge(a: Option<Extent>, b: Option<Extent>) -> Option<Extent> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.merge(b)),
        (a, None) => a,
        (None, b) => b,
    }
}

fn row_extent(y: usize, row: &[u8]) -> Option<Extent> {
    let left = row.iter().position(|&p| p == FOREGROUND)?;
    let right = row.iter().rposition(|&p| p == FOREGROUND)?;
    Some(Extent {
        top: y as u32,
        bottom: y as u32,
        left: left as u32,
        right: right as u32,
    })
}

/// Finds the minimal rectangle enclosing every foreground pixel of a mask.
pub struct BoundingBoxScanner {
    workers: usize,
}

impl BoundingBoxScanner {
    /// Create a scanner using `workers` threads. `0` or `1` scans on the
    /// calling thread.
    pub fn new(workers: usize) -> Self {
        Self { workers }
    }

    /// Scan the mask. Returns `None` if it contains no foreground pixel.
    pub fn scan(&self, mask: &BinaryMask) -> Option<BoundingBox> {
        let (width, height) = (mask.width(), mask.height());
        if width == 0 || height == 0 {
            return None;
        }

        let raw = mask.as_raw();
        let row_len = width as usize;
        let extent = if self.workers <= 1 {
            scan_sequential(raw, row_len)
        } else {
            match rayon::ThreadPoolBuilder::new()
                .num_threads(self.workers)
                .build()
            {
                Ok(pool) => pool.install(|| scan_parallel(raw, row_len)),
                Err(e) => {
                    tracing::warn!("Scan pool unavailable ({e}), scanning sequentially");
                    scan_sequential(raw, row_len)
                }
            }
        }?;

        BoundingBox::new(extent.left, extent.top, extent.right, extent.bottom)?
            .clamp_to(width, height)
    }
}

fn scan_sequential(raw: &[u8], row_len: usize) -> Option<Extent> {
    raw.chunks_exact(row_len)
        .enumerate()
        .fold(None, |acc, (y, row)| merge(acc, row_extent(y, row)))
}

fn scan_parallel(raw: &[u8], row_len: usize) -> Option<Extent> {
    raw.par_chunks_exact(row_len)
        .enumerate()
        .fold(
            || None,
            |acc, (y, row)| merge(acc, row_extent(y, row)),
        )
        .reduce(|| None, merge)
}
