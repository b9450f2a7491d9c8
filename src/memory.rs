//! Allocator configuration and allocation counters
//!
//! - `mimalloc`: use mimalloc as the global allocator
//! - `memory_tracking`: wrap the allocator and count live and peak bytes
//!
//! Without `memory_tracking` every counter reads 0.

#[cfg(feature = "memory_tracking")]
mod tracking {
    use std::alloc::{GlobalAlloc, Layout};
    use std::sync::atomic::{AtomicUsize, Ordering};

    pub static ALLOCATED: AtomicUsize = AtomicUsize::new(0);
    pub static PEAK_ALLOCATED: AtomicUsize = AtomicUsize::new(0);

    pub struct TrackingAllocator;

    #[cfg(feature = "mimalloc")]
    static UNDERLYING: mimalloc::MiMalloc = mimalloc::MiMalloc;

    #[cfg(not(feature = "mimalloc"))]
    static UNDERLYING: std::alloc::System = std::alloc::System;

    fn record_growth(size: usize) {
        let current = ALLOCATED.fetch_add(size, Ordering::Relaxed) + size;
        PEAK_ALLOCATED.fetch_max(current, Ordering::Relaxed);
    }

    unsafe impl GlobalAlloc for TrackingAllocator {
        unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
            let ptr = UNDERLYING.alloc(layout);
            if !ptr.is_null() {
                record_growth(layout.size());
            }
            ptr
        }

        unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
            ALLOCATED.fetch_sub(layout.size(), Ordering::Relaxed);
            UNDERLYING.dealloc(ptr, layout)
        }

        unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
            let new_ptr = UNDERLYING.realloc(ptr, layout, new_size);
            if !new_ptr.is_null() {
                ALLOCATED.fetch_sub(layout.size(), Ordering::Relaxed);
                record_growth(new_size);
            }
            new_ptr
        }
    }
}

#[cfg(feature = "memory_tracking")]
#[global_allocator]
static GLOBAL: tracking::TrackingAllocator = tracking::TrackingAllocator;

#[cfg(all(feature = "mimalloc", not(feature = "memory_tracking")))]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[cfg(feature = "memory_tracking")]
use std::sync::atomic::Ordering;

/// Bytes currently allocated through the global allocator
#[cfg(feature = "memory_tracking")]
pub fn allocated() -> usize {
    tracking::ALLOCATED.load(Ordering::SeqCst)
}

/// Highest value `allocated()` has reached since the last reset
#[cfg(feature = "memory_tracking")]
pub fn peak_allocated() -> usize {
    tracking::PEAK_ALLOCATED.load(Ordering::SeqCst)
}

/// Reset the peak to the current value, returning `(current, old_peak)`
#[cfg(feature = "memory_tracking")]
pub fn reset_peak() -> (usize, usize) {
    let current = tracking::ALLOCATED.load(Ordering::SeqCst);
    let peak = tracking::PEAK_ALLOCATED.swap(current, Ordering::SeqCst);
    (current, peak)
}

#[cfg(not(feature = "memory_tracking"))]
pub fn allocated() -> usize {
    0
}

#[cfg(not(feature = "memory_tracking"))]
pub fn peak_allocated() -> usize {
    0
}

#[cfg(not(feature = "memory_tracking"))]
pub fn reset_peak() -> (usize, usize) {
    (0, 0)
}

/// Whether the counters are live
pub const fn is_tracking() -> bool {
    cfg!(feature = "memory_tracking")
}
