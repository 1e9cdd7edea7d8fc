//! Buffer pool: a fixed set of frames caching decoded node pages.
//!
//! Eviction is first-fit over the frames' fixed array order, not LRU
//! — see [`pool`] for why that distinction is load-bearing here.

mod pool;

pub use pool::{BufferPool, BufferPoolImpl, FrameRef, FrameRefMut, PageGuard, PageGuardMut, PoolStats};
