use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info};

/// Pool of fixed-capacity receive buffers shared by the listener and every
/// in-flight query.
///
/// A buffer is checked out before a datagram is read into it and travels with
/// that query until the query finishes; dropping the [`PooledBuffer`] hands it
/// back. At most `max_idle` returned buffers are retained, so the idle set never
/// outgrows the peak number of concurrent queries.
pub struct BufferPool {
    free: Mutex<Vec<Box<[u8]>>>,

    buffer_size: usize,

    max_idle: usize,

    checked_out: AtomicUsize,

    total_allocated: AtomicU64,

    total_reused: AtomicU64,
}

impl BufferPool {
    pub fn new(buffer_size: usize, max_idle: usize) -> Self {
        info!(buffer_size, max_idle, "Initializing datagram buffer pool");

        Self {
            free: Mutex::new(Vec::new()),
            buffer_size,
            max_idle,
            checked_out: AtomicUsize::new(0),
            total_allocated: AtomicU64::new(0),
            total_reused: AtomicU64::new(0),
        }
    }

    /// Take an idle buffer or allocate a new one.
    pub fn checkout(self: &Arc<Self>) -> PooledBuffer {
        let reused = self
            .free
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop();

        let data = match reused {
            Some(data) => {
                self.total_reused.fetch_add(1, Ordering::Relaxed);
                data
            }
            None => {
                self.total_allocated.fetch_add(1, Ordering::Relaxed);
                debug!(buffer_size = self.buffer_size, "Allocated datagram buffer");
                vec![0u8; self.buffer_size].into_boxed_slice()
            }
        };

        self.checked_out.fetch_add(1, Ordering::AcqRel);

        PooledBuffer {
            data: Some(data),
            len: 0,
            pool: Arc::clone(self),
        }
    }

    fn release(&self, data: Box<[u8]>) {
        {
            let mut free = self.free.lock().unwrap_or_else(PoisonError::into_inner);
            if free.len() < self.max_idle {
                free.push(data);
            }
        }
        self.checked_out.fetch_sub(1, Ordering::AcqRel);
    }

    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    pub fn stats(&self) -> BufferPoolStats {
        BufferPoolStats {
            checked_out: self.checked_out.load(Ordering::Acquire),
            idle: self.free.lock().unwrap_or_else(PoisonError::into_inner).len(),
            total_allocated: self.total_allocated.load(Ordering::Relaxed),
            total_reused: self.total_reused.load(Ordering::Relaxed),
        }
    }
}

/// Exclusively owned datagram buffer, returned to its pool on drop.
pub struct PooledBuffer {
    data: Option<Box<[u8]>>,
    len: usize,
    pool: Arc<BufferPool>,
}

impl PooledBuffer {
    /// Whole capacity, for receiving into.
    pub fn spare_mut(&mut self) -> &mut [u8] {
        self.data.as_deref_mut().unwrap_or_default()
    }

    /// Marks the first `len` bytes as the received datagram.
    pub fn set_len(&mut self, len: usize) {
        self.len = len.min(self.capacity());
    }

    /// The received datagram.
    pub fn filled(&self) -> &[u8] {
        let data = self.data.as_deref().unwrap_or_default();
        &data[..self.len]
    }

    pub fn capacity(&self) -> usize {
        self.data.as_ref().map_or(0, |data| data.len())
    }
}

impl Drop for PooledBuffer {
    fn drop(&mut self) {
        if let Some(data) = self.data.take() {
            self.pool.release(data);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferPoolStats {
    /// Buffers currently owned by the listener or a query
    pub checked_out: usize,
    /// Buffers waiting in the pool
    pub idle: usize,
    pub total_allocated: u64,
    pub total_reused: u64,
}
