use std::collections::VecDeque;

/// Rolling history of the most recent readings. Push evicts the oldest entry
/// once the buffer is full, so a snapshot always covers the same fixed window.
pub struct RingBuffer<T> {
    max: usize,
    buf: VecDeque<T>,
}

impl<T: Copy> RingBuffer<T> {
    pub fn new(max: usize) -> Self {
        Self {
            max,
            buf: VecDeque::with_capacity(max),
        }
    }

    pub fn push(&mut self, item: T) {
        if self.buf.len() == self.max {
            self.buf.pop_front();
        }
        self.buf.push_back(item);
    }

    /// The whole history, oldest first. This is the order the wire snapshot
    /// message expects.
    pub fn snapshot(&self) -> Vec<T> {
        self.buf.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}
