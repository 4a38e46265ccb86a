use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Floating point priority with a total order, lower is better
#[derive(Clone, Copy, Debug, Default)]
pub struct Priority(pub f64);

impl PartialEq for Priority {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Priority {}

impl PartialOrd for Priority {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Priority {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Debug)]
struct QueuedItem<T> {
    priority: Priority,
    order: u64,
    item: T,
}

impl<T> PartialEq for QueuedItem<T> {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.order == other.order
    }
}

impl<T> Eq for QueuedItem<T> {}

impl<T> PartialOrd for QueuedItem<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for QueuedItem<T> {
    // Reversed, such that the max-heap pops the lowest priority first. Ties are broken by
    // insertion order.
    fn cmp(&self, other: &Self) -> Ordering {
        other.priority.cmp(&self.priority)
            .then_with(|| other.order.cmp(&self.order))
    }
}

/// Min-priority queue of items to expand
#[derive(Debug)]
pub struct AstarQueue<T> {
    heap: BinaryHeap<QueuedItem<T>>,
    num_queued: u64,
}

impl<T> AstarQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(capacity),
            num_queued: 0,
        }
    }

    pub fn queue(&mut self, item: T, priority: f64) {
        self.heap.push(QueuedItem { priority: Priority(priority), order: self.num_queued, item });
        self.num_queued += 1;
    }

    pub fn pop(&mut self) -> Option<(f64, T)> {
        self.heap.pop()
            .map(|queued| (queued.priority.0, queued.item))
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

impl<T> Default for AstarQueue<T> {
    fn default() -> Self {
        Self {
            heap: BinaryHeap::with_capacity(64),
            num_queued: 0,
        }
    }
}
