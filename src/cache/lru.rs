//! LRU Tracker Module
//!
//! Implements Least Recently Used tracking for cache eviction.

// == Node Id ==
/// Handle to a key's slot in the tracker, kept alongside the cache entry.
pub type NodeId = usize;

#[derive(Debug)]
struct Node {
    key: String,
    prev: Option<NodeId>,
    next: Option<NodeId>,
}

// == LRU Tracker ==
/// Tracks access order for LRU eviction strategy.
///
/// A doubly linked list stored in a slot array, linked by index:
/// - Head = Most recently used
/// - Tail = Least recently used
///
/// Callers hold the `NodeId` returned by [`LruTracker::push_front`], which
/// makes touch and remove O(1). Freed slots are recycled.
#[derive(Debug, Default)]
pub struct LruTracker {
    nodes: Vec<Option<Node>>,
    free: Vec<NodeId>,
    head: Option<NodeId>,
    tail: Option<NodeId>,
    len: usize,
}

impl LruTracker {
    // == Constructor ==
    /// Creates a new empty LRU tracker.
    pub fn new() -> Self {
        Self::default()
    }

    // == Push Front ==
    /// Adds a key as the most recently used and returns its node.
    pub fn push_front(&mut self, key: String) -> NodeId {
        let node = Node {
            key,
            prev: None,
            next: None,
        };
        let id = match self.free.pop() {
            Some(id) => {
                self.nodes[id] = Some(node);
                id
            }
            None => {
                self.nodes.push(Some(node));
                self.nodes.len() - 1
            }
        };
        self.link_front(id);
        self.len += 1;
        id
    }

    // == Touch ==
    /// Marks a node as recently used (moves to front).
    pub fn touch(&mut self, id: NodeId) {
        if self.head == Some(id) || self.node(id).is_none() {
            return;
        }
        self.unlink(id);
        self.link_front(id);
    }

    // == Remove ==
    /// Removes a node from the tracker, returning its key.
    pub fn remove(&mut self, id: NodeId) -> Option<String> {
        self.node(id)?;
        self.unlink(id);
        let node = self.nodes.get_mut(id)?.take()?;
        self.free.push(id);
        self.len -= 1;
        Some(node.key)
    }

    // == Evict Oldest ==
    /// Returns and removes the least recently used key.
    ///
    /// Returns None if tracker is empty.
    pub fn evict_oldest(&mut self) -> Option<String> {
        let tail = self.tail?;
        self.remove(tail)
    }

    // == Peek Oldest ==
    /// Returns the least recently used key without removing it.
    pub fn peek_oldest(&self) -> Option<&str> {
        self.tail
            .and_then(|id| self.node(id))
            .map(|node| node.key.as_str())
    }

    /// Keys from most to least recently used.
    pub fn iter_newest_first(&self) -> impl Iterator<Item = &str> + '_ {
        std::iter::successors(self.head, move |&id| self.node(id).and_then(|n| n.next))
            .filter_map(move |id| self.node(id).map(|n| n.key.as_str()))
    }

    /// Keys from least to most recently used.
    pub fn iter_oldest_first(&self) -> impl Iterator<Item = &str> + '_ {
        std::iter::successors(self.tail, move |&id| self.node(id).and_then(|n| n.prev))
            .filter_map(move |id| self.node(id).map(|n| n.key.as_str()))
    }

    // == Clear ==
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    // == Length ==
    /// Returns the number of tracked keys.
    pub fn len(&self) -> usize {
        self.len
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id).and_then(Option::as_mut)
    }

    fn unlink(&mut self, id: NodeId) {
        let (prev, next) = match self.node(id) {
            Some(node) => (node.prev, node.next),
            None => return,
        };

        match prev.and_then(|p| self.node_mut(p)) {
            Some(prev_node) => prev_node.next = next,
            None => self.head = next,
        }
        match next.and_then(|n| self.node_mut(n)) {
            Some(next_node) => next_node.prev = prev,
            None => self.tail = prev,
        }

        if let Some(node) = self.node_mut(id) {
            node.prev = None;
            node.next = None;
        }
    }

    fn link_front(&mut self, id: NodeId) {
        let old_head = self.head;
        if let Some(node) = self.node_mut(id) {
            node.prev = None;
            node.next = old_head;
        }
        match old_head.and_then(|h| self.node_mut(h)) {
            Some(head_node) => head_node.prev = Some(id),
            None => self.tail = Some(id),
        }
        self.head = Some(id);
    }
}
