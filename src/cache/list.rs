//! Ordered List Module
//!
//! Doubly linked list whose nodes live in an arena of slots addressed by
//! integer handles. Freed slots are recycled through a free list, so every
//! operation except iteration is O(1) and no raw pointers are involved.
//!
//! - Head = most recently used
//! - Tail = least recently used

// == Handle ==
/// Stable, non-owning reference to a node in an [`OrderedList`].
///
/// A handle stays valid until the node it points to is removed. After that
/// the slot may be reused, so owners must drop handles they no longer track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle(usize);

#[derive(Debug)]
struct Node<T> {
    value: T,
    prev: Option<Handle>,
    next: Option<Handle>,
}

// == Ordered List ==
/// Arena-backed doubly linked list.
#[derive(Debug)]
pub struct OrderedList<T> {
    /// Node slots, `None` when free
    slots: Vec<Option<Node<T>>>,
    /// Indices of free slots available for reuse
    free: Vec<usize>,
    head: Option<Handle>,
    tail: Option<Handle>,
    len: usize,
}

impl<T> Default for OrderedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> OrderedList<T> {
    // == Constructor ==
    /// Creates an empty list.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    /// Creates an empty list with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            ..Self::new()
        }
    }

    // == Length ==
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Handle of the most recently used node.
    pub fn head(&self) -> Option<Handle> {
        self.head
    }

    /// Handle of the least recently used node.
    pub fn tail(&self) -> Option<Handle> {
        self.tail
    }

    // == Access ==
    pub fn get(&self, handle: Handle) -> Option<&T> {
        self.node(handle).map(|node| &node.value)
    }

    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        self.slots
            .get_mut(handle.0)
            .and_then(|slot| slot.as_mut())
            .map(|node| &mut node.value)
    }

    // == Add Head ==
    /// Inserts `value` at the head and returns its handle.
    pub fn add_head(&mut self, value: T) -> Handle {
        let node = Node {
            value,
            prev: None,
            next: self.head,
        };
        let handle = match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = Some(node);
                Handle(idx)
            }
            None => {
                self.slots.push(Some(node));
                Handle(self.slots.len() - 1)
            }
        };

        match self.head {
            Some(old_head) => self.set_prev(old_head, Some(handle)),
            None => self.tail = Some(handle),
        }
        self.head = Some(handle);
        self.len += 1;
        handle
    }

    // == Delete Head ==
    /// Removes and returns the head value.
    pub fn delete_head(&mut self) -> Option<T> {
        let head = self.head?;
        self.remove(head)
    }

    // == Delete Tail ==
    /// Removes and returns the tail value.
    pub fn delete_tail(&mut self) -> Option<T> {
        let tail = self.tail?;
        self.remove(tail)
    }

    // == Remove ==
    /// Unlinks the node at `handle`, frees its slot and returns its value.
    ///
    /// Returns `None` if the handle does not point at a live node.
    pub fn remove(&mut self, handle: Handle) -> Option<T> {
        self.unlink(handle)?;
        let node = self.slots[handle.0].take()?;
        self.free.push(handle.0);
        self.len -= 1;
        Some(node.value)
    }

    // == Move To Head ==
    /// Moves the node at `handle` to the head.
    ///
    /// Returns `false` if the handle does not point at a live node.
    pub fn move_to_head(&mut self, handle: Handle) -> bool {
        if self.head == Some(handle) {
            return self.node(handle).is_some();
        }
        if self.unlink(handle).is_none() {
            return false;
        }

        let old_head = self.head;
        if let Some(node) = self.node_mut(handle) {
            node.prev = None;
            node.next = old_head;
        }
        match old_head {
            Some(old_head) => self.set_prev(old_head, Some(handle)),
            None => self.tail = Some(handle),
        }
        self.head = Some(handle);
        true
    }

    // == Clear ==
    /// Drops every node and releases the arena.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    // == Iteration ==
    /// Iterates handles from head (most recent) to tail (least recent).
    pub fn handles(&self) -> Handles<'_, T> {
        Handles {
            list: self,
            current: self.head,
        }
    }

    // == Internals ==
    fn node(&self, handle: Handle) -> Option<&Node<T>> {
        self.slots.get(handle.0).and_then(|slot| slot.as_ref())
    }

    fn node_mut(&mut self, handle: Handle) -> Option<&mut Node<T>> {
        self.slots.get_mut(handle.0).and_then(|slot| slot.as_mut())
    }

    fn set_prev(&mut self, handle: Handle, prev: Option<Handle>) {
        if let Some(node) = self.node_mut(handle) {
            node.prev = prev;
        }
    }

    fn set_next(&mut self, handle: Handle, next: Option<Handle>) {
        if let Some(node) = self.node_mut(handle) {
            node.next = next;
        }
    }

    /// Patches both neighbours around `handle` and updates head/tail.
    /// The node itself keeps stale links until the caller relinks or frees it.
    fn unlink(&mut self, handle: Handle) -> Option<()> {
        let (prev, next) = {
            let node = self.node(handle)?;
            (node.prev, node.next)
        };

        match prev {
            Some(prev) => self.set_next(prev, next),
            None => self.head = next,
        }
        match next {
            Some(next) => self.set_prev(next, prev),
            None => self.tail = prev,
        }
        Some(())
    }

    /// Panics if head/tail, links, or length disagree.
    #[cfg(test)]
    pub(crate) fn validate_invariants(&self) {
        assert_eq!(self.head.is_none(), self.is_empty(), "head set on empty list");
        assert_eq!(self.tail.is_none(), self.is_empty(), "tail set on empty list");

        let mut count = 0;
        let mut prev = None;
        let mut current = self.head;
        while let Some(handle) = current {
            let node = self.node(handle).expect("dangling handle in list");
            assert_eq!(node.prev, prev, "broken prev link");
            prev = Some(handle);
            current = node.next;
            count += 1;
            assert!(count <= self.len, "cycle detected");
        }
        assert_eq!(prev, self.tail, "tail does not terminate the chain");
        assert_eq!(count, self.len, "length mismatch");
        assert_eq!(
            self.slots.iter().filter(|slot| slot.is_some()).count(),
            self.len,
            "live slot count mismatch"
        );
    }
}

/// Iterator over list handles, head to tail.
pub struct Handles<'a, T> {
    list: &'a OrderedList<T>,
    current: Option<Handle>,
}

impl<T> Iterator for Handles<'_, T> {
    type Item = Handle;

    fn next(&mut self) -> Option<Self::Item> {
        let handle = self.current?;
        self.current = self.list.node(handle).and_then(|node| node.next);
        Some(handle)
    }
}
