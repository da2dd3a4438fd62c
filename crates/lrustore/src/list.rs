//! Recency list
//!
//! Doubly-linked list stored in an arena. Links are slot indices, so the
//! arena is the only owner of entries. Slots 0 and 1 are the head and tail
//! sentinels; they never hold an entry and are never freed.

/// Slot of the head sentinel (most recently used side)
pub(crate) const HEAD: usize = 0;

/// Slot of the tail sentinel (least recently used side)
pub(crate) const TAIL: usize = 1;

/// Node in the recency list
struct Node<K, V> {
    entry: Option<(K, V)>,
    prev: usize,
    next: usize,
}

impl<K, V> Node<K, V> {
    fn sentinel(prev: usize, next: usize) -> Self {
        Self {
            entry: None,
            prev,
            next,
        }
    }
}

/// Arena-backed list ordered from most to least recently used
pub(crate) struct RecencyList<K, V> {
    nodes: Vec<Node<K, V>>,
    free_list: Vec<usize>,
    len: usize,
}

impl<K, V> RecencyList<K, V> {
    /// Create an empty list with room reserved for `reserve` entries
    pub(crate) fn with_capacity(reserve: usize) -> Self {
        // One spare slot: an insert lands before the matching eviction.
        let mut nodes = Vec::with_capacity(reserve.saturating_add(3));
        nodes.push(Node::sentinel(HEAD, TAIL));
        nodes.push(Node::sentinel(HEAD, TAIL));

        Self {
            nodes,
            free_list: Vec::new(),
            len: 0,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Allocate a slot for `key`/`value` and link it right after the head.
    pub(crate) fn push_front(&mut self, key: K, value: V) -> usize {
        let idx = match self.free_list.pop() {
            Some(idx) => {
                self.nodes[idx].entry = Some((key, value));
                idx
            }
            None => {
                self.nodes.push(Node {
                    entry: Some((key, value)),
                    prev: HEAD,
                    next: HEAD,
                });
                self.nodes.len() - 1
            }
        };

        self.link_front(idx);
        self.len += 1;
        idx
    }

    /// Relink an occupied slot right after the head.
    pub(crate) fn move_to_front(&mut self, idx: usize) {
        if self.nodes[HEAD].next == idx {
            return;
        }

        self.unlink(idx);
        self.link_front(idx);
    }

    /// Unlink and free a slot, handing back what it held.
    pub(crate) fn release(&mut self, idx: usize) -> Option<(K, V)> {
        if idx <= TAIL {
            return None;
        }

        let entry = self.nodes[idx].entry.take()?;
        self.unlink(idx);
        self.free_list.push(idx);
        self.len -= 1;
        Some(entry)
    }

    /// Slot right before the tail sentinel, if the list is not empty.
    pub(crate) fn back(&self) -> Option<usize> {
        match self.nodes[TAIL].prev {
            HEAD => None,
            idx => Some(idx),
        }
    }

    /// Slot right after the head sentinel, if the list is not empty.
    pub(crate) fn front(&self) -> Option<usize> {
        match self.nodes[HEAD].next {
            TAIL => None,
            idx => Some(idx),
        }
    }

    pub(crate) fn get(&self, idx: usize) -> Option<&(K, V)> {
        self.nodes.get(idx).and_then(|node| node.entry.as_ref())
    }

    pub(crate) fn get_mut(&mut self, idx: usize) -> Option<&mut (K, V)> {
        self.nodes.get_mut(idx).and_then(|node| node.entry.as_mut())
    }

    /// Drop every entry. Sentinels stay in place.
    pub(crate) fn clear(&mut self) {
        self.nodes.truncate(2);
        self.nodes[HEAD].next = TAIL;
        self.nodes[TAIL].prev = HEAD;
        self.free_list.clear();
        self.len = 0;
    }

    /// Walk from the head, stopping after `len` occupied slots.
    pub(crate) fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            list: self,
            cursor: self.nodes[HEAD].next,
            remaining: self.len,
        }
    }

    /// Walk from the tail towards the head, yielding slot ids.
    #[cfg(test)]
    pub(crate) fn slots_rev(&self) -> Vec<usize> {
        let mut out = Vec::with_capacity(self.len);
        let mut cursor = self.nodes[TAIL].prev;
        while cursor != HEAD && out.len() < self.len {
            out.push(cursor);
            cursor = self.nodes[cursor].prev;
        }
        out
    }

    /// Check `e.prev.next == e` and `e.next.prev == e` for every linked slot.
    #[cfg(test)]
    pub(crate) fn is_doubly_consistent(&self) -> bool {
        let mut cursor = self.nodes[HEAD].next;
        let mut seen = 0;
        while cursor != TAIL {
            let node = &self.nodes[cursor];
            if node.entry.is_none()
                || self.nodes[node.prev].next != cursor
                || self.nodes[node.next].prev != cursor
            {
                return false;
            }
            seen += 1;
            if seen > self.len {
                return false;
            }
            cursor = node.next;
        }
        seen == self.len && self.nodes[HEAD].prev == HEAD && self.nodes[TAIL].next == TAIL
    }

    fn link_front(&mut self, idx: usize) {
        let old_front = self.nodes[HEAD].next;

        self.nodes[idx].prev = HEAD;
        self.nodes[idx].next = old_front;
        self.nodes[old_front].prev = idx;
        self.nodes[HEAD].next = idx;
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = {
            let node = &self.nodes[idx];
            (node.prev, node.next)
        };

        self.nodes[prev].next = next;
        self.nodes[next].prev = prev;
    }
}

/// Iterator over `(slot, key, value)` from most to least recently used
pub(crate) struct Iter<'a, K, V> {
    list: &'a RecencyList<K, V>,
    cursor: usize,
    remaining: usize,
}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            list: self.list,
            cursor: self.cursor,
            remaining: self.remaining,
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (usize, &'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let idx = self.cursor;
        let node = &self.list.nodes[idx];
        let (key, value) = node.entry.as_ref()?;
        self.cursor = node.next;
        self.remaining -= 1;
        Some((idx, key, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(list: &RecencyList<&'static str, ()>) -> Vec<&'static str> {
        list.iter().map(|(_, k, _)| *k).collect()
    }

    #[test]
    fn test_list_empty() {
        let list: RecencyList<&str, ()> = RecencyList::with_capacity(3);

        assert_eq!(list.len(), 0);
        assert_eq!(list.front(), None);
        assert_eq!(list.back(), None);
        assert!(list.is_doubly_consistent());
    }

    #[test]
    fn test_list_push_front() {
        let mut list = RecencyList::with_capacity(3);

        let a = list.push_front("a", ());
        let b = list.push_front("b", ());

        assert_eq!(keys(&list), vec!["b", "a"]);
        assert_eq!(list.front(), Some(b));
        assert_eq!(list.back(), Some(a));
        assert!(list.is_doubly_consistent());
    }

    #[test]
    fn test_list_move_to_front() {
        let mut list = RecencyList::with_capacity(3);

        let a = list.push_front("a", ());
        list.push_front("b", ());
        list.push_front("c", ());

        list.move_to_front(a);
        assert_eq!(keys(&list), vec!["a", "c", "b"]);

        // Already at front
        list.move_to_front(a);
        assert_eq!(keys(&list), vec!["a", "c", "b"]);
        assert_eq!(list.len(), 3);
        assert!(list.is_doubly_consistent());
    }

    #[test]
    fn test_list_release_reuses_slot() {
        let mut list = RecencyList::with_capacity(2);

        let a = list.push_front("a", ());
        list.push_front("b", ());

        assert_eq!(list.release(a), Some(("a", ())));
        assert_eq!(list.release(a), None);
        assert_eq!(list.len(), 1);

        let c = list.push_front("c", ());
        assert_eq!(c, a);
        assert_eq!(keys(&list), vec!["c", "b"]);
        assert!(list.is_doubly_consistent());
    }

    #[test]
    fn test_list_sentinels_not_releasable() {
        let mut list: RecencyList<&str, ()> = RecencyList::with_capacity(1);

        assert_eq!(list.release(HEAD), None);
        assert_eq!(list.release(TAIL), None);
        assert!(list.is_doubly_consistent());
    }

    #[test]
    fn test_list_reverse_walk() {
        let mut list = RecencyList::with_capacity(3);

        let a = list.push_front("a", ());
        let b = list.push_front("b", ());
        let c = list.push_front("c", ());

        assert_eq!(list.slots_rev(), vec![a, b, c]);
    }

    #[test]
    fn test_list_zero_reserve() {
        let mut list = RecencyList::with_capacity(0);
        list.push_front("a", ());
        assert_eq!(list.len(), 1);
        assert!(list.is_doubly_consistent());
    }

    #[test]
    fn test_list_clear() {
        let mut list = RecencyList::with_capacity(3);

        list.push_front("a", ());
        list.push_front("b", ());
        list.clear();

        assert_eq!(list.len(), 0);
        assert_eq!(keys(&list), Vec::<&str>::new());
        assert!(list.is_doubly_consistent());

        let idx = list.push_front("c", ());
        assert_eq!(idx, 2);
    }
}
