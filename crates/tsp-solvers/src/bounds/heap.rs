use tsp_core::instance::{distance::Distance, node::Node};

/// Indexed binary min-heap keyed by [Distance], supporting O(log n) insert/decrease-key/
/// extract-min and O(1) membership checks. Backs the Prim's-algorithm pass in
/// [crate::bounds::cbst].
pub struct IndexedMinHeap {
    heap: Vec<Node>,
    position: Vec<Option<usize>>,
    key: Vec<Distance>,
}

impl IndexedMinHeap {
    pub fn with_capacity(n: usize) -> Self {
        Self {
            heap: Vec::with_capacity(n),
            position: vec![None; n],
            key: vec![Distance::MAX; n],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn contains(&self, node: Node) -> bool {
        self.position[node.0].is_some()
    }

    pub fn insert(&mut self, node: Node, key: Distance) {
        debug_assert!(!self.contains(node));
        self.key[node.0] = key;
        self.heap.push(node);
        let idx = self.heap.len() - 1;
        self.position[node.0] = Some(idx);
        self.sift_up(idx);
    }

    pub fn decrease_key(&mut self, node: Node, key: Distance) {
        debug_assert!(self.contains(node));
        if key < self.key[node.0] {
            self.key[node.0] = key;
            let idx = self.position[node.0].expect("node must be in the heap");
            self.sift_up(idx);
        }
    }

    pub fn extract_min(&mut self) -> Option<(Node, Distance)> {
        if self.heap.is_empty() {
            return None;
        }
        let root = self.heap[0];
        let root_key = self.key[root.0];
        let last = self.heap.pop().expect("heap is non-empty");
        self.position[root.0] = None;
        if !self.heap.is_empty() {
            self.heap[0] = last;
            self.position[last.0] = Some(0);
            self.sift_down(0);
        }
        Some((root, root_key))
    }

    fn sift_up(&mut self, mut idx: usize) {
        while idx > 0 {
            let parent = (idx - 1) / 2;
            if self.key[self.heap[idx].0] < self.key[self.heap[parent].0] {
                self.heap.swap(idx, parent);
                self.position[self.heap[idx].0] = Some(idx);
                self.position[self.heap[parent].0] = Some(parent);
                idx = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut idx: usize) {
        loop {
            let left = 2 * idx + 1;
            let right = 2 * idx + 2;
            let mut smallest = idx;
            if left < self.heap.len() && self.key[self.heap[left].0] < self.key[self.heap[smallest].0] {
                smallest = left;
            }
            if right < self.heap.len() && self.key[self.heap[right].0] < self.key[self.heap[smallest].0] {
                smallest = right;
            }
            if smallest == idx {
                break;
            }
            self.heap.swap(idx, smallest);
            self.position[self.heap[idx].0] = Some(idx);
            self.position[self.heap[smallest].0] = Some(smallest);
            idx = smallest;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_in_ascending_order() {
        let mut heap = IndexedMinHeap::with_capacity(4);
        heap.insert(Node(0), Distance(5));
        heap.insert(Node(1), Distance(2));
        heap.insert(Node(2), Distance(9));
        heap.decrease_key(Node(2), Distance(1));

        assert_eq!(heap.extract_min(), Some((Node(2), Distance(1))));
        assert_eq!(heap.extract_min(), Some((Node(1), Distance(2))));
        assert_eq!(heap.extract_min(), Some((Node(0), Distance(5))));
        assert_eq!(heap.extract_min(), None);
    }

    #[test]
    fn decrease_key_ignores_larger_keys() {
        let mut heap = IndexedMinHeap::with_capacity(2);
        heap.insert(Node(0), Distance(3));
        heap.decrease_key(Node(0), Distance(10));
        assert_eq!(heap.extract_min(), Some((Node(0), Distance(3))));
    }
}
