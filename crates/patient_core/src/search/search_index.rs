//! Ordered secondary index keyed by patient id.
//!
//! # Responsibility
//! - Map patient ids to record-store handles with logarithmic lookup.
//! - Provide ascending in-order traversal for sorted listings.
//!
//! # Invariants
//! - Left subtree keys < node key < right subtree keys; no duplicates.
//! - Every node is height-balanced (AVL, |balance| <= 1), so sequential
//!   id issuance never degrades lookup into a linear chain.
//! - The index never owns records; it stores `RecordHandle`s that the
//!   manager re-resolves through `RecordStore::get`.
//! - Two-child removal takes the in-order successor (minimum of the right
//!   subtree) and then removes that successor from the right subtree.

use crate::model::patient::PatientId;
use crate::repo::record_store::RecordHandle;
use std::cmp::Ordering;

type Link = Option<Box<Node>>;

#[derive(Debug)]
struct Node {
    key: PatientId,
    handle: RecordHandle,
    height: u32,
    left: Link,
    right: Link,
}

impl Node {
    fn leaf(key: PatientId, handle: RecordHandle) -> Box<Self> {
        Box::new(Self {
            key,
            handle,
            height: 1,
            left: None,
            right: None,
        })
    }
}

/// Balanced binary search tree from `PatientId` to `RecordHandle`.
#[derive(Debug, Default)]
pub struct SearchIndex {
    root: Link,
    len: usize,
}

impl SearchIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Inserts `id -> handle`.
    ///
    /// Returns `false` and leaves the existing mapping untouched when `id` is
    /// already indexed.
    pub fn insert(&mut self, id: PatientId, handle: RecordHandle) -> bool {
        let mut inserted = false;
        self.root = Some(insert_node(self.root.take(), id, handle, &mut inserted));
        if inserted {
            self.len += 1;
        }
        inserted
    }

    /// Looks up the handle stored for `id`.
    pub fn search(&self, id: PatientId) -> Option<RecordHandle> {
        let mut cursor = self.root.as_deref();
        while let Some(node) = cursor {
            cursor = match id.cmp(&node.key) {
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
                Ordering::Equal => return Some(node.handle),
            };
        }
        None
    }

    pub fn contains(&self, id: PatientId) -> bool {
        self.search(id).is_some()
    }

    /// Removes `id`. Returns `false` if it was not indexed.
    pub fn remove(&mut self, id: PatientId) -> bool {
        let mut removed = false;
        self.root = remove_node(self.root.take(), id, &mut removed);
        if removed {
            self.len -= 1;
        }
        removed
    }

    /// Replaces the handle stored for `id` without touching tree shape.
    ///
    /// Returns `false` if `id` is not indexed.
    pub fn update_reference(&mut self, id: PatientId, handle: RecordHandle) -> bool {
        let mut cursor = self.root.as_deref_mut();
        while let Some(node) = cursor {
            cursor = match id.cmp(&node.key) {
                Ordering::Less => node.left.as_deref_mut(),
                Ordering::Greater => node.right.as_deref_mut(),
                Ordering::Equal => {
                    node.handle = handle;
                    return true;
                }
            };
        }
        false
    }

    /// Ascending `(id, handle)` pairs.
    pub fn inorder_entries(&self) -> Vec<(PatientId, RecordHandle)> {
        let mut entries = Vec::with_capacity(self.len);
        let mut stack: Vec<&Node> = Vec::new();
        let mut cursor = self.root.as_deref();
        loop {
            while let Some(node) = cursor {
                stack.push(node);
                cursor = node.left.as_deref();
            }
            let Some(node) = stack.pop() else {
                break;
            };
            entries.push((node.key, node.handle));
            cursor = node.right.as_deref();
        }
        entries
    }

    pub fn inorder_ids(&self) -> Vec<PatientId> {
        self.inorder_entries().into_iter().map(|(id, _)| id).collect()
    }

    pub fn inorder_handles(&self) -> Vec<RecordHandle> {
        self.inorder_entries()
            .into_iter()
            .map(|(_, handle)| handle)
            .collect()
    }

    /// Tree height for diagnostics: 0 when empty, 1 for a single node.
    pub fn height(&self) -> u32 {
        link_height(&self.root)
    }

    pub fn clear(&mut self) {
        self.root = None;
        self.len = 0;
    }
}

fn link_height(link: &Link) -> u32 {
    link.as_ref().map_or(0, |node| node.height)
}

fn update_height(node: &mut Node) {
    node.height = 1 + link_height(&node.left).max(link_height(&node.right));
}

fn balance_factor(node: &Node) -> i64 {
    i64::from(link_height(&node.left)) - i64::from(link_height(&node.right))
}

fn rotate_right(mut node: Box<Node>) -> Box<Node> {
    let Some(mut pivot) = node.left.take() else {
        return node;
    };
    node.left = pivot.right.take();
    update_height(&mut node);
    pivot.right = Some(node);
    update_height(&mut pivot);
    pivot
}

fn rotate_left(mut node: Box<Node>) -> Box<Node> {
    let Some(mut pivot) = node.right.take() else {
        return node;
    };
    node.right = pivot.left.take();
    update_height(&mut node);
    pivot.left = Some(node);
    update_height(&mut pivot);
    pivot
}

fn rebalance(mut node: Box<Node>) -> Box<Node> {
    update_height(&mut node);
    let balance = balance_factor(&node);

    if balance > 1 {
        if node.left.as_deref().map_or(0, balance_factor) < 0 {
            node.left = node.left.take().map(rotate_left);
        }
        return rotate_right(node);
    }
    if balance < -1 {
        if node.right.as_deref().map_or(0, balance_factor) > 0 {
            node.right = node.right.take().map(rotate_right);
        }
        return rotate_left(node);
    }
    node
}

fn insert_node(
    link: Link,
    key: PatientId,
    handle: RecordHandle,
    inserted: &mut bool,
) -> Box<Node> {
    let Some(mut node) = link else {
        *inserted = true;
        return Node::leaf(key, handle);
    };

    match key.cmp(&node.key) {
        Ordering::Less => node.left = Some(insert_node(node.left.take(), key, handle, inserted)),
        Ordering::Greater => {
            node.right = Some(insert_node(node.right.take(), key, handle, inserted))
        }
        Ordering::Equal => return node,
    }
    rebalance(node)
}

fn min_entry(node: &Node) -> (PatientId, RecordHandle) {
    let mut current = node;
    while let Some(left) = current.left.as_deref() {
        current = left;
    }
    (current.key, current.handle)
}

fn remove_node(link: Link, key: PatientId, removed: &mut bool) -> Link {
    let mut node = link?;

    match key.cmp(&node.key) {
        Ordering::Less => node.left = remove_node(node.left.take(), key, removed),
        Ordering::Greater => node.right = remove_node(node.right.take(), key, removed),
        Ordering::Equal => {
            *removed = true;
            match (node.left.take(), node.right.take()) {
                (None, None) => return None,
                (Some(child), None) | (None, Some(child)) => return Some(child),
                (Some(left), Some(right)) => {
                    let (successor_key, successor_handle) = min_entry(&right);
                    node.key = successor_key;
                    node.handle = successor_handle;
                    node.left = Some(left);
                    let mut successor_removed = false;
                    node.right = remove_node(Some(right), successor_key, &mut successor_removed);
                }
            }
        }
    }
    Some(rebalance(node))
}
