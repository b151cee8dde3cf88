//! Utility types to support unbalanced binary search trees

#![warn(missing_docs)]

extern crate alloc;
use alloc::vec::Vec;

use core::{cmp::Ordering, fmt::Display, ops::Deref};

//-----------------------------------------------------------------------------------------------//

// A node in a binary search tree
#[derive(Clone, Copy)]
struct Node {
    parent: usize,
    left: usize,
    right: usize,
}

//-----------------------------------------------------------------------------------------------//

/// A tree of integer nodes
///
/// `Tree` manages the structure of a binary search tree over `usize` slots without storing the
/// keys itself; keys live in an external slice indexed by slot. The null slot is `!0`, and it
/// doubles as the one-past-the-end position when stepping through the tree in order. The tree is
/// never rebalanced: the order of insertion alone decides its shape, and a slot keeps its index
/// for as long as its key is present.
#[derive(Clone)]
pub struct Tree {
    node: Vec<Node>,
    root: usize,
    recycle: usize,
    count: usize,
}

impl Tree {
    /// Construct an empty tree
    pub fn new() -> Tree {
        Tree {
            node: Vec::new(),
            root: !0,
            recycle: !0,
            count: 0,
        }
    }

    /// Construct an empty tree, pre-allocating a given capacity
    pub fn with_capacity(capacity: usize) -> Tree {
        Tree {
            node: Vec::with_capacity(capacity),
            root: !0,
            recycle: !0,
            count: 0,
        }
    }

    /// Get the number of nodes in the tree
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Get the number of recycled slots in the tree
    #[inline]
    pub fn recycle_count(&self) -> usize {
        self.node.len() - self.count
    }

    /// Get the current allocated size of the tree. This is the current `count` plus the
    /// `recycle_count`. Note that this is not necessarily the same as the allocated capacity.
    #[inline]
    pub fn allocated_count(&self) -> usize {
        self.node.len()
    }

    /// Remove all nodes from the tree
    pub fn clear(&mut self) {
        self.node.truncate(0);
        self.root = !0;
        self.recycle = !0;
        self.count = 0;
    }

    /// Check whether the tree has any nodes
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Reserves capacity for at least `additional` more nodes
    ///
    /// The tree may already have some room that has been allocated then 'recycled', and this
    /// space is subtracted from the `additional` requested. This function returns the total
    /// amount of additional element storage that was required (if any), which is useful when
    /// implementing more complex types.
    pub fn reserve(&mut self, additional: usize) -> usize {
        let recycle_count = self.recycle_count();
        if additional > recycle_count {
            let required = additional - recycle_count;
            self.node.reserve(required);
            required
        } else {
            0
        }
    }

    /// Find a slot by key
    ///
    /// If the key is not found, then `usize::MAX` is returned. If the slice of keys is not
    /// sorted properly according to the binary tree, then the results are undefined.
    pub fn find_k<K: Ord>(&self, key: &K, key_slice: &[K]) -> usize {
        get_k(&self.node, self.root, key, key_slice)
    }

    /// Insert a key, attaching a new leaf slot where the descent bottoms out
    ///
    /// Returns the slot and whether it was newly attached. When an equal key is already present
    /// its slot is returned unchanged and nothing is modified. A new slot may be a recycled one
    /// that has previously been removed, or the next index in the ascending sequence. All key
    /// comparisons happen during the descent, before any slot is allocated or linked.
    pub fn insert_k<K: Ord>(&mut self, key: &K, key_slice: &[K]) -> (usize, bool) {
        match locate_k(&self.node, self.root, key, key_slice) {
            Location::Found(slot) => (slot, false),
            Location::Root => {
                let slot = self.alloc(!0);
                self.root = slot;
                (slot, true)
            }
            Location::Left(parent) => {
                let slot = self.alloc(parent);
                self.node[parent].left = slot;
                (slot, true)
            }
            Location::Right(parent) => {
                let slot = self.alloc(parent);
                self.node[parent].right = slot;
                (slot, true)
            }
        }
    }

    /// Find the slot of the smallest key that is greater than or equal to `key`
    ///
    /// If every stored key is smaller, then `usize::MAX` is returned.
    pub fn lower_bound_k<K: Ord>(&self, key: &K, key_slice: &[K]) -> usize {
        lower_bound_k(&self.node, self.root, key, key_slice)
    }

    /// Find the slot of the smallest key that is strictly greater than `key`
    ///
    /// If every stored key is smaller or equal, then `usize::MAX` is returned.
    pub fn upper_bound_k<K: Ord>(&self, key: &K, key_slice: &[K]) -> usize {
        let slot = lower_bound_k(&self.node, self.root, key, key_slice);

        // Keys are unique, so at most one slot can compare equal to the query; a lower bound
        // already greater than the query is the strict bound itself.
        if !slot != 0 && key_slice[slot] == *key {
            next(&self.node, slot)
        } else {
            slot
        }
    }

    /// Find a slot by string
    ///
    /// If the string is not found, then `usize::MAX` is returned. If the slice of strings is
    /// not sorted properly according to the binary tree, then the results are undefined.
    pub fn find_s<S: Deref<Target = str>>(&self, key: &str, key_slice: &[S]) -> usize {
        get_s(&self.node, self.root, key, key_slice)
    }

    /// Insert a string, attaching a new leaf slot where the descent bottoms out
    ///
    /// Returns the slot and whether it was newly attached. When an equal string is already
    /// present its slot is returned unchanged and nothing is modified.
    pub fn insert_s<S: Deref<Target = str>>(&mut self, key: &str, key_slice: &[S]) -> (usize, bool) {
        match locate_s(&self.node, self.root, key, key_slice) {
            Location::Found(slot) => (slot, false),
            Location::Root => {
                let slot = self.alloc(!0);
                self.root = slot;
                (slot, true)
            }
            Location::Left(parent) => {
                let slot = self.alloc(parent);
                self.node[parent].left = slot;
                (slot, true)
            }
            Location::Right(parent) => {
                let slot = self.alloc(parent);
                self.node[parent].right = slot;
                (slot, true)
            }
        }
    }

    /// Find the slot of the smallest string that is greater than or equal to `key`
    ///
    /// If every stored string is smaller, then `usize::MAX` is returned.
    pub fn lower_bound_s<S: Deref<Target = str>>(&self, key: &str, key_slice: &[S]) -> usize {
        lower_bound_s(&self.node, self.root, key, key_slice)
    }

    /// Find the slot of the smallest string that is strictly greater than `key`
    ///
    /// If every stored string is smaller or equal, then `usize::MAX` is returned.
    pub fn upper_bound_s<S: Deref<Target = str>>(&self, key: &str, key_slice: &[S]) -> usize {
        let slot = lower_bound_s(&self.node, self.root, key, key_slice);

        // Same uniqueness reliance as `upper_bound_k`.
        if !slot != 0 && key_slice[slot].deref() == key {
            next(&self.node, slot)
        } else {
            slot
        }
    }

    /// Remove a slot
    ///
    /// The slot is unlinked from the tree and added to the 'recycle bin' for possible future
    /// reallocation. A slot with two children first trades places with its in-order
    /// predecessor, so removal never moves or compares keys and every other slot keeps its
    /// index; in particular the in-order successor of the removed slot survives unchanged.
    pub fn remove(&mut self, slot: usize) {
        if let Some(root) = detach(&mut self.node, slot) {
            self.root = root;
        }
        self.free(slot);
    }

    /// Get the first slot in the tree
    #[inline]
    pub fn first(&self) -> usize {
        if !self.root == 0 {
            !0
        } else {
            leftmost(&self.node, self.root)
        }
    }

    /// Get the last slot in the tree
    #[inline]
    pub fn last(&self) -> usize {
        if !self.root == 0 {
            !0
        } else {
            rightmost(&self.node, self.root)
        }
    }

    /// Get the previous slot in the tree
    #[inline]
    pub fn prev(&self, slot: usize) -> usize {
        prev(&self.node, slot)
    }

    /// Get the next slot in the tree
    #[inline]
    pub fn next(&self, slot: usize) -> usize {
        next(&self.node, slot)
    }

    // Allocate and initialise a new slot
    fn alloc(&mut self, parent: usize) -> usize {
        // Increase the node count
        self.count += 1;

        // Recycle an old slot
        let slot = self.recycle;
        if !slot != 0 {
            let n = &mut self.node[slot];
            self.recycle = n.parent;
            n.parent = parent;
            n.left = !0;
            n.right = !0;

            return slot;
        }

        // Initialise a new one
        let slot = self.node.len();
        self.node.push(Node {
            parent,
            left: !0,
            right: !0,
        });

        // Return the new slot
        slot
    }

    // Free a slot and add it to the recycle queue
    fn free(&mut self, slot: usize) {
        // Decrease the node count
        self.count -= 1;

        // Recycle the slot
        self.node[slot].parent = self.recycle;
        self.recycle = slot;
    }

    // Debug tests
    #[cfg(debug_assertions)]
    #[allow(dead_code)]
    fn check(&self) {
        check_tree(&self.node, self.root);
        debug_assert_eq!(check_count(&self.node, self.root), self.count);
    }
}

impl Default for Tree {
    fn default() -> Self {
        Tree::new()
    }
}

impl Display for Tree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "[ ")?;
        let mut slot = self.first();
        while !slot != 0 {
            write!(f, "{slot} ")?;
            slot = self.next(slot);
        }
        write!(f, "]")?;
        Ok(())
    }
}

//-----------------------------------------------------------------------------------------------//

// IMPLEMENTATION NOTE
//
// The functions below are low level. They are not 'unsafe' in the Rust sense, but they implement
// very low level operations. Use with caution.

enum Location {
    Found(usize),
    Root,
    Left(usize),
    Right(usize),
}

// Get a slot in a tree
fn get_k<K: Ord>(node: &[Node], mut x: usize, key: &K, key_slice: &[K]) -> usize {
    // `x` should be a root
    debug_assert!(!x == 0 || node[x].parent == !0);

    loop {
        if !x == 0 {
            return !0;
        }

        match key.cmp(&key_slice[x]) {
            Ordering::Equal => {
                return x;
            }
            Ordering::Less => x = node[x].left,
            Ordering::Greater => x = node[x].right,
        }
    }
}

// Locate a slot in a tree, or if not found identify where to insert it
fn locate_k<K: Ord>(node: &[Node], mut x: usize, key: &K, key_slice: &[K]) -> Location {
    // `x` should be a root
    debug_assert!(!x == 0 || node[x].parent == !0);

    // First slot is a special case
    if !x == 0 {
        return Location::Root;
    }

    loop {
        match key.cmp(&key_slice[x]) {
            Ordering::Equal => return Location::Found(x),
            Ordering::Less => {
                let y = node[x].left;
                if !y == 0 {
                    return Location::Left(x);
                }
                x = y;
            }
            Ordering::Greater => {
                let y = node[x].right;
                if !y == 0 {
                    return Location::Right(x);
                }
                x = y;
            }
        }
    }
}

// Get a slot in a tree
fn get_s<S: Deref<Target = str>>(node: &[Node], mut x: usize, key: &str, key_slice: &[S]) -> usize {
    // `x` should be a root
    debug_assert!(!x == 0 || node[x].parent == !0);

    loop {
        if !x == 0 {
            return !0;
        }

        match key.cmp(&key_slice[x]) {
            Ordering::Equal => {
                return x;
            }
            Ordering::Less => x = node[x].left,
            Ordering::Greater => x = node[x].right,
        }
    }
}

// Locate a slot in a tree, or if not found identify where to insert it
fn locate_s<S: Deref<Target = str>>(
    node: &[Node],
    mut x: usize,
    key: &str,
    key_slice: &[S],
) -> Location {
    // `x` should be a root
    debug_assert!(!x == 0 || node[x].parent == !0);

    // First slot is a special case
    if !x == 0 {
        return Location::Root;
    }

    loop {
        match key.cmp(&key_slice[x]) {
            Ordering::Equal => return Location::Found(x),
            Ordering::Less => {
                let y = node[x].left;
                if !y == 0 {
                    return Location::Left(x);
                }
                x = y;
            }
            Ordering::Greater => {
                let y = node[x].right;
                if !y == 0 {
                    return Location::Right(x);
                }
                x = y;
            }
        }
    }
}

// Find the slot of the smallest key that is at least `key` within the subtree rooted at `x`
//
// An equal key ends the search at once. A greater query rules out the whole subtree root and
// its left branch, so the search continues right with no fallback. A smaller query descends
// left, and if nothing there qualifies the subtree root itself is the tightest bound:
// everything below it that is smaller has been excluded, and its own key already exceeds the
// query.
fn lower_bound_k<K: Ord>(node: &[Node], x: usize, key: &K, key_slice: &[K]) -> usize {
    if !x == 0 {
        return !0;
    }

    match key.cmp(&key_slice[x]) {
        Ordering::Equal => x,
        Ordering::Greater => lower_bound_k(node, node[x].right, key, key_slice),
        Ordering::Less => {
            let y = lower_bound_k(node, node[x].left, key, key_slice);
            if !y != 0 {
                y
            } else {
                x
            }
        }
    }
}

// Find the slot of the smallest string that is at least `key` within the subtree rooted at `x`
fn lower_bound_s<S: Deref<Target = str>>(
    node: &[Node],
    x: usize,
    key: &str,
    key_slice: &[S],
) -> usize {
    if !x == 0 {
        return !0;
    }

    match key.cmp(&key_slice[x]) {
        Ordering::Equal => x,
        Ordering::Greater => lower_bound_s(node, node[x].right, key, key_slice),
        Ordering::Less => {
            let y = lower_bound_s(node, node[x].left, key, key_slice);
            if !y != 0 {
                y
            } else {
                x
            }
        }
    }
}

// Exchange the tree positions of two slots
//
// `z` must lie in the left subtree of `x`. Each slot takes over the other's parent and children
// and the neighbours are rewired to agree. Only links move; the keys stay in their slots, so
// every other position in the tree is unaffected. When the two slots are directly linked the
// rewiring briefly leaves self references behind, and the final field swap resolves them.
fn exchange(node: &mut [Node], x: usize, z: usize) {
    let a = node[x];
    let b = node[z];

    if !a.parent != 0 {
        if node[a.parent].left == x {
            node[a.parent].left = z;
        } else {
            debug_assert_eq!(node[a.parent].right, x);
            node[a.parent].right = z;
        }
    }

    if !b.parent != 0 {
        if node[b.parent].left == z {
            node[b.parent].left = x;
        } else {
            debug_assert_eq!(node[b.parent].right, z);
            node[b.parent].right = x;
        }
    }

    if !a.left != 0 {
        node[a.left].parent = z;
    }
    if !a.right != 0 {
        node[a.right].parent = z;
    }
    if !b.left != 0 {
        node[b.left].parent = x;
    }
    if !b.right != 0 {
        node[b.right].parent = x;
    }

    let (first, second) = (node[x], node[z]);
    node[x] = second;
    node[z] = first;
}

// Unlink a slot from the tree, leaving the slot itself to the caller
//
// A slot with two children first trades places with its in-order predecessor, the rightmost
// slot of its left subtree; after the exchange it has at most one child. A slot with at most
// one child is removed by relinking the sole child (if any) into its place on the former
// parent. This function does not modify the detached slot's own links or free any memory, it
// just rewires the surrounding slots.
//
// If the root is changed by this operation then Some(root) is returned, otherwise the root is
// unchanged. A returned root of `!0` means the tree is now empty.
fn detach(node: &mut [Node], x: usize) -> Option<usize> {
    debug_assert!(!x != 0);

    let a = node[x].left;
    let b = node[x].right;

    if !a != 0 && !b != 0 {
        let z = rightmost(node, a);
        let promoted = if !node[x].parent == 0 { Some(z) } else { None };

        exchange(node, x, z);

        // `x` sits in the predecessor's old position now, which always has a parent, so the
        // second pass cannot move the root again.
        detach(node, x);
        return promoted;
    }

    let y = node[x].parent;
    let c = if !a != 0 { a } else { b };

    if !c != 0 {
        node[c].parent = y;
    }

    if !y == 0 {
        return Some(c);
    }

    if node[y].left == x {
        node[y].left = c;
    } else {
        debug_assert_eq!(node[y].right, x);
        node[y].right = c;
    }

    None
}

// Get the leftmost slot of the subtree rooted at `x` (the smallest)
fn leftmost(node: &[Node], mut x: usize) -> usize {
    debug_assert!(!x != 0);

    loop {
        let y = node[x].left;
        if !y == 0 {
            return x;
        }
        x = y;
    }
}

// Get the rightmost slot of the subtree rooted at `x` (the largest)
fn rightmost(node: &[Node], mut x: usize) -> usize {
    debug_assert!(!x != 0);

    loop {
        let y = node[x].right;
        if !y == 0 {
            return x;
        }
        x = y;
    }
}

// Get the logical predecessor of a slot
//
// With a left child the predecessor is the rightmost slot below it. Otherwise it is the first
// ancestor reached through a right edge; past the smallest slot the walk runs out of parents
// and yields `!0`.
fn prev(node: &[Node], mut x: usize) -> usize {
    let y = node[x].left;
    if !y != 0 {
        return rightmost(node, y);
    }

    loop {
        let y = node[x].parent;
        if !y == 0 {
            return !0;
        }
        if node[y].right == x {
            return y;
        }
        debug_assert_eq!(node[y].left, x);
        x = y;
    }
}

// Get the logical successor of a slot
//
// With a right child the successor is the leftmost slot below it. Otherwise it is the first
// ancestor reached through a left edge; past the largest slot the walk runs out of parents and
// yields `!0`, the one-past-the-end position.
fn next(node: &[Node], mut x: usize) -> usize {
    let y = node[x].right;
    if !y != 0 {
        return leftmost(node, y);
    }

    loop {
        let y = node[x].parent;
        if !y == 0 {
            return !0;
        }
        if node[y].left == x {
            return y;
        }
        debug_assert_eq!(node[y].right, x);
        x = y;
    }
}

//-----------------------------------------------------------------------------------------------//

// DEBUG : Check the tree structure
#[cfg(debug_assertions)]
fn check_tree(node: &[Node], root: usize) {
    // Check we are starting at the root
    debug_assert!(!root == 0 || node[root].parent == !0);

    // Iterate over slots and check each one
    let mut x = if !root == 0 { !0 } else { leftmost(node, root) };

    while !x != 0 {
        let y = node[x].left;
        let z = node[x].right;

        if !y != 0 {
            debug_assert_eq!(x, node[y].parent);
        }

        if !z != 0 {
            debug_assert_eq!(x, node[z].parent);
        }

        x = next(node, x);
    }
}

// DEBUG : Check the slot counts
#[cfg(debug_assertions)]
fn check_count(node: &[Node], root: usize) -> usize {
    // Count slots (forwards)
    let mut x = if !root == 0 { !0 } else { leftmost(node, root) };
    let mut count_f = 0;

    while !x != 0 {
        count_f += 1;
        x = next(node, x);
    }

    // Count slots (backwards)
    x = if !root == 0 { !0 } else { rightmost(node, root) };
    let mut count_b = 0;

    while !x != 0 {
        count_b += 1;
        x = prev(node, x);
    }

    debug_assert_eq!(count_f, count_b);

    // Return the count
    count_f
}

// DEBUG : Check the key order
#[cfg(debug_assertions)]
#[allow(dead_code)]
fn check_k<K: Ord>(node: &[Node], root: usize, key_slice: &[K]) {
    // Check we are starting at the root
    debug_assert!(!root == 0 || node[root].parent == !0);

    // Iterate over slots and check each consecutive pair
    let mut x = if !root == 0 { !0 } else { leftmost(node, root) };
    if !x == 0 {
        return;
    }

    let mut y = next(node, x);
    while !y != 0 {
        debug_assert!(key_slice[x] < key_slice[y]);
        x = y;
        y = next(node, y);
    }
}
