//! Implementation of the patricia tree.

use crate::{to_right, Error, Prefix};

mod iter;

pub use iter::*;

/// Path-compressed binary trie (patricia tree) mapping prefixes of at most `width` bits to values.
/// Any lookup performs longest-prefix match.
///
/// All nodes live in a single table. Removed nodes are put on a free list and reused by later
/// insertions, so repeated insert/remove cycles do not grow the table.
#[derive(Clone)]
pub struct PatriciaTree<P, T> {
    pub(crate) table: Vec<Node<P, T>>,
    pub(crate) free: Vec<usize>,
    width: u8,
    count: usize,
}

impl<P, T> Default for PatriciaTree<P, T>
where
    P: Prefix,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<P, T> PatriciaTree<P, T>
where
    P: Prefix,
{
    /// Create an empty tree whose width is the full width of the prefix representation (32 bits
    /// for `Ipv4Net` and `(u32, u8)`, 128 bits for `Ipv6Net`).
    pub fn new() -> Self {
        Self::empty(P::max_len())
    }

    /// Create an empty tree storing prefixes of at most `width` bits. Addresses passed to
    /// [`Self::lookup`] are interpreted as their first `width` bits (counted from the most
    /// significant bit of the representation).
    ///
    /// ```
    /// # use patricia_lpm::*;
    /// let mut pt: PatriciaTree<(u32, u8), &str> = PatriciaTree::with_width(24).unwrap();
    /// assert_eq!(pt.insert((0x0a000000, 8), "a"), Ok(None));
    /// assert_eq!(
    ///     pt.insert((0x0a010203, 32), "b"),
    ///     Err(Error::InvalidLength { len: 32, width: 24 })
    /// );
    /// assert_eq!(
    ///     PatriciaTree::<(u32, u8), ()>::with_width(33).err(),
    ///     Some(Error::InvalidWidth { width: 33, max: 32 })
    /// );
    /// ```
    pub fn with_width(width: u8) -> Result<Self, Error> {
        let max = P::max_len();
        if width == 0 || width > max {
            return Err(Error::InvalidWidth { width, max });
        }
        log::debug!("create patricia tree with a width of {width} bits");
        Ok(Self::empty(width))
    }

    fn empty(width: u8) -> Self {
        Self {
            table: vec![Node::root()],
            free: Vec::new(),
            width,
            count: 0,
        }
    }

    /// Address width of the tree in bits.
    pub fn width(&self) -> u8 {
        self.width
    }

    /// Number of stored prefixes.
    pub fn len(&self) -> usize {
        self.count
    }

    /// `true` if no prefix is stored.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Get the value of an element by matching exactly on the prefix.
    ///
    /// ```
    /// # use patricia_lpm::*;
    /// # use ipnet::Ipv4Net;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut pt: PatriciaTree<Ipv4Net, _> = PatriciaTree::new();
    /// pt.insert("192.168.1.0/24".parse()?, 1)?;
    /// assert_eq!(pt.get(&"192.168.1.0/24".parse()?), Some(&1));
    /// assert_eq!(pt.get(&"192.168.2.0/24".parse()?), None);
    /// assert_eq!(pt.get(&"192.168.0.0/23".parse()?), None);
    /// assert_eq!(pt.get(&"192.168.1.128/25".parse()?), None);
    /// # Ok(())
    /// # }
    /// ```
    pub fn get(&self, prefix: &P) -> Option<&T> {
        self.find(prefix)
            .and_then(|idx| self.table[idx].value.as_ref())
    }

    /// Get a mutable reference to a value of an element by matching exactly on the prefix.
    pub fn get_mut(&mut self, prefix: &P) -> Option<&mut T> {
        let idx = self.find(prefix)?;
        self.table[idx].value.as_mut()
    }

    /// Get the stored prefix and its value by matching exactly on the prefix.
    pub fn get_key_value(&self, prefix: &P) -> Option<(&P, &T)> {
        self.find(prefix)
            .and_then(|idx| self.table[idx].prefix_value())
    }

    /// Check if a prefix is stored in the tree.
    pub fn contains_key(&self, prefix: &P) -> bool {
        self.get(prefix).is_some()
    }

    /// Get the value of the longest stored prefix containing `addr`. Only the first
    /// [`Self::width`] bits of `addr` are considered.
    ///
    /// This is the lookup fast path: it performs a single descent without backtracking, visiting
    /// at most one node per stored prefix length on the path to `addr`.
    ///
    /// ```
    /// # use patricia_lpm::*;
    /// # use ipnet::Ipv4Net;
    /// # use std::net::Ipv4Addr;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut pt: PatriciaTree<Ipv4Net, _> = PatriciaTree::new();
    /// pt.insert("10.0.0.0/8".parse()?, 1)?;
    /// pt.insert("10.1.0.0/16".parse()?, 2)?;
    /// assert_eq!(pt.lookup(Ipv4Addr::new(10, 1, 2, 3).into()), Some(&2));
    /// assert_eq!(pt.lookup(Ipv4Addr::new(10, 2, 2, 3).into()), Some(&1));
    /// assert_eq!(pt.lookup(Ipv4Addr::new(11, 0, 0, 0).into()), None);
    /// # Ok(())
    /// # }
    /// ```
    #[inline]
    pub fn lookup(&self, addr: P::R) -> Option<&T> {
        self.get_lpm(&P::from_repr_len(addr, self.width))
            .map(|(_, v)| v)
    }

    /// Get a mutable reference to the value of the longest stored prefix containing `addr`.
    pub fn lookup_mut(&mut self, addr: P::R) -> Option<&mut T> {
        let addr = P::from_repr_len(addr, self.width);
        self.get_lpm_mut(&addr).map(|(_, v)| v)
    }

    /// Get the longest stored prefix that contains `prefix` (or is equal to it), together with
    /// its value.
    ///
    /// ```
    /// # use patricia_lpm::*;
    /// # use ipnet::Ipv4Net;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut pt: PatriciaTree<Ipv4Net, _> = PatriciaTree::new();
    /// pt.insert("192.168.1.0/24".parse()?, 1)?;
    /// pt.insert("192.168.0.0/23".parse()?, 2)?;
    /// assert_eq!(pt.get_lpm(&"192.168.1.1/32".parse()?), Some((&"192.168.1.0/24".parse()?, &1)));
    /// assert_eq!(pt.get_lpm(&"192.168.0.0/24".parse()?), Some((&"192.168.0.0/23".parse()?, &2)));
    /// assert_eq!(pt.get_lpm(&"192.168.0.0/22".parse()?), None);
    /// # Ok(())
    /// # }
    /// ```
    pub fn get_lpm<'a>(&'a self, prefix: &P) -> Option<(&'a P, &'a T)> {
        let mut idx = 0;
        let mut best_match: Option<(&P, &T)> = None;
        loop {
            best_match = self.table[idx].prefix_value().or(best_match);
            match self.get_direction(idx, prefix) {
                Direction::Enter { next, .. } => idx = next,
                _ => return best_match,
            }
        }
    }

    /// Get a mutable reference to the value of the longest stored prefix that contains `prefix`.
    pub fn get_lpm_mut(&mut self, prefix: &P) -> Option<(&P, &mut T)> {
        let mut idx = 0;
        let mut best_match: Option<usize> = None;
        loop {
            if self.table[idx].value.is_some() {
                best_match = Some(idx);
            }
            match self.get_direction(idx, prefix) {
                Direction::Enter { next, .. } => idx = next,
                _ => break,
            }
        }
        match best_match {
            Some(idx) => self.table[idx].prefix_value_mut(),
            None => None,
        }
    }

    /// Get the longest stored prefix that contains `prefix`.
    pub fn get_lpm_prefix(&self, prefix: &P) -> Option<&P> {
        self.get_lpm(prefix).map(|(p, _)| p)
    }

    /// Insert a new prefix into the tree. If the prefix was already present, its value is
    /// replaced and the old value is returned. Bits after the prefix length are ignored.
    ///
    /// Returns [`Error::InvalidLength`] if the prefix is longer than [`Self::width`]; the tree is
    /// not modified in that case.
    ///
    /// ```
    /// # use patricia_lpm::*;
    /// # use ipnet::Ipv4Net;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut pt: PatriciaTree<Ipv4Net, _> = PatriciaTree::new();
    /// assert_eq!(pt.insert("192.168.0.0/23".parse()?, 1)?, None);
    /// assert_eq!(pt.insert("192.168.1.0/24".parse()?, 2)?, None);
    /// assert_eq!(pt.insert("192.168.1.0/24".parse()?, 3)?, Some(2));
    /// assert_eq!(pt.len(), 2);
    /// # Ok(())
    /// # }
    /// ```
    pub fn insert(&mut self, prefix: P, value: T) -> Result<Option<T>, Error> {
        if prefix.prefix_len() > self.width {
            return Err(Error::InvalidLength {
                len: prefix.prefix_len(),
                width: self.width,
            });
        }
        let prefix = prefix.normalized();
        let mut idx = 0;
        loop {
            match self.get_direction_for_insert(idx, &prefix) {
                DirectionForInsert::Enter { next, .. } => idx = next,
                DirectionForInsert::Reached => {
                    let old = self.table[idx].value.replace(value);
                    if old.is_none() {
                        self.count += 1;
                    }
                    return Ok(old);
                }
                DirectionForInsert::NewLeaf { right } => {
                    log::trace!(
                        "append /{} below /{}",
                        prefix.prefix_len(),
                        self.table[idx].prefix.prefix_len()
                    );
                    let new = self.new_node(prefix, Some(value));
                    self.set_child(idx, new, right);
                    break;
                }
                DirectionForInsert::NewChild { right, child_right } => {
                    log::trace!(
                        "insert /{} above an existing subtree",
                        prefix.prefix_len()
                    );
                    let new = self.new_node(prefix, Some(value));
                    if let Some(child) = self.set_child(idx, new, right) {
                        self.set_child(new, child, child_right);
                    }
                    break;
                }
                DirectionForInsert::NewBranch {
                    branch_prefix,
                    right,
                    prefix_right,
                } => {
                    log::trace!(
                        "split at bit {} to insert /{}",
                        branch_prefix.prefix_len(),
                        prefix.prefix_len()
                    );
                    let branch = self.new_node(branch_prefix, None);
                    let new = self.new_node(prefix, Some(value));
                    if let Some(child) = self.set_child(idx, branch, right) {
                        self.set_child(branch, child, !prefix_right);
                    }
                    self.set_child(branch, new, prefix_right);
                    break;
                }
            }
        }
        self.count += 1;
        Ok(None)
    }

    /// Insert all elements of `iter`, stopping at the first element that cannot be inserted.
    /// Elements before the failing one remain in the tree.
    pub fn try_extend<I>(&mut self, iter: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = (P, T)>,
    {
        for (prefix, value) in iter {
            self.insert(prefix, value)?;
        }
        Ok(())
    }

    /// Remove the exact prefix from the tree and return its value. Removing a prefix that is not
    /// stored is a no-op. Nodes that are left without a value and with a single child are merged
    /// into that child, so the tree is identical to one where the prefix was never inserted.
    ///
    /// ```
    /// # use patricia_lpm::*;
    /// # use ipnet::Ipv4Net;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut pt: PatriciaTree<Ipv4Net, _> = PatriciaTree::new();
    /// let prefix = "192.168.1.0/24".parse()?;
    /// pt.insert(prefix, 1)?;
    /// assert_eq!(pt.get(&prefix), Some(&1));
    /// assert_eq!(pt.remove(&prefix), Some(1));
    /// assert_eq!(pt.get(&prefix), None);
    /// assert_eq!(pt.remove(&prefix), None);
    /// # Ok(())
    /// # }
    /// ```
    pub fn remove(&mut self, prefix: &P) -> Option<T> {
        let mut idx = 0;
        let mut grandparent = None;
        let mut grandparent_right = false;
        let mut parent = None;
        let mut parent_right = false;
        // first, search for the element
        loop {
            match self.get_direction(idx, prefix) {
                Direction::Reached => break,
                Direction::Enter { next, right } => {
                    grandparent_right = parent_right;
                    parent_right = right;
                    grandparent = parent;
                    parent = Some(idx);
                    idx = next;
                }
                Direction::Missing => return None,
            }
        }
        if self.table[idx].value.is_none() {
            return None;
        }
        self.remove_node(idx, parent, parent_right, grandparent, grandparent_right)
            .0
    }

    /// Keep only the elements for which `f` returns `true`. The tree structure is merged in the
    /// same way as [`Self::remove`] does.
    pub fn retain<F>(&mut self, f: F)
    where
        F: FnMut(&P, &T) -> bool,
    {
        self._retain(0, None, false, None, false, f);
    }

    /// Remove all elements, calling `finalizer` exactly once on every stored value. The tree
    /// remains usable afterwards, with the same width.
    ///
    /// ```
    /// # use patricia_lpm::*;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut pt: PatriciaTree<(u32, u8), _> = PatriciaTree::new();
    /// pt.insert((0x0a000000, 8), 1)?;
    /// pt.insert((0x0a010000, 16), 2)?;
    /// let mut released = Vec::new();
    /// pt.clear_with(|v| released.push(v));
    /// released.sort();
    /// assert_eq!(released, vec![1, 2]);
    /// assert!(pt.is_empty());
    /// # Ok(())
    /// # }
    /// ```
    pub fn clear_with<F>(&mut self, mut finalizer: F)
    where
        F: FnMut(T),
    {
        let live_nodes = self.table.len() - self.free.len();
        let mut finalized = 0usize;
        let mut to_visit = vec![0];
        while let Some(idx) = to_visit.pop() {
            let node = &mut self.table[idx];
            if let Some(value) = node.value.take() {
                finalizer(value);
                finalized += 1;
            }
            to_visit.extend(node.left.take());
            to_visit.extend(node.right.take());
        }
        debug_assert_eq!(finalized, self.count);
        log::debug!("finalized {finalized} values and released {live_nodes} nodes");
        self.table.truncate(1);
        self.free.clear();
        self.count = 0;
    }

    /// Remove all elements, dropping every value.
    pub fn clear(&mut self) {
        self.clear_with(drop)
    }

    /// Destroy the tree, calling `finalizer` exactly once on every stored value before all nodes
    /// are released. Pass `drop` (or `|_| {}`) if the values need no cleanup.
    ///
    /// The tree is consumed, so it can be neither used nor destroyed a second time afterwards.
    pub fn destroy<F>(mut self, finalizer: F)
    where
        F: FnMut(T),
    {
        self.clear_with(finalizer)
    }
}

/// Private function implementations
impl<P, T> PatriciaTree<P, T>
where
    P: Prefix,
{
    fn find(&self, prefix: &P) -> Option<usize> {
        let mut idx = 0;
        loop {
            match self.get_direction(idx, prefix) {
                Direction::Reached => return Some(idx),
                Direction::Enter { next, .. } => idx = next,
                Direction::Missing => return None,
            }
        }
    }

    #[inline(always)]
    fn get_child(&self, idx: usize, right: bool) -> Option<usize> {
        if right {
            self.table[idx].right
        } else {
            self.table[idx].left
        }
    }

    #[inline(always)]
    fn set_child(&mut self, idx: usize, child: usize, right: bool) -> Option<usize> {
        if right {
            self.table[idx].right.replace(child)
        } else {
            self.table[idx].left.replace(child)
        }
    }

    #[inline(always)]
    fn clear_child(&mut self, idx: usize, right: bool) -> Option<usize> {
        if right {
            self.table[idx].right.take()
        } else {
            self.table[idx].left.take()
        }
    }

    #[inline(always)]
    fn new_node(&mut self, prefix: P, value: Option<T>) -> usize {
        if let Some(idx) = self.free.pop() {
            let node = &mut self.table[idx];
            node.prefix = prefix;
            node.value = value;
            node.left = None;
            node.right = None;
            idx
        } else {
            let idx = self.table.len();
            self.table.push(Node {
                prefix,
                value,
                left: None,
                right: None,
            });
            idx
        }
    }

    /// Take the value out of `idx` and restore path compression around it. Returns the value, and
    /// whether `par` was merged away (its other child now hangs directly at `grp`).
    fn remove_node(
        &mut self,
        idx: usize,
        par: Option<usize>,
        par_right: bool,
        grp: Option<usize>,
        grp_right: bool,
    ) -> (Option<T>, bool) {
        // `idx` is the element to remove, `par` is its parent, and `par_right` stores the
        // direction of `idx` at `par`.
        let node = &mut self.table[idx];
        let value = node.value.take();
        let has_left = node.left.is_some();
        let has_right = node.right.is_some();
        if value.is_some() {
            self.count -= 1;
        }

        if has_left && has_right {
            // a branch without a value is still a valid divergence point.
        } else if !(has_left || has_right) {
            if let Some(par) = par {
                // a leaf is simply removed.
                self.clear_child(par, par_right);
                self.free.push(idx);
                // the parent is now a pass-through node if it has no value. Merge it with the
                // remaining sibling, unless the parent is the root.
                if let Some(grp) = grp {
                    if self.table[par].value.is_none() {
                        log::trace!(
                            "merge pass-through node /{}",
                            self.table[par].prefix.prefix_len()
                        );
                        match self.clear_child(par, !par_right) {
                            Some(sibling) => {
                                self.set_child(grp, sibling, grp_right);
                            }
                            None => {
                                self.clear_child(grp, grp_right);
                            }
                        }
                        self.free.push(par);
                        return (value, true);
                    }
                }
            }
        } else if let Some(par) = par {
            // one child remains. Connect that child directly to the parent.
            log::trace!(
                "merge /{} into its only child",
                self.table[idx].prefix.prefix_len()
            );
            let child = self.clear_child(idx, has_right);
            if let Some(child) = child {
                self.set_child(par, child, par_right);
            }
            self.free.push(idx);
        }
        (value, false)
    }

    fn _retain<F>(
        &mut self,
        idx: usize,
        par: Option<usize>,
        par_right: bool,
        grp: Option<usize>,
        grp_right: bool,
        mut f: F,
    ) -> (F, bool)
    where
        F: FnMut(&P, &T) -> bool,
    {
        // first, do the recursion. The right child is read before the left subtree is processed,
        // as a merge of `idx` clears its children.
        let right = self.table[idx].right;
        let mut idx_removed = false;
        let mut par_removed = false;
        if let Some(left) = self.table[idx].left {
            (f, idx_removed) = self._retain(left, Some(idx), false, par, par_right, f);
        }
        if let Some(right) = right {
            if idx_removed {
                (f, par_removed) = self._retain(right, par, par_right, grp, grp_right, f);
            } else {
                (f, _) = self._retain(right, Some(idx), true, par, par_right, f);
            }
        }
        if idx_removed {
            return (f, par_removed);
        }
        // then, check if we need to delete the node
        if let Some(val) = self.table[idx].value.as_ref() {
            if !f(&self.table[idx].prefix, val) {
                let (_, par_del) = self.remove_node(idx, par, par_right, grp, grp_right);
                par_removed = par_del;
            }
        }
        (f, par_removed)
    }

    #[inline(always)]
    pub(crate) fn get_direction(&self, cur: usize, prefix: &P) -> Direction {
        let cur_p = &self.table[cur].prefix;
        if cur_p.eq(prefix) {
            Direction::Reached
        } else {
            let right = to_right(cur_p, prefix);
            match self.get_child(cur, right) {
                Some(child) if self.table[child].prefix.contains(prefix) => {
                    Direction::Enter { next: child, right }
                }
                _ => Direction::Missing,
            }
        }
    }

    #[inline(always)]
    fn get_direction_for_insert(&self, cur: usize, prefix: &P) -> DirectionForInsert<P> {
        let cur_p = &self.table[cur].prefix;
        if cur_p.eq(prefix) {
            DirectionForInsert::Reached
        } else {
            let right = to_right(cur_p, prefix);
            if let Some(child) = self.get_child(cur, right) {
                let child_p = &self.table[child].prefix;
                if child_p.contains(prefix) {
                    DirectionForInsert::Enter { next: child, right }
                } else if prefix.contains(child_p) {
                    DirectionForInsert::NewChild {
                        right,
                        child_right: to_right(prefix, child_p),
                    }
                } else {
                    let branch_prefix = prefix.longest_common_prefix(child_p);
                    let prefix_right = to_right(&branch_prefix, prefix);
                    DirectionForInsert::NewBranch {
                        branch_prefix,
                        right,
                        prefix_right,
                    }
                }
            } else {
                DirectionForInsert::NewLeaf { right }
            }
        }
    }
}

impl<P, T> PartialEq for PatriciaTree<P, T>
where
    P: Prefix + PartialEq,
    T: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width && self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<P, T> Eq for PatriciaTree<P, T>
where
    P: Prefix + Eq,
    T: Eq,
{
}

/// A node of the tree. The prefix length of a node is the bit index at which its two children
/// diverge: the left child has that bit cleared, the right child has it set.
#[derive(Clone)]
pub(crate) struct Node<P, T> {
    pub(crate) prefix: P,
    pub(crate) value: Option<T>,
    pub(crate) left: Option<usize>,
    pub(crate) right: Option<usize>,
}

impl<P: Prefix, T> Node<P, T> {
    fn root() -> Self {
        Self {
            prefix: P::zero(),
            value: None,
            left: None,
            right: None,
        }
    }
}

impl<P, T> Node<P, T> {
    fn prefix_value(&self) -> Option<(&P, &T)> {
        self.value.as_ref().map(|v| (&self.prefix, v))
    }

    fn prefix_value_mut(&mut self) -> Option<(&P, &mut T)> {
        self.value.as_mut().map(|v| (&self.prefix, v))
    }
}

pub(crate) enum Direction {
    /// The prefix is already reached.
    Reached,
    /// Enter the next index and search again.
    Enter { next: usize, right: bool },
    /// The node was not found.
    Missing,
}

enum DirectionForInsert<P> {
    /// The prefix is already reached.
    Reached,
    /// Enter the next index and search again.
    Enter { next: usize, right: bool },
    /// Insert a new child at the given position as a leaf.
    NewLeaf { right: bool },
    /// Insert a new child at the given position, moving the old child to be a child of the new
    /// prefix. `right` tells where to insert the new node, while `child_right` tells where to
    /// insert the old child (on the right or the left of the new node).
    NewChild { right: bool, child_right: bool },
    /// Insert a new branch at the parent with the given prefix. `right` tells where to insert the
    /// branch, while `prefix_right` tells where to insert the new node at the branch. The old
    /// child of the parent is inserted at `!prefix_right` of the branch.
    NewBranch {
        branch_prefix: P,
        right: bool,
        prefix_right: bool,
    },
}
