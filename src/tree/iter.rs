//! Iterators over a [`PatriciaTree`].

use crate::*;

use super::Direction;

/// An iterator over all entries of a [`PatriciaTree`] in lexicographic order.
#[derive(Clone)]
pub struct Iter<'a, P, T> {
    pub(crate) tree: &'a PatriciaTree<P, T>,
    pub(crate) nodes: Vec<usize>,
}

impl<'a, P, T> Iterator for Iter<'a, P, T> {
    type Item = (&'a P, &'a T);

    fn next(&mut self) -> Option<(&'a P, &'a T)> {
        while let Some(cur) = self.nodes.pop() {
            let node = &self.tree.table[cur];
            if let Some(right) = node.right {
                self.nodes.push(right);
            }
            if let Some(left) = node.left {
                self.nodes.push(left);
            }
            if let Some(v) = &node.value {
                return Some((&node.prefix, v));
            }
        }
        None
    }
}

/// An iterator over all prefixes of a [`PatriciaTree`] in lexicographic order.
#[derive(Clone)]
pub struct Keys<'a, P, T> {
    pub(crate) inner: Iter<'a, P, T>,
}

impl<'a, P, T> Iterator for Keys<'a, P, T> {
    type Item = &'a P;

    fn next(&mut self) -> Option<&'a P> {
        self.inner.next().map(|(k, _)| k)
    }
}

/// An iterator over all values of a [`PatriciaTree`] in lexicographic order of their associated
/// prefixes.
#[derive(Clone)]
pub struct Values<'a, P, T> {
    pub(crate) inner: Iter<'a, P, T>,
}

impl<'a, P, T> Iterator for Values<'a, P, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        self.inner.next().map(|(_, v)| v)
    }
}

/// An iterator over all owned entries of a [`PatriciaTree`] in lexicographic order.
#[derive(Clone)]
pub struct IntoIter<P, T> {
    tree: PatriciaTree<P, T>,
    nodes: Vec<usize>,
}

impl<P: Prefix, T> Iterator for IntoIter<P, T> {
    type Item = (P, T);

    fn next(&mut self) -> Option<(P, T)> {
        while let Some(cur) = self.nodes.pop() {
            let node = &mut self.tree.table[cur];
            if let Some(right) = node.right {
                self.nodes.push(right);
            }
            if let Some(left) = node.left {
                self.nodes.push(left);
            }
            if let Some(v) = node.value.take() {
                return Some((std::mem::replace(&mut node.prefix, P::zero()), v));
            }
        }
        None
    }
}

impl<P: Prefix, T> IntoIterator for PatriciaTree<P, T> {
    type Item = (P, T);

    type IntoIter = IntoIter<P, T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            tree: self,
            nodes: vec![0],
        }
    }
}

impl<'a, P, T> IntoIterator for &'a PatriciaTree<P, T> {
    type Item = (&'a P, &'a T);

    type IntoIter = Iter<'a, P, T>;

    fn into_iter(self) -> Self::IntoIter {
        Iter {
            tree: self,
            nodes: vec![0],
        }
    }
}

impl<P, T> PatriciaTree<P, T> {
    /// An iterator visiting all key-value pairs in lexicographic order. The iterator element type
    /// is `(&P, &T)`.
    ///
    /// ```
    /// # use patricia_lpm::*;
    /// # #[cfg(feature = "ipnet")]
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut pt: PatriciaTree<ipnet::Ipv4Net, _> = PatriciaTree::new();
    /// pt.insert("192.168.0.0/22".parse()?, 1)?;
    /// pt.insert("192.168.0.0/23".parse()?, 2)?;
    /// pt.insert("192.168.2.0/23".parse()?, 3)?;
    /// pt.insert("192.168.0.0/24".parse()?, 4)?;
    /// pt.insert("192.168.2.0/24".parse()?, 5)?;
    /// assert_eq!(
    ///     pt.iter().collect::<Vec<_>>(),
    ///     vec![
    ///         (&"192.168.0.0/22".parse()?, &1),
    ///         (&"192.168.0.0/23".parse()?, &2),
    ///         (&"192.168.0.0/24".parse()?, &4),
    ///         (&"192.168.2.0/23".parse()?, &3),
    ///         (&"192.168.2.0/24".parse()?, &5),
    ///     ]
    /// );
    /// # Ok(())
    /// # }
    /// # #[cfg(not(feature = "ipnet"))]
    /// # fn main() {}
    /// ```
    #[inline(always)]
    pub fn iter(&self) -> Iter<'_, P, T> {
        self.into_iter()
    }

    /// An iterator visiting all keys in lexicographic order. The iterator element type is `&P`.
    #[inline(always)]
    pub fn keys(&self) -> Keys<'_, P, T> {
        Keys { inner: self.iter() }
    }

    /// An iterator visiting all values in lexicographic order of their prefixes. The iterator
    /// element type is `&T`.
    #[inline(always)]
    pub fn values(&self) -> Values<'_, P, T> {
        Values { inner: self.iter() }
    }
}

impl<P, T> PatriciaTree<P, T>
where
    P: Prefix,
{
    /// Iterate over all stored prefixes that contain `prefix` (including `prefix` itself if
    /// present), from the shortest to the longest. The last element yielded is the longest
    /// prefix match.
    ///
    /// ```
    /// # use patricia_lpm::*;
    /// # #[cfg(feature = "ipnet")]
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut pt: PatriciaTree<ipnet::Ipv4Net, _> = PatriciaTree::new();
    /// pt.insert("0.0.0.0/0".parse()?, 0)?;
    /// pt.insert("10.0.0.0/8".parse()?, 1)?;
    /// pt.insert("10.1.0.0/16".parse()?, 2)?;
    /// pt.insert("10.2.0.0/16".parse()?, 3)?;
    /// assert_eq!(
    ///     pt.cover(&"10.1.2.0/24".parse()?).collect::<Vec<_>>(),
    ///     vec![
    ///         (&"0.0.0.0/0".parse()?, &0),
    ///         (&"10.0.0.0/8".parse()?, &1),
    ///         (&"10.1.0.0/16".parse()?, &2),
    ///     ]
    /// );
    /// # Ok(())
    /// # }
    /// # #[cfg(not(feature = "ipnet"))]
    /// # fn main() {}
    /// ```
    pub fn cover<'a>(&'a self, prefix: &'a P) -> Cover<'a, P, T> {
        Cover {
            tree: self,
            idx: None,
            prefix,
        }
    }
}

/// An iterator that yields all items in a [`PatriciaTree`] that cover a given prefix (including
/// the prefix itself if present). See [`PatriciaTree::cover`] for how to create this iterator.
pub struct Cover<'a, P, T> {
    tree: &'a PatriciaTree<P, T>,
    idx: Option<usize>,
    prefix: &'a P,
}

impl<'a, P, T> Iterator for Cover<'a, P, T>
where
    P: Prefix,
{
    type Item = (&'a P, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let mut idx = match self.idx {
            Some(idx) => idx,
            None => {
                // the root is always visited first.
                self.idx = Some(0);
                let root = &self.tree.table[0];
                if let Some(value) = root.value.as_ref() {
                    return Some((&root.prefix, value));
                }
                0
            }
        };

        loop {
            let Direction::Enter { next, .. } = self.tree.get_direction(idx, self.prefix) else {
                return None;
            };
            idx = next;
            self.idx = Some(next);
            let entry = &self.tree.table[next];
            if let Some(value) = entry.value.as_ref() {
                return Some((&entry.prefix, value));
            }
        }
    }
}
