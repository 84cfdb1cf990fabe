//! Serialization and Deserialization implementation. A tree is represented as a map from prefix
//! to value; deserialization builds a tree of full width.

use std::collections::HashMap;

use ::serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};

use super::*;

impl<P: Prefix + Serialize + Eq + std::hash::Hash, T: Serialize> Serialize for PatriciaTree<P, T> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let map: HashMap<&P, &T> = HashMap::from_iter(self);
        map.serialize(serializer)
    }
}

/// The width is not part of the serialized form: a deserialized tree always has the full width of
/// the prefix representation, even if the serialized tree was created with
/// [`PatriciaTree::with_width`]. Rebuild with `with_width` and [`PatriciaTree::try_extend`] to
/// restore a narrower width.
impl<'de, P: Prefix + Deserialize<'de> + Eq + std::hash::Hash, T: Deserialize<'de>> Deserialize<'de>
    for PatriciaTree<P, T>
{
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let map: HashMap<P, T> = HashMap::deserialize(deserializer)?;
        let mut tree = Self::new();
        tree.try_extend(map).map_err(D::Error::custom)?;
        Ok(tree)
    }
}
