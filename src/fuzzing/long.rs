//! Properties over prefixes of the full IPv4 length, including host routes and long runs of bits
//! without any branching.

use super::*;
use itertools::Itertools;

qc!(long_model, _long_model);
fn _long_model(list: Vec<Operation<LongPrefix, i32>>) -> bool {
    let (tree, hmap) = apply(list);
    tree.len() == hmap.len() && tree.into_iter().eq(hmap.into_iter().sorted())
}

qc!(long_structure_is_valid, _long_structure_is_valid);
fn _long_structure_is_valid(list: Vec<Operation<LongPrefix, i32>>) -> bool {
    let mut tree = PatriciaTree::new();
    list.into_iter().all(|op| {
        match op {
            Operation::Add(p, t) => {
                let _ = tree.insert(p, t);
            }
            Operation::Remove(p) => {
                tree.remove(&p);
            }
        }
        validate(&tree)
    })
}

qc!(long_shape_is_canonical, _long_shape_is_canonical);
fn _long_shape_is_canonical(list: Vec<Operation<LongPrefix, i32>>) -> bool {
    let (tree, hmap) = apply(list);
    let mut fresh = PatriciaTree::new();
    let _ = fresh.try_extend(hmap);
    same_shape(&tree, Some(0), &fresh, Some(0))
}

qc!(long_lookup, _long_lookup);
fn _long_lookup((list, near, noise): (Vec<Operation<LongPrefix, i32>>, LongPrefix, u32)) -> bool {
    let (tree, _) = apply(list);
    // an address inside `near`, which mostly shares its leading bits with the stored prefixes
    let addr = near.0 | (noise & !Prefix::mask(&(u32::MAX, near.1)));
    let host = LongPrefix::from_repr_len(addr, 32);
    tree.lookup(addr) == naive_lpm(&tree, &host).map(|(_, t)| t)
        && tree.get_lpm(&near) == naive_lpm(&tree, &near)
}

qc!(long_host_routes, _long_host_routes);
fn _long_host_routes(list: Vec<(LongPrefix, i32)>) -> bool {
    let mut tree = PatriciaTree::new();
    let _ = tree.try_extend(list.iter().copied());
    // every stored host route is its own longest match
    list.iter()
        .map(|(p, _)| p)
        .filter(|p| p.1 == 32)
        .all(|p| tree.get_lpm(p).map(|(k, _)| k) == Some(p) && tree.lookup(p.0) == tree.get(p))
}

qc!(long_remove_all, _long_remove_all);
fn _long_remove_all(list: Vec<(LongPrefix, i32)>) -> bool {
    let mut tree = PatriciaTree::new();
    let _ = tree.try_extend(list.iter().copied());
    let slots = tree.table.len();
    for (p, _) in list.iter().rev() {
        tree.remove(p);
        if !validate(&tree) {
            return false;
        }
    }
    let root = &tree.table[0];
    tree.is_empty()
        && root.left.is_none()
        && root.right.is_none()
        && tree.free.len() + 1 == slots
}

qc!(long_destroy_finalizes_each_value_once, _long_destroy_finalizes_each_value_once);
fn _long_destroy_finalizes_each_value_once(list: Vec<Operation<LongPrefix, i32>>) -> bool {
    let (tree, hmap) = apply(list);
    let mut finalized = Vec::new();
    tree.destroy(|t| finalized.push(t));
    finalized
        .into_iter()
        .sorted()
        .eq(hmap.into_values().sorted())
}
