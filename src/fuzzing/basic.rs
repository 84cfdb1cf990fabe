use std::collections::HashMap;

use super::*;
use itertools::Itertools;

qc!(new, _new);
fn _new(list: Vec<(TestPrefix, i32)>) -> bool {
    let mut tree = PatriciaTree::new();
    let mut hmap = HashMap::new();

    for (p, t) in list {
        let _ = tree.insert(p, t);
        hmap.insert(p, t);
    }

    // assert that the iterator of both is the same
    tree.len() == hmap.len() && tree.into_iter().eq(hmap.into_iter().sorted())
}

qc!(new_mods, _new_mods);
fn _new_mods(list: Vec<Operation<TestPrefix, i32>>) -> bool {
    let (tree, hmap) = apply(list);
    tree.len() == hmap.len() && tree.into_iter().eq(hmap.into_iter().sorted())
}

qc!(insert_returns_old_value, _insert_returns_old_value);
fn _insert_returns_old_value(list: Vec<(TestPrefix, i32)>) -> bool {
    let mut tree = PatriciaTree::new();
    let mut hmap = HashMap::new();
    list.into_iter()
        .all(|(p, t)| tree.insert(p, t) == Ok(hmap.insert(p, t)))
}

qc!(remove_returns_old_value, _remove_returns_old_value);
fn _remove_returns_old_value(list: Vec<Operation<TestPrefix, i32>>) -> bool {
    let mut tree = PatriciaTree::new();
    let mut hmap = HashMap::new();
    list.into_iter().all(|op| match op {
        Operation::Add(p, t) => tree.insert(p, t) == Ok(hmap.insert(p, t)),
        Operation::Remove(p) => tree.remove(&p) == hmap.remove(&p),
    })
}

qc!(structure_is_valid, _structure_is_valid);
fn _structure_is_valid(list: Vec<Operation<TestPrefix, i32>>) -> bool {
    let mut tree = PatriciaTree::new();
    for op in list {
        match op {
            Operation::Add(p, t) => {
                let _ = tree.insert(p, t);
            }
            Operation::Remove(p) => {
                tree.remove(&p);
            }
        }
        if !validate(&tree) {
            return false;
        }
    }
    true
}

qc!(shape_is_canonical, _shape_is_canonical);
fn _shape_is_canonical(list: Vec<Operation<TestPrefix, i32>>) -> bool {
    let (tree, hmap) = apply(list);
    let mut fresh = PatriciaTree::new();
    for (p, t) in hmap.into_iter().sorted() {
        let _ = fresh.insert(p, t);
    }
    same_shape(&tree, Some(0), &fresh, Some(0))
}

qc!(remove_is_inverse_of_insert, _remove_is_inverse_of_insert);
fn _remove_is_inverse_of_insert((tree, p): (PatriciaTree<TestPrefix, i32>, TestPrefix)) -> bool {
    if tree.contains_key(&p) {
        return true;
    }
    let mut modified = tree.clone();
    let _ = modified.insert(p, 0);
    modified.remove(&p);
    same_shape(&tree, Some(0), &modified, Some(0)) && validate(&modified)
}

qc!(retain, _retain);
fn _retain((list, bits): (Vec<Operation<TestPrefix, i32>>, u32)) -> bool {
    let (mut tree, mut hmap) = apply(list);
    let keep = |p: &TestPrefix, t: &i32| (p.0 ^ bits ^ (*t as u32)) & 1 == 0;
    tree.retain(keep);
    hmap.retain(|p, t| keep(p, t));
    validate(&tree) && tree.into_iter().eq(hmap.into_iter().sorted())
}

qc!(destroy_finalizes_each_value_once, _destroy_finalizes_each_value_once);
fn _destroy_finalizes_each_value_once(list: Vec<Operation<TestPrefix, i32>>) -> bool {
    let (tree, hmap) = apply(list);
    let mut finalized = Vec::new();
    tree.destroy(|t| finalized.push(t));
    finalized
        .into_iter()
        .sorted()
        .eq(hmap.into_values().sorted())
}

qc!(clear_with_keeps_tree_usable, _clear_with_keeps_tree_usable);
fn _clear_with_keeps_tree_usable(
    (first, second): (Vec<(TestPrefix, i32)>, Vec<(TestPrefix, i32)>),
) -> bool {
    let mut tree = PatriciaTree::new();
    let _ = tree.try_extend(first.iter().copied());
    let mut count = 0;
    tree.clear_with(|_| count += 1);
    let cleared = count == first.iter().map(|(p, _)| p).unique().count()
        && tree.is_empty()
        && validate(&tree);

    let _ = tree.try_extend(second.iter().copied());
    let hmap: HashMap<_, _> = second.into_iter().collect();
    cleared && validate(&tree) && tree.into_iter().eq(hmap.into_iter().sorted())
}

qc!(width_is_enforced, _width_is_enforced);
fn _width_is_enforced((list, width): (Vec<(TestPrefix, i32)>, u8)) -> bool {
    let width = width % 32 + 1;
    let Ok(mut tree) = PatriciaTree::<TestPrefix, i32>::with_width(width) else {
        return false;
    };
    let mut hmap = HashMap::new();
    for (p, t) in list {
        let result = tree.insert(p, t);
        if p.1 > width {
            if result != Err(Error::InvalidLength { len: p.1, width }) {
                return false;
            }
        } else {
            hmap.insert(p, t);
        }
    }
    validate(&tree) && tree.into_iter().eq(hmap.into_iter().sorted())
}

qc!(equality, _equality);
fn _equality((a, b): (Vec<Operation<TestPrefix, i32>>, Vec<Operation<TestPrefix, i32>>)) -> bool {
    let (tree_a, hmap_a) = apply(a);
    let (tree_b, hmap_b) = apply(b);
    (tree_a == tree_b) == (hmap_a == hmap_b)
}
