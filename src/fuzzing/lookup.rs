use super::*;

qc!(lookup, _lookup);
fn _lookup((list, addr): (Vec<Operation<TestPrefix, i32>>, u32)) -> bool {
    let (tree, _) = apply(list);
    let host = TestPrefix::from_repr_len(addr, 32);
    tree.lookup(addr) == naive_lpm(&tree, &host).map(|(_, t)| t)
}

qc!(lookup_stored_prefix, _lookup_stored_prefix);
fn _lookup_stored_prefix((tree, host_bits): (PatriciaTree<TestPrefix, i32>, u32)) -> bool {
    // any address inside a stored prefix matches that prefix or a longer one
    tree.iter().all(|(p, _)| {
        let addr = p.0 | (host_bits & !p.mask_bits());
        let host = TestPrefix::from_repr_len(addr, 32);
        match tree.get_lpm(&host) {
            Some((lpm, _)) => lpm.prefix_len() >= p.prefix_len() && lpm.contains(&host),
            None => false,
        }
    })
}

qc!(get_lpm, _get_lpm);
fn _get_lpm((tree, p): (PatriciaTree<TestPrefix, i32>, TestPrefix)) -> bool {
    tree.get_lpm(&p) == naive_lpm(&tree, &p)
        && tree.get_lpm_prefix(&p) == naive_lpm(&tree, &p).map(|(k, _)| k)
}

qc!(lookup_mut, _lookup_mut);
fn _lookup_mut((tree, addr): (PatriciaTree<TestPrefix, i32>, u32)) -> bool {
    let mut modified = tree.clone();
    let host = TestPrefix::from_repr_len(addr, 32);
    let expected = naive_lpm(&tree, &host).map(|(k, t)| (*k, t.wrapping_add(1)));
    if let Some(t) = modified.lookup_mut(addr) {
        *t = t.wrapping_add(1);
    }
    match expected {
        Some((k, t)) => modified.get(&k) == Some(&t) && modified.len() == tree.len(),
        None => modified == tree,
    }
}

qc!(default_route, _default_route);
fn _default_route((tree, addr, t): (PatriciaTree<TestPrefix, i32>, u32, i32)) -> bool {
    let mut with_default = tree.clone();
    let _ = with_default.insert(TestPrefix(0, 0), t);
    // with a default route, every address matches
    let host = TestPrefix::from_repr_len(addr, 32);
    let expected = match naive_lpm(&tree, &host) {
        Some((k, v)) if k.prefix_len() > 0 => v,
        _ => &t,
    };
    with_default.lookup(addr) == Some(expected)
}

qc!(cover, _cover);
fn _cover((tree, p): (PatriciaTree<TestPrefix, i32>, TestPrefix)) -> bool {
    let want = tree.iter().filter(|(k, _)| k.contains(&p));
    tree.cover(&p).eq(want) && tree.cover(&p).last() == naive_lpm(&tree, &p)
}

impl TestPrefix {
    fn mask_bits(&self) -> u32 {
        Prefix::mask(&(u32::MAX, self.1))
    }
}
