//! Unordered k-combinations of a child list.
//!
//! Used by the evaluator for K-of-N gates: every combination of at least
//! `k` children is a valid joint-failure cause.

/// All k-length combinations of `items`, in a deterministic order.
///
/// Order within a combination follows the input order; combinations are
/// emitted with earlier indices first. `k == 0` and `k > items.len()`
/// produce no combinations.
pub fn combinations<T: Clone>(items: &[T], k: usize) -> Vec<Vec<T>> {
    if k == 0 || k > items.len() {
        return Vec::new();
    }
    if k == items.len() {
        return vec![items.to_vec()];
    }
    if k == 1 {
        return items.iter().map(|item| vec![item.clone()]).collect();
    }

    let mut out = Vec::new();
    // For each viable head, prepend it to every (k-1)-combination of the tail.
    for i in 0..=items.len() - k {
        for tail in combinations(&items[i + 1..], k - 1) {
            let mut combo = Vec::with_capacity(k);
            combo.push(items[i].clone());
            combo.extend(tail);
            out.push(combo);
        }
    }
    out
}
