//! PHP version strings and their numeric, component-wise ordering

use std::cmp::Ordering;

/// Split a dotted version into numeric components.
///
/// Components that are not plain non-negative integers count as 0.
pub fn version_components(version: &str) -> Vec<u64> {
    version
        .trim()
        .split('.')
        .map(|part| part.trim().parse::<u64>().unwrap_or(0))
        .collect()
}

/// Compare two dotted versions component by component.
///
/// Missing trailing components are treated as 0, so `5.6` equals `5.6.0`,
/// and comparison is numeric, so `5.10` is greater than `5.9`.
pub fn compare(a: &str, b: &str) -> Ordering {
    let left = version_components(a);
    let right = version_components(b);
    let len = left.len().max(right.len());

    for i in 0..len {
        let l = left.get(i).copied().unwrap_or(0);
        let r = right.get(i).copied().unwrap_or(0);
        match l.cmp(&r) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    Ordering::Equal
}
