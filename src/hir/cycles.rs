//! Cycle detection over the dependency graph.
//!
//! Depth-first search with an explicit stack, so the depth of a dependency
//! chain is bounded by heap memory, not by the call stack.

use std::collections::BTreeSet;

use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use super::model::Edge;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    /// Not visited yet
    White,
    /// On the current DFS path
    Gray,
    /// Finished
    Black,
}

/// Find dependency cycles.
///
/// `order` fixes the root order (declaration order); dependencies of a
/// vertex are followed in sorted order. Each back edge yields one cycle,
/// listed from the vertex the back edge returns to, along the direction
/// "depends on". `A depends on B` plus `B depends on A` gives `[A, B]`
/// when `A` is visited first.
pub(crate) fn find_cycles<'a>(
    order: impl IntoIterator<Item = &'a SmolStr>,
    edges: &'a BTreeSet<Edge>,
) -> Vec<Vec<SmolStr>> {
    // vertex -> the vertices it depends on
    let mut dependencies: FxHashMap<&str, Vec<&SmolStr>> = FxHashMap::default();
    for edge in edges {
        dependencies.entry(edge.to.as_str()).or_default().push(&edge.from);
    }
    for targets in dependencies.values_mut() {
        targets.sort();
    }

    let mut color: FxHashMap<&str, Color> = FxHashMap::default();
    let mut cycles = Vec::new();
    let no_dependencies: Vec<&SmolStr> = Vec::new();

    for root in order {
        if color.get(root.as_str()).copied().unwrap_or(Color::White) != Color::White {
            continue;
        }

        // (vertex, index of the next dependency to visit)
        let mut stack: Vec<(&SmolStr, usize)> = vec![(root, 0)];
        color.insert(root.as_str(), Color::Gray);

        while let Some(top) = stack.last_mut() {
            let vertex = top.0;
            let targets = dependencies.get(vertex.as_str()).unwrap_or(&no_dependencies);
            let Some(&target) = targets.get(top.1) else {
                color.insert(vertex.as_str(), Color::Black);
                stack.pop();
                continue;
            };
            top.1 += 1;

            match color.get(target.as_str()).copied().unwrap_or(Color::White) {
                Color::White => {
                    color.insert(target.as_str(), Color::Gray);
                    stack.push((target, 0));
                }
                Color::Gray => {
                    let start = stack
                        .iter()
                        .position(|(v, _)| *v == target)
                        .unwrap_or(0);
                    cycles.push(stack[start..].iter().map(|(v, _)| (*v).clone()).collect());
                }
                Color::Black => {}
            }
        }
    }

    cycles
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<SmolStr> {
        list.iter().map(SmolStr::new).collect()
    }

    /// `(vertex, dependency)` pairs
    fn edges(deps: &[(&str, &str)]) -> BTreeSet<Edge> {
        deps.iter().map(|(v, d)| Edge::new(*d, *v)).collect()
    }

    #[test]
    fn test_acyclic() {
        let order = names(&["A", "B", "C"]);
        let cycles = find_cycles(&order, &edges(&[("A", "B"), ("B", "C"), ("A", "C")]));
        assert!(cycles.is_empty());
    }

    #[test]
    fn test_two_cycle() {
        let order = names(&["A", "B"]);
        let cycles = find_cycles(&order, &edges(&[("A", "B"), ("B", "A")]));
        assert_eq!(cycles, vec![names(&["A", "B"])]);
    }

    #[test]
    fn test_cycle_starts_at_reentered_vertex() {
        let order = names(&["X", "A", "B", "C"]);
        let deps = edges(&[("X", "A"), ("A", "B"), ("B", "C"), ("C", "A")]);
        assert_eq!(find_cycles(&order, &deps), vec![names(&["A", "B", "C"])]);
    }

    #[test]
    fn test_independent_cycles_are_all_reported() {
        let order = names(&["A", "B", "C", "D"]);
        let deps = edges(&[("A", "B"), ("B", "A"), ("C", "D"), ("D", "C")]);
        assert_eq!(find_cycles(&order, &deps).len(), 2);
    }

    #[test]
    fn test_deep_chain_does_not_overflow() {
        let order: Vec<SmolStr> = (0..200_000).map(|i| SmolStr::new(format!("v{}", i))).collect();
        let mut deps = BTreeSet::new();
        for pair in order.windows(2) {
            deps.insert(Edge::new(pair[1].clone(), pair[0].clone()));
        }
        assert!(find_cycles(&order, &deps).is_empty());

        deps.insert(Edge::new(order[0].clone(), order[order.len() - 1].clone()));
        let cycles = find_cycles(&order, &deps);
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].len(), order.len());
    }
}
