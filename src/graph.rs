//! Dependency graph with layered topological sort
//!
//! Layers group elements that can be processed in parallel: every element's
//! dependencies live in strictly earlier layers, and each layer is maximal.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use crate::error::StrataError;

/// A recorded (value, dependencies) pair.
///
/// If node A has deps [X, Y, Z], then X, Y, and Z must be processed before A.
#[derive(Debug, Clone)]
struct Node<T> {
    value: T,
    deps: Vec<T>,
}

/// A collection of nodes and their declared dependencies.
///
/// Generic over any value usable as a map key. Dependencies may reference
/// values that are added later or never added at all; a value seen only as a
/// dependency target is treated as a node with no prerequisites.
#[derive(Debug, Clone, Default)]
pub struct Graph<T> {
    nodes: Vec<Node<T>>,
}

impl<T: Eq + Hash + Clone> Graph<T> {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Record a node with its dependencies.
    ///
    /// Adding the same value twice is additive: both dependency lists are
    /// kept and the union of them is enforced by [`Graph::sort_by_layers`].
    pub fn add_node(&mut self, value: T, deps: Vec<T>) {
        self.nodes.push(Node { value, deps });
    }

    /// Number of recorded additions (not distinct values).
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Partition the graph into an ordered sequence of layers.
    ///
    /// Every distinct value (explicit or dependency-only) appears in exactly
    /// one layer, all of its dependencies appear in strictly earlier layers,
    /// and each layer holds everything resolvable at that point. Element
    /// order within a layer is unspecified.
    ///
    /// Read-only: may be called repeatedly and always yields the same layer
    /// sets. Fails with [`StrataError::CyclicDependency`] if any declared
    /// dependencies form a cycle; no partial result is returned.
    pub fn sort_by_layers(&self) -> Result<Vec<Vec<T>>, StrataError> {
        // value -> union of its declared dependency lists
        let mut depends_on: HashMap<&T, Vec<&T>> = HashMap::new();
        // reverse: value -> values that declared it as a dependency
        let mut depended_on_by: HashMap<&T, Vec<&T>> = HashMap::new();
        // every value seen anywhere; the universe the result must cover
        let mut all_values: HashSet<&T> = HashSet::new();

        for node in &self.nodes {
            all_values.insert(&node.value);
            let declared = depends_on.entry(&node.value).or_default();
            for dep in &node.deps {
                declared.push(dep);
            }
            for dep in &node.deps {
                all_values.insert(dep);
                depended_on_by.entry(dep).or_default().push(&node.value);
            }
        }

        // values with no declared prerequisites form the first layer;
        // absent entry means dependency-only, which counts as zero deps
        let mut current: Vec<&T> = all_values
            .iter()
            .copied()
            .filter(|value| depends_on.get(value).map_or(true, |deps| deps.is_empty()))
            .collect();

        let mut layers: Vec<Vec<T>> = Vec::new();
        let mut visited: HashSet<&T> = HashSet::with_capacity(all_values.len());

        while !current.is_empty() {
            for value in &current {
                visited.insert(*value);
            }

            // admit a dependent once all of its declared deps are visited,
            // not just the one that triggered the check
            let mut next: Vec<&T> = Vec::new();
            let mut admitted: HashSet<&T> = HashSet::new();

            for value in &current {
                let Some(dependents) = depended_on_by.get(*value) else {
                    continue;
                };
                for &dependent in dependents {
                    if visited.contains(dependent) || admitted.contains(dependent) {
                        continue;
                    }

                    let ready = depends_on
                        .get(dependent)
                        .map_or(true, |deps| deps.iter().all(|dep| visited.contains(dep)));

                    if ready {
                        next.push(dependent);
                        admitted.insert(dependent);
                    }
                }
            }

            layers.push(current.iter().map(|value| (*value).clone()).collect());
            current = next;
        }

        // anything left unvisited with declared deps sits on (or behind) a cycle
        for value in &all_values {
            if !visited.contains(value)
                && depends_on.get(value).is_some_and(|deps| !deps.is_empty())
            {
                return Err(StrataError::CyclicDependency);
            }
        }

        Ok(layers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn layer_sets<'a>(layers: &'a [Vec<&'a str>]) -> Vec<HashSet<&'a str>> {
        layers
            .iter()
            .map(|layer| layer.iter().copied().collect())
            .collect()
    }

    fn sets(expected: &[&[&'static str]]) -> Vec<HashSet<&'static str>> {
        expected
            .iter()
            .map(|layer| layer.iter().copied().collect())
            .collect()
    }

    #[test]
    fn linear_chain() {
        let mut g = Graph::new();
        g.add_node("a", vec![]);
        g.add_node("b", vec!["a"]);
        g.add_node("c", vec!["b"]);

        let layers = g.sort_by_layers().unwrap();
        assert_eq!(layer_sets(&layers), sets(&[&["a"], &["b"], &["c"]]));
    }

    #[test]
    fn diamond() {
        let mut g = Graph::new();
        g.add_node("a", vec![]);
        g.add_node("b", vec![]);
        g.add_node("c", vec!["a", "b"]);
        g.add_node("d", vec!["a", "b"]);

        let layers = g.sort_by_layers().unwrap();
        assert_eq!(layer_sets(&layers), sets(&[&["a", "b"], &["c", "d"]]));
    }

    #[test]
    fn mixed_widths() {
        let mut g = Graph::new();
        g.add_node("a", vec![]);
        g.add_node("b", vec![]);
        g.add_node("c", vec!["a"]);
        g.add_node("d", vec!["b"]);
        g.add_node("e", vec!["c", "d"]);
        g.add_node("f", vec!["a"]);

        let layers = g.sort_by_layers().unwrap();
        assert_eq!(
            layer_sets(&layers),
            sets(&[&["a", "b"], &["c", "d", "f"], &["e"]])
        );
    }

    #[test]
    fn three_cycle_is_an_error() {
        let mut g = Graph::new();
        g.add_node("a", vec!["c"]);
        g.add_node("b", vec!["a"]);
        g.add_node("c", vec!["b"]);

        assert!(matches!(
            g.sort_by_layers(),
            Err(StrataError::CyclicDependency)
        ));
    }

    #[test]
    fn self_dependency_is_an_error() {
        let mut g = Graph::new();
        g.add_node("a", vec!["a"]);

        assert!(matches!(
            g.sort_by_layers(),
            Err(StrataError::CyclicDependency)
        ));
    }

    #[test]
    fn implicit_node_resolves_first() {
        let mut g = Graph::new();
        g.add_node("x", vec!["y"]);

        let layers = g.sort_by_layers().unwrap();
        assert_eq!(layer_sets(&layers), sets(&[&["y"], &["x"]]));
    }

    #[test]
    fn disconnected_nodes_share_one_layer() {
        let mut g = Graph::new();
        g.add_node("a", vec![]);
        g.add_node("b", vec![]);

        let layers = g.sort_by_layers().unwrap();
        assert_eq!(layer_sets(&layers), sets(&[&["a", "b"]]));
    }

    #[test]
    fn empty_graph_yields_no_layers() {
        let g: Graph<&str> = Graph::new();
        assert!(g.sort_by_layers().unwrap().is_empty());
    }

    #[test]
    fn duplicate_additions_union_deps() {
        // "a" is added twice with different deps; both lists are enforced,
        // so "a" must wait for "y" even though "x" resolves first
        let mut g = Graph::new();
        g.add_node("x", vec![]);
        g.add_node("a", vec!["x"]);
        g.add_node("a", vec!["y"]);
        g.add_node("y", vec!["x"]);

        let layers = g.sort_by_layers().unwrap();
        assert_eq!(layer_sets(&layers), sets(&[&["x"], &["y"], &["a"]]));
    }

    #[test]
    fn sort_is_repeatable() {
        let mut g = Graph::new();
        g.add_node("a", vec![]);
        g.add_node("b", vec!["a"]);
        g.add_node("c", vec!["a", "b"]);

        let first = g.sort_by_layers().unwrap();
        let second = g.sort_by_layers().unwrap();
        assert_eq!(layer_sets(&first), layer_sets(&second));
    }

    #[test]
    fn integer_values() {
        let mut g = Graph::new();
        g.add_node(2u32, vec![1]);
        g.add_node(3u32, vec![1, 2]);

        let layers = g.sort_by_layers().unwrap();
        assert_eq!(layers.len(), 3);
        assert_eq!(layers[0], vec![1]);
        assert_eq!(layers[1], vec![2]);
        assert_eq!(layers[2], vec![3]);
    }
}
