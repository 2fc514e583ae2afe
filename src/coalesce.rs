// SPDX-License-Identifier: BSD-3-Clause
//! Coalescing points-to sets into alias groups
//!
//! The engine keeps the name/node relation in both directions. A reduction
//! pass collapses every points-to set with more than one node onto a single
//! *primary* node, always the least id of the set, and folds the names
//! pointing at the other nodes into the primary's entry. Passes repeat until
//! one collapses nothing. Each collapsing pass removes at least one node
//! from the backward map, so a dump with K distinct nodes needs at most K
//! passes.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Display;

use tracing::{debug, trace_span};

use crate::{
    dump::PointsTo,
    name::{NodeId, ValueName},
    union::NodeClasses,
};

/// How a reduction pass applies its merges.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, clap::ValueEnum)]
pub enum Reduction {
    /// Read a snapshot of the relation and commit all merges together at the
    /// end of the pass. Nodes merged by different names in the same pass end
    /// up in one class, so no name is left pointing at a removed node.
    #[default]
    Snapshot,
    /// Merge each name in turn, directly in the maps, deleting non-primary
    /// nodes at the end of the pass. A node that becomes the primary of one
    /// name can be deleted as a non-primary of a later one, dropping the
    /// first merge.
    InPlace,
}

impl Display for Reduction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Reduction::Snapshot => write!(f, "snapshot"),
            Reduction::InPlace => write!(f, "in-place"),
        }
    }
}

/// A set of names that must be treated as aliases, labelled by the node
/// that survived the reduction.
#[derive(Clone, Debug, Hash, PartialEq, Eq, serde::Serialize)]
pub struct AliasGroup {
    pub primary: NodeId,
    pub members: BTreeSet<ValueName>,
}

/// Renders as `{'@a', 'f::%x'}`, the format read back by
/// [`crate::alias_sets::parse_alias_sets`].
impl Display for AliasGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for (i, name) in self.members.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "'{}'", name)?;
        }
        write!(f, "}}")
    }
}

/// What [`Engine::reduce`] did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Reduced {
    /// Passes that collapsed at least one set. The closing pass that
    /// confirms the fixpoint is not counted.
    pub passes: usize,
    /// Points-to sets collapsed, summed over all passes
    pub merges: usize,
}

#[derive(Clone, Debug, Default)]
pub struct Engine {
    forward: BTreeMap<ValueName, BTreeSet<NodeId>>,
    backward: BTreeMap<NodeId, BTreeSet<ValueName>>,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `name` may point to each of `nodes`. Repeated names
    /// accumulate.
    pub fn insert(&mut self, name: ValueName, nodes: BTreeSet<NodeId>) {
        for node in &nodes {
            self.backward.entry(*node).or_default().insert(name.clone());
        }
        self.forward.entry(name).or_default().extend(nodes);
    }

    #[inline]
    pub fn forward(&self) -> &BTreeMap<ValueName, BTreeSet<NodeId>> {
        &self.forward
    }

    #[inline]
    pub fn backward(&self) -> &BTreeMap<NodeId, BTreeSet<ValueName>> {
        &self.backward
    }

    /// Run passes until one of them collapses nothing.
    pub fn reduce(&mut self, reduction: Reduction) -> Reduced {
        let span = trace_span!("reduce");
        let _span = span.enter();
        let mut reduced = Reduced::default();
        loop {
            let merges = match reduction {
                Reduction::Snapshot => self.snapshot_pass(),
                Reduction::InPlace => self.in_place_pass(),
            };
            if merges == 0 {
                return reduced;
            }
            reduced.passes += 1;
            reduced.merges += merges;
            debug!(
                pass = reduced.passes,
                merges,
                nodes = self.backward.len(),
                "reduction pass"
            );
        }
    }

    fn snapshot_pass(&mut self) -> usize {
        let span = trace_span!("snapshot_pass");
        let _span = span.enter();

        let mut classes = NodeClasses::default();
        let mut merges = 0;
        for nodes in self.forward.values() {
            let primary = match nodes.first() {
                Some(primary) if nodes.len() > 1 => *primary,
                _ => continue,
            };
            merges += 1;
            for node in nodes.iter().skip(1) {
                classes.merge(primary, *node);
            }
        }
        if merges == 0 {
            return 0;
        }

        let mut backward: BTreeMap<NodeId, BTreeSet<ValueName>> = BTreeMap::new();
        for (node, names) in std::mem::take(&mut self.backward) {
            backward
                .entry(classes.lookup(node))
                .or_default()
                .extend(names);
        }
        self.backward = backward;
        for nodes in self.forward.values_mut() {
            *nodes = nodes.iter().map(|node| classes.lookup(*node)).collect();
        }
        merges
    }

    fn in_place_pass(&mut self) -> usize {
        let span = trace_span!("in_place_pass");
        let _span = span.enter();

        let mut merges = 0;
        let mut delete = Vec::new();
        for (name, nodes) in self.forward.iter_mut() {
            let primary = match nodes.first() {
                Some(primary) if nodes.len() > 1 => *primary,
                _ => continue,
            };
            let mut names = BTreeSet::new();
            for node in nodes.iter() {
                if let Some(ns) = self.backward.get(node) {
                    names.extend(ns.iter().cloned());
                }
            }
            debug!(%name, %primary, "collapsing points-to set");
            delete.extend(nodes.iter().copied().filter(|node| *node != primary));
            *nodes = BTreeSet::from([primary]);
            self.backward.insert(primary, names);
            merges += 1;
        }
        for node in delete {
            self.backward.remove(&node);
        }
        merges
    }

    /// Every surviving name set with more than one member, ordered by
    /// primary node.
    pub fn alias_groups(&self) -> Vec<AliasGroup> {
        self.backward
            .iter()
            .filter(|(_, names)| names.len() > 1)
            .map(|(node, names)| AliasGroup {
                primary: *node,
                members: names.clone(),
            })
            .collect()
    }
}

impl Extend<PointsTo> for Engine {
    fn extend<T: IntoIterator<Item = PointsTo>>(&mut self, iter: T) {
        for pts in iter {
            self.insert(pts.name, pts.nodes);
        }
    }
}

impl FromIterator<PointsTo> for Engine {
    fn from_iter<T: IntoIterator<Item = PointsTo>>(iter: T) -> Self {
        let mut engine = Engine::new();
        engine.extend(iter);
        engine
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(xs: &[u64]) -> BTreeSet<NodeId> {
        xs.iter().copied().map(NodeId::new).collect()
    }

    fn names(xs: &[&str]) -> BTreeSet<ValueName> {
        xs.iter().copied().map(ValueName::from).collect()
    }

    fn engine(pts: &[(&str, &[u64])]) -> Engine {
        let mut engine = Engine::new();
        for (name, nodes) in pts {
            engine.insert(ValueName::from(*name), ids(nodes));
        }
        engine
    }

    #[test]
    fn insert_accumulates_and_transposes() {
        let e = engine(&[("@a", &[1, 2]), ("@a", &[2, 3]), ("@b", &[3])]);
        assert_eq!(e.forward()[&ValueName::from("@a")], ids(&[1, 2, 3]));
        assert_eq!(e.backward()[&NodeId::new(3)], names(&["@a", "@b"]));
        assert_eq!(e.backward()[&NodeId::new(1)], names(&["@a"]));
    }

    #[test]
    fn two_sets_sharing_a_node() {
        for reduction in [Reduction::Snapshot, Reduction::InPlace] {
            let mut e = engine(&[("@a", &[10, 20]), ("@b", &[20, 30])]);
            let reduced = e.reduce(reduction);
            assert_eq!(reduced.merges, 2, "{reduction}");
            assert_eq!(
                e.alias_groups(),
                vec![AliasGroup {
                    primary: NodeId::new(10),
                    members: names(&["@a", "@b"]),
                }],
                "{reduction}"
            );
        }
    }

    #[test]
    fn singletons_need_no_merge() {
        for reduction in [Reduction::Snapshot, Reduction::InPlace] {
            let mut e = engine(&[("@a", &[1]), ("@b", &[2]), ("f::%x", &[3])]);
            let reduced = e.reduce(reduction);
            assert_eq!(reduced, Reduced::default());
            assert!(e.alias_groups().is_empty());
        }
    }

    #[test]
    fn empty_engine_runs_no_pass() {
        for reduction in [Reduction::Snapshot, Reduction::InPlace] {
            let mut e = Engine::new();
            assert_eq!(e.reduce(reduction).passes, 0);
            assert!(e.alias_groups().is_empty());
        }
    }

    #[test]
    fn shared_singletons_alias() {
        let mut e = engine(&[("@a", &[7]), ("@b", &[7])]);
        assert_eq!(e.reduce(Reduction::Snapshot).merges, 0);
        assert_eq!(e.alias_groups().len(), 1);
        assert_eq!(e.alias_groups()[0].members, names(&["@a", "@b"]));
    }

    #[test]
    fn snapshot_leaves_no_dangling_nodes() {
        let mut e = engine(&[("@a", &[1, 5]), ("@b", &[5, 6]), ("@c", &[6]), ("@d", &[9])]);
        e.reduce(Reduction::Snapshot);
        for nodes in e.forward().values() {
            assert_eq!(nodes.len(), 1);
            for node in nodes {
                assert!(e.backward().contains_key(node));
            }
        }
        assert_eq!(
            e.alias_groups(),
            vec![AliasGroup {
                primary: NodeId::new(1),
                members: names(&["@a", "@b", "@c"]),
            }]
        );
    }

    #[test]
    fn in_place_drops_merge_of_deleted_primary() {
        // "@a" deletes node 5, which "@b" then picks as its primary. The
        // names reaching "@b" through node 6 are lost with it.
        let mut e = engine(&[("@a", &[1, 5]), ("@b", &[5, 6]), ("@c", &[6])]);
        e.reduce(Reduction::InPlace);
        assert_eq!(
            e.alias_groups(),
            vec![AliasGroup {
                primary: NodeId::new(1),
                members: names(&["@a", "@b"]),
            }]
        );
        assert!(!e.backward().contains_key(&NodeId::new(5)));
        assert_eq!(e.forward()[&ValueName::from("@b")], ids(&[5]));
    }

    #[test]
    fn passes_bounded_by_node_count() {
        let pts: Vec<(String, Vec<u64>)> = (0..50)
            .map(|i| (format!("@v{i}"), vec![i, i + 1, (i * 7) % 50]))
            .collect();
        for reduction in [Reduction::Snapshot, Reduction::InPlace] {
            let mut e = Engine::new();
            for (name, nodes) in &pts {
                e.insert(ValueName::from(name.as_str()), ids(nodes));
            }
            let k = e.backward().len();
            let reduced = e.reduce(reduction);
            assert!(reduced.passes <= k, "{reduction}");
            assert!(e.forward().values().all(|nodes| nodes.len() <= 1));
        }
    }

    #[test]
    fn display_uses_set_notation() {
        let group = AliasGroup {
            primary: NodeId::new(3),
            members: names(&["main::%p", "@g"]),
        };
        assert_eq!(group.to_string(), "{'@g', 'main::%p'}");
    }

    #[test]
    fn from_records() {
        let e: Engine = vec![
            PointsTo {
                name: ValueName::from("@a"),
                nodes: ids(&[1]),
            },
            PointsTo {
                name: ValueName::from("@a"),
                nodes: ids(&[2]),
            },
        ]
        .into_iter()
        .collect();
        assert_eq!(e.forward()[&ValueName::from("@a")], ids(&[1, 2]));
    }
}
