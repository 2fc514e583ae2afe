// SPDX-License-Identifier: BSD-3-Clause
use rustc_hash::FxHashMap;

use crate::name::NodeId;

/// Disjoint sets of node ids. Every class is rooted at its least member, so
/// [`NodeClasses::lookup`] doubles as "the primary node of this class".
///
/// Ids never passed to [`NodeClasses::merge`] are singleton classes.
#[derive(Debug, Default)]
pub(crate) struct NodeClasses {
    parent: FxHashMap<NodeId, NodeId>,
}

impl NodeClasses {
    fn grandparent(&self, a: NodeId) -> Option<(NodeId, NodeId)> {
        let p = *self.parent.get(&a)?;
        debug_assert!(a != p);
        let gp = *self.parent.get(&p)?;
        debug_assert!(a != gp);
        debug_assert!(p != gp);
        Some((p, gp))
    }

    /// Root of `a`'s class, halving the path on the way up.
    pub(crate) fn lookup(&mut self, a: NodeId) -> NodeId {
        let mut current = a;
        while let Some((p, gp)) = self.grandparent(current) {
            self.parent.insert(current, gp);
            current = p;
        }
        match self.parent.get(&current) {
            None => current,
            Some(p) => *p,
        }
    }

    /// Join the classes of `a` and `b`. Returns whether they were distinct.
    pub(crate) fn merge(&mut self, a: NodeId, b: NodeId) -> bool {
        if a == b {
            return false;
        }
        let ar = self.lookup(a);
        let br = self.lookup(b);
        if ar == br {
            return false;
        }
        let (less, greater) = if ar < br { (ar, br) } else { (br, ar) };
        self.parent.insert(greater, less);
        true
    }
}
