// SPDX-License-Identifier: BSD-3-Clause
//! Coalesce the points-to sets of a pointer-analysis dump into alias groups.
//!
//! [`dump`] decodes each line of the dump with the combinators in [`parse`];
//! [`coalesce::Engine`] collapses the resulting name/node relation to a
//! fixpoint; [`analysis::analysis`] runs both over a whole dump.

pub mod alias_sets;
pub mod analysis;
pub mod coalesce;
pub mod dump;
pub mod name;
pub mod parse;
mod union;

pub use analysis::{Check, MalformedLines, Options, Output, Stats};
pub use coalesce::{AliasGroup, Engine, Reduced, Reduction};
pub use dump::{Log, PointsTo, Skipped};
pub use name::{NodeId, ValueName};
