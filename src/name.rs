// SPDX-License-Identifier: BSD-3-Clause
use std::fmt::Display;

/// Prefix marking a global value name.
pub const GLOBAL_SIGIL: &str = "@";

/// Separator between the function and the local in a local value name.
pub const LOCAL_SEPARATOR: &str = "::%";

/// The name of an analyzed program value, either `@global` or
/// `function::%local`. Compared as a plain string.
#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, serde::Serialize)]
#[serde(transparent)]
pub struct ValueName(String);

impl ValueName {
    pub(crate) fn global(name: &str) -> Self {
        let mut s = String::with_capacity(GLOBAL_SIGIL.len() + name.len());
        s += GLOBAL_SIGIL;
        s += name;
        ValueName(s)
    }

    pub(crate) fn local(function: &str, local: &str) -> Self {
        let mut s = String::with_capacity(function.len() + LOCAL_SEPARATOR.len() + local.len());
        s += function;
        s += LOCAL_SEPARATOR;
        s += local;
        ValueName(s)
    }

    #[inline]
    pub fn is_global(&self) -> bool {
        self.0.starts_with(GLOBAL_SIGIL)
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ValueName {
    fn from(s: &str) -> Self {
        ValueName(s.to_string())
    }
}

impl<T> PartialEq<T> for ValueName
where
    T: AsRef<str>,
{
    fn eq(&self, other: &T) -> bool {
        self.0.as_str().eq(other.as_ref())
    }
}

impl Display for ValueName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An abstract memory location from the points-to analysis.
#[derive(
    Clone, Copy, Debug, Default, Hash, PartialEq, Eq, PartialOrd, Ord, serde::Serialize,
)]
#[serde(transparent)]
pub struct NodeId(u64);

impl NodeId {
    #[inline]
    pub fn new(id: u64) -> Self {
        NodeId(id)
    }

    #[inline]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
