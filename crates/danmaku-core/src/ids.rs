//! Identifiers and the counter object that hands them out.
//!
//! Every `DanmakuContext` owns one `Ids`, so two independent stages never
//! share numbering and tests stay deterministic.

use std::cell::Cell;
use std::fmt;

/// Identity of one movement engine (one danmaku item)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EngineId(u64);

/// Identity of a visual node created by a `NodeFactory`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

/// Identity of a container nodes can be attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContainerId(u64);

macro_rules! id_accessors {
    ($($ty:ident),*) => {
        $(
            impl $ty {
                #[inline]
                pub fn get(self) -> u64 {
                    self.0
                }
            }

            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, "{}", self.0)
                }
            }
        )*
    };
}

id_accessors!(EngineId, NodeId, ContainerId);

/// Monotonic counters, all starting at 1
#[derive(Debug)]
pub struct Ids {
    danmaku: Cell<u64>,
    node: Cell<u64>,
    container: Cell<u64>,
    plugin: Cell<u64>,
}

impl Default for Ids {
    fn default() -> Self {
        Self::new()
    }
}

impl Ids {
    pub fn new() -> Self {
        Self {
            danmaku: Cell::new(1),
            node: Cell::new(1),
            container: Cell::new(1),
            plugin: Cell::new(1),
        }
    }

    pub fn next_danmaku(&self) -> EngineId {
        EngineId(bump(&self.danmaku))
    }

    pub fn next_node(&self) -> NodeId {
        NodeId(bump(&self.node))
    }

    pub fn next_container(&self) -> ContainerId {
        ContainerId(bump(&self.container))
    }

    /// Generated name for a plugin registered without one
    pub fn next_plugin_name(&self) -> String {
        format!("__facile_danmaku_plugin_{}__", bump(&self.plugin))
    }
}

fn bump(counter: &Cell<u64>) -> u64 {
    let n = counter.get();
    counter.set(n + 1);
    n
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_are_independent() {
        let ids = Ids::new();
        assert_eq!(ids.next_danmaku().get(), 1);
        assert_eq!(ids.next_danmaku().get(), 2);
        assert_eq!(ids.next_node().get(), 1);
        assert_eq!(ids.next_container().get(), 1);
    }

    #[test]
    fn test_plugin_names() {
        let ids = Ids::new();
        assert_eq!(ids.next_plugin_name(), "__facile_danmaku_plugin_1__");
        assert_eq!(ids.next_plugin_name(), "__facile_danmaku_plugin_2__");

        // A second counter object starts over
        let other = Ids::default();
        assert_eq!(other.next_plugin_name(), "__facile_danmaku_plugin_1__");
    }
}
