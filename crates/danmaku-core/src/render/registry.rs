use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::ids::{EngineId, NodeId};

/// Lookup table from a node to the engine controlling it
///
/// Non-owning: it maps identities only, so a host resolves the engine in
/// whatever collection it keeps them in. Clones share the same table.
#[derive(Debug, Clone, Default)]
pub struct NodeRegistry {
    inner: Rc<RefCell<HashMap<NodeId, EngineId>>>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, node: NodeId, engine: EngineId) {
        self.inner.borrow_mut().insert(node, engine);
    }

    pub fn unregister(&self, node: NodeId) -> Option<EngineId> {
        self.inner.borrow_mut().remove(&node)
    }

    /// Engine controlling `node`, if it is still alive
    pub fn lookup(&self, node: NodeId) -> Option<EngineId> {
        self.inner.borrow().get(&node).copied()
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }
}
