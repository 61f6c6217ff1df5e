//! Shared collaborators handed to every engine created on one stage.

use std::fmt;
use std::rc::Rc;

use crate::ids::{EngineId, Ids};
use crate::render::{NodeFactory, NodeRegistry};
use crate::stage::{InternalStatuses, Viewport};

pub struct DanmakuContext<T> {
    pub viewport: Rc<Viewport>,
    pub statuses: Rc<InternalStatuses>,
    pub ids: Rc<Ids>,
    pub registry: NodeRegistry,
    nodes: Box<dyn NodeFactory<T>>,
    del_in_track: Box<dyn Fn(EngineId)>,
}

impl<T> fmt::Debug for DanmakuContext<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DanmakuContext")
            .field("viewport", &self.viewport)
            .field("statuses", &self.statuses)
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

impl<T> DanmakuContext<T> {
    pub fn new(viewport: Rc<Viewport>, nodes: impl NodeFactory<T> + 'static) -> Self {
        Self {
            viewport,
            statuses: Rc::new(InternalStatuses::default()),
            ids: Rc::new(Ids::new()),
            registry: NodeRegistry::new(),
            nodes: Box::new(nodes),
            del_in_track: Box::new(|_| {}),
        }
    }

    pub fn with_statuses(mut self, statuses: Rc<InternalStatuses>) -> Self {
        self.statuses = statuses;
        self
    }

    pub fn with_ids(mut self, ids: Rc<Ids>) -> Self {
        self.ids = ids;
        self
    }

    pub fn with_registry(mut self, registry: NodeRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Callback invoked when an item leaves its lane
    pub fn with_del_in_track(mut self, f: impl Fn(EngineId) + 'static) -> Self {
        self.del_in_track = Box::new(f);
        self
    }

    pub(crate) fn nodes(&self) -> &dyn NodeFactory<T> {
        self.nodes.as_ref()
    }

    pub(crate) fn del_in_track(&self, id: EngineId) {
        (self.del_in_track)(id)
    }
}
