use tokio::time::Instant;

use super::style::{NodeStyle, StyleProperty};
use crate::ids::{ContainerId, NodeId};

/// A visual node driven by a movement engine
///
/// Implementations own layout and transition timing. The engine only writes
/// `StyleProperty` values and asks whether the transform transition it
/// requested has finished.
pub trait RenderNode {
    fn id(&self) -> NodeId;

    fn apply_style(&mut self, property: StyleProperty);

    /// Current style declaration
    fn style(&self) -> &NodeStyle;

    /// Laid-out width in pixels
    fn client_width(&self) -> f64;

    /// Laid-out height in pixels
    fn client_height(&self) -> f64;

    fn parent(&self) -> Option<ContainerId>;

    /// Attach to `container`, moving the node if it already has a parent
    fn attach(&mut self, container: ContainerId);

    fn detach(&mut self);

    /// Report, once, that the running transform transition has completed
    fn transition_ended(&mut self, now: Instant) -> bool;

    /// Rendered horizontal translation at `now`
    fn computed_translate_x(&mut self, now: Instant) -> f64;
}

/// Allocates nodes for items carrying `T`
pub trait NodeFactory<T> {
    fn create(&self, id: NodeId, data: &T) -> Box<dyn RenderNode>;
}

impl<T, F> NodeFactory<T> for F
where
    F: Fn(NodeId, &T) -> Box<dyn RenderNode>,
{
    fn create(&self, id: NodeId, data: &T) -> Box<dyn RenderNode> {
        self(id, data)
    }
}
