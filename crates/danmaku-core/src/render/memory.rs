//! Headless rendering backend
//!
//! `MemoryNode` keeps a style declaration and emulates linear transform
//! transitions the way a browser does: writes made at the same instant are
//! batched, the transition starts from the value rendered at that instant,
//! zero-duration writes and detaching cancel it without an end signal, and
//! neither a detached node nor a write of the rendered value transitions.

use std::time::Duration;

use tokio::time::Instant;

use super::node::{NodeFactory, RenderNode};
use super::style::{NodeStyle, StyleProperty};
use crate::ids::{ContainerId, NodeId};
use crate::movement::timing::{lerp, progress};

#[derive(Debug, Clone, Copy)]
struct ActiveTransition {
    from: f64,
    to: f64,
    started: Instant,
    duration: Duration,
}

impl ActiveTransition {
    fn value_at(&self, now: Instant) -> f64 {
        lerp(self.from, self.to, progress(self.started, self.duration, now))
    }

    fn is_complete(&self, now: Instant) -> bool {
        now >= self.started + self.duration
    }
}

#[derive(Debug, Clone)]
pub struct MemoryNode {
    id: NodeId,
    width: f64,
    height: f64,
    parent: Option<ContainerId>,
    style: NodeStyle,
    /// Rendered translation when no transition is running
    resting: f64,
    active: Option<ActiveTransition>,
    /// First uncommitted transform write
    dirty_since: Option<Instant>,
}

impl MemoryNode {
    pub fn new(id: NodeId, width: f64, height: f64) -> Self {
        Self {
            id,
            width,
            height,
            parent: None,
            style: NodeStyle::default(),
            resting: 0.0,
            active: None,
            dirty_since: None,
        }
    }

    /// Change the laid-out size (content reflow)
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    /// Whether a transform transition is currently running
    pub fn is_transitioning(&mut self) -> bool {
        self.flush();
        self.active.is_some()
    }

    fn value_at(&self, now: Instant) -> f64 {
        self.active.map_or(self.resting, |a| a.value_at(now))
    }

    /// Commit batched transform writes as one style change
    fn flush(&mut self) {
        let Some(at) = self.dirty_since.take() else {
            return;
        };
        let from = self.value_at(at);
        let to = self.style.transform.unwrap_or(0.0);
        let duration = self.style.transition_duration();

        // No computed change, no transition and no end event.
        let unchanged = (to - from).abs() < f64::EPSILON;
        if duration.is_zero() || self.parent.is_none() || unchanged {
            self.active = None;
            self.resting = to;
        } else {
            self.active = Some(ActiveTransition {
                from,
                to,
                started: at,
                duration,
            });
        }
    }
}

impl RenderNode for MemoryNode {
    fn id(&self) -> NodeId {
        self.id
    }

    fn apply_style(&mut self, property: StyleProperty) {
        // Writes from an earlier instant were rendered before this one.
        if self.dirty_since.is_some_and(|at| at < Instant::now()) {
            self.flush();
        }
        let is_transform = matches!(property, StyleProperty::Transform(_));
        self.style.apply(property);
        if is_transform {
            self.dirty_since.get_or_insert_with(Instant::now);
        }
    }

    fn style(&self) -> &NodeStyle {
        &self.style
    }

    fn client_width(&self) -> f64 {
        self.width
    }

    fn client_height(&self) -> f64 {
        self.height
    }

    fn parent(&self) -> Option<ContainerId> {
        self.parent
    }

    fn attach(&mut self, container: ContainerId) {
        // Inserted nodes start from their committed style, never mid-transition.
        self.flush();
        self.parent = Some(container);
    }

    fn detach(&mut self) {
        self.flush();
        self.resting = self.value_at(Instant::now());
        self.active = None;
        self.parent = None;
    }

    fn transition_ended(&mut self, now: Instant) -> bool {
        self.flush();
        match self.active {
            Some(active) if active.is_complete(now) => {
                self.resting = active.to;
                self.active = None;
                true
            }
            _ => false,
        }
    }

    fn computed_translate_x(&mut self, now: Instant) -> f64 {
        self.flush();
        self.value_at(now)
    }
}

/// Sizes text items by character count
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextMetrics {
    pub char_width: f64,
    pub line_height: f64,
}

impl Default for TextMetrics {
    fn default() -> Self {
        Self {
            char_width: 10.0,
            line_height: 20.0,
        }
    }
}

impl<T: AsRef<str>> NodeFactory<T> for TextMetrics {
    fn create(&self, id: NodeId, data: &T) -> Box<dyn RenderNode> {
        let chars = data.as_ref().chars().count() as f64;
        Box::new(MemoryNode::new(id, chars * self.char_width, self.line_height))
    }
}
