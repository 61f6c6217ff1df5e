//! Collaborators shared by every item on a stage: the viewport ("box"),
//! the global view status and the lanes.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::ids::EngineId;

/// The bounding box items traverse
///
/// Read on every distance computation, so a resize is reflected
/// mid-animation. Width is `None` until the box has been measured.
#[derive(Debug, Default)]
pub struct Viewport {
    width: Cell<Option<f64>>,
    height: Cell<Option<f64>>,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: Cell::new(Some(width)),
            height: Cell::new(Some(height)),
        }
    }

    /// A box that has not been laid out yet
    pub fn unmeasured() -> Self {
        Self::default()
    }

    #[inline]
    pub fn width(&self) -> Option<f64> {
        self.width.get()
    }

    #[inline]
    pub fn height(&self) -> Option<f64> {
        self.height.get()
    }

    pub fn resize(&self, width: f64, height: f64) {
        self.width.set(Some(width));
        self.height.set(Some(height));
    }
}

/// Global visibility mode of all items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewStatus {
    #[default]
    Show,
    Hide,
}

#[derive(Debug, Default)]
pub struct InternalStatuses {
    view_status: Cell<ViewStatus>,
}

impl InternalStatuses {
    pub fn new(view_status: ViewStatus) -> Self {
        Self {
            view_status: Cell::new(view_status),
        }
    }

    #[inline]
    pub fn view_status(&self) -> ViewStatus {
        self.view_status.get()
    }

    pub fn set_view_status(&self, status: ViewStatus) {
        self.view_status.set(status);
    }
}

/// One lane and the items currently assigned to it
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackData {
    pub index: usize,
    /// Top, middle and bottom of the lane in pixels
    pub location: [f64; 3],
    pub list: Vec<EngineId>,
}

impl TrackData {
    pub fn new(index: usize, top: f64, height: f64) -> Self {
        Self {
            index,
            location: [top, top + height / 2.0, top + height],
            list: Vec::new(),
        }
    }

    #[inline]
    pub fn top(&self) -> f64 {
        self.location[0]
    }

    /// Most recently assigned item
    pub fn last(&self) -> Option<EngineId> {
        self.list.last().copied()
    }
}

/// Externally owned lane; engines keep only a weak reference
pub type TrackHandle = Rc<RefCell<TrackData>>;
