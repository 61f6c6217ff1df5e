//! Rendering seam between movement engines and whatever draws them.
//!
//! - `style` - The typed style properties an engine may write
//! - `node` - `RenderNode` / `NodeFactory` traits
//! - `memory` - Headless backend emulating linear transform transitions
//! - `registry` - Node to engine lookup
//! - `frame` - Double-frame deferral

pub mod frame;
pub mod memory;
pub mod node;
pub mod registry;
pub mod style;

pub use frame::{next_frame, FRAME};
pub use memory::{MemoryNode, TextMetrics};
pub use node::{NodeFactory, RenderNode};
pub use registry::NodeRegistry;
pub use style::{NodeStyle, PointerEvents, Positioning, Side, StyleProperty, Visibility};
