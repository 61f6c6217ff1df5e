//! Movement engine for danmaku items
//!
//! ## L4 Atomic Layer
//! - `timing` - `TimeRecorder` and progress helpers
//! - `direction` - Traversal direction and sign conventions
//! - `completion` - Cancelable move-completion signal
//! - `context` - Collaborators shared by all items of a stage
//!
//! ## L3 Molecular Layer
//! - `facile` - `FacileDanmaku`, the per-item state machine
//! - `plugins` - Built-in lifecycle plugins
//!
//! # Usage
//!
//! ```ignore
//! let ctx = Rc::new(DanmakuContext::new(viewport, TextMetrics::default()));
//! let mut item = FacileDanmaku::new(ctx, options);
//! item.create_node();
//! item.append_node(container);
//! next_frame(FRAME).await;
//! let completion = item.start();
//!
//! // Each frame
//! item.tick(Instant::now());
//! ```

// L4 Atomic Layer
pub mod completion;
pub mod context;
pub mod direction;
pub mod timing;

// L3 Molecular Layer
pub mod facile;
pub mod plugins;

pub use completion::{MoveCompletion, MoveOutcome};
pub use context::DanmakuContext;
pub use direction::Direction;
pub use facile::{FacileDanmaku, FacileOptions, Plugin, Position, PositionUpdate};
pub use plugins::lifecycle_logger;
pub use timing::TimeRecorder;
