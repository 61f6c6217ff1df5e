pub mod config;
pub mod error;
pub mod hooks;
pub mod ids;
pub mod movement;
pub mod render;
pub mod stage;
pub mod units;

pub use config::{DanmakuConfig, LimitsConfig, StageConfig};
pub use error::{Error, Result};
pub use hooks::{DanmakuPlugin, LifecycleEvent, LifecycleHookBus};
pub use ids::{ContainerId, EngineId, Ids, NodeId};
pub use movement::{
    DanmakuContext, Direction, FacileDanmaku, FacileOptions, MoveCompletion, MoveOutcome,
    Position, PositionUpdate,
};
pub use stage::{InternalStatuses, TrackData, TrackHandle, ViewStatus, Viewport};
