//! Built-in plugins.

use tracing::debug;

use super::facile::{FacileDanmaku, Plugin};
use crate::hooks::LifecycleEvent;

pub const LIFECYCLE_LOGGER: &str = "lifecycle-logger";

/// Log every lifecycle event of an item at debug level
pub fn lifecycle_logger<T: 'static>() -> Plugin<T> {
    Plugin::named(LIFECYCLE_LOGGER).on_any(|event: LifecycleEvent, item: &FacileDanmaku<T>| {
        debug!(
            danmaku = %item.id(),
            event = event.name(),
            percent = item.move_percent(),
            paused = item.is_paused(),
            "Lifecycle event"
        );
    })
}
