//! L3 Molecular Layer: The movement engine of one danmaku item
//!
//! Owns the item's timeline (start, pause/resume, hide/show, reset, destroy)
//! and reconstructs elapsed progress across pauses, so a traversal resumes
//! exactly where it was frozen. The transition itself runs in the render
//! backend; the engine only requests it and listens for its end.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, trace};

use super::completion::{move_timer, MoveCompletion, MoveTimer};
use super::context::DanmakuContext;
use super::direction::Direction;
use super::timing::{scale_duration, TimeRecorder};
use crate::hooks::{DanmakuPlugin, LifecycleEvent, LifecycleHookBus};
use crate::ids::{ContainerId, EngineId};
use crate::render::{PointerEvents, Positioning, RenderNode, StyleProperty, Visibility};
use crate::stage::{TrackData, TrackHandle, ViewStatus};
use crate::Result;

/// Logical coordinates of an item
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Partial position update; `None` fields are left untouched
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PositionUpdate {
    pub x: Option<f64>,
    pub y: Option<f64>,
}

/// Construction parameters of one item
#[derive(Debug, Clone)]
pub struct FacileOptions<T> {
    pub data: T,
    pub rate: f64,
    pub duration: Duration,
    pub direction: Direction,
}

pub type Plugin<T> = DanmakuPlugin<FacileDanmaku<T>>;

pub struct FacileDanmaku<T> {
    id: EngineId,
    data: T,
    rate: f64,
    duration: Duration,
    direction: Direction,
    position: Position,
    loops: u32,
    is_loop: bool,
    paused: bool,
    moving: bool,
    is_ended: bool,
    is_fixed: bool,
    recorder: TimeRecorder,
    node: Option<Box<dyn RenderNode>>,
    move_timer: Option<MoveTimer>,
    track: Option<Weak<RefCell<TrackData>>>,
    hooks: LifecycleHookBus<FacileDanmaku<T>>,
    /// Mirrors the bus so names stay readable while it is lent out in `emit`
    plugins: Vec<String>,
    ctx: Rc<DanmakuContext<T>>,
}

impl<T: std::fmt::Debug> std::fmt::Debug for FacileDanmaku<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FacileDanmaku")
            .field("id", &self.id)
            .field("data", &self.data)
            .field("rate", &self.rate)
            .field("duration", &self.duration)
            .field("direction", &self.direction)
            .field("position", &self.position)
            .field("moving", &self.moving)
            .field("paused", &self.paused)
            .field("is_ended", &self.is_ended)
            .field("recorder", &self.recorder)
            .field("hooks", &self.hooks)
            .finish_non_exhaustive()
    }
}

impl<T> FacileDanmaku<T> {
    pub fn new(ctx: Rc<DanmakuContext<T>>, options: FacileOptions<T>) -> Self {
        Self {
            id: ctx.ids.next_danmaku(),
            data: options.data,
            rate: options.rate,
            duration: options.duration,
            direction: options.direction,
            position: Position::default(),
            loops: 0,
            is_loop: false,
            paused: false,
            moving: false,
            is_ended: false,
            is_fixed: false,
            recorder: TimeRecorder::new(),
            node: None,
            move_timer: None,
            track: None,
            hooks: LifecycleHookBus::new(),
            plugins: Vec::new(),
            ctx,
        }
    }

    #[inline]
    pub fn id(&self) -> EngineId {
        self.id
    }

    pub fn data(&self) -> &T {
        &self.data
    }

    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[inline]
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Nominal traversal time at rate 1
    #[inline]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn loops(&self) -> u32 {
        self.loops
    }

    pub fn is_loop(&self) -> bool {
        self.is_loop
    }

    pub fn is_moving(&self) -> bool {
        self.moving
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_ended(&self) -> bool {
        self.is_ended
    }

    pub fn is_fixed(&self) -> bool {
        self.is_fixed
    }

    pub fn recorder(&self) -> &TimeRecorder {
        &self.recorder
    }

    pub fn node(&self) -> Option<&dyn RenderNode> {
        self.node.as_deref()
    }

    pub fn node_mut(&mut self) -> Option<&mut (dyn RenderNode + 'static)> {
        self.node.as_deref_mut()
    }

    /// Lane the item is registered with, while it is still alive
    pub fn track(&self) -> Option<TrackHandle> {
        self.track.as_ref().and_then(Weak::upgrade)
    }

    pub fn plugin_names(&self) -> Vec<&str> {
        self.plugins.iter().map(String::as_str).collect()
    }

    // With a constant distance, speed is inversely proportional to time.
    pub fn actual_duration(&self) -> Duration {
        Duration::try_from_secs_f64(self.duration.as_secs_f64() / self.rate)
            .unwrap_or(Duration::ZERO)
    }

    pub fn set_loop(&mut self) {
        self.is_loop = true;
    }

    pub fn unloop(&mut self) {
        self.is_loop = false;
    }

    /// Change the playback speed multiplier
    pub fn set_rate(&mut self, rate: f64) {
        if !rate.is_finite() || rate <= 0.0 {
            debug!(danmaku = %self.id, rate, "Ignoring invalid rate");
            return;
        }
        self.rate = rate;
    }

    /// Pin the duration so it is never recomputed from the rate elsewhere
    pub fn fix_duration(&mut self, duration: Duration) {
        self.is_fixed = true;
        self.duration = duration;
    }

    /// Attach a plugin, returning the name it is registered under
    pub fn use_plugin(&mut self, plugin: Plugin<T>) -> Result<String> {
        let name = match plugin.name() {
            Some(name) => name.to_string(),
            None => self.ctx.ids.next_plugin_name(),
        };
        self.hooks.use_refine(plugin.with_name(name.clone()))?;
        self.plugins.push(name.clone());
        debug!(danmaku = %self.id, plugin = %name, "Plugin attached");
        Ok(name)
    }

    /// Attach a plugin built from the item itself
    pub fn use_plugin_with<F>(&mut self, build: F) -> Result<String>
    where
        F: FnOnce(&Self) -> Plugin<T>,
    {
        let plugin = build(self);
        self.use_plugin(plugin)
    }

    pub fn remove_plugin(&mut self, name: &str) -> bool {
        let removed = self.hooks.remove(name);
        if removed {
            self.plugins.retain(|p| p != name);
        }
        removed
    }

    pub fn update_position(&mut self, update: PositionUpdate) {
        if let Some(x) = update.x {
            self.position.x = x;
        }
        if let Some(y) = update.y {
            self.position.y = y;
            self.set_style(StyleProperty::Top(Some(y)));
        }
    }

    /// Register with a lane (`Some`) or forget the current one (`None`)
    pub fn update_track_data(&mut self, track: Option<&TrackHandle>) {
        match track {
            Some(track) => {
                track.borrow_mut().list.push(self.id);
                self.track = Some(Rc::downgrade(track));
            }
            None => self.track = None,
        }
    }

    pub fn height(&self) -> f64 {
        self.node.as_ref().map_or(0.0, |n| n.client_height())
    }

    pub fn width(&self) -> f64 {
        self.node.as_ref().map_or(0.0, |n| n.client_width())
    }

    pub fn move_percent(&self) -> f64 {
        self.move_percent_at(Instant::now())
    }

    /// Distance traveled so far in pixels, 0 when not moving
    pub fn move_distance(&self) -> f64 {
        self.move_distance_at(Instant::now())
    }

    /// Pixels per millisecond, 0 while the box has no width
    pub fn speed(&self) -> f64 {
        if self.ctx.viewport.width().is_none() {
            return 0.0;
        }
        let ms = self.actual_duration().as_secs_f64() * 1000.0;
        self.summary_width() / ms
    }

    pub fn create_node(&mut self) {
        if self.node.is_some() {
            return;
        }
        let node_id = self.ctx.ids.next_node();
        self.node = Some(self.ctx.nodes().create(node_id, &self.data));
        self.set_start_status();
        self.ctx.registry.register(node_id, self.id);
        self.emit(LifecycleEvent::CreateNode);
    }

    pub fn append_node(&mut self, container: ContainerId) {
        let Some(node) = self.node.as_mut() else {
            return;
        };
        if node.parent() == Some(container) {
            return;
        }
        node.attach(container);
        self.emit(LifecycleEvent::AppendNode);
    }

    pub fn remove_node(&mut self, notify: bool) {
        let Some(node) = self.node.as_mut() else {
            return;
        };
        if node.parent().is_none() {
            return;
        }
        node.detach();
        if notify {
            self.emit(LifecycleEvent::RemoveNode);
        }
    }

    /// Begin the traversal
    ///
    /// The returned completion resolves with `Ended` when the render backend
    /// reports the end of the transition, or `Cancelled` if the timeline is
    /// reset, destroyed or restarted first.
    pub fn start(&mut self) -> MoveCompletion {
        let (timer, completion) = move_timer();
        if self.node.is_none() {
            self.moving = false;
            self.is_ended = true;
            timer.fire();
            return completion;
        }

        let w = self.width();
        let cw = self.summary_width();
        self.restore_view_status();
        self.set_style(StyleProperty::Opacity(None));
        self.set_style(StyleProperty::Transform(Some(
            self.direction.travel_sign() * cw,
        )));
        self.set_style(StyleProperty::Transition(Some(self.actual_duration())));
        if let Some(side) = self.direction.side() {
            self.set_style(StyleProperty::Inset(side, Some(-w)));
        }

        self.moving = true;
        self.paused = false;
        self.is_ended = false;
        self.recorder.start(Instant::now());
        if let Some(stale) = self.move_timer.replace(timer) {
            stale.clear();
        }
        debug!(
            danmaku = %self.id,
            distance = cw,
            duration_ms = self.actual_duration().as_millis() as u64,
            "Move started"
        );
        self.emit(LifecycleEvent::MoveStart);
        completion
    }

    /// Poll the render backend for the end of the running transition
    ///
    /// Returns true when this call finished the traversal.
    pub fn tick(&mut self, now: Instant) -> bool {
        let ended = self
            .node
            .as_mut()
            .is_some_and(|node| node.transition_ended(now));
        ended && self.handle_transition_end()
    }

    /// Transition-end listener for backends that push the signal
    ///
    /// Only the first end of a started timeline counts.
    pub fn handle_transition_end(&mut self) -> bool {
        let Some(timer) = self.move_timer.take() else {
            trace!(danmaku = %self.id, "Transition end without pending move");
            return false;
        };
        self.moving = false;
        self.is_ended = true;
        if self.is_loop {
            self.loops += 1;
        }
        debug!(danmaku = %self.id, loops = self.loops, "Move ended");
        self.emit(LifecycleEvent::MoveEnd);
        timer.fire();
        true
    }

    pub fn pause(&mut self, notify: bool) {
        if !self.moving || self.paused {
            trace!(danmaku = %self.id, "Pause ignored");
            return;
        }
        let now = Instant::now();
        let d = self.move_distance_at(now);
        if !d.is_finite() {
            debug!(danmaku = %self.id, "Pause abandoned: traveled distance is not finite");
            return;
        }

        self.paused = true;
        self.recorder.begin_pause(now);
        self.set_style(StyleProperty::ZIndex(2));
        self.set_style(StyleProperty::TransitionDuration(Duration::ZERO));
        self.set_style(StyleProperty::Transform(Some(d * self.direction.pause_sign())));
        if notify {
            self.emit(LifecycleEvent::Pause);
        }
    }

    pub fn resume(&mut self, notify: bool) {
        if !self.moving || !self.paused {
            trace!(danmaku = %self.id, "Resume ignored");
            return;
        }
        let now = Instant::now();
        let cw = self.summary_width();
        let remaining = self.remaining_time_at(now);

        self.paused = false;
        self.recorder.end_pause(now);
        self.set_style(StyleProperty::ZIndex(0));
        self.set_style(StyleProperty::TransitionDuration(remaining));
        self.set_style(StyleProperty::Transform(Some(
            cw * self.direction.travel_sign(),
        )));
        if notify {
            self.emit(LifecycleEvent::Resume);
        }
    }

    pub fn hide(&mut self, notify: bool) {
        self.set_style(StyleProperty::Visibility(Visibility::Hidden));
        self.set_style(StyleProperty::PointerEvents(PointerEvents::None));
        if notify {
            self.emit(LifecycleEvent::Hide);
        }
    }

    pub fn show(&mut self, notify: bool) {
        self.set_style(StyleProperty::Visibility(Visibility::Visible));
        self.set_style(StyleProperty::PointerEvents(PointerEvents::Auto));
        if notify {
            self.emit(LifecycleEvent::Show);
        }
    }

    /// Tear the item down for good
    pub fn destroy(&mut self) {
        self.moving = false;
        self.del_in_track();
        self.remove_node(true);
        if let Some(timer) = self.move_timer.take() {
            timer.clear();
        }
        self.emit(LifecycleEvent::Destroy);
        if let Some(node) = self.node.take() {
            self.ctx.registry.unregister(node.id());
        }
    }

    /// Clear state and caches, keeping the node for reuse
    pub fn reset(&mut self) {
        self.paused = false;
        self.moving = false;
        self.is_ended = false;
        self.position = Position::default();
        self.remove_node(true);
        self.del_in_track();
        self.set_start_status();
        self.set_style(StyleProperty::Top(None));
        self.update_track_data(None);
        if let Some(timer) = self.move_timer.take() {
            timer.clear();
        }
        self.recorder.clear();
    }

    /// Pre-animation baseline
    pub fn set_start_status(&mut self) {
        self.restore_view_status();
        self.set_style(StyleProperty::ZIndex(0));
        self.set_style(StyleProperty::Opacity(Some(0.0)));
        self.set_style(StyleProperty::Transform(None));
        self.set_style(StyleProperty::Transition(None));
        self.set_style(StyleProperty::Position(Positioning::Absolute));
        self.set_style(StyleProperty::Top(Some(self.position.y)));
        if let Some(side) = self.direction.side() {
            self.set_style(StyleProperty::Inset(side, Some(0.0)));
        }
    }

    fn restore_view_status(&mut self) {
        match self.ctx.statuses.view_status() {
            ViewStatus::Hide => self.hide(false),
            ViewStatus::Show => self.show(false),
        }
    }

    fn move_percent_at(&self, now: Instant) -> f64 {
        self.recorder.move_percent(now, self.actual_duration())
    }

    fn move_distance_at(&self, now: Instant) -> f64 {
        if !self.moving {
            return 0.0;
        }
        self.move_percent_at(now) * self.summary_width()
    }

    fn remaining_time_at(&self, now: Instant) -> Duration {
        let left = (1.0 - self.move_percent_at(now)).max(0.0);
        scale_duration(self.actual_duration(), left)
    }

    fn summary_width(&self) -> f64 {
        self.ctx.viewport.width().unwrap_or(0.0) + self.width()
    }

    fn set_style(&mut self, property: StyleProperty) {
        if let Some(node) = self.node.as_mut() {
            node.apply_style(property);
        }
    }

    fn del_in_track(&mut self) {
        let Some(track) = self.track.take() else {
            return;
        };
        if let Some(track) = track.upgrade() {
            track.borrow_mut().list.retain(|id| *id != self.id);
        }
        self.ctx.del_in_track(self.id);
    }

    fn emit(&mut self, event: LifecycleEvent) {
        if self.hooks.is_empty() {
            return;
        }
        // Handlers see the item immutably while the bus is borrowed out.
        let mut hooks = std::mem::take(&mut self.hooks);
        hooks.emit(event, self);
        self.hooks = hooks;
    }
}
