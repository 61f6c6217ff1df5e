//! Headless stage host
//!
//! Feeds comments into lanes one interval apart, drives every item's
//! timeline from a frame loop and collects what happened into a report.

use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};
use std::rc::Rc;
use std::time::Duration;

use anyhow::Result;
use serde::Serialize;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, trace, warn};

use danmaku_core::movement::lifecycle_logger;
use danmaku_core::render::{next_frame, TextMetrics};
use danmaku_core::{
    ContainerId, DanmakuConfig, DanmakuContext, EngineId, FacileDanmaku, FacileOptions,
    InternalStatuses, MoveCompletion, MoveOutcome, PositionUpdate, TrackData, TrackHandle,
    Viewport,
};

/// A global pause applied to every moving item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PauseWindow {
    pub at: Duration,
    pub length: Duration,
}

impl PauseWindow {
    fn contains(&self, elapsed: Duration) -> bool {
        elapsed >= self.at && elapsed < self.at + self.length
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ItemReport {
    pub id: u64,
    pub text: String,
    pub lane: usize,
    pub duration_ms: u64,
    pub started_ms: u64,
    pub finished_ms: u64,
    pub paused_ms: u64,
    pub outcome: &'static str,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Report {
    pub lanes: usize,
    pub dropped: usize,
    pub elapsed_ms: u64,
    pub items: Vec<ItemReport>,
}

impl Report {
    pub fn completed(&self) -> usize {
        self.items.iter().filter(|i| i.outcome == "ended").count()
    }
}

struct Live {
    item: FacileDanmaku<String>,
    completion: MoveCompletion,
    lane: usize,
    started: Instant,
}

pub struct Player {
    config: DanmakuConfig,
    ctx: Rc<DanmakuContext<String>>,
    container: ContainerId,
    tracks: Vec<TrackHandle>,
    pending: VecDeque<(usize, String)>,
    total: usize,
    live: BTreeMap<EngineId, Live>,
    pause: Option<PauseWindow>,
    report: Report,
}

impl Player {
    pub fn new(config: DanmakuConfig, comments: Vec<String>) -> Result<Self> {
        let stage = &config.stage;
        let viewport = Rc::new(Viewport::new(stage.width, stage.height));
        let statuses = Rc::new(InternalStatuses::new(stage.view_status));
        let ctx = Rc::new(
            DanmakuContext::new(viewport, TextMetrics::default())
                .with_statuses(statuses)
                .with_del_in_track(|id| trace!(danmaku = %id, "Left lane")),
        );
        let container = ctx.ids.next_container();

        let height = stage.track_height_px()?;
        let tracks: Vec<TrackHandle> = (0..stage.track_count()?)
            .map(|i| Rc::new(RefCell::new(TrackData::new(i, i as f64 * height, height))))
            .collect();

        let mut pending: VecDeque<(usize, String)> = comments
            .into_iter()
            .filter(|c| !c.trim().is_empty())
            .enumerate()
            .collect();
        let mut dropped = 0;
        if pending.len() > config.limits.stash {
            dropped = pending.len() - config.limits.stash;
            warn!(
                stash = config.limits.stash,
                dropped, "Too many comments queued, dropping the excess"
            );
            pending.truncate(config.limits.stash);
        }
        let total = pending.len();

        info!(lanes = tracks.len(), queued = total, "Stage ready");
        Ok(Self {
            report: Report {
                lanes: tracks.len(),
                dropped,
                ..Report::default()
            },
            config,
            ctx,
            container,
            tracks,
            pending,
            total,
            live: BTreeMap::new(),
            pause: None,
        })
    }

    pub fn with_pause(mut self, pause: Option<PauseWindow>) -> Self {
        self.pause = pause;
        self
    }

    /// Run until every queued comment has crossed the stage
    pub async fn play(mut self) -> Result<Report> {
        let frame = self.config.stage.frame();
        let mut ticker = tokio::time::interval(frame);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let origin = Instant::now();
        let mut last_push: Option<Instant> = None;
        let mut paused = false;

        while !self.pending.is_empty() || !self.live.is_empty() {
            ticker.tick().await;
            let now = Instant::now();

            let in_window = self
                .pause
                .is_some_and(|w| w.contains(now.duration_since(origin)));
            if in_window != paused {
                paused = in_window;
                self.set_paused(paused);
            }

            let interval = self.config.stage.interval();
            let due = last_push.map_or(true, |t| now.duration_since(t) >= interval);
            if !paused && due {
                if let Some(lane) = self.free_lane() {
                    if let Some((index, text)) = self.pending.pop_front() {
                        self.push(index, text, lane, frame).await?;
                        last_push = Some(Instant::now());
                    }
                }
            }

            self.advance(Instant::now(), origin);
        }

        self.report.elapsed_ms = origin.elapsed().as_millis() as u64;
        info!(
            completed = self.report.completed(),
            elapsed_ms = self.report.elapsed_ms,
            "Stage drained"
        );
        Ok(self.report)
    }

    fn set_paused(&mut self, paused: bool) {
        debug!(paused, live = self.live.len(), "Global pause toggled");
        for live in self.live.values_mut() {
            if paused {
                live.item.pause(true);
            } else {
                live.item.resume(true);
            }
        }
    }

    /// First lane whose newest item has left at least `gap` pixels behind it
    fn free_lane(&self) -> Option<usize> {
        if self
            .config
            .limits
            .view
            .is_some_and(|max| self.live.len() >= max)
        {
            return None;
        }
        let gap = self.config.stage.gap;
        self.tracks.iter().position(|track| {
            let Some(last) = track.borrow().last() else {
                return true;
            };
            match self.live.get(&last) {
                Some(live) => live.item.move_distance() - live.item.width() >= gap,
                None => true,
            }
        })
    }

    async fn push(
        &mut self,
        index: usize,
        text: String,
        lane: usize,
        frame: Duration,
    ) -> Result<()> {
        let stage = &self.config.stage;
        let mut item = FacileDanmaku::new(
            self.ctx.clone(),
            FacileOptions {
                data: text,
                rate: stage.rate,
                duration: stage.duration_for(index, self.total),
                direction: stage.direction,
            },
        );
        item.use_plugin(lifecycle_logger())?;
        item.create_node();

        let track = &self.tracks[lane];
        let top = track.borrow().top();
        item.update_position(PositionUpdate {
            x: None,
            y: Some(top),
        });
        item.update_track_data(Some(track));
        item.append_node(self.container);

        // The node needs a committed layout before its transition is requested
        next_frame(frame).await;
        let completion = item.start();
        debug!(danmaku = %item.id(), lane, "Pushed");

        self.live.insert(
            item.id(),
            Live {
                item,
                completion,
                lane,
                started: Instant::now(),
            },
        );
        Ok(())
    }

    fn advance(&mut self, now: Instant, origin: Instant) {
        let mut finished = Vec::new();
        for (id, live) in self.live.iter_mut() {
            live.item.tick(now);
            if let Some(outcome) = live.completion.try_outcome() {
                finished.push((*id, outcome));
            }
        }

        for (id, outcome) in finished {
            let Some(mut live) = self.live.remove(&id) else {
                continue;
            };
            let paused_ms = live.item.recorder().pause_time().as_millis() as u64;
            live.item.destroy();
            self.report.items.push(ItemReport {
                id: id.get(),
                text: live.item.data().clone(),
                lane: live.lane,
                duration_ms: live.item.actual_duration().as_millis() as u64,
                started_ms: live.started.duration_since(origin).as_millis() as u64,
                finished_ms: now.duration_since(origin).as_millis() as u64,
                paused_ms,
                outcome: match outcome {
                    MoveOutcome::Ended => "ended",
                    MoveOutcome::Cancelled => "cancelled",
                },
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> DanmakuConfig {
        let mut config = DanmakuConfig::default();
        config.stage.width = 200.0;
        config.stage.height = 60.0;
        config.stage.track_height = "20px".to_string();
        config.stage.times_ms = [1000, 1000];
        config.stage.interval_ms = 100;
        config
    }

    fn comments(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("comment {i}")).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_every_comment_ends() {
        let player = Player::new(config(), comments(5)).unwrap();
        let report = player.play().await.unwrap();

        assert_eq!(report.lanes, 3);
        assert_eq!(report.items.len(), 5);
        assert_eq!(report.completed(), 5);
        assert!(report.items.iter().all(|i| i.lane < 3));
        assert!(report.items.iter().all(|i| i.finished_ms >= i.started_ms + 1000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_lines_skipped_and_stash_enforced() {
        let mut config = config();
        config.limits.stash = 2;
        let mut input = comments(3);
        input.insert(1, "   ".to_string());

        let report = Player::new(config, input).unwrap().play().await.unwrap();
        assert_eq!(report.items.len(), 2);
        assert_eq!(report.dropped, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_window_delays_completion() {
        let pause = PauseWindow {
            at: Duration::from_millis(300),
            length: Duration::from_millis(500),
        };
        let report = Player::new(config(), comments(1))
            .unwrap()
            .with_pause(Some(pause))
            .play()
            .await
            .unwrap();

        let item = &report.items[0];
        assert_eq!(item.outcome, "ended");
        assert!(item.paused_ms >= 450);
        assert!(item.finished_ms - item.started_ms >= 1450);
    }

    #[tokio::test(start_paused = true)]
    async fn test_gap_serializes_a_single_lane() {
        let mut config = config();
        config.stage.height = 20.0;
        config.stage.gap = 50.0;
        let report = Player::new(config, comments(2)).unwrap().play().await.unwrap();

        assert_eq!(report.lanes, 1);
        let (a, b) = (&report.items[0], &report.items[1]);
        // "comment 0" is 90px wide; the second waits for 140px of travel
        // out of 290px, roughly half of the one second traversal.
        assert!(b.started_ms >= a.started_ms + 400);
    }

    #[test]
    fn test_stage_too_short_for_a_lane() {
        let mut config = config();
        config.stage.height = 10.0;
        assert!(Player::new(config, comments(1)).is_err());
    }
}
