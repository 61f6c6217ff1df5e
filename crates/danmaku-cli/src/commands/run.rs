use std::time::Duration;

use anyhow::{Context, Result};

use danmaku_core::{DanmakuConfig, ViewStatus};

use crate::player::{PauseWindow, Player, Report};
use crate::RunArgs;

pub async fn run(mut config: DanmakuConfig, args: RunArgs) -> Result<()> {
    apply_overrides(&mut config, &args)?;

    let content = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let comments: Vec<String> = content.lines().map(str::to_string).collect();

    let pause = match (args.pause_at, args.pause_for) {
        (Some(at), Some(length)) => Some(PauseWindow {
            at: Duration::from_millis(at),
            length: Duration::from_millis(length),
        }),
        _ => None,
    };

    let report = Player::new(config, comments)?
        .with_pause(pause)
        .play()
        .await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn apply_overrides(config: &mut DanmakuConfig, args: &RunArgs) -> Result<()> {
    let stage = &mut config.stage;
    if let Some(rate) = args.rate {
        stage.rate = rate;
    }
    if let Some(direction) = args.direction {
        stage.direction = direction;
    }
    if let Some(width) = args.width {
        stage.width = width;
    }
    if let Some(height) = args.height {
        stage.height = height;
    }
    if args.hidden {
        stage.view_status = ViewStatus::Hide;
    }
    config.validate()?;
    Ok(())
}

fn print_report(report: &Report) {
    println!(
        "Played {} comment(s) on {} lane(s) in {:.1}s",
        report.items.len(),
        report.lanes,
        report.elapsed_ms as f64 / 1000.0
    );
    if report.dropped > 0 {
        println!("Dropped {} comment(s) over the stash limit", report.dropped);
    }
    println!();

    for item in &report.items {
        let paused = if item.paused_ms > 0 {
            format!(" (paused {}ms)", item.paused_ms)
        } else {
            String::new()
        };
        println!(
            "  #{:<4} lane {}  {:>6}ms -> {:>6}ms  {}{}  {}",
            item.id, item.lane, item.started_ms, item.finished_ms, item.outcome, paused, item.text
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use danmaku_core::Direction;
    use std::path::PathBuf;

    fn args() -> RunArgs {
        RunArgs {
            input: PathBuf::from("comments.txt"),
            rate: None,
            direction: None,
            width: None,
            height: None,
            pause_at: None,
            pause_for: None,
            hidden: false,
            json: false,
        }
    }

    #[test]
    fn test_overrides_replace_config_values() {
        let mut config = DanmakuConfig::default();
        let args = RunArgs {
            rate: Some(2.0),
            direction: Some(Direction::Left),
            hidden: true,
            ..args()
        };
        apply_overrides(&mut config, &args).unwrap();
        assert_eq!(config.stage.rate, 2.0);
        assert_eq!(config.stage.direction, Direction::Left);
        assert_eq!(config.stage.view_status, ViewStatus::Hide);
    }

    #[test]
    fn test_invalid_override_rejected() {
        let mut config = DanmakuConfig::default();
        let args = RunArgs {
            rate: Some(0.0),
            ..args()
        };
        assert!(apply_overrides(&mut config, &args).is_err());
    }
}
