use std::time::Duration;

/// Nominal frame interval of the headless host (~60fps)
pub const FRAME: Duration = Duration::from_millis(16);

/// Wait two frames
///
/// A node inserted in this frame has no committed layout yet; requesting a
/// transition before the next-next frame would collapse it into a jump.
pub async fn next_frame(frame: Duration) {
    tokio::time::sleep(frame).await;
    tokio::time::sleep(frame).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn test_waits_two_frames() {
        let before = Instant::now();
        next_frame(FRAME).await;
        assert!(Instant::now() - before >= FRAME * 2);
    }
}
