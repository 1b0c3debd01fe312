//! Live special-filter preview loop
//!
//! Runs a pixel effect once per animation tick against frames pulled from a
//! source. Cancellation is explicit: switching the active filter or tearing
//! down the preview must stop the loop, otherwise a stale processor keeps
//! consuming the frame budget after its surface is gone. Slow ticks are
//! skipped, not queued.

use std::sync::Arc;
use std::time::Duration;

use rand::{rngs::SmallRng, SeedableRng};
use tokio::{sync::watch, task::JoinHandle, time};
use tracing::{debug, warn};

use crate::{
    filters::{EffectContext, PixelEffect},
    raster::Frame,
};

/// Handle to a running preview loop
///
/// Cancel it (or drop it) to stop scheduling further ticks. Replacing the
/// active effect means cancelling the old handle and starting a new loop.
pub struct PreviewHandle {
    cancel: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl PreviewHandle {
    /// Stop the loop; no further frames are pulled or delivered
    pub fn cancel(&self) {
        let _ = self.cancel.send(true);
    }

    /// Whether the loop has finished
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map(|t| t.is_finished()).unwrap_or(true)
    }

    /// Wait for the loop to wind down after cancellation
    pub async fn join(mut self) {
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        let _ = self.cancel.send(true);
    }
}

/// Start a preview loop at the given tick rate
///
/// `source` yields the next live frame (returning `None` ends the loop,
/// e.g. the camera went away); `sink` receives each processed frame. If the
/// effect fails on a frame the unprocessed frame is delivered instead —
/// the preview degrades to "no filter", it never crashes the loop.
pub fn start_preview<S, K>(
    effect: Arc<dyn PixelEffect>,
    fps: f64,
    mut source: S,
    mut sink: K,
) -> PreviewHandle
where
    S: FnMut() -> Option<Frame> + Send + 'static,
    K: FnMut(Frame) + Send + 'static,
{
    let (cancel_tx, mut cancel_rx) = watch::channel(false);
    let period = Duration::from_secs_f64(1.0 / fps.max(1.0));

    let task = tokio::spawn(async move {
        let mut ticker = time::interval(period);
        ticker.set_missed_tick_behavior(time::MissedTickBehavior::Skip);
        let mut rng = SmallRng::from_entropy();

        loop {
            tokio::select! {
                changed = cancel_rx.changed() => {
                    // a closed channel means the handle is gone; stop either way
                    if changed.is_err() || *cancel_rx.borrow() {
                        debug!("preview loop cancelled");
                        break;
                    }
                }
                _ = ticker.tick() => {
                    let frame = match source() {
                        Some(frame) => frame,
                        None => {
                            debug!("frame source exhausted, stopping preview");
                            break;
                        }
                    };

                    let mut target = Frame::new_clear(frame.width(), frame.height());
                    let mut ctx = EffectContext::new(&mut rng);
                    match effect.apply(&mut target, &frame, &mut ctx) {
                        Ok(()) => sink(target),
                        Err(e) => {
                            warn!("preview effect failed, showing unfiltered frame: {}", e);
                            sink(frame);
                        }
                    }
                }
            }
        }
    });

    PreviewHandle {
        cancel: cancel_tx,
        task: Some(task),
    }
}
