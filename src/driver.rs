//! Drivers that feed input records and animation frames into the overlay
//!
//! - `replay`: deterministic, timestamps come from the script and frames are
//!   synthesized on a fixed 16ms grid
//! - `live`: records arrive on an async reader, frames come from a Tokio
//!   interval and every record is restamped with the driver's clock

use crate::codec::{self, decode_input, encode_event};
use crate::overlay::OverlayService;
use crate::protocol::{InputRecord, OverlayEvent};
use crate::store::PositionStore;
use crate::window::WindowPlacement;
use anyhow::{Context, Result};
use std::io::Write;
use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, warn};

/// Frame interval (~60 FPS)
pub const FRAME_MS: u64 = 16;

pub struct Driver<W, S, O> {
    service: OverlayService<W, S>,
    events: Receiver<OverlayEvent>,
    out: O,
}

impl<W: WindowPlacement, S: PositionStore, O: Write> Driver<W, S, O> {
    pub fn new(service: OverlayService<W, S>, events: Receiver<OverlayEvent>, out: O) -> Self {
        Self {
            service,
            events,
            out,
        }
    }

    #[cfg(test)]
    pub fn service(&self) -> &OverlayService<W, S> {
        &self.service
    }

    #[cfg(test)]
    pub fn into_output(self) -> O {
        self.out
    }

    /// Apply one record at `now_ms`
    pub fn apply(&mut self, record: &InputRecord, now_ms: u64) {
        match record {
            InputRecord::Dismiss { .. } => self.service.dismiss_panel(),
            InputRecord::Stop => self.service.stop(),
            _ => {
                if let Some(event) = record.to_pointer(now_ms) {
                    self.service.handle_pointer(&event);
                    debug!(
                        "Visual after {:?}: {:?}, delete zone {:?}",
                        event.action,
                        self.service.bubble_visual(),
                        self.service.delete_zone_visual()
                    );
                }
            }
        }
    }

    /// Write every pending overlay event as NDJSON
    pub fn flush(&mut self) -> Result<()> {
        while let Ok(event) = self.events.try_recv() {
            let line = encode_event(&event)?;
            self.out
                .write_all(line.as_bytes())
                .context("Failed to write overlay event")?;
        }
        self.out.flush()?;
        Ok(())
    }

    /// Replay a script. Records without a timestamp happen at the current
    /// synthetic time. The final snap, if any, runs to completion.
    pub fn replay(&mut self, records: &[InputRecord]) -> Result<()> {
        let mut clock = 0u64;

        for record in records {
            let at = record.time_ms().unwrap_or(clock).max(clock);

            while self.service.is_animating() && clock + FRAME_MS <= at {
                clock += FRAME_MS;
                self.service.on_frame(clock);
            }
            clock = at;

            self.apply(record, clock);
            self.flush()?;

            if !self.service.is_running() {
                break;
            }
        }

        while self.service.is_animating() {
            clock += FRAME_MS;
            self.service.on_frame(clock);
        }
        self.flush()
    }

    /// Decode one live line and apply it at `now_ms`
    fn apply_line(&mut self, line: &str, now_ms: u64) {
        if codec::is_skippable(line) {
            return;
        }
        match decode_input(line) {
            Ok(record) => self.apply(&record.with_time(now_ms), now_ms),
            Err(e) => warn!("Skipping bad input line: {}", e),
        }
    }

    /// Read NDJSON records until EOF or stop, ticking frames in between.
    /// Malformed or non UTF-8 lines are logged and skipped.
    pub async fn live<R: AsyncBufRead + Unpin>(&mut self, mut reader: R) -> Result<()> {
        let started = Instant::now();
        let now_ms = || started.elapsed().as_millis() as u64;

        let mut buf = Vec::new();
        let mut frames = tokio::time::interval(Duration::from_millis(FRAME_MS));
        frames.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        while self.service.is_running() {
            tokio::select! {
                // Partial reads stay in `buf` when a frame wins the race
                read = reader.read_until(b'\n', &mut buf) => {
                    if read.context("Failed to read input")? == 0 {
                        break;
                    }
                    let bytes = std::mem::take(&mut buf);
                    match String::from_utf8(bytes) {
                        Ok(line) => self.apply_line(&line, now_ms()),
                        Err(e) => warn!("Skipping non UTF-8 input line: {}", e),
                    }
                }
                _ = frames.tick() => self.service.on_frame(now_ms()),
            }
            self.flush()?;
        }

        // Input closed: let a running snap land before shutting down
        while self.service.is_animating() {
            frames.tick().await;
            self.service.on_frame(now_ms());
        }
        self.service.stop();
        self.flush()
    }
}
