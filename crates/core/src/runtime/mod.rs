//! Drives a [`LandmarkSource`] through the mirror pipeline at a fixed pace.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    mpsc::{self, Receiver, Sender},
    Arc,
};

use tracing::{debug, info};

use crate::{
    config::FrameConfig,
    landmarks::{LandmarkSource, VideoFrame},
    mirror::{Command, FrameEvent, FrameInput, MirrorContext, MirrorState},
    timeline::FrameClock,
    MirrorError, Result,
};

/// Cloneable stop flag for a running [`FrameLoop`].
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Why a loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Cancelled,
    Exhausted,
    FrameLimit,
}

#[derive(Debug)]
pub struct LoopOutcome {
    pub state: MirrorState,
    pub frames: u64,
    pub reason: StopReason,
}

pub struct FrameLoop<S: LandmarkSource> {
    source: S,
    clock: FrameClock,
    cancel: CancelToken,
    max_frames: Option<u64>,
    video: VideoFrame,
    commands_tx: Sender<Command>,
    commands_rx: Receiver<Command>,
}

impl<S: LandmarkSource> FrameLoop<S> {
    pub fn new(source: S, config: &FrameConfig) -> Self {
        let (commands_tx, commands_rx) = mpsc::channel();
        Self {
            source,
            clock: FrameClock::new(config.interval_ms),
            cancel: CancelToken::new(),
            max_frames: None,
            video: VideoFrame::default(),
            commands_tx,
            commands_rx,
        }
    }

    pub fn with_max_frames(mut self, max_frames: u64) -> Self {
        self.max_frames = Some(max_frames);
        self
    }

    pub fn with_video(mut self, width: u32, height: u32) -> Self {
        self.video.width = width;
        self.video.height = height;
        self
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Queue for UI commands; they run on the next frame.
    pub fn commands(&self) -> Sender<Command> {
        self.commands_tx.clone()
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Initialises the source, runs frames until stopped, then releases the
    /// source. `on_frame` sees every state and its events.
    pub fn run(
        &mut self,
        state: MirrorState,
        ctx: &mut MirrorContext<'_>,
        mut on_frame: impl FnMut(&MirrorState, &[FrameEvent]),
    ) -> Result<LoopOutcome> {
        self.source.initialize().map_err(|err| match err {
            MirrorError::Init(_) => err,
            other => MirrorError::Init(other.to_string()),
        })?;
        info!("landmark source initialised");

        let outcome = self.run_frames(state, ctx, &mut on_frame);
        self.source.release();
        if let Ok(outcome) = &outcome {
            info!(frames = outcome.frames, reason = ?outcome.reason, "frame loop stopped");
        }
        outcome
    }

    fn run_frames(
        &mut self,
        mut state: MirrorState,
        ctx: &mut MirrorContext<'_>,
        on_frame: &mut impl FnMut(&MirrorState, &[FrameEvent]),
    ) -> Result<LoopOutcome> {
        let mut frames = 0u64;
        let reason = loop {
            if self.cancel.is_cancelled() {
                break StopReason::Cancelled;
            }
            if self.max_frames.is_some_and(|max| frames >= max) {
                break StopReason::FrameLimit;
            }
            let now = self.clock.now_ms();
            if self.source.is_exhausted(now) {
                break StopReason::Exhausted;
            }

            self.clock.tick();
            self.video.index = frames;
            let face = self
                .source
                .detect_face(&self.video, now)?
                .and_then(|faces| faces.into_iter().next());
            let hand = self
                .source
                .detect_hands(&self.video, now)?
                .and_then(|hands| hands.into_iter().next());
            let commands: Vec<Command> = self.commands_rx.try_iter().collect();

            let input = FrameInput {
                timestamp_ms: now,
                face,
                hand,
                commands,
            };
            let (next, events) = state.advance(input, ctx);
            state = next;
            if !events.is_empty() {
                debug!(frame = frames, count = events.len(), "frame events");
            }
            on_frame(&state, &events);
            frames += 1;
        };

        Ok(LoopOutcome {
            state,
            frames,
            reason,
        })
    }
}
