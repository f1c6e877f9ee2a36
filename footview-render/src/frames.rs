//! Frame scheduling
//!
//! A view paints at most one frame per request and re-requests after every
//! paint. The host decides when requested frames run: a window event loop
//! maps requests to redraws, tests drive them by hand.

/// Identifies a requested frame so it can be cancelled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CancelToken(pub u64);

/// Something that can run a paint callback on the next display frame
pub trait FrameScheduler {
    /// Request one more frame
    fn schedule_next_frame(&mut self) -> CancelToken;

    /// Drop a requested frame that has not run yet
    fn cancel(&mut self, token: CancelToken);
}

/// Frames that only run when the owner says so
#[derive(Debug, Default)]
pub struct ManualFrames {
    next: u64,
    pending: Option<CancelToken>,
    scheduled: usize,
    cancelled: usize,
}

impl ManualFrames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume the pending request; true when a frame should be painted
    pub fn take_pending(&mut self) -> bool {
        self.pending.take().is_some()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn scheduled_count(&self) -> usize {
        self.scheduled
    }

    pub fn cancelled_count(&self) -> usize {
        self.cancelled
    }
}

impl FrameScheduler for ManualFrames {
    fn schedule_next_frame(&mut self) -> CancelToken {
        self.next += 1;
        let token = CancelToken(self.next);
        if self.pending.replace(token).is_some() {
            log::trace!("frame already pending, superseded by {:?}", token);
        }
        self.scheduled += 1;
        token
    }

    fn cancel(&mut self, token: CancelToken) {
        if self.pending == Some(token) {
            self.pending = None;
            self.cancelled += 1;
        }
    }
}
