use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::{CancelReason, Error, Result};

/// Shared cooperative cancellation signal, optionally with a deadline.
///
/// Clones share the same flag. Stages poll it; nothing is preempted.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.reason().is_some()
    }

    pub fn reason(&self) -> Option<CancelReason> {
        if self.flag.load(Ordering::Acquire) {
            return Some(CancelReason::Requested);
        }
        match self.deadline {
            Some(d) if Instant::now() >= d => Some(CancelReason::DeadlineExceeded),
            _ => None,
        }
    }

    pub fn check(&self) -> Result<()> {
        match self.reason() {
            Some(reason) => Err(Error::Cancelled(reason)),
            None => Ok(()),
        }
    }
}

/// Progress callback: `(processed, total)`.
pub type ProgressFn = Arc<dyn Fn(usize, usize) + Send + Sync>;

/// Per-invocation context threaded through every stage.
#[derive(Clone, Default)]
pub struct Context {
    cancel: CancelToken,
    progress: Option<ProgressFn>,
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("cancel", &self.cancel)
            .field("progress", &self.progress.is_some())
            .finish()
    }
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn with_progress<F>(mut self, f: F) -> Self
    where
        F: Fn(usize, usize) + Send + Sync + 'static,
    {
        self.progress = Some(Arc::new(f));
        self
    }

    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    pub fn check(&self) -> Result<()> {
        self.cancel.check()
    }

    /// Report progress. No-op without a callback; `processed` is clamped to
    /// `total`.
    pub fn report(&self, processed: usize, total: usize) {
        if let Some(cb) = &self.progress {
            cb(processed.min(total), total);
        }
    }

    /// A context for one stage whose progress is offset by the work already
    /// reported by earlier stages, so the caller sees one non-decreasing
    /// sequence across the whole run. The stage's last reported total is
    /// stored in `stage_total`.
    pub(crate) fn offset(&self, base: usize, stage_total: Arc<AtomicUsize>) -> Context {
        let progress = self.progress.clone().map(|parent| {
            Arc::new(move |processed: usize, total: usize| {
                stage_total.store(total, Ordering::Relaxed);
                parent(base + processed, base + total);
            }) as ProgressFn
        });
        Context {
            cancel: self.cancel.clone(),
            progress,
        }
    }
}
