//! Change notification: mute and coalesce modes.
//!
//! Every content mutation records added/deleted byte counts. A registered
//! callback observes them either per-operation or folded into a single
//! event across a coalesced section. Structural operations that do not
//! change observable content (contiguation, space management) run muted,
//! so their internal bookkeeping never leaks to the caller.

use crate::buffer::Buffer;

/// Counters handed to a change callback.
///
/// `orig_size` is the content length when the callback was registered or
/// last invoked; `n_added` and `n_deleted` accumulate since then.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChangeInfo {
    /// Content length at the previous emission.
    pub orig_size: usize,
    /// Bytes added since the previous emission.
    pub n_added: usize,
    /// Bytes deleted since the previous emission.
    pub n_deleted: usize,
}

pub(crate) type ChangedFn = Box<dyn FnMut(&ChangeInfo) + Send>;

/// Per-buffer notifier state.
#[derive(Default)]
pub(crate) struct ChangeLog {
    pub(crate) cb: Option<ChangedFn>,
    pub(crate) info: ChangeInfo,
    pub(crate) muted: u32,
    pub(crate) coalescing: u32,
}

impl Buffer {
    /// Register a callback invoked after content-changing operations.
    ///
    /// The callback receives only the counters; it cannot reach the buffer,
    /// which rules out re-entrant mutation. Replaces any previous callback
    /// and resets the counters.
    pub fn set_changed_cb(&mut self, cb: impl FnMut(&ChangeInfo) + Send + 'static) {
        self.changes.info = ChangeInfo {
            orig_size: self.content_len,
            ..ChangeInfo::default()
        };
        self.changes.cb = Some(Box::new(cb));
    }

    /// Remove the change callback, if any.
    pub fn clear_changed_cb(&mut self) {
        self.changes.cb = None;
    }

    /// Start folding change events into one. Nestable.
    pub fn begin_coalescing(&mut self) {
        self.changes.coalescing += 1;
    }

    /// End a coalesced section; on the outermost end, the folded event is
    /// emitted if anything changed.
    pub fn end_coalescing(&mut self) {
        debug_assert!(self.changes.coalescing > 0);
        self.changes.coalescing = self.changes.coalescing.saturating_sub(1);
        if self.changes.coalescing == 0 {
            self.maybe_emit();
        }
    }

    /// Run `f` with change events coalesced into a single emission.
    pub fn coalesced<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.begin_coalescing();
        let out = f(self);
        self.end_coalescing();
        out
    }

    /// Run `f` with change events silenced: changes made inside are not
    /// counted at all.
    pub(crate) fn muted<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.changes.muted += 1;
        let out = f(self);
        self.changes.muted -= 1;
        if self.changes.muted == 0 {
            self.maybe_emit();
        }
        out
    }

    pub(crate) fn record_add(&mut self, n: usize) {
        if n == 0 || self.changes.muted > 0 {
            return;
        }
        self.changes.info.n_added += n;
        self.maybe_emit();
    }

    pub(crate) fn record_delete(&mut self, n: usize) {
        if n == 0 || self.changes.muted > 0 {
            return;
        }
        self.changes.info.n_deleted += n;
        self.maybe_emit();
    }

    fn maybe_emit(&mut self) {
        if self.changes.muted > 0 || self.changes.coalescing > 0 {
            return;
        }
        if self.changes.info.n_added == 0 && self.changes.info.n_deleted == 0 {
            return;
        }
        if let Some(mut cb) = self.changes.cb.take() {
            let info = self.changes.info;
            cb(&info);
            self.changes.info = ChangeInfo {
                orig_size: self.content_len,
                ..ChangeInfo::default()
            };
            self.changes.cb = Some(cb);
        }
    }
}
