//! Render request coalescing
//!
//! Hosts that redraw on demand (settings edits, window resizes) often produce several render
//! requests between two frames. Only the most recent one matters: at the next frame the host
//! calls [`FrameScheduler::take_frame`] and renders whatever is pending, if anything.

/// Identifies one render request. Tickets issued by a scheduler strictly increase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameTicket(u64);

/// Single-slot, latest-request-wins render queue
#[derive(Debug)]
pub struct FrameScheduler<R> {
    pending: Option<(FrameTicket, R)>,
    next_ticket: u64,
}

impl<R> Default for FrameScheduler<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> FrameScheduler<R> {
    pub fn new() -> Self {
        Self {
            pending: None,
            next_ticket: 0,
        }
    }

    /// Queue a render for the next frame, superseding any request still pending
    pub fn request(&mut self, request: R) -> FrameTicket {
        let ticket = FrameTicket(self.next_ticket);
        self.next_ticket += 1;

        if let Some((superseded, _)) = self.pending.replace((ticket, request)) {
            tracing::trace!(
                superseded = superseded.0,
                by = ticket.0,
                "Render request superseded"
            );
        }
        ticket
    }

    /// Drop the pending request if it is still the one identified by `ticket`.
    ///
    /// Returns false when that request already ran or was superseded.
    pub fn cancel(&mut self, ticket: FrameTicket) -> bool {
        match self.pending {
            Some((pending, _)) if pending == ticket => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }

    /// Called once per frame: hand out the latest request, leaving the slot empty
    pub fn take_frame(&mut self) -> Option<R> {
        self.pending.take().map(|(_, request)| request)
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    #[inline]
    pub fn pending_ticket(&self) -> Option<FrameTicket> {
        self.pending.as_ref().map(|(ticket, _)| *ticket)
    }
}
