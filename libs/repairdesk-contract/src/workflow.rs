//! Ticket status graph.
//!
//! ```text
//! beklemede ──► isleniyor ──► tamamlandi
//!     │  │          │              ▲
//!     │  └──────────┼──────────────┘
//!     └──► iptal ◄──┘
//! ```
//!
//! A pending ticket may be closed straight away without passing through
//! `isleniyor`. `tamamlandi` and `iptal` are terminal.

use thiserror::Error;

use crate::model::TicketStatus;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("cannot move ticket from '{from}' to '{to}'")]
pub struct TransitionError {
    pub from: TicketStatus,
    pub to: TicketStatus,
}

impl TicketStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TicketStatus::Completed | TicketStatus::Cancelled)
    }

    /// True when `next` is a forward edge of the graph. Staying in place is
    /// not a transition and returns false.
    pub fn can_transition_to(&self, next: TicketStatus) -> bool {
        use TicketStatus::*;
        matches!(
            (self, next),
            (Pending, InProgress)
                | (Pending, Completed)
                | (InProgress, Completed)
                | (Pending, Cancelled)
                | (InProgress, Cancelled)
        )
    }

    /// Validate a requested status. Re-sending the current status is a no-op
    /// and yields `Ok(None)`; a real move yields `Ok(Some(next))`.
    pub fn transition(&self, next: TicketStatus) -> Result<Option<TicketStatus>, TransitionError> {
        if *self == next {
            return Ok(None);
        }
        if self.can_transition_to(next) {
            Ok(Some(next))
        } else {
            Err(TransitionError {
                from: *self,
                to: next,
            })
        }
    }
}
