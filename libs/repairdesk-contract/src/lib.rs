//! Types shared by the RepairDesk backend and its clients.
//!
//! Everything here is transport-level vocabulary: the wire enums, the ticket
//! workflow graph, the capability set a role grants, and the upload policy.
//! No I/O lives in this crate.

pub mod capabilities;
pub mod model;
pub mod upload;
pub mod workflow;

pub use capabilities::{Capabilities, VisibleScope};
pub use model::{ParseEnumError, PaymentStatus, Priority, Role, TicketStatus};
pub use upload::{UploadPolicy, UploadViolation};
pub use workflow::TransitionError;
