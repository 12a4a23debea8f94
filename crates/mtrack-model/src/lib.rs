//! mtrack Model
//!
//! Records shared between the data layer, the scanner front end and the view:
//! - **Machine**: a tracked machine, as handed out by the data layer
//! - **User**: the signed-in identity raising complaints
//! - **NewComplaint**: the draft payload sent to the data layer
//! - **Complaint**: a stored complaint
//!
//! # Example
//!
//! ```rust
//! use mtrack_model::{Machine, NewComplaint, Urgency, User};
//!
//! let machine = Machine::new("m1", "QR1", "Press A");
//! let user = User::new("u1", "Dana", "operator");
//!
//! let draft = NewComplaint::raise(&machine, &user, "Hydraulic leak");
//! assert_eq!(draft.urgency, Urgency::Medium);
//! assert_eq!(draft.escalation_level, 0);
//! ```

#![warn(missing_docs)]

pub mod complaint;
pub mod machine;
pub mod user;

pub use complaint::{Complaint, ComplaintId, ComplaintStatus, NewComplaint, Urgency};
pub use machine::{Machine, MachineId};
pub use user::{User, UserId};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with mtrack records
    pub use crate::{
        Complaint, ComplaintId, ComplaintStatus, Machine, MachineId, NewComplaint, Urgency, User,
        UserId,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
