//! Service Plan Claim State
//!
//! Domain model and update protocol for service plan claims: requests to
//! provision and bind a service instance, tracked through their lifecycle
//! as records in a key-value configuration store.
//!
//! # Key Components
//!
//! - [`ClaimRecord`]: The claim itself, with its lifecycle status and extra data
//! - [`ClaimStatus`]: Closed set of lifecycle states
//! - [`Update`]: Every kind of change a caller may request on a claim
//! - [`apply_update`]: The single state-transition function
//! - [`ClaimRecord::to_map`] / [`ClaimRecord::from_map`]: Key-value codec
//!
//! # Example
//!
//! ```
//! use claim_state::{apply_update, ClaimRecord, ClaimStatus, Update};
//!
//! let mut claim = ClaimRecord::new(ClaimStatus::Provisioned).with_description("start");
//! apply_update(&mut claim, &Update::status_only(ClaimStatus::Binding));
//!
//! assert_eq!(claim.status, ClaimStatus::Binding);
//! assert_eq!(claim.status_description, "start");
//! ```

pub mod apply;
pub mod codec;
pub mod error;
pub mod record;
pub mod status;
pub mod update;

// Re-export main types
pub use apply::apply_update;
pub use error::DecodeError;
pub use record::{ClaimRecord, Extra};
pub use status::{ClaimAction, ClaimStatus};
pub use update::{Update, UpdateKind};
