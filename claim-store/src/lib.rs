//! Service Plan Claim Store
//!
//! Persistence side of service plan claims. A claim lives in a key-value
//! configuration store as a [`KvRecord`] whose metadata carries a
//! store-assigned [`ResourceVersion`]; every write back is a
//! compare-and-swap against the version captured when the claim was read.
//!
//! # Key Components
//!
//! - [`ClaimWrapper`]: A claim plus its persistence metadata, with the record codec
//! - [`ClaimListWrapper`]: A listed snapshot plus the version to resume watching from
//! - [`KvStore`]: Trait for the external configuration store
//! - [`InMemoryKvStore`]: Reference store with compare-and-swap and watch
//! - [`ClaimInteractor`]: Typed claim operations over a [`KvStore`]
//!
//! # Example
//!
//! ```ignore
//! use claim_state::{ClaimRecord, ClaimStatus, Update};
//! use claim_store::{ClaimInteractor, InMemoryKvStore, StoreConfig};
//!
//! let config = StoreConfig::default();
//! let claims = ClaimInteractor::new(InMemoryKvStore::new(&config), &config);
//!
//! let mut wrapper = claims.create("claim-1", ClaimRecord::new(ClaimStatus::Received)).await?;
//! wrapper.apply(&Update::status_only(ClaimStatus::Provisioning));
//! let wrapper = claims.update(&wrapper).await?; // fails with Conflict if someone wrote first
//! ```

pub mod config;
pub mod error;
pub mod interactor;
pub mod list;
pub mod memory;
pub mod record;
pub mod retry;
pub mod store;
pub mod wrapper;

// Re-export main types
pub use config::StoreConfig;
pub use error::{Result, StoreError};
pub use interactor::{ClaimEvent, ClaimInteractor, ClaimWatch};
pub use list::ClaimListWrapper;
pub use memory::InMemoryKvStore;
pub use record::{KvRecord, ObjectMeta, ResourceVersion};
pub use store::{KvStore, KvWatch, WatchEvent, WatchEventKind};
pub use wrapper::ClaimWrapper;
