//! Use-case services over the storage traits
//!
//! - [`EstablishmentService`]: CRUD, summary/detail views, guarded delete
//! - [`StoreService`]: CRUD pass-through and per-establishment listing
//!
//! Services own no state besides their storage handle. Clone them freely.

pub mod establishments;
pub mod stores;

pub use establishments::EstablishmentService;
pub use stores::StoreService;

#[cfg(test)]
pub(crate) mod fakes;
