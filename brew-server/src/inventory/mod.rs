//! Inventory reservation engine
//!
//! The part of the server that actually guards stock:
//!
//! - [`ledger`] - derived availability (batches minus active holds)
//! - [`reservation`] - time-limited holds against the ledger
//! - [`checkout`] - converts holds into orders, allocating physical batches
//! - [`reaper`] - periodic expiry sweep
//!
//! Every multi-step operation runs inside a single SQLite transaction and
//! re-validates availability inside it; broadcasts happen strictly after
//! commit.

pub mod checkout;
pub mod ledger;
pub mod reaper;
pub mod reservation;

pub use checkout::CheckoutService;
pub use reservation::ReservationService;
