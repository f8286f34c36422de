//! # erc1056-ledger
//!
//! Stand-in execution environment for the ERC1056 registry:
//!
//! - [`LocalLedger`] orders transactions, assigns block heights and timestamps
//! - [`EventJournal`] keeps the event log, the attribute index and a live feed
//! - [`Clock`] abstracts block time so tests can move it forward

#![warn(clippy::all)]

pub mod clock;
pub mod errors;
pub mod journal;
pub mod ledger;

pub use clock::{Clock, ManualClock, SystemClock};
pub use errors::{LedgerError, Result};
pub use journal::{AttributeRecord, EventJournal};
pub use ledger::LocalLedger;
