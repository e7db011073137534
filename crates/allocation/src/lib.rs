//! Allocation domain module.
//!
//! This crate contains the business rules for allocating customer order lines
//! against stock batches, implemented purely as deterministic domain logic
//! (no IO, no HTTP, no storage).

pub mod allocate;
pub mod batch;
pub mod order_line;

pub use allocate::allocate;
pub use batch::Batch;
pub use order_line::OrderLine;
