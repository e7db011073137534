use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use warely_core::{BatchRef, Entity, Sku};

use crate::order_line::OrderLine;

/// Entity: a discrete delivery or stock holding of a single SKU.
///
/// `purchased_quantity` is fixed for the batch's lifetime; only the set of
/// allocated order lines mutates, through [`Batch::allocate`] and
/// [`Batch::deallocate`]. An ETA of `None` means the batch is already in
/// warehouse stock; a present date means it arrives later.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Batch {
    reference: BatchRef,
    sku: Sku,
    eta: Option<NaiveDate>,
    purchased_quantity: i64,
    allocations: HashSet<OrderLine>,
}

// Batch identity is the reference alone: two batches with the same reference
// are the same batch even when the rest of their state differs. An accepted
// modeling simplification; keep it when touching these impls.
impl PartialEq for Batch {
    fn eq(&self, other: &Self) -> bool {
        self.reference == other.reference
    }
}

impl Eq for Batch {}

impl std::hash::Hash for Batch {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.reference.hash(state);
    }
}

impl Entity for Batch {
    type Id = BatchRef;

    fn id(&self) -> &Self::Id {
        &self.reference
    }
}

impl Batch {
    pub fn new(
        reference: impl Into<BatchRef>,
        sku: impl Into<Sku>,
        qty: i64,
        eta: Option<NaiveDate>,
    ) -> Self {
        Self {
            reference: reference.into(),
            sku: sku.into(),
            eta,
            purchased_quantity: qty,
            allocations: HashSet::new(),
        }
    }

    pub fn reference(&self) -> &BatchRef {
        &self.reference
    }

    pub fn sku(&self) -> &Sku {
        &self.sku
    }

    pub fn eta(&self) -> Option<NaiveDate> {
        self.eta
    }

    pub fn purchased_quantity(&self) -> i64 {
        self.purchased_quantity
    }

    /// Sum of the quantities of all lines currently allocated to this batch.
    pub fn allocated_quantity(&self) -> i64 {
        self.allocations.iter().map(|line| line.qty).sum()
    }

    pub fn available_quantity(&self) -> i64 {
        self.purchased_quantity - self.allocated_quantity()
    }

    /// True iff the line's SKU matches and enough stock remains.
    pub fn can_allocate(&self, line: &OrderLine) -> bool {
        self.sku == line.sku && self.available_quantity() >= line.qty
    }

    /// Record an allocation of `line` against this batch.
    ///
    /// Silent no-op when the line is not allocatable; callers that need to
    /// distinguish rely on [`Batch::can_allocate`] first. Re-allocating a
    /// line already held is idempotent (set insertion).
    pub fn allocate(&mut self, line: OrderLine) {
        if self.can_allocate(&line) {
            self.allocations.insert(line);
        }
    }

    /// Remove a previously allocated line. No-op when the line is absent.
    pub fn deallocate(&mut self, line: &OrderLine) {
        self.allocations.remove(line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn eta(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(year, month, day)
    }

    fn batch_and_line(batch_qty: i64, line_qty: i64) -> (Batch, OrderLine) {
        (
            Batch::new("batch-001", "SMALL-TABLE", batch_qty, None),
            OrderLine::new("order-123", "SMALL-TABLE", line_qty),
        )
    }

    #[test]
    fn allocating_reduces_available_quantity() {
        let (mut batch, line) = batch_and_line(20, 2);
        batch.allocate(line);
        assert_eq!(batch.available_quantity(), 18);
    }

    #[test]
    fn can_allocate_if_available_greater_than_required() {
        let (batch, line) = batch_and_line(20, 2);
        assert!(batch.can_allocate(&line));
    }

    #[test]
    fn cannot_allocate_if_available_smaller_than_required() {
        let (batch, line) = batch_and_line(2, 20);
        assert!(!batch.can_allocate(&line));
    }

    #[test]
    fn can_allocate_if_available_equal_to_required() {
        let (batch, line) = batch_and_line(2, 2);
        assert!(batch.can_allocate(&line));
    }

    #[test]
    fn cannot_allocate_if_skus_do_not_match() {
        let batch = Batch::new("batch-001", "UNCOMFORTABLE-CHAIR", 100, None);
        let line = OrderLine::new("order-123", "EXPENSIVE-TOASTER", 10);
        assert!(!batch.can_allocate(&line));
    }

    #[test]
    fn allocation_is_idempotent() {
        let (mut batch, line) = batch_and_line(20, 2);
        batch.allocate(line.clone());
        batch.allocate(line);
        assert_eq!(batch.available_quantity(), 18);
    }

    #[test]
    fn ineligible_allocate_leaves_state_unchanged() {
        let (mut batch, line) = batch_and_line(2, 20);
        batch.allocate(line);
        assert_eq!(batch.available_quantity(), 2);
        assert_eq!(batch.allocated_quantity(), 0);
    }

    #[test]
    fn can_deallocate_allocated_line() {
        let (mut batch, line) = batch_and_line(20, 2);
        batch.allocate(line.clone());
        batch.deallocate(&line);
        assert_eq!(batch.available_quantity(), 20);
    }

    #[test]
    fn can_only_deallocate_allocated_lines() {
        let (mut batch, unallocated_line) = batch_and_line(20, 2);
        batch.deallocate(&unallocated_line);
        assert_eq!(batch.available_quantity(), 20);
    }

    #[test]
    fn identity_is_the_reference_alone() {
        let in_stock = Batch::new("batch-001", "RED-CHAIR", 20, None);
        let shipment = Batch::new("batch-001", "BLUE-CHAIR", 5, eta(2025, 1, 1));
        let other = Batch::new("batch-002", "RED-CHAIR", 20, None);
        assert_eq!(in_stock, shipment);
        assert_ne!(in_stock, other);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: after any sequence of allocate/deallocate calls,
        /// available_quantity equals purchased_quantity minus the sum of
        /// the quantities still held in the allocation set.
        #[test]
        fn available_equals_purchased_minus_allocated(
            purchased in 0i64..1_000,
            ops in prop::collection::vec((0u32..100, 1i64..50, prop::bool::ANY), 0..20)
        ) {
            let mut batch = Batch::new("batch-001", "SMALL-TABLE", purchased, None);

            for (order_no, qty, is_deallocate) in ops {
                let line = OrderLine::new(format!("order-{order_no}"), "SMALL-TABLE", qty);
                if is_deallocate {
                    batch.deallocate(&line);
                } else {
                    batch.allocate(line);
                }
                prop_assert_eq!(
                    batch.available_quantity(),
                    batch.purchased_quantity() - batch.allocated_quantity()
                );
                prop_assert!(batch.available_quantity() >= 0);
            }
        }
    }
}
