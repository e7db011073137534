//! Domain service: pick one batch for an order line.

use tracing::debug;

use warely_core::{BatchRef, DomainError, DomainResult};

use crate::batch::Batch;
use crate::order_line::OrderLine;

/// Allocate `line` to the best eligible batch in `batches`, scanning in the
/// supplied order.
///
/// Selection policy:
/// - the first eligible in-warehouse batch (no ETA) encountered wins
///   immediately;
/// - otherwise, among eligible dated batches, the one with the strictly
///   earliest ETA wins (first seen keeps ties).
///
/// A dated batch appearing before an in-warehouse batch is never compared
/// against it: the scan returns on the first in-warehouse match regardless of
/// ETAs seen earlier. Callers depend on this scan-order behavior.
///
/// On success exactly one batch is mutated and its reference returned; on
/// failure no batch is touched.
///
/// # Errors
///
/// Returns [`DomainError::OutOfStock`] when no batch can satisfy the line
/// (wrong SKU everywhere, or insufficient available quantity on every
/// matching batch).
pub fn allocate(line: &OrderLine, batches: &mut [Batch]) -> DomainResult<BatchRef> {
    let mut earliest: Option<usize> = None;

    for idx in 0..batches.len() {
        if !batches[idx].can_allocate(line) {
            continue;
        }
        if batches[idx].eta().is_none() {
            batches[idx].allocate(line.clone());
            let reference = batches[idx].reference().clone();
            debug!(batch = %reference, orderid = %line.orderid, sku = %line.sku, qty = line.qty,
                "allocated line to in-warehouse batch");
            return Ok(reference);
        }
        let sooner = match earliest {
            None => true,
            Some(best) => batches[idx].eta() < batches[best].eta(),
        };
        if sooner {
            earliest = Some(idx);
        }
    }

    if let Some(idx) = earliest {
        batches[idx].allocate(line.clone());
        let reference = batches[idx].reference().clone();
        debug!(batch = %reference, orderid = %line.orderid, sku = %line.sku, qty = line.qty,
            eta = %batches[idx].eta().unwrap_or_default(),
            "allocated line to earliest shipment");
        return Ok(reference);
    }

    Err(DomainError::out_of_stock(line.sku.clone()))
}
