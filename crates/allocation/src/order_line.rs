use serde::{Deserialize, Serialize};

use warely_core::{OrderId, Sku, ValueObject};

/// Value object: a request to allocate `qty` units of `sku` for order `orderid`.
///
/// Equality and hashing are structural (all three fields), so order lines can
/// live in a `HashSet` and re-adding an identical line is a no-op. Quantities
/// are deliberately unvalidated: the domain accepts whatever integer the
/// caller supplies and leaves rejection of non-positive quantities to outer
/// layers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderLine {
    pub orderid: OrderId,
    pub sku: Sku,
    pub qty: i64,
}

impl OrderLine {
    pub fn new(orderid: impl Into<OrderId>, sku: impl Into<Sku>, qty: i64) -> Self {
        Self {
            orderid: orderid.into(),
            sku: sku.into(),
            qty,
        }
    }
}

impl ValueObject for OrderLine {}
