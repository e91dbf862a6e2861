//! Strongly-typed identifiers for domain entities.
//!
//! Every entity uses a store-assigned surrogate key. The newtypes keep a
//! customer id from being passed where an order id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Create an identifier from its raw key.
            #[must_use]
            pub const fn new(value: u64) -> Self {
                Self(value)
            }

            /// Get the raw key.
            #[must_use]
            pub const fn value(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(CustomerId, "Identifier of a customer.");
define_id!(MeasurementId, "Identifier of a recorded measurement set.");
define_id!(VendorRoleId, "Identifier of a vendor role (Cutter, Tailor, ...).");
define_id!(PipelineStageId, "Identifier of a production pipeline stage.");
define_id!(VendorId, "Identifier of a vendor.");
define_id!(OrderId, "Identifier of a customer order.");
define_id!(OrderStageId, "Identifier of one stage row attached to an order.");
define_id!(InvoiceId, "Identifier of an invoice.");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_new_and_display() {
        let id = OrderId::new(42);
        assert_eq!(id.value(), 42);
        assert_eq!(format!("{id}"), "42");
    }

    #[test]
    fn id_conversions() {
        let id: CustomerId = 7.into();
        let raw: u64 = id.into();
        assert_eq!(raw, 7);
    }

    #[test]
    fn ids_order_by_raw_key() {
        assert!(OrderStageId::new(1) < OrderStageId::new(2));
    }

    #[test]
    fn id_serializes_transparently() {
        let json = serde_json::to_string(&InvoiceId::new(9)).unwrap();
        assert_eq!(json, "9");
        let parsed: InvoiceId = serde_json::from_str("9").unwrap();
        assert_eq!(parsed, InvoiceId::new(9));
    }
}
