//! # fatoora
//!
//! Totals engine for Saudi (ZATCA) e-invoices: line net/VAT/gross amounts,
//! the per-category VAT subtotal breakdown, and document totals with the
//! document discount attributed to a single tax category.
//!
//! All monetary values use [`rust_decimal::Decimal`] — never floating point.
//! Rounding is half away from zero at every stage.
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use fatoora::core::*;
//! use rust_decimal_macros::dec;
//!
//! let supplier = SupplierBuilder::new(
//!     "Maximum Speed Tech Supply LTD",
//!     "399999999900003",
//!     AddressBuilder::new("Riyadh", "23333", "SA").build(),
//! )
//! .build();
//! let customer = CustomerBuilder::new(
//!     "Fatoora Samples LTD",
//!     AddressBuilder::new("Riyadh", "12222", "SA").build(),
//! )
//! .build();
//!
//! let invoice = InvoiceBuilder::new("INV/2024/001", NaiveDate::from_ymd_opt(2024, 6, 15).unwrap())
//!     .supplier(supplier)
//!     .customer(customer)
//!     .add_line(LineItemBuilder::new("Consulting", dec!(1), dec!(100))
//!         .tax(TaxCategory::StandardRate, dec!(15))
//!         .build())
//!     .build()
//!     .unwrap();
//!
//! let totals = invoice.totals().unwrap();
//! assert_eq!(totals.tax_amount, dec!(15.00));
//! assert_eq!(totals.gross_total, dec!(115.00));
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | Invoice types, line and document totals, builders, validation |
//! | `json` | Load [`core::InvoiceDefaults`] from JSON |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
