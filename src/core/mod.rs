//! Core invoice types and the totals computation.
//!
//! Lines are evaluated independently ([`LineItem::amounts`]), then the
//! aggregator ([`compute_totals`]) derives document totals and the VAT
//! subtotal breakdown from the evaluated line set.

mod builder;
mod config;
mod error;
mod line;
pub mod reason_codes;
pub mod rounding;
mod totals;
mod types;
mod validation;

pub use builder::*;
pub use config::*;
pub use error::*;
pub use reason_codes::{default_exemption_reason, is_known_exemption_reason};
pub use totals::*;
pub use types::*;
pub use validation::*;
