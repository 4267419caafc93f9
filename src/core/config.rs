use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::error::FatooraError;
use super::types::{InvoiceKind, InvoiceTypeCode, PaymentMeansCode, TaxCategory};

/// Defaults applied by the builders when a field is not set explicitly.
///
/// Missing keys in a deserialized document fall back to [`Default`], so a
/// config only needs to name the values it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvoiceDefaults {
    /// Document and line tax rate (percent).
    pub tax_rate: Decimal,
    /// Line tax category.
    pub tax_category: TaxCategory,
    pub payment_means: PaymentMeansCode,
    pub type_code: InvoiceTypeCode,
    pub invoice_type: InvoiceKind,
    /// Transaction type code; `None` derives it from `invoice_type`.
    pub transaction_type_code: Option<String>,
}

impl Default for InvoiceDefaults {
    fn default() -> Self {
        Self {
            tax_rate: dec!(15),
            tax_category: TaxCategory::StandardRate,
            payment_means: PaymentMeansCode::Cash,
            type_code: InvoiceTypeCode::TaxInvoice,
            invoice_type: InvoiceKind::Standard,
            transaction_type_code: None,
        }
    }
}

impl InvoiceDefaults {
    /// Effective transaction type code.
    pub fn transaction_type_code(&self) -> String {
        self.transaction_type_code
            .clone()
            .unwrap_or_else(|| self.invoice_type.transaction_type_code().to_string())
    }

    /// Parse defaults from JSON, e.g. `{"tax_rate": "5"}`.
    #[cfg(feature = "json")]
    pub fn from_json_str(json: &str) -> Result<Self, FatooraError> {
        let defaults: Self = serde_json::from_str(json)
            .map_err(|e| FatooraError::Builder(format!("invalid defaults: {e}")))?;
        defaults.check()?;
        Ok(defaults)
    }

    /// Reject defaults that would produce invalid lines.
    pub fn check(&self) -> Result<(), FatooraError> {
        if self.tax_rate.is_sign_negative() {
            return Err(FatooraError::InvalidInput(format!(
                "default tax rate must not be negative, got {}",
                self.tax_rate
            )));
        }
        Ok(())
    }
}
