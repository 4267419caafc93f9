use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The invoice document (ZATCA invoice data model).
///
/// Derived figures are never stored here; call [`Invoice::totals`] or
/// [`compute_totals`](super::compute_totals) to obtain them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    /// Invoice number as printed (e.g. "INV/2023/2/131231").
    pub number: String,
    /// Invoice UUID.
    pub id: String,
    /// Standard (B2B) or simplified (B2C) invoice.
    pub invoice_type: InvoiceKind,
    /// UNTDID 1001 document type code.
    pub type_code: InvoiceTypeCode,
    /// ZATCA transaction type code (e.g. "0100000" standard, "0200000" simplified).
    pub transaction_type_code: String,
    /// Free text note.
    pub notes: Option<String>,
    /// Invoice counter value (ICV).
    pub order: u64,
    /// Issue date.
    pub issue_date: NaiveDate,
    /// Issue time.
    pub issue_time: NaiveTime,
    /// Hash of the previous invoice in the chain. Opaque to this crate.
    pub previous_invoice_hash: String,
    /// Invoice lines in display order.
    pub lines: Vec<LineItem>,
    pub supplier: Supplier,
    pub customer: Customer,
    /// Document-level allowance amount.
    pub discount: Decimal,
    /// Billing reference (original invoice for credit/debit notes).
    pub reference_id: Option<String>,
    /// UNTDID 4461 payment means.
    pub payment_means: PaymentMeansCode,
    /// Placeholder document tax rate. The rate actually applied is resolved
    /// from the lines and reported in [`Totals::tax_rate`].
    pub tax_rate: Decimal,
    /// Actual delivery date.
    pub delivery_date: Option<NaiveDate>,
}

/// One invoice line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Line identifier (UUID v4 unless set explicitly).
    pub id: String,
    /// Position on the invoice, 1-based.
    pub index: u32,
    /// Product or service name.
    pub description: String,
    /// Invoiced quantity.
    pub quantity: Decimal,
    /// Item net price per unit.
    pub unit_price: Decimal,
    /// Line-level allowance amount.
    pub line_discount: Decimal,
    /// Price-level allowance amount (difference between gross and net price).
    pub price_discount: Decimal,
    /// Tax rate percentage for this line.
    pub tax_rate: Decimal,
    pub tax_category: TaxCategory,
    /// Exemption reason code (VATEX) for non-standard categories.
    pub tax_category_reason_code: Option<String>,
    /// Exemption reason text.
    pub tax_category_reason: Option<String>,
}

/// UNTDID 5305 tax category codes used by ZATCA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaxCategory {
    /// S — Standard rate.
    #[serde(rename = "S")]
    StandardRate,
    /// Z — Zero rated goods.
    #[serde(rename = "Z")]
    ZeroRated,
    /// E — Exempt from tax.
    #[serde(rename = "E")]
    Exempt,
    /// O — Services outside scope of tax.
    #[serde(rename = "O")]
    NotSubjectToVat,
}

impl TaxCategory {
    /// UNTDID 5305 code letter.
    pub fn code(&self) -> &'static str {
        match self {
            Self::StandardRate => "S",
            Self::ZeroRated => "Z",
            Self::Exempt => "E",
            Self::NotSubjectToVat => "O",
        }
    }

    /// Parse from UNTDID 5305 code string.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "S" => Some(Self::StandardRate),
            "Z" => Some(Self::ZeroRated),
            "E" => Some(Self::Exempt),
            "O" => Some(Self::NotSubjectToVat),
            _ => None,
        }
    }
}

impl std::fmt::Display for TaxCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// ZATCA invoice kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvoiceKind {
    /// Standard tax invoice (B2B), cleared by the authority.
    Standard,
    /// Simplified tax invoice (B2C), reported after issue.
    Simplified,
}

impl InvoiceKind {
    /// Transaction type code with no special flags set.
    pub fn transaction_type_code(&self) -> &'static str {
        match self {
            Self::Standard => "0100000",
            Self::Simplified => "0200000",
        }
    }
}

/// UNTDID 1001 — Invoice type codes accepted by ZATCA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvoiceTypeCode {
    /// 388 — Tax invoice.
    TaxInvoice,
    /// 381 — Credit note.
    CreditNote,
    /// 383 — Debit note.
    DebitNote,
    /// 386 — Prepayment invoice.
    Prepayment,
}

impl InvoiceTypeCode {
    /// UNTDID 1001 numeric code.
    pub fn code(&self) -> u16 {
        match self {
            Self::TaxInvoice => 388,
            Self::CreditNote => 381,
            Self::DebitNote => 383,
            Self::Prepayment => 386,
        }
    }

    /// Parse from UNTDID 1001 numeric code.
    pub fn from_code(code: u16) -> Option<Self> {
        match code {
            388 => Some(Self::TaxInvoice),
            381 => Some(Self::CreditNote),
            383 => Some(Self::DebitNote),
            386 => Some(Self::Prepayment),
            _ => None,
        }
    }
}

/// Common payment means codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMeansCode {
    /// 1 — Instrument not defined.
    NotDefined,
    /// 10 — Cash.
    Cash,
    /// 30 — Credit transfer.
    CreditTransfer,
    /// 42 — Payment to bank account.
    PaymentToBankAccount,
    /// 48 — Bank card.
    BankCard,
    /// Other code value.
    Other(u16),
}

impl PaymentMeansCode {
    pub fn code(&self) -> u16 {
        match self {
            Self::NotDefined => 1,
            Self::Cash => 10,
            Self::CreditTransfer => 30,
            Self::PaymentToBankAccount => 42,
            Self::BankCard => 48,
            Self::Other(c) => *c,
        }
    }

    /// Parse from UNTDID 4461 numeric code.
    pub fn from_code(code: u16) -> Self {
        match code {
            1 => Self::NotDefined,
            10 => Self::Cash,
            30 => Self::CreditTransfer,
            42 => Self::PaymentToBankAccount,
            48 => Self::BankCard,
            c => Self::Other(c),
        }
    }
}

/// Seller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supplier {
    /// Registered legal name.
    pub name: String,
    /// VAT registration number (TRN, 15 digits).
    pub vat_number: String,
    /// Other seller identity scheme (e.g. "CRN", "MOM", "700").
    pub identity_type: Option<String>,
    pub identity_number: Option<String>,
    pub address: Address,
}

/// Buyer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub name: String,
    /// VAT registration number, if the buyer is VAT registered.
    pub vat_number: Option<String>,
    /// Buyer identity scheme (e.g. "NAT", "IQA", "CRN").
    pub identity_type: Option<String>,
    pub identity_number: Option<String>,
    pub address: Address,
}

/// Postal address (Saudi national address layout).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub street: Option<String>,
    pub additional_street: Option<String>,
    /// Four-digit building number.
    pub building_number: Option<String>,
    pub city: String,
    /// District (neighbourhood).
    pub district: Option<String>,
    /// Region / country subdivision.
    pub region: Option<String>,
    pub postal_code: String,
    /// ISO 3166-1 alpha-2.
    pub country_code: String,
}

/// Derived amounts of one line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineAmounts {
    /// Identifier of the line these amounts belong to.
    pub line_id: String,
    /// Line net amount, excluding VAT, after the line allowance.
    pub net_amount: Decimal,
    /// Line VAT amount.
    pub tax_amount: Decimal,
    /// Line amount including VAT.
    pub gross_amount: Decimal,
    /// Unit price before the price allowance. Unrounded.
    pub gross_unit_price: Decimal,
}

/// VAT breakdown row for one tax category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxSubtotal {
    pub category: TaxCategory,
    /// Rate of the first line seen in this category.
    pub rate: Decimal,
    /// Category taxable amount, after the document discount if this is
    /// the discount category.
    pub taxable_amount: Decimal,
    pub tax_amount: Decimal,
    pub reason_code: Option<String>,
    pub reason: Option<String>,
}

/// Document totals, computed in one pass by [`compute_totals`](super::compute_totals).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    /// Per-line derived amounts, in line order.
    pub line_amounts: Vec<LineAmounts>,
    /// Sum of line net amounts before the document discount.
    pub line_net_total: Decimal,
    /// Document-level allowance.
    pub discount: Decimal,
    /// Invoice total without VAT = line_net_total - discount.
    pub net_total: Decimal,
    /// Category that absorbs the document discount. `None` without lines.
    pub discount_category: Option<TaxCategory>,
    /// Document tax rate resolved from the discount category.
    pub tax_rate: Decimal,
    /// Total VAT amount.
    pub tax_amount: Decimal,
    /// Invoice total with VAT = net_total + tax_amount.
    pub gross_total: Decimal,
    pub line_count: usize,
    /// VAT breakdown, one row per category in first-seen order.
    pub subtotals: Vec<TaxSubtotal>,
}
