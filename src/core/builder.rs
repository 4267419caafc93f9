use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use uuid::Uuid;

use super::config::InvoiceDefaults;
use super::error::{FatooraError, ValidationError};
use super::reason_codes;
use super::types::*;
use super::validation;

/// Previous invoice hash of the first invoice in a chain: base64 of the
/// hex SHA-256 digest of "0".
pub const INITIAL_PREVIOUS_INVOICE_HASH: &str =
    "NWZlY2ViNjZmZmM4NmYzOGQ5NTI3ODZjNmQ2OTZjNzljMmRiYzIzOWRkNGU5MWI0NjcyOWQ3M2EyN2ZiNTdlOQ==";

/// Builder for constructing invoices.
///
/// ```
/// use fatoora::core::*;
/// use rust_decimal_macros::dec;
/// use chrono::NaiveDate;
///
/// let invoice = InvoiceBuilder::new("INV/2024/001", NaiveDate::from_ymd_opt(2024, 1, 15).unwrap())
///     .supplier(SupplierBuilder::new("Seller LTD", "399999999900003",
///         AddressBuilder::new("Riyadh", "23333", "SA").build()).build())
///     .customer(CustomerBuilder::new("Buyer LTD",
///         AddressBuilder::new("Jeddah", "21442", "SA").build()).build())
///     .add_line(LineItemBuilder::new("Consulting", dec!(10), dec!(150.00)).build())
///     .discount(dec!(100))
///     .build();
/// ```
pub struct InvoiceBuilder {
    number: String,
    id: Option<String>,
    invoice_type: InvoiceKind,
    type_code: InvoiceTypeCode,
    transaction_type_code: String,
    notes: Option<String>,
    order: u64,
    issue_date: NaiveDate,
    issue_time: NaiveTime,
    previous_invoice_hash: String,
    lines: Vec<LineItem>,
    supplier: Option<Supplier>,
    customer: Option<Customer>,
    discount: Decimal,
    reference_id: Option<String>,
    payment_means: PaymentMeansCode,
    tax_rate: Decimal,
    delivery_date: Option<NaiveDate>,
}

impl InvoiceBuilder {
    pub fn new(number: impl Into<String>, issue_date: NaiveDate) -> Self {
        Self::with_defaults(&InvoiceDefaults::default(), number, issue_date)
    }

    pub fn with_defaults(
        defaults: &InvoiceDefaults,
        number: impl Into<String>,
        issue_date: NaiveDate,
    ) -> Self {
        Self {
            number: number.into(),
            id: None,
            invoice_type: defaults.invoice_type,
            type_code: defaults.type_code,
            transaction_type_code: defaults.transaction_type_code(),
            notes: None,
            order: 1,
            issue_date,
            issue_time: NaiveTime::default(),
            previous_invoice_hash: INITIAL_PREVIOUS_INVOICE_HASH.to_string(),
            lines: Vec::new(),
            supplier: None,
            customer: None,
            discount: Decimal::ZERO,
            reference_id: None,
            payment_means: defaults.payment_means,
            tax_rate: defaults.tax_rate,
            delivery_date: None,
        }
    }

    /// Override the generated invoice UUID.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the invoice kind; also resets the transaction type code.
    pub fn invoice_type(mut self, kind: InvoiceKind) -> Self {
        self.invoice_type = kind;
        self.transaction_type_code = kind.transaction_type_code().to_string();
        self
    }

    pub fn type_code(mut self, code: InvoiceTypeCode) -> Self {
        self.type_code = code;
        self
    }

    pub fn transaction_type_code(mut self, code: impl Into<String>) -> Self {
        self.transaction_type_code = code.into();
        self
    }

    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.notes = Some(note.into());
        self
    }

    /// Invoice counter value.
    pub fn order(mut self, order: u64) -> Self {
        self.order = order;
        self
    }

    pub fn issue_time(mut self, time: NaiveTime) -> Self {
        self.issue_time = time;
        self
    }

    pub fn previous_invoice_hash(mut self, hash: impl Into<String>) -> Self {
        self.previous_invoice_hash = hash.into();
        self
    }

    pub fn supplier(mut self, supplier: Supplier) -> Self {
        self.supplier = Some(supplier);
        self
    }

    pub fn customer(mut self, customer: Customer) -> Self {
        self.customer = Some(customer);
        self
    }

    /// Add a line. Lines without an index are numbered by position on build.
    pub fn add_line(mut self, line: LineItem) -> Self {
        self.lines.push(line);
        self
    }

    /// Document-level allowance amount.
    pub fn discount(mut self, amount: Decimal) -> Self {
        self.discount = amount;
        self
    }

    pub fn reference_id(mut self, reference: impl Into<String>) -> Self {
        self.reference_id = Some(reference.into());
        self
    }

    pub fn payment_means(mut self, code: PaymentMeansCode) -> Self {
        self.payment_means = code;
        self
    }

    pub fn tax_rate(mut self, rate: Decimal) -> Self {
        self.tax_rate = rate;
        self
    }

    pub fn delivery_date(mut self, date: NaiveDate) -> Self {
        self.delivery_date = Some(date);
        self
    }

    /// Build the invoice and run input validation.
    ///
    /// Numeric problems are reported as [`FatooraError::InvalidInput`],
    /// structural ones as [`FatooraError::Validation`]. A document without
    /// lines is accepted; its totals are all zero.
    pub fn build(self) -> Result<Invoice, FatooraError> {
        // Input limits to prevent abuse
        if self.lines.len() > 10_000 {
            return Err(FatooraError::Builder(
                "invoice cannot have more than 10,000 line items".into(),
            ));
        }
        if self.number.len() > 200 {
            return Err(FatooraError::Builder(
                "invoice number cannot exceed 200 characters".into(),
            ));
        }

        let invoice = self.build_unchecked()?;

        let errors = validation::validate_input(&invoice);
        if !errors.is_empty() {
            return Err(FatooraError::InvalidInput(join(&errors)));
        }

        let errors = validation::validate_invoice(&invoice);
        if !errors.is_empty() {
            return Err(FatooraError::Validation(join(&errors)));
        }

        Ok(invoice)
    }

    /// Build without validation — useful for testing or importing external data.
    pub fn build_unchecked(self) -> Result<Invoice, FatooraError> {
        let supplier = self
            .supplier
            .ok_or_else(|| FatooraError::Builder("supplier is required".into()))?;
        let customer = self
            .customer
            .ok_or_else(|| FatooraError::Builder("customer is required".into()))?;

        let mut lines = self.lines;
        for (position, line) in lines.iter_mut().enumerate() {
            if line.index == 0 {
                line.index = u32::try_from(position + 1).map_err(|_| {
                    FatooraError::Builder(format!("line position {} exceeds u32", position + 1))
                })?;
            }
        }

        Ok(Invoice {
            number: self.number,
            id: self.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            invoice_type: self.invoice_type,
            type_code: self.type_code,
            transaction_type_code: self.transaction_type_code,
            notes: self.notes,
            order: self.order,
            issue_date: self.issue_date,
            issue_time: self.issue_time,
            previous_invoice_hash: self.previous_invoice_hash,
            lines,
            supplier,
            customer,
            discount: self.discount,
            reference_id: self.reference_id,
            payment_means: self.payment_means,
            tax_rate: self.tax_rate,
            delivery_date: self.delivery_date,
        })
    }
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Builder for Supplier.
pub struct SupplierBuilder {
    name: String,
    vat_number: String,
    identity_type: Option<String>,
    identity_number: Option<String>,
    address: Address,
}

impl SupplierBuilder {
    pub fn new(name: impl Into<String>, vat_number: impl Into<String>, address: Address) -> Self {
        Self {
            name: name.into(),
            vat_number: vat_number.into(),
            identity_type: None,
            identity_number: None,
            address,
        }
    }

    /// Additional seller identification (e.g. "CRN", "1010010000").
    pub fn identity(mut self, kind: impl Into<String>, number: impl Into<String>) -> Self {
        self.identity_type = Some(kind.into());
        self.identity_number = Some(number.into());
        self
    }

    pub fn build(self) -> Supplier {
        Supplier {
            name: self.name,
            vat_number: self.vat_number,
            identity_type: self.identity_type,
            identity_number: self.identity_number,
            address: self.address,
        }
    }
}

/// Builder for Customer.
pub struct CustomerBuilder {
    name: String,
    vat_number: Option<String>,
    identity_type: Option<String>,
    identity_number: Option<String>,
    address: Address,
}

impl CustomerBuilder {
    pub fn new(name: impl Into<String>, address: Address) -> Self {
        Self {
            name: name.into(),
            vat_number: None,
            identity_type: None,
            identity_number: None,
            address,
        }
    }

    pub fn vat_number(mut self, number: impl Into<String>) -> Self {
        self.vat_number = Some(number.into());
        self
    }

    /// Buyer identification (e.g. "NAT", "1234567890").
    pub fn identity(mut self, kind: impl Into<String>, number: impl Into<String>) -> Self {
        self.identity_type = Some(kind.into());
        self.identity_number = Some(number.into());
        self
    }

    pub fn build(self) -> Customer {
        Customer {
            name: self.name,
            vat_number: self.vat_number,
            identity_type: self.identity_type,
            identity_number: self.identity_number,
            address: self.address,
        }
    }
}

/// Builder for Address.
pub struct AddressBuilder {
    street: Option<String>,
    additional_street: Option<String>,
    building_number: Option<String>,
    city: String,
    district: Option<String>,
    region: Option<String>,
    postal_code: String,
    country_code: String,
}

impl AddressBuilder {
    pub fn new(
        city: impl Into<String>,
        postal_code: impl Into<String>,
        country_code: impl Into<String>,
    ) -> Self {
        Self {
            street: None,
            additional_street: None,
            building_number: None,
            city: city.into(),
            district: None,
            region: None,
            postal_code: postal_code.into(),
            country_code: country_code.into(),
        }
    }

    pub fn street(mut self, street: impl Into<String>) -> Self {
        self.street = Some(street.into());
        self
    }

    pub fn additional_street(mut self, street: impl Into<String>) -> Self {
        self.additional_street = Some(street.into());
        self
    }

    pub fn building_number(mut self, number: impl Into<String>) -> Self {
        self.building_number = Some(number.into());
        self
    }

    pub fn district(mut self, district: impl Into<String>) -> Self {
        self.district = Some(district.into());
        self
    }

    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn build(self) -> Address {
        Address {
            street: self.street,
            additional_street: self.additional_street,
            building_number: self.building_number,
            city: self.city,
            district: self.district,
            region: self.region,
            postal_code: self.postal_code,
            country_code: self.country_code,
        }
    }
}

/// Builder for LineItem.
pub struct LineItemBuilder {
    id: Option<String>,
    index: u32,
    description: String,
    quantity: Decimal,
    unit_price: Decimal,
    line_discount: Decimal,
    price_discount: Decimal,
    tax_category: TaxCategory,
    tax_rate: Decimal,
    reason_code: Option<String>,
    reason: Option<String>,
}

impl LineItemBuilder {
    pub fn new(description: impl Into<String>, quantity: Decimal, unit_price: Decimal) -> Self {
        Self::with_defaults(&InvoiceDefaults::default(), description, quantity, unit_price)
    }

    pub fn with_defaults(
        defaults: &InvoiceDefaults,
        description: impl Into<String>,
        quantity: Decimal,
        unit_price: Decimal,
    ) -> Self {
        Self {
            id: None,
            index: 0,
            description: description.into(),
            quantity,
            unit_price,
            line_discount: Decimal::ZERO,
            price_discount: Decimal::ZERO,
            tax_category: defaults.tax_category,
            tax_rate: defaults.tax_rate,
            reason_code: None,
            reason: None,
        }
    }

    /// Override the generated UUID.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// 1-based position on the invoice.
    pub fn index(mut self, index: u32) -> Self {
        self.index = index;
        self
    }

    pub fn tax(mut self, category: TaxCategory, rate: Decimal) -> Self {
        self.tax_category = category;
        self.tax_rate = rate;
        self
    }

    pub fn line_discount(mut self, amount: Decimal) -> Self {
        self.line_discount = amount;
        self
    }

    pub fn price_discount(mut self, amount: Decimal) -> Self {
        self.price_discount = amount;
        self
    }

    /// Exemption reason for non-standard categories. Without one, exempt
    /// and zero-rated lines get the category's default VATEX reason.
    pub fn exemption_reason(mut self, code: impl Into<String>, text: impl Into<String>) -> Self {
        self.reason_code = Some(code.into());
        self.reason = Some(text.into());
        self
    }

    pub fn build(self) -> LineItem {
        let (reason_code, reason) = match (self.reason_code, self.reason) {
            (None, None) => match reason_codes::default_exemption_reason(self.tax_category) {
                Some((code, text)) => (Some(code.to_string()), Some(text.to_string())),
                None => (None, None),
            },
            explicit => explicit,
        };

        LineItem {
            id: self.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            index: self.index,
            description: self.description,
            quantity: self.quantity,
            unit_price: self.unit_price,
            line_discount: self.line_discount,
            price_discount: self.price_discount,
            tax_rate: self.tax_rate,
            tax_category: self.tax_category,
            tax_category_reason_code: reason_code,
            tax_category_reason: reason,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    pub(crate) fn supplier() -> Supplier {
        SupplierBuilder::new(
            "Maximum Speed Tech Supply LTD",
            "399999999900003",
            AddressBuilder::new("Riyadh", "23333", "SA")
                .street("Prince Sultan")
                .building_number("2322")
                .district("Al-Murabba")
                .build(),
        )
        .identity("CRN", "1010010000")
        .build()
    }

    pub(crate) fn customer() -> Customer {
        CustomerBuilder::new(
            "Fatoora Samples LTD",
            AddressBuilder::new("Riyadh", "42812", "SA")
                .street("Salah Al-Din")
                .building_number("1111")
                .build(),
        )
        .vat_number("399999999800003")
        .build()
    }

    pub(crate) fn invoice_with(lines: Vec<LineItem>, discount: Decimal) -> Invoice {
        let mut builder = InvoiceBuilder::new(
            "SME00010",
            NaiveDate::from_ymd_opt(2022, 8, 17).unwrap(),
        )
        .supplier(supplier())
        .customer(customer())
        .discount(discount);
        for line in lines {
            builder = builder.add_line(line);
        }
        builder.build_unchecked().unwrap()
    }

    #[test]
    fn lines_are_numbered_by_position() {
        let inv = invoice_with(
            vec![
                LineItemBuilder::new("A", dec!(1), dec!(1)).build(),
                LineItemBuilder::new("B", dec!(1), dec!(1)).index(7).build(),
                LineItemBuilder::new("C", dec!(1), dec!(1)).build(),
            ],
            dec!(0),
        );
        let indices: Vec<_> = inv.lines.iter().map(|l| l.index).collect();
        assert_eq!(indices, vec![1, 7, 3]);
    }

    #[test]
    fn line_numbering_happens_on_build() {
        let builder = InvoiceBuilder::new("INV-1", NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
            .supplier(supplier())
            .customer(customer())
            .add_line(LineItemBuilder::new("A", dec!(1), dec!(1)).build());
        assert_eq!(builder.lines[0].index, 0);
        let inv = builder.build().unwrap();
        assert_eq!(inv.lines[0].index, 1);
    }

    #[test]
    fn generated_ids_are_unique_uuids() {
        let a = LineItemBuilder::new("A", dec!(1), dec!(1)).build();
        let b = LineItemBuilder::new("A", dec!(1), dec!(1)).build();
        assert_ne!(a.id, b.id);
        assert!(Uuid::parse_str(&a.id).is_ok());
    }

    #[test]
    fn defaults_applied() {
        let line = LineItemBuilder::new("A", dec!(1), dec!(1)).build();
        assert_eq!(line.tax_category, TaxCategory::StandardRate);
        assert_eq!(line.tax_rate, dec!(15));
        assert_eq!(line.tax_category_reason_code, None);

        let inv = invoice_with(vec![line], dec!(0));
        assert_eq!(inv.tax_rate, dec!(15));
        assert_eq!(inv.payment_means, PaymentMeansCode::Cash);
        assert_eq!(inv.type_code, InvoiceTypeCode::TaxInvoice);
        assert_eq!(inv.transaction_type_code, "0100000");
        assert_eq!(inv.previous_invoice_hash, INITIAL_PREVIOUS_INVOICE_HASH);
    }

    #[test]
    fn custom_defaults() {
        let defaults = InvoiceDefaults {
            tax_rate: dec!(5),
            tax_category: TaxCategory::ZeroRated,
            ..Default::default()
        };
        let line = LineItemBuilder::with_defaults(&defaults, "A", dec!(1), dec!(1)).build();
        assert_eq!(line.tax_rate, dec!(5));
        assert_eq!(line.tax_category, TaxCategory::ZeroRated);
        assert_eq!(line.tax_category_reason_code.as_deref(), Some("VATEX-SA-36"));
    }

    #[test]
    fn exempt_line_gets_default_reason() {
        let line = LineItemBuilder::new("Loan fee", dec!(1), dec!(10))
            .tax(TaxCategory::Exempt, dec!(0))
            .build();
        assert_eq!(line.tax_category_reason_code.as_deref(), Some("VATEX-SA-29"));
        assert!(line.tax_category_reason.is_some());
    }

    #[test]
    fn explicit_reason_wins() {
        let line = LineItemBuilder::new("Export", dec!(1), dec!(10))
            .tax(TaxCategory::ZeroRated, dec!(0))
            .exemption_reason("VATEX-SA-32", "Export of goods")
            .build();
        assert_eq!(line.tax_category_reason_code.as_deref(), Some("VATEX-SA-32"));
    }

    #[test]
    fn simplified_kind_sets_transaction_code() {
        let inv = InvoiceBuilder::new("S-1", NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
            .invoice_type(InvoiceKind::Simplified)
            .supplier(supplier())
            .customer(customer())
            .build()
            .unwrap();
        assert_eq!(inv.transaction_type_code, "0200000");
    }

    #[test]
    fn missing_supplier_rejected() {
        let err = InvoiceBuilder::new("X", NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
            .customer(customer())
            .build()
            .unwrap_err();
        assert_eq!(err, FatooraError::Builder("supplier is required".into()));
    }

    #[test]
    fn negative_quantity_rejected_at_build() {
        let err = InvoiceBuilder::new("X", NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
            .supplier(supplier())
            .customer(customer())
            .add_line(LineItemBuilder::new("A", dec!(-1), dec!(10)).build())
            .build()
            .unwrap_err();
        assert!(matches!(err, FatooraError::InvalidInput(msg) if msg.contains("lines[0].quantity")));
    }

    #[test]
    fn empty_invoice_builds() {
        let inv = InvoiceBuilder::new("X", NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
            .supplier(supplier())
            .customer(customer())
            .build()
            .unwrap();
        assert!(inv.lines.is_empty());
    }
}
