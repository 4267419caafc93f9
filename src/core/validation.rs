use rust_decimal::Decimal;

use super::error::{FatooraError, ValidationError};
use super::reason_codes;
use super::rounding::{self, MONEY_DP};
use super::types::*;

/// Check numeric input fields. Returns all errors found (not just the first).
///
/// The calculators accept any value; these checks run at construction time
/// so that malformed data never reaches them through [`InvoiceBuilder::build`](super::InvoiceBuilder::build).
pub fn validate_input(invoice: &Invoice) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for (i, line) in invoice.lines.iter().enumerate() {
        validate_line_input(line, i, &mut errors);
    }

    if is_negative(invoice.discount) {
        errors.push(ValidationError::with_rule(
            "discount",
            format!("document discount must not be negative, got {}", invoice.discount),
            "FT-07",
        ));
    }

    // Subtotals allocate the discount at cent precision; finer discounts would
    // make them disagree with the net total.
    if invoice.discount.normalize().scale() > MONEY_DP {
        errors.push(ValidationError::with_rule(
            "discount",
            format!(
                "document discount must have at most {MONEY_DP} decimal places, got {}",
                invoice.discount
            ),
            "FT-08",
        ));
    }

    if is_negative(invoice.tax_rate) {
        errors.push(ValidationError::with_rule(
            "tax_rate",
            "document tax rate must not be negative",
            "FT-04",
        ));
    }

    errors
}

fn validate_line_input(line: &LineItem, index: usize, errors: &mut Vec<ValidationError>) {
    let prefix = format!("lines[{index}]");

    let non_negative = [
        ("quantity", line.quantity, "FT-03"),
        ("tax_rate", line.tax_rate, "FT-04"),
        ("line_discount", line.line_discount, "FT-05"),
        ("price_discount", line.price_discount, "FT-06"),
    ];
    for (field, value, rule) in non_negative {
        if is_negative(value) {
            errors.push(ValidationError::with_rule(
                format!("{prefix}.{field}"),
                format!("{field} must not be negative, got {value}"),
                rule,
            ));
        }
    }
}

fn is_negative(value: Decimal) -> bool {
    value.is_sign_negative() && !value.is_zero()
}

/// Validate structure and input of an invoice.
/// Returns all validation errors found, including those of [`validate_input`].
pub fn validate_invoice(invoice: &Invoice) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if invoice.number.trim().is_empty() {
        errors.push(ValidationError::with_rule(
            "number",
            "invoice number must not be empty",
            "FT-01",
        ));
    }

    if invoice.supplier.name.trim().is_empty() {
        errors.push(ValidationError::with_rule(
            "supplier.name",
            "supplier name must not be empty",
            "FT-09",
        ));
    }

    let mut seen = std::collections::HashSet::new();
    for (i, line) in invoice.lines.iter().enumerate() {
        if line.id.trim().is_empty() {
            errors.push(ValidationError::with_rule(
                format!("lines[{i}].id"),
                "line identifier must not be empty",
                "FT-02",
            ));
        } else if !seen.insert(line.id.as_str()) {
            errors.push(ValidationError::with_rule(
                format!("lines[{i}].id"),
                format!("duplicate line identifier '{}'", line.id),
                "FT-02",
            ));
        }

        if let Some(code) = &line.tax_category_reason_code {
            if !reason_codes::is_known_exemption_reason(code) {
                errors.push(ValidationError::with_rule(
                    format!("lines[{i}].tax_category_reason_code"),
                    format!("'{code}' is not a known VATEX-SA reason code"),
                    "FT-10",
                ));
            }
        }
    }

    errors.extend(validate_input(invoice));
    errors
}

/// Cross-check computed totals against the invoice they were computed from.
pub fn validate_arithmetic(invoice: &Invoice, totals: &Totals) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if totals.line_count != invoice.lines.len() || totals.line_amounts.len() != invoice.lines.len()
    {
        errors.push(ValidationError::with_rule(
            "totals.line_count",
            format!(
                "totals cover {} lines, invoice has {}",
                totals.line_count,
                invoice.lines.len()
            ),
            "FT-20",
        ));
    }

    match rounding::checked_sum(totals.line_amounts.iter().map(|a| a.net_amount)) {
        Ok(expected) if expected != totals.line_net_total => {
            errors.push(ValidationError::with_rule(
                "totals.line_net_total",
                format!(
                    "line net total {} does not match sum of line amounts {}",
                    totals.line_net_total, expected
                ),
                "FT-21",
            ));
        }
        Ok(_) => {}
        Err(e) => errors.push(overflow("totals.line_amounts", e, "FT-21")),
    }

    match rounding::checked_sub(
        totals.line_net_total,
        totals.discount,
        "line net total − discount",
    ) {
        Ok(expected) if expected != totals.net_total => {
            errors.push(ValidationError::with_rule(
                "totals.net_total",
                format!(
                    "net total {} does not match {} - discount {}",
                    totals.net_total, totals.line_net_total, totals.discount
                ),
                "FT-22",
            ));
        }
        Ok(_) => {}
        Err(e) => errors.push(overflow("totals.net_total", e, "FT-22")),
    }

    match rounding::checked_add(totals.net_total, totals.tax_amount, "net total + tax") {
        Ok(expected) if expected != totals.gross_total => {
            errors.push(ValidationError::with_rule(
                "totals.gross_total",
                format!(
                    "gross total {} does not match net {} + tax {}",
                    totals.gross_total, totals.net_total, totals.tax_amount
                ),
                "FT-23",
            ));
        }
        Ok(_) => {}
        Err(e) => errors.push(overflow("totals.gross_total", e, "FT-23")),
    }

    if !invoice.lines.is_empty() {
        match rounding::checked_sum(totals.subtotals.iter().map(|s| s.taxable_amount)) {
            Ok(subtotal_net) if subtotal_net != totals.net_total => {
                errors.push(ValidationError::with_rule(
                    "totals.subtotals",
                    format!(
                        "sum of subtotal taxable amounts {} does not match net total {}",
                        subtotal_net, totals.net_total
                    ),
                    "FT-24",
                ));
            }
            Ok(_) => {}
            Err(e) => errors.push(overflow("totals.subtotals", e, "FT-24")),
        }
    }

    if is_negative(totals.tax_amount) {
        errors.push(ValidationError::with_rule(
            "totals.tax_amount",
            "document tax amount must not be negative",
            "FT-25",
        ));
    }

    errors
}

fn overflow(field: &str, err: FatooraError, rule: &str) -> ValidationError {
    ValidationError::with_rule(field, format!("cannot be checked: {err}"), rule)
}
