use rust_decimal::Decimal;

use super::error::FatooraError;
use super::rounding::{self, checked_add, checked_sub, checked_sum};
use super::types::*;

/// Select the tax category that absorbs the document discount, together
/// with the rate used for the document tax amount.
///
/// The first standard-rated line wins; without one, the first line decides.
/// This is a pure function of the lines: the invoice's placeholder
/// `tax_rate` is never overwritten.
pub fn discount_category(lines: &[LineItem]) -> Result<(TaxCategory, Decimal), FatooraError> {
    lines
        .iter()
        .find(|l| l.tax_category == TaxCategory::StandardRate)
        .or_else(|| lines.first())
        .map(|l| (l.tax_category, l.tax_rate))
        .ok_or(FatooraError::EmptyLineSet)
}

/// Compute every derived figure of an invoice in one pass.
///
/// Document net total = Σ line net − discount. The document tax amount uses
/// only the discount category's net base (floored at zero) and the rate of
/// that category, not the sum of line taxes.
pub fn compute_totals(invoice: &Invoice) -> Result<Totals, FatooraError> {
    let line_amounts = invoice
        .lines
        .iter()
        .map(LineItem::amounts)
        .collect::<Result<Vec<_>, _>>()?;

    let line_sum = checked_sum(line_amounts.iter().map(|a| a.net_amount))?;
    let line_net_total = rounding::round2(line_sum)?;
    let net_total = rounding::round2(checked_sub(line_sum, invoice.discount, "line total − discount")?)?;

    let selected = match discount_category(&invoice.lines) {
        Ok(selected) => Some(selected),
        Err(FatooraError::EmptyLineSet) => None,
        Err(e) => return Err(e),
    };

    let (tax_amount, tax_rate) = match selected {
        Some((category, rate)) => {
            let base = checked_sum(
                invoice
                    .lines
                    .iter()
                    .zip(&line_amounts)
                    .filter(|(l, _)| l.tax_category == category)
                    .map(|(_, a)| a.net_amount),
            )?;
            let taxable = checked_sub(base, invoice.discount, "category base − discount")?;
            // a non-positive base carries no tax whatever the discount
            let tax = if base > Decimal::ZERO && taxable > Decimal::ZERO {
                rounding::percentage_of(taxable, rate)?
            } else {
                rounding::round2(Decimal::ZERO)?
            };
            (tax, rate)
        }
        None => (rounding::round2(Decimal::ZERO)?, invoice.tax_rate),
    };

    let gross_total = rounding::round2(checked_add(tax_amount, net_total, "tax + net total")?)?;
    let subtotals = build_subtotals(invoice, &line_amounts, selected.map(|(c, _)| c))?;

    tracing::debug!(
        invoice = %invoice.number,
        lines = invoice.lines.len(),
        discount_category = ?selected.map(|(c, _)| c.code()),
        %net_total,
        %tax_amount,
        %gross_total,
        "computed invoice totals"
    );

    Ok(Totals {
        line_amounts,
        line_net_total,
        discount: invoice.discount,
        net_total,
        discount_category: selected.map(|(c, _)| c),
        tax_rate,
        tax_amount,
        gross_total,
        line_count: invoice.lines.len(),
        subtotals,
    })
}

struct CategoryGroup<'a> {
    category: TaxCategory,
    first: &'a LineItem,
    net_sum: Decimal,
}

/// One row per category, ordered by first occurrence in the line sequence.
fn build_subtotals(
    invoice: &Invoice,
    line_amounts: &[LineAmounts],
    discount_category: Option<TaxCategory>,
) -> Result<Vec<TaxSubtotal>, FatooraError> {
    let mut groups: Vec<CategoryGroup<'_>> = Vec::new();
    for (line, amounts) in invoice.lines.iter().zip(line_amounts) {
        match groups.iter_mut().find(|g| g.category == line.tax_category) {
            Some(group) => {
                group.net_sum = checked_add(group.net_sum, amounts.net_amount, "category net")?;
            }
            None => groups.push(CategoryGroup {
                category: line.tax_category,
                first: line,
                net_sum: amounts.net_amount,
            }),
        }
    }

    let discount = rounding::round2(invoice.discount)?;
    groups
        .into_iter()
        .map(|group| -> Result<TaxSubtotal, FatooraError> {
            let allocated = if Some(group.category) == discount_category {
                discount
            } else {
                Decimal::ZERO
            };
            let taxable_amount = rounding::round2(checked_sub(
                group.net_sum,
                allocated,
                "category net − discount",
            )?)?;
            let tax_amount = rounding::percentage_of(taxable_amount, group.first.tax_rate)?;

            tracing::trace!(
                category = group.category.code(),
                %taxable_amount,
                %tax_amount,
                "tax subtotal"
            );

            Ok(TaxSubtotal {
                category: group.category,
                rate: group.first.tax_rate,
                taxable_amount,
                tax_amount,
                reason_code: group.first.tax_category_reason_code.clone(),
                reason: group.first.tax_category_reason.clone(),
            })
        })
        .collect()
}

impl Invoice {
    /// Compute totals for this invoice. See [`compute_totals`].
    pub fn totals(&self) -> Result<Totals, FatooraError> {
        compute_totals(self)
    }

    /// The discount category and resolved document tax rate.
    /// Fails with [`FatooraError::EmptyLineSet`] when there are no lines.
    pub fn discount_category(&self) -> Result<(TaxCategory, Decimal), FatooraError> {
        discount_category(&self.lines)
    }

    /// Number of line items.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }
}
