use rust_decimal::Decimal;

use super::error::FatooraError;
use super::rounding::{self, checked_add};
use super::types::{LineAmounts, LineItem};

impl LineItem {
    /// Evaluate all derived amounts of this line.
    ///
    /// No input validation happens here; negative quantities or prices
    /// flow through the arithmetic unchanged.
    pub fn amounts(&self) -> Result<LineAmounts, FatooraError> {
        let net_amount = self.net_amount()?;
        let tax_amount = rounding::percentage_of(net_amount, self.tax_rate)?;
        let gross_amount = rounding::round2(checked_add(
            tax_amount,
            net_amount,
            "line tax + line net",
        )?)?;

        Ok(LineAmounts {
            line_id: self.id.clone(),
            net_amount,
            tax_amount,
            gross_amount,
            gross_unit_price: self.gross_unit_price()?,
        })
    }

    /// Line net amount: quantity × unit price − line discount, rounded to
    /// 3 then 2 decimals.
    pub fn net_amount(&self) -> Result<Decimal, FatooraError> {
        rounding::line_net_amount(self.quantity, self.unit_price, self.line_discount)
    }

    /// Line VAT amount: net amount × rate / 100.
    pub fn tax_amount(&self) -> Result<Decimal, FatooraError> {
        rounding::percentage_of(self.net_amount()?, self.tax_rate)
    }

    /// Line amount including VAT.
    pub fn gross_amount(&self) -> Result<Decimal, FatooraError> {
        self.amounts().map(|a| a.gross_amount)
    }

    /// Unit price before the price allowance, without rounding.
    pub fn gross_unit_price(&self) -> Result<Decimal, FatooraError> {
        checked_add(self.unit_price, self.price_discount, "unit price + price discount")
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::super::builder::LineItemBuilder;
    use super::super::types::TaxCategory;
    use super::*;

    fn line(quantity: Decimal, price: Decimal, rate: Decimal) -> LineItem {
        LineItemBuilder::new("Item", quantity, price)
            .tax(TaxCategory::StandardRate, rate)
            .build()
    }

    #[test]
    fn standard_line() {
        let amounts = line(dec!(1), dec!(100), dec!(15)).amounts().unwrap();
        assert_eq!(amounts.net_amount, dec!(100.00));
        assert_eq!(amounts.tax_amount, dec!(15.00));
        assert_eq!(amounts.gross_amount, dec!(115.00));
    }

    #[test]
    fn line_discount_reduces_net() {
        let mut item = line(dec!(4), dec!(25), dec!(15));
        item.line_discount = dec!(10);
        let amounts = item.amounts().unwrap();
        assert_eq!(amounts.net_amount, dec!(90.00));
        assert_eq!(amounts.tax_amount, dec!(13.50));
        assert_eq!(amounts.gross_amount, dec!(103.50));
    }

    #[test]
    fn tax_is_computed_on_rounded_net() {
        // 3 × 3.3333 = 9.9999 → 10.000 → 10.00; tax on 10.00, not 9.9999
        let amounts = line(dec!(3), dec!(3.3333), dec!(15)).amounts().unwrap();
        assert_eq!(amounts.net_amount, dec!(10.00));
        assert_eq!(amounts.tax_amount, dec!(1.50));
    }

    #[test]
    fn gross_unit_price_is_unrounded() {
        let mut item = line(dec!(1), dec!(10.1234), dec!(15));
        item.price_discount = dec!(0.0001);
        assert_eq!(item.gross_unit_price().unwrap(), dec!(10.1235));
        assert_eq!(item.amounts().unwrap().gross_unit_price, dec!(10.1235));
    }

    #[test]
    fn price_discount_does_not_affect_net() {
        let mut item = line(dec!(2), dec!(10), dec!(15));
        item.price_discount = dec!(5);
        assert_eq!(item.net_amount().unwrap(), dec!(20.00));
    }

    #[test]
    fn zero_rate_line() {
        let item = LineItemBuilder::new("Milk", dec!(2), dec!(7.5))
            .tax(TaxCategory::ZeroRated, dec!(0))
            .build();
        let amounts = item.amounts().unwrap();
        assert_eq!(amounts.tax_amount, dec!(0.00));
        assert_eq!(amounts.gross_amount, dec!(15.00));
    }

    #[test]
    fn negative_quantity_allowed() {
        let amounts = line(dec!(-1), dec!(100), dec!(15)).amounts().unwrap();
        assert_eq!(amounts.net_amount, dec!(-100.00));
        assert_eq!(amounts.tax_amount, dec!(-15.00));
        assert_eq!(amounts.gross_amount, dec!(-115.00));
    }

    #[test]
    fn accessors_agree_with_amounts() {
        let item = line(dec!(7), dec!(13.37), dec!(15));
        let amounts = item.amounts().unwrap();
        assert_eq!(item.net_amount().unwrap(), amounts.net_amount);
        assert_eq!(item.tax_amount().unwrap(), amounts.tax_amount);
        assert_eq!(item.gross_amount().unwrap(), amounts.gross_amount);
        assert_eq!(amounts.line_id, item.id);
    }

    #[test]
    fn recomputes_after_mutation() {
        let mut item = line(dec!(1), dec!(100), dec!(15));
        assert_eq!(item.net_amount().unwrap(), dec!(100.00));
        item.quantity = dec!(2);
        assert_eq!(item.net_amount().unwrap(), dec!(200.00));
    }
}
