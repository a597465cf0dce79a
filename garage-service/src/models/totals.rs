//! Money arithmetic for invoice lines and labour items.
//!
//! Tax rates are percentages. Every amount is rounded to 2 decimal places.
//! Arithmetic saturates instead of overflowing; [`Totals::fits_storage`]
//! catches anything too large for a `NUMERIC(12, 2)` column.

use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Largest value a `NUMERIC(12, 2)` money column holds: 9,999,999,999.99.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(3_567_587_327, 232, 0, false, 2);

fn percent_of(amount: Decimal, pct: Decimal) -> Decimal {
    (amount.saturating_mul(pct) / HUNDRED).round_dp(2)
}

/// Computed amounts for one parts line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineAmounts {
    pub amount: Decimal,
    pub cgst_amount: Decimal,
    pub sgst_amount: Decimal,
}

impl LineAmounts {
    pub fn compute(rate: Decimal, quantity: i32, cgst_pct: Decimal, sgst_pct: Decimal) -> Self {
        let amount = rate.saturating_mul(Decimal::from(quantity)).round_dp(2);
        Self {
            amount,
            cgst_amount: percent_of(amount, cgst_pct),
            sgst_amount: percent_of(amount, sgst_pct),
        }
    }
}

/// Computed amounts for one labour item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabourAmounts {
    pub subtotal: Decimal,
    pub cgst_amount: Decimal,
    pub sgst_amount: Decimal,
    pub total: Decimal,
}

impl LabourAmounts {
    pub fn compute(
        charges: [Decimal; 4],
        cgst_pct: Decimal,
        sgst_pct: Decimal,
    ) -> Self {
        let subtotal = charges
            .iter()
            .fold(Decimal::ZERO, |sum, charge| sum.saturating_add(*charge))
            .round_dp(2);
        let cgst_amount = percent_of(subtotal, cgst_pct);
        let sgst_amount = percent_of(subtotal, sgst_pct);
        Self {
            subtotal,
            cgst_amount,
            sgst_amount,
            total: subtotal.saturating_add(cgst_amount).saturating_add(sgst_amount),
        }
    }
}

/// Document-level totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub subtotal: Decimal,
    pub cgst: Decimal,
    pub sgst: Decimal,
    pub total_due: Decimal,
}

impl Totals {
    fn add(mut self, subtotal: Decimal, cgst: Decimal, sgst: Decimal) -> Self {
        self.subtotal = self.subtotal.saturating_add(subtotal);
        self.cgst = self.cgst.saturating_add(cgst);
        self.sgst = self.sgst.saturating_add(sgst);
        self.total_due = self.subtotal.saturating_add(self.cgst).saturating_add(self.sgst);
        self
    }

    /// Every figure fits the money columns.
    pub fn fits_storage(&self) -> bool {
        [self.subtotal, self.cgst, self.sgst, self.total_due]
            .iter()
            .all(|amount| *amount <= MAX_AMOUNT)
    }
}

/// Sum parts lines into document totals.
pub fn tax_totals<'a>(lines: impl IntoIterator<Item = &'a LineAmounts>) -> Totals {
    lines.into_iter().fold(Totals::default(), |totals, line| {
        totals.add(line.amount, line.cgst_amount, line.sgst_amount)
    })
}

/// Sum labour items into document totals.
pub fn labour_totals<'a>(items: impl IntoIterator<Item = &'a LabourAmounts>) -> Totals {
    items.into_iter().fold(Totals::default(), |totals, item| {
        totals.add(item.subtotal, item.cgst_amount, item.sgst_amount)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn line_amount_is_rate_times_quantity() {
        let line = LineAmounts::compute(dec!(250.00), 3, dec!(9), dec!(9));

        assert_eq!(line.amount, dec!(750.00));
        assert_eq!(line.cgst_amount, dec!(67.50));
        assert_eq!(line.sgst_amount, dec!(67.50));
    }

    #[test]
    fn line_tax_rounds_to_two_places() {
        let line = LineAmounts::compute(dec!(33.33), 1, dec!(2.5), dec!(0));

        // 33.33 * 2.5 / 100 = 0.833250
        assert_eq!(line.cgst_amount, dec!(0.83));
        assert_eq!(line.sgst_amount, Decimal::ZERO);
    }

    #[test]
    fn tax_totals_sum_every_line() {
        let lines = [
            LineAmounts::compute(dec!(100), 2, dec!(9), dec!(9)),
            LineAmounts::compute(dec!(50), 1, dec!(14), dec!(14)),
        ];

        let totals = tax_totals(&lines);

        assert_eq!(totals.subtotal, dec!(250));
        assert_eq!(totals.cgst, dec!(25));
        assert_eq!(totals.sgst, dec!(25));
        assert_eq!(totals.total_due, dec!(300));
    }

    #[test]
    fn empty_lines_total_zero() {
        assert_eq!(tax_totals(&[] as &[LineAmounts]), Totals::default());
    }

    #[test]
    fn labour_item_total_includes_both_taxes() {
        let item = LabourAmounts::compute(
            [dec!(500), dec!(1200), dec!(0), dec!(300)],
            dec!(9),
            dec!(9),
        );

        assert_eq!(item.subtotal, dec!(2000));
        assert_eq!(item.cgst_amount, dec!(180));
        assert_eq!(item.sgst_amount, dec!(180));
        assert_eq!(item.total, dec!(2360));
    }

    #[test]
    fn labour_totals_grand_total() {
        let items = [
            LabourAmounts::compute([dec!(100), dec!(0), dec!(0), dec!(0)], dec!(9), dec!(9)),
            LabourAmounts::compute([dec!(0), dec!(0), dec!(50), dec!(50)], dec!(0), dec!(0)),
        ];

        let totals = labour_totals(&items);

        assert_eq!(totals.subtotal, dec!(200));
        assert_eq!(totals.cgst, dec!(9));
        assert_eq!(totals.sgst, dec!(9));
        assert_eq!(totals.total_due, dec!(218));
    }

    #[test]
    fn max_amount_is_the_money_column_limit() {
        assert_eq!(MAX_AMOUNT, dec!(9999999999.99));
    }

    #[test]
    fn huge_rate_saturates_instead_of_panicking() {
        let line = LineAmounts::compute(Decimal::MAX, 100, dec!(9), dec!(9));
        let totals = tax_totals(&[line]);

        assert_eq!(line.amount, Decimal::MAX);
        assert!(!totals.fits_storage());
    }

    #[test]
    fn huge_labour_charges_saturate() {
        let item = LabourAmounts::compute([Decimal::MAX; 4], dec!(100), dec!(100));

        assert_eq!(item.total, Decimal::MAX);
        assert!(!labour_totals(&[item]).fits_storage());
    }

    #[test]
    fn ordinary_totals_fit_storage() {
        let line = LineAmounts::compute(dec!(999999.99), 10000, dec!(0), dec!(0));
        assert!(tax_totals(&[line]).fits_storage());
    }
}
