//! Invoice arithmetic – per-line and aggregate net / VAT / gross amounts.
//!
//! Every line is rounded to grosze on its own and the totals are sums of the
//! rounded line values, so the totals row always agrees with the lines above
//! it and `gross == net + vat` holds exactly.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::config::{Item, VatRate};
use crate::error::{FakturaError, Result};

/// Rounding applied to every monetary value (half to even).
pub const ROUNDING: RoundingStrategy = RoundingStrategy::MidpointNearestEven;

/// Round to two decimal places with [`ROUNDING`].
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, ROUNDING)
}

fn out_of_range(what: &str) -> FakturaError {
    FakturaError::Config(format!("{what} exceeds the representable amount range"))
}

fn checked_sum(a: Decimal, b: Decimal, what: &str) -> Result<Decimal> {
    a.checked_add(b).ok_or_else(|| out_of_range(what))
}

/// Amounts for a single item, already rounded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineTotals {
    pub rate: VatRate,
    pub net: Decimal,
    pub vat: Decimal,
    pub gross: Decimal,
}

impl LineTotals {
    /// Net and VAT are rounded separately; gross is their sum.
    pub fn for_item(item: &Item) -> Result<Self> {
        let what = format!("item {:?}", item.item_name);
        let net = item
            .item_netto_cost
            .checked_mul(item.item_quantity)
            .ok_or_else(|| out_of_range(&what))?;
        let vat = (item.vat_rate.value() / Decimal::ONE_HUNDRED)
            .checked_mul(net)
            .ok_or_else(|| out_of_range(&what))?;
        let net = round_money(net);
        let vat = round_money(vat);
        Ok(Self {
            rate: item.vat_rate.clone(),
            net,
            vat,
            gross: checked_sum(net, vat, &what)?,
        })
    }

    fn absorb(&mut self, other: &LineTotals, what: &str) -> Result<()> {
        self.net = checked_sum(self.net, other.net, what)?;
        self.vat = checked_sum(self.vat, other.vat, what)?;
        self.gross = checked_sum(self.gross, other.gross, what)?;
        Ok(())
    }
}

/// Per-line amounts in item order plus the three aggregates.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InvoiceTotals {
    pub lines: Vec<LineTotals>,
    pub net: Decimal,
    pub vat: Decimal,
    pub gross: Decimal,
}

impl InvoiceTotals {
    /// Lines merged per VAT rate, in order of first appearance.
    pub fn by_rate(&self) -> Result<Vec<LineTotals>> {
        let mut groups: Vec<LineTotals> = Vec::new();
        for line in &self.lines {
            match groups
                .iter_mut()
                .find(|g| g.rate.value() == line.rate.value())
            {
                Some(group) => group.absorb(line, "VAT group total")?,
                None => groups.push(line.clone()),
            }
        }
        Ok(groups)
    }
}

/// Compute line and aggregate totals for `items`.
///
/// Amounts beyond the range of [`Decimal`] are reported as
/// [`FakturaError::Config`].
pub fn calculate(items: &[Item]) -> Result<InvoiceTotals> {
    let mut totals = InvoiceTotals::default();
    for item in items {
        let line = LineTotals::for_item(item)?;
        totals.net = checked_sum(totals.net, line.net, "invoice total")?;
        totals.vat = checked_sum(totals.vat, line.vat, "invoice total")?;
        totals.gross = checked_sum(totals.gross, line.gross, "invoice total")?;
        totals.lines.push(line);
    }
    log::debug!(
        "Totals over {} line(s): net={} vat={} gross={}",
        totals.lines.len(),
        totals.net,
        totals.vat,
        totals.gross
    );
    Ok(totals)
}
