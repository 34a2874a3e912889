//! Number formatting conventions, passed around explicitly instead of being
//! installed process-wide.

use rust_decimal::Decimal;

use crate::calc::ROUNDING;

/// Numeric formatting rules of a locale (the `LC_NUMERIC` subset we need).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumericLocale {
    pub decimal_point: char,
    pub thousands_sep: char,
    /// Digits per group; `0` disables grouping.
    pub grouping: usize,
}

impl NumericLocale {
    /// `pl_PL`: decimal comma, narrow no-break space between thousands.
    pub fn polish() -> Self {
        Self {
            decimal_point: ',',
            thousands_sep: '\u{202F}',
            grouping: 3,
        }
    }

    /// Format `value` with exactly `precision` decimals and thousands
    /// grouping. No-break group separators come out as plain spaces so the
    /// text survives fonts without those glyphs.
    pub fn format_fixed(&self, value: Decimal, precision: u32) -> String {
        let mut rounded = value.round_dp_with_strategy(precision, ROUNDING);
        rounded.rescale(precision);
        let negative = rounded.is_sign_negative() && !rounded.is_zero();
        let digits = rounded.abs().to_string();
        let (int_part, frac_part) = match digits.split_once('.') {
            Some((i, f)) => (i, Some(f)),
            None => (digits.as_str(), None),
        };

        let mut out = String::with_capacity(digits.len() + 8);
        if negative {
            out.push('-');
        }
        out.push_str(&self.group(int_part));
        if let Some(frac) = frac_part {
            out.push(self.decimal_point);
            out.push_str(frac);
        }
        normalize_spaces(&out)
    }

    fn group(&self, int_part: &str) -> String {
        if self.grouping == 0 || int_part.len() <= self.grouping {
            return int_part.to_string();
        }
        let mut out = String::with_capacity(int_part.len() * 2);
        let lead = int_part.len() % self.grouping;
        for (i, ch) in int_part.chars().enumerate() {
            if i > 0 && (i + self.grouping - lead) % self.grouping == 0 {
                out.push(self.thousands_sep);
            }
            out.push(ch);
        }
        out
    }
}

impl Default for NumericLocale {
    fn default() -> Self {
        Self::polish()
    }
}

/// Replace narrow and regular no-break spaces with U+0020.
pub fn normalize_spaces(text: &str) -> String {
    text.replace(['\u{202F}', '\u{00A0}'], " ")
}
