//! Polish amounts in words, e.g. `246.00` →
//! `dwieście czterdzieści sześć zł, zero groszy`.

use rust_decimal::{Decimal, RoundingStrategy};

const ZERO: &str = "zero";
const MINUS: &str = "minus";

const ONES: [&str; 10] = [
    "", "jeden", "dwa", "trzy", "cztery", "pięć", "sześć", "siedem", "osiem", "dziewięć",
];

const TEENS: [&str; 10] = [
    "dziesięć",
    "jedenaście",
    "dwanaście",
    "trzynaście",
    "czternaście",
    "piętnaście",
    "szesnaście",
    "siedemnaście",
    "osiemnaście",
    "dziewiętnaście",
];

const TENS: [&str; 10] = [
    "",
    "",
    "dwadzieścia",
    "trzydzieści",
    "czterdzieści",
    "pięćdziesiąt",
    "sześćdziesiąt",
    "siedemdziesiąt",
    "osiemdziesiąt",
    "dziewięćdziesiąt",
];

const HUNDREDS: [&str; 10] = [
    "", "sto", "dwieście", "trzysta", "czterysta", "pięćset", "sześćset", "siedemset", "osiemset",
    "dziewięćset",
];

/// Scale words for 10^3, 10^6, … in singular / few / many form, enough
/// for every `u128`.
const SCALES: [[&str; 3]; 12] = [
    ["tysiąc", "tysiące", "tysięcy"],
    ["milion", "miliony", "milionów"],
    ["miliard", "miliardy", "miliardów"],
    ["bilion", "biliony", "bilionów"],
    ["biliard", "biliardy", "biliardów"],
    ["trylion", "tryliony", "trylionów"],
    ["tryliard", "tryliardy", "tryliardów"],
    ["kwadrylion", "kwadryliony", "kwadrylionów"],
    ["kwadryliard", "kwadryliardy", "kwadryliardów"],
    ["kwintylion", "kwintyliony", "kwintylionów"],
    ["kwintyliard", "kwintyliardy", "kwintyliardów"],
    ["sekstylion", "sekstyliony", "sekstylionów"],
];

/// Names of a currency's major and minor unit in the three Polish
/// grammatical number forms (`1`, `2–4`, `5+`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrencyVocabulary {
    pub major: [&'static str; 3],
    pub minor: [&'static str; 3],
}

impl CurrencyVocabulary {
    /// Złoty as printed on invoices: the abbreviated `zł` for every count.
    pub const PLN: Self = Self {
        major: ["zł", "zł", "zł"],
        minor: ["grosz", "grosze", "groszy"],
    };
}

/// Pick the grammatical form matching `n`.
pub fn plural_form<'a>(n: u128, forms: &[&'a str; 3]) -> &'a str {
    let last = n % 10;
    let last_two = n % 100;
    if n == 1 {
        forms[0]
    } else if (2..=4).contains(&last) && !(10..=20).contains(&last_two) {
        forms[1]
    } else {
        forms[2]
    }
}

/// Cardinal number in words.
pub fn cardinal(n: u128) -> String {
    if n == 0 {
        return ZERO.to_string();
    }

    let mut groups = Vec::new();
    let mut rest = n;
    while rest > 0 {
        groups.push(rest % 1000);
        rest /= 1000;
    }

    let mut words: Vec<&str> = Vec::new();
    for (scale, &group) in groups.iter().enumerate().rev() {
        if group == 0 {
            continue;
        }
        let hundreds = (group / 100) as usize;
        let tens = (group / 10 % 10) as usize;
        let ones = (group % 10) as usize;

        if hundreds > 0 {
            words.push(HUNDREDS[hundreds]);
        }
        if tens > 1 {
            words.push(TENS[tens]);
        }
        if tens == 1 {
            words.push(TEENS[ones]);
        } else if ones > 0 && !(scale > 0 && group == 1) {
            // "tysiąc", never "jeden tysiąc"
            words.push(ONES[ones]);
        }
        if scale > 0 {
            if let Some(forms) = SCALES.get(scale - 1) {
                words.push(plural_form(group, forms));
            }
        }
    }
    words.join(" ")
}

/// Integral non-negative `value` as `u128`. Lowering the scale never
/// overflows and a Decimal mantissa fits in 96 bits.
fn integer_part(mut value: Decimal) -> u128 {
    value.rescale(0);
    value.mantissa().unsigned_abs()
}

/// Spell out a money amount: `<whole> <major>, <fraction> <minor>`.
///
/// The amount is first quantised to hundredths (half away from zero).
pub fn amount_in_words(amount: Decimal, currency: &CurrencyVocabulary) -> String {
    let quantised = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let negative = quantised.is_sign_negative() && !quantised.is_zero();
    let abs = quantised.abs();
    let whole = integer_part(abs.trunc());
    let fraction = integer_part((abs - abs.trunc()) * Decimal::ONE_HUNDRED);

    let mut out = String::new();
    if negative {
        out.push_str(MINUS);
        out.push(' ');
    }
    out.push_str(&cardinal(whole));
    out.push(' ');
    out.push_str(plural_form(whole, &currency.major));
    out.push_str(", ");
    out.push_str(&cardinal(fraction));
    out.push(' ');
    out.push_str(plural_form(fraction, &currency.minor));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn pln(amount: Decimal) -> String {
        amount_in_words(amount, &CurrencyVocabulary::PLN)
    }

    #[test]
    fn cardinals() {
        assert_eq!(cardinal(0), "zero");
        assert_eq!(cardinal(7), "siedem");
        assert_eq!(cardinal(11), "jedenaście");
        assert_eq!(cardinal(20), "dwadzieścia");
        assert_eq!(cardinal(246), "dwieście czterdzieści sześć");
        assert_eq!(cardinal(1000), "tysiąc");
        assert_eq!(cardinal(1001), "tysiąc jeden");
        assert_eq!(cardinal(2000), "dwa tysiące");
        assert_eq!(cardinal(5000), "pięć tysięcy");
        assert_eq!(cardinal(12_000), "dwanaście tysięcy");
        assert_eq!(cardinal(22_000), "dwadzieścia dwa tysiące");
        assert_eq!(cardinal(101_000), "sto jeden tysięcy");
        assert_eq!(cardinal(1_000_000), "milion");
        assert_eq!(
            cardinal(2_345_678),
            "dwa miliony trzysta czterdzieści pięć tysięcy sześćset siedemdziesiąt osiem"
        );
    }

    #[test]
    fn plural_forms() {
        let forms = ["grosz", "grosze", "groszy"];
        assert_eq!(plural_form(0, &forms), "groszy");
        assert_eq!(plural_form(1, &forms), "grosz");
        for n in [2, 3, 4, 22, 23, 24, 92] {
            assert_eq!(plural_form(n, &forms), "grosze", "n = {n}");
        }
        for n in [5, 11, 12, 13, 14, 21, 25, 99] {
            assert_eq!(plural_form(n, &forms), "groszy", "n = {n}");
        }
    }

    #[test]
    fn whole_amounts() {
        assert_eq!(pln(dec!(0.00)), "zero zł, zero groszy");
        assert_eq!(pln(dec!(1.00)), "jeden zł, zero groszy");
        assert_eq!(pln(dec!(2.00)), "dwa zł, zero groszy");
        assert_eq!(pln(dec!(5.00)), "pięć zł, zero groszy");
        assert_eq!(pln(dec!(22.00)), "dwadzieścia dwa zł, zero groszy");
        assert_eq!(pln(dec!(246.00)), "dwieście czterdzieści sześć zł, zero groszy");
    }

    #[test]
    fn grosz_forms_follow_fraction() {
        assert_eq!(pln(dec!(0.01)), "zero zł, jeden grosz");
        assert_eq!(pln(dec!(0.02)), "zero zł, dwa grosze");
        assert_eq!(pln(dec!(0.05)), "zero zł, pięć groszy");
        assert_eq!(pln(dec!(0.12)), "zero zł, dwanaście groszy");
        assert_eq!(pln(dec!(3.22)), "trzy zł, dwadzieścia dwa grosze");
        assert_eq!(
            pln(dec!(1230.99)),
            "tysiąc dwieście trzydzieści zł, dziewięćdziesiąt dziewięć groszy"
        );
    }

    #[test]
    fn quantises_before_spelling() {
        assert_eq!(pln(dec!(0.015)), "zero zł, dwa grosze");
        assert_eq!(pln(dec!(9.999)), "dziesięć zł, zero groszy");
    }

    #[test]
    fn negative_amount() {
        assert_eq!(pln(dec!(-5.50)), "minus pięć zł, pięćdziesiąt groszy");
    }

    #[test]
    fn amounts_past_u64() {
        assert_eq!(
            pln(dec!(30000000000000000000.00)),
            "trzydzieści trylionów zł, zero groszy"
        );
        assert!(pln(Decimal::MAX).starts_with(
            "siedemdziesiąt dziewięć kwadryliardów dwieście dwadzieścia osiem kwadrylionów"
        ));
        assert!(pln(Decimal::MAX).ends_with("trzysta trzydzieści pięć zł, zero groszy"));
    }

    #[test]
    fn largest_cardinal_uses_sekstylion() {
        assert!(cardinal(u128::MAX).starts_with("trzysta czterdzieści sekstylionów"));
    }
}
