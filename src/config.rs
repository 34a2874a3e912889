//! Invoice configuration – the YAML document describing seller, buyer, dates
//! and billed items.
//!
//! ```yaml
//! seller:
//!   name: Firma Sp. z o.o.
//!   address: ul. Prosta 1
//!   city: Warszawa
//!   zipcode: 00-950
//!   nip: 5250000000
//!   bank_account_number: 12 3456 7890 1234 5678 9012 3456
//! buyer: { name: Klient, address: ul. Krzywa 2, city: Kraków, zipcode: 30-001, nip: 6750000000 }
//! invoice_number: 7
//! invoice_creation_date: "2024-03-05"
//! services_delivery_date: "2024-03-05"
//! time_to_pay_in_days: 14
//! items:
//!   - { item_name: Usługa programistyczna, item_netto_cost: 100.00, item_quantity: 2, vat_rate: 23 }
//! regular_font_file: fonts/DejaVuSans.ttf
//! bold_font_file: fonts/DejaVuSans-Bold.ttf
//! ```

use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer};

use crate::error::{FakturaError, Result};
use crate::fonts::FontVariant;

/// The whole invoice as read from YAML. Immutable once loaded.
#[derive(Debug, Clone, Deserialize)]
pub struct InvoiceConfig {
    pub seller: Seller,
    pub buyer: Party,
    #[serde(deserialize_with = "text")]
    pub invoice_number: String,
    pub invoice_creation_date: NaiveDate,
    pub services_delivery_date: NaiveDate,
    pub time_to_pay_in_days: i64,
    pub items: Vec<Item>,
    pub regular_font_file: PathBuf,
    pub bold_font_file: PathBuf,
    /// Aggregate the VAT breakdown table per rate instead of one row per item.
    #[serde(default)]
    pub group_vat_by_rate: bool,

    /// Directory relative font paths are resolved against.
    #[serde(skip)]
    base_dir: PathBuf,
}

/// Buyer-side party.
#[derive(Debug, Clone, Deserialize)]
pub struct Party {
    #[serde(deserialize_with = "text")]
    pub name: String,
    #[serde(deserialize_with = "text")]
    pub address: String,
    #[serde(deserialize_with = "text")]
    pub city: String,
    #[serde(deserialize_with = "text")]
    pub zipcode: String,
    #[serde(deserialize_with = "text")]
    pub nip: String,
}

/// The issuing party; a [`Party`] plus the account payments go to.
#[derive(Debug, Clone, Deserialize)]
pub struct Seller {
    #[serde(flatten)]
    pub party: Party,
    #[serde(deserialize_with = "text")]
    pub bank_account_number: String,
}

/// One billed line.
#[derive(Debug, Clone, Deserialize)]
pub struct Item {
    #[serde(deserialize_with = "text")]
    pub item_name: String,
    #[serde(deserialize_with = "decimal")]
    pub item_netto_cost: Decimal,
    #[serde(deserialize_with = "decimal")]
    pub item_quantity: Decimal,
    pub vat_rate: VatRate,
}

/// A VAT percentage that remembers how it was written, so `23` prints as
/// `23` and `23.0` as `23.0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VatRate {
    value: Decimal,
    label: String,
}

impl VatRate {
    pub fn new(value: Decimal) -> Self {
        Self {
            label: value.normalize().to_string(),
            value,
        }
    }

    pub fn value(&self) -> Decimal {
        self.value
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl fmt::Display for VatRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

impl<'de> Deserialize<'de> for VatRate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let scalar = Scalar::deserialize(deserializer)?;
        let value = scalar.to_decimal().map_err(de::Error::custom)?;
        let label = match scalar {
            Scalar::Int(i) => i.to_string(),
            Scalar::Float(f) => format!("{f:?}"),
            Scalar::Text(s) => s.trim().to_string(),
        };
        Ok(Self { value, label })
    }
}

/// A YAML scalar as it appeared in the document.
enum Scalar {
    Int(i128),
    Float(f64),
    Text(String),
}

impl<'de> Deserialize<'de> for Scalar {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(ScalarVisitor)
    }
}

struct ScalarVisitor;

impl<'de> Visitor<'de> for ScalarVisitor {
    type Value = Scalar;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a number or a string")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> std::result::Result<Scalar, E> {
        Ok(Scalar::Text(v.to_string()))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Scalar, E> {
        Ok(Scalar::Int(v.into()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Scalar, E> {
        Ok(Scalar::Int(v.into()))
    }

    fn visit_i128<E: de::Error>(self, v: i128) -> std::result::Result<Scalar, E> {
        Ok(Scalar::Int(v))
    }

    // Digits past i128 stay text; account numbers only need them printed.
    fn visit_u128<E: de::Error>(self, v: u128) -> std::result::Result<Scalar, E> {
        Ok(i128::try_from(v).map_or_else(|_| Scalar::Text(v.to_string()), Scalar::Int))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<Scalar, E> {
        Ok(Scalar::Float(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Scalar, E> {
        Ok(Scalar::Text(v.to_owned()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> std::result::Result<Scalar, E> {
        Ok(Scalar::Text(v))
    }
}

impl Scalar {
    fn to_decimal(&self) -> std::result::Result<Decimal, String> {
        match self {
            Scalar::Int(i) => Decimal::try_from_i128_with_scale(*i, 0)
                .map_err(|e| format!("invalid number {i}: {e}")),
            // Shortest round-trip text, so 0.1 becomes exactly 0.1.
            Scalar::Float(f) => {
                Decimal::from_str(&f.to_string()).map_err(|e| format!("invalid number {f}: {e}"))
            }
            Scalar::Text(s) => {
                let s = s.trim();
                Decimal::from_str(s)
                    .or_else(|_| Decimal::from_scientific(s))
                    .map_err(|e| format!("invalid number {s:?}: {e}"))
            }
        }
    }

    fn into_text(self) -> String {
        match self {
            Scalar::Int(i) => i.to_string(),
            Scalar::Float(f) => f.to_string(),
            Scalar::Text(s) => s,
        }
    }
}

fn decimal<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Decimal, D::Error> {
    Scalar::deserialize(deserializer)?
        .to_decimal()
        .map_err(de::Error::custom)
}

fn text<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<String, D::Error> {
    Ok(Scalar::deserialize(deserializer)?.into_text())
}

impl InvoiceConfig {
    /// Read and parse a configuration file.
    ///
    /// A missing file is reported as [`FakturaError::ConfigNotFound`]; every
    /// other failure keeps its own variant.
    pub fn load(path: &Path) -> Result<Self> {
        let yaml = fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => FakturaError::ConfigNotFound(path.to_path_buf()),
            _ => FakturaError::io(path, e),
        })?;
        let base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let config = Self::from_yaml_str(&yaml)?.with_base_dir(base_dir);
        log::info!(
            "Loaded invoice {} with {} item(s) from '{}'",
            config.invoice_number,
            config.items.len(),
            path.display()
        );
        Ok(config)
    }

    /// Parse a configuration from YAML text. Relative font paths resolve
    /// against the current directory until [`with_base_dir`](Self::with_base_dir)
    /// says otherwise.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = base_dir.into();
        self
    }

    /// Resolved location of the font file for `variant`.
    pub fn font_path(&self, variant: FontVariant) -> PathBuf {
        let file = match variant {
            FontVariant::Regular => &self.regular_font_file,
            FontVariant::Bold => &self.bold_font_file,
        };
        self.base_dir.join(file)
    }

    /// `FA/<year>/<month>/<day>/<number>`, the number printed in the title.
    pub fn full_invoice_number(&self) -> String {
        format!(
            "FA/{}/{}",
            self.invoice_creation_date.format("%Y/%m/%d"),
            self.invoice_number
        )
    }

    /// Name of the PDF written for this invoice, e.g.
    /// `FAKTURA_FA_2024_03_05_7.pdf`.
    pub fn output_file_name(&self) -> String {
        format!(
            "FAKTURA_FA_{}_{}.pdf",
            self.invoice_creation_date, self.invoice_number
        )
        .replace('-', "_")
    }

    /// Delivery date plus the configured payment term.
    pub fn payment_due_date(&self) -> Result<NaiveDate> {
        chrono::TimeDelta::try_days(self.time_to_pay_in_days)
            .and_then(|term| self.services_delivery_date.checked_add_signed(term))
            .ok_or_else(|| {
                FakturaError::Config(format!(
                    "payment due date out of range ({} + {} days)",
                    self.services_delivery_date, self.time_to_pay_in_days
                ))
            })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    pub(crate) const SAMPLE: &str = r#"
seller:
  name: Firma Sp. z o.o.
  address: ul. Prosta 1
  city: Warszawa
  zipcode: 00-950
  nip: 5250000000
  bank_account_number: "12 3456 7890 1234 5678 9012 3456"
buyer:
  name: Klient S.A.
  address: ul. Krzywa 2
  city: Kraków
  zipcode: 30-001
  nip: "675-000-00-00"
invoice_number: 7
invoice_creation_date: "2024-03-05"
services_delivery_date: "2024-03-01"
time_to_pay_in_days: 14
items:
  - item_name: Usługa programistyczna
    item_netto_cost: 100.00
    item_quantity: 2
    vat_rate: 23
  - item_name: Hosting
    item_netto_cost: "19.99"
    item_quantity: 1.5
    vat_rate: 8.0
regular_font_file: fonts/regular.ttf
bold_font_file: /usr/share/fonts/bold.ttf
"#;

    #[test]
    fn parses_sample() {
        let cfg = InvoiceConfig::from_yaml_str(SAMPLE).unwrap();
        assert_eq!(cfg.seller.party.name, "Firma Sp. z o.o.");
        assert_eq!(cfg.seller.party.nip, "5250000000");
        assert_eq!(cfg.buyer.nip, "675-000-00-00");
        assert_eq!(cfg.invoice_number, "7");
        assert_eq!(cfg.items.len(), 2);
        assert_eq!(cfg.items[0].item_netto_cost, dec!(100));
        assert_eq!(cfg.items[1].item_netto_cost, dec!(19.99));
        assert_eq!(cfg.items[1].item_quantity, dec!(1.5));
        assert!(!cfg.group_vat_by_rate);
    }

    #[test]
    fn vat_rate_keeps_written_form() {
        let cfg = InvoiceConfig::from_yaml_str(SAMPLE).unwrap();
        assert_eq!(cfg.items[0].vat_rate.label(), "23");
        assert_eq!(cfg.items[0].vat_rate.value(), dec!(23));
        assert_eq!(cfg.items[1].vat_rate.label(), "8.0");
        assert_eq!(cfg.items[1].vat_rate.value(), dec!(8));
    }

    #[test]
    fn output_file_name_replaces_dashes() {
        let cfg = InvoiceConfig::from_yaml_str(SAMPLE).unwrap();
        assert_eq!(cfg.output_file_name(), "FAKTURA_FA_2024_03_05_7.pdf");
        assert_eq!(cfg.full_invoice_number(), "FA/2024/03/05/7");
    }

    #[test]
    fn due_date_adds_days_to_delivery() {
        let cfg = InvoiceConfig::from_yaml_str(SAMPLE).unwrap();
        assert_eq!(
            cfg.payment_due_date().unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
        );
    }

    #[test]
    fn font_paths_resolve_against_base_dir() {
        let cfg = InvoiceConfig::from_yaml_str(SAMPLE)
            .unwrap()
            .with_base_dir("/etc/faktura");
        assert_eq!(
            cfg.font_path(FontVariant::Regular),
            PathBuf::from("/etc/faktura/fonts/regular.ttf")
        );
        assert_eq!(
            cfg.font_path(FontVariant::Bold),
            PathBuf::from("/usr/share/fonts/bold.ttf")
        );
    }

    #[test]
    fn missing_file_is_config_not_found() {
        let err = InvoiceConfig::load(Path::new("/definitely/not/here.yaml")).unwrap_err();
        assert!(matches!(err, FakturaError::ConfigNotFound(_)));
    }

    #[test]
    fn missing_key_is_yaml_error() {
        let err = InvoiceConfig::from_yaml_str("invoice_number: 1\n").unwrap_err();
        assert!(matches!(err, FakturaError::Yaml(_)));
    }

    #[test]
    fn bad_date_is_rejected() {
        let yaml = SAMPLE.replace("\"2024-03-05\"", "\"2024-13-05\"");
        assert!(InvoiceConfig::from_yaml_str(&yaml).is_err());
    }

    #[test]
    fn unquoted_account_number_keeps_every_digit() {
        let yaml = SAMPLE.replace(
            "\"12 3456 7890 1234 5678 9012 3456\"",
            "61109010140000071219812874",
        );
        let cfg = InvoiceConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(cfg.seller.bank_account_number, "61109010140000071219812874");
    }

    #[test]
    fn wide_integer_amounts_parse_exactly() {
        let yaml = SAMPLE.replace("item_netto_cost: 100.00", "item_netto_cost: 100000000000000000000");
        let cfg = InvoiceConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(cfg.items[0].item_netto_cost, dec!(100000000000000000000));
    }

    #[test]
    fn amount_beyond_decimal_range_is_rejected() {
        let yaml = SAMPLE.replace(
            "item_netto_cost: 100.00",
            "item_netto_cost: 1000000000000000000000000000000",
        );
        let err = InvoiceConfig::from_yaml_str(&yaml).unwrap_err();
        assert!(matches!(err, FakturaError::Yaml(_)), "{err}");
    }
}
