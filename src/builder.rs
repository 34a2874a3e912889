//! Document builder – turns the configuration and computed totals into the
//! fixed sequence of invoice blocks.
//!
//! Nothing here measures text or touches the filesystem; the result is a
//! plain [`InvoiceDocument`] that the layout stage places on the page.

use rust_decimal::Decimal;

use crate::calc::{InvoiceTotals, LineTotals};
use crate::config::{InvoiceConfig, Party};
use crate::document::{
    Block, Borders, Cell, Color, ColumnWidths, InvoiceDocument, Padding, Paragraph, Table,
    TextAlign, SPACER_FONT_SIZE,
};
use crate::error::Result;
use crate::locale::NumericLocale;
use crate::words::{amount_in_words, CurrencyVocabulary};

const TITLE_SIZE: f32 = 14.0;
const HEADING_SIZE: f32 = 10.0;
const INFO_SIZE: f32 = 9.0;
const TABLE_SIZE: f32 = 7.1;
const PAYMENT_SIZE: f32 = 8.0;
const SIGNATURE_SIZE: f32 = 7.0;

const RULE: f32 = 0.5;
const TABLE_PADDING: Padding = Padding::new(4.0, 4.0, 2.0, 4.0);
const SIGNATURE_PADDING: Padding = Padding::new(4.0, 1.0, 1.0, 1.0);

const ITEM_HEADERS: [&str; 9] = [
    "L.p.",
    "Nazwa towaru/Usługi",
    "J.m.",
    "Cena Jedn. Netto",
    "Ilość",
    "Stawka VAT [%]",
    "Netto [PLN]",
    "VAT [PLN]",
    "Brutto [PLN]",
];

const VAT_HEADERS: [&str; 4] = ["Stawka VAT [%]", "Netto [PLN]", "VAT [PLN]", "Brutto [PLN]"];

/// Assemble every block of the invoice in page order.
pub fn build_document(
    config: &InvoiceConfig,
    totals: &InvoiceTotals,
    locale: &NumericLocale,
) -> Result<InvoiceDocument> {
    let title = format!("FAKTURA nr {}", config.full_invoice_number());
    let mut doc = InvoiceDocument::new(title.clone());

    doc.push(Paragraph::new(title, TITLE_SIZE).bold().align(TextAlign::Center));
    doc.push(Block::Spacer);
    doc.push(dates_table(config));
    doc.push(Block::Spacer);
    doc.push(parties_table(config));
    doc.push(bank_account_table(config));
    doc.push(Block::Spacer);
    doc.push(Block::Spacer);
    doc.push(line_items_table(config, totals, locale));
    doc.push(vat_breakdown_table(config, totals, locale)?);
    doc.push(summary_table(config, totals, locale)?);
    for _ in 0..3 {
        doc.push(Block::Spacer);
    }
    doc.push(signature_table());

    Ok(doc)
}

// ---------------------------------------------------------------------------
// Cell helpers
// ---------------------------------------------------------------------------

fn blank() -> Cell {
    Cell::new(Paragraph::new(" ", SPACER_FONT_SIZE))
}

fn info(text: impl Into<String>) -> Cell {
    Cell::new(Paragraph::new(text, INFO_SIZE))
}

fn header(text: &str) -> Cell {
    Cell::new(Paragraph::new(text, TABLE_SIZE).align(TextAlign::Center))
        .background(Color::GAINSBORO)
        .borders(Borders::all(RULE))
}

fn value(text: impl Into<String>, align: TextAlign) -> Cell {
    Cell::new(Paragraph::new(text, TABLE_SIZE).align(align)).borders(Borders::all(RULE))
}

fn total(text: impl Into<String>) -> Cell {
    Cell::new(Paragraph::new(text, TABLE_SIZE).bold().align(TextAlign::Right))
        .borders(Borders::all(RULE))
}

/// Invisible filler keeping the totals under their columns.
fn gap() -> Cell {
    Cell::new(Paragraph::new(" ", TABLE_SIZE).bold())
}

fn money(locale: &NumericLocale, amount: Decimal) -> String {
    locale.format_fixed(amount, 2)
}

// ---------------------------------------------------------------------------
// Blocks
// ---------------------------------------------------------------------------

fn dates_table(config: &InvoiceConfig) -> Table {
    let mut table = Table::new(2, ColumnWidths::Fixed);
    table.push_row(vec![
        info(format!(
            "Data wystawienia {}, {}",
            config.invoice_creation_date, config.seller.party.city
        )),
        blank(),
    ]);
    table.push_row(vec![
        info(format!(
            "Data sprzedaży/wykonania usługi {}",
            config.services_delivery_date
        )),
        blank(),
    ]);
    table
}

fn parties_table(config: &InvoiceConfig) -> Table {
    let seller = &config.seller.party;
    let buyer = &config.buyer;

    let mut table = Table::new(3, ColumnWidths::Fixed);
    table.push_row(vec![
        Cell::new(Paragraph::new("SPRZEDAWCA:", HEADING_SIZE).bold()),
        blank(),
        Cell::new(Paragraph::new("NABYWCA:", HEADING_SIZE).bold()),
    ]);
    let lines: [fn(&Party) -> String; 4] = [
        |p| p.name.clone(),
        |p| p.address.clone(),
        |p| format!("{} {}", p.zipcode, p.city),
        |p| format!("NIP: {}", p.nip),
    ];
    for line in lines {
        table.push_row(vec![info(line(seller)), blank(), info(line(buyer))]);
    }
    table
}

fn bank_account_table(config: &InvoiceConfig) -> Table {
    let mut table = Table::new(1, ColumnWidths::Fixed);
    table.push_row(vec![info(format!(
        "NUMER RACHUNKU: {}",
        config.seller.bank_account_number
    ))]);
    table
}

fn line_items_table(
    config: &InvoiceConfig,
    totals: &InvoiceTotals,
    locale: &NumericLocale,
) -> Table {
    let mut table = Table::new(ITEM_HEADERS.len(), ColumnWidths::Flexible).padding(TABLE_PADDING);
    table.push_row(ITEM_HEADERS.iter().map(|h| header(h)).collect());

    for (idx, (item, line)) in config.items.iter().zip(&totals.lines).enumerate() {
        table.push_row(vec![
            value(format!("{}.", idx + 1), TextAlign::Center),
            value(item.item_name.clone(), TextAlign::Center),
            value("szt.", TextAlign::Right),
            value(money(locale, item.item_netto_cost), TextAlign::Right),
            value(money(locale, item.item_quantity), TextAlign::Right),
            value(line.rate.label(), TextAlign::Right),
            value(money(locale, line.net), TextAlign::Right),
            value(money(locale, line.vat), TextAlign::Right),
            value(money(locale, line.gross), TextAlign::Right),
        ]);
    }

    let mut footer: Vec<Cell> = (0..5).map(|_| gap()).collect();
    footer.push(total("Razem"));
    footer.extend(totals_cells(totals, locale));
    table.push_row(footer);
    table
}

fn vat_breakdown_table(
    config: &InvoiceConfig,
    totals: &InvoiceTotals,
    locale: &NumericLocale,
) -> Result<Table> {
    let mut table = Table::new(VAT_HEADERS.len(), ColumnWidths::Flexible).padding(TABLE_PADDING);
    table.push_row((0..4).map(|_| gap()).collect());
    table.push_row(VAT_HEADERS.iter().map(|h| header(h)).collect());

    let rows: Vec<LineTotals> = if config.group_vat_by_rate {
        totals.by_rate()?
    } else {
        totals.lines.clone()
    };
    for line in &rows {
        table.push_row(vec![
            value(line.rate.label(), TextAlign::Right),
            value(money(locale, line.net), TextAlign::Right),
            value(money(locale, line.vat), TextAlign::Right),
            value(money(locale, line.gross), TextAlign::Right),
        ]);
    }

    let mut footer = vec![total("Razem")];
    footer.extend(totals_cells(totals, locale));
    table.push_row(footer);
    table.push_row((0..4).map(|_| gap()).collect());
    Ok(table)
}

fn totals_cells(totals: &InvoiceTotals, locale: &NumericLocale) -> [Cell; 3] {
    [
        total(money(locale, totals.net)),
        total(money(locale, totals.vat)),
        total(money(locale, totals.gross)),
    ]
}

fn summary_table(
    config: &InvoiceConfig,
    totals: &InvoiceTotals,
    locale: &NumericLocale,
) -> Result<Table> {
    let due = config.payment_due_date()?;
    let words = amount_in_words(totals.gross, &CurrencyVocabulary::PLN);

    let mut table = Table::new(1, ColumnWidths::Fixed);
    table.push_row(vec![Cell::new(
        Paragraph::new(
            format!("Do zapłaty: {} PLN", money(locale, totals.gross)),
            HEADING_SIZE,
        )
        .bold(),
    )]);
    table.push_row(vec![info(format!("Słownie: {words}"))]);
    table.push_row(vec![blank()]);
    table.push_row(vec![Cell::new(Paragraph::new(
        "Typ płatności: Przelew",
        PAYMENT_SIZE,
    ))]);
    table.push_row(vec![Cell::new(Paragraph::new(
        format!("Termin płatności: {}", due.format("%Y-%m-%d")),
        PAYMENT_SIZE,
    ))]);
    Ok(table)
}

fn signature_table() -> Table {
    let signature = |text: &str| {
        Cell::new(Paragraph::new(text, SIGNATURE_SIZE).align(TextAlign::Center))
            .borders(Borders::top_only(RULE))
    };

    let mut table = Table::new(3, ColumnWidths::Fixed).padding(SIGNATURE_PADDING);
    table.push_row(vec![
        signature("Podpis osoby upoważnionej do wystawienia"),
        blank(),
        signature("Podpis osoby upoważnionej do odbioru"),
    ]);
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc::calculate;
    use crate::config::tests::SAMPLE;

    fn build(yaml: &str) -> InvoiceDocument {
        let config = InvoiceConfig::from_yaml_str(yaml).unwrap();
        let totals = calculate(&config.items).unwrap();
        build_document(&config, &totals, &NumericLocale::polish()).unwrap()
    }

    fn table_texts(doc: &InvoiceDocument, index: usize) -> Vec<Vec<String>> {
        doc.tables()
            .nth(index)
            .unwrap()
            .texts()
            .into_iter()
            .map(|row| row.into_iter().map(str::to_string).collect())
            .collect()
    }

    #[test]
    fn block_sequence() {
        let doc = build(SAMPLE);
        assert_eq!(doc.title, "FAKTURA nr FA/2024/03/05/7");
        match &doc.blocks[0] {
            Block::Paragraph(p) => {
                assert_eq!(p.text, "FAKTURA nr FA/2024/03/05/7");
                assert_eq!(p.align, TextAlign::Center);
            }
            other => panic!("expected title paragraph, got {other:?}"),
        }
        assert_eq!(doc.tables().count(), 7);
        assert!(matches!(doc.blocks.last(), Some(Block::Table(_))));
    }

    #[test]
    fn dates_and_parties() {
        let doc = build(SAMPLE);
        let dates = table_texts(&doc, 0);
        assert_eq!(dates[0][0], "Data wystawienia 2024-03-05, Warszawa");
        assert_eq!(dates[1][0], "Data sprzedaży/wykonania usługi 2024-03-01");

        let parties = table_texts(&doc, 1);
        assert_eq!(parties.len(), 5);
        assert_eq!(parties[0], vec!["SPRZEDAWCA:", " ", "NABYWCA:"]);
        assert_eq!(parties[3][0], "00-950 Warszawa");
        assert_eq!(parties[3][2], "30-001 Kraków");
        assert_eq!(parties[4][2], "NIP: 675-000-00-00");

        let bank = table_texts(&doc, 2);
        assert_eq!(bank[0][0], "NUMER RACHUNKU: 12 3456 7890 1234 5678 9012 3456");
    }

    #[test]
    fn line_items_and_totals_row() {
        let doc = build(SAMPLE);
        let items = table_texts(&doc, 3);
        assert_eq!(items.len(), 4);
        assert_eq!(items[0], ITEM_HEADERS.to_vec());
        assert_eq!(
            items[1],
            vec![
                "1.",
                "Usługa programistyczna",
                "szt.",
                "100,00",
                "2,00",
                "23",
                "200,00",
                "46,00",
                "246,00"
            ]
        );
        // 19.99 * 1.5 = 29.985 -> 29.98; 8% of 29.985 = 2.3988 -> 2.40
        assert_eq!(
            items[2][3..],
            ["19,99", "1,50", "8.0", "29,98", "2,40", "32,38"]
        );
        assert_eq!(
            items[3],
            vec![" ", " ", " ", " ", " ", "Razem", "229,98", "48,40", "278,38"]
        );
    }

    #[test]
    fn vat_breakdown_has_one_row_per_item() {
        let yaml = SAMPLE.replace("vat_rate: 8.0", "vat_rate: 23");
        let doc = build(&yaml);
        let vat = table_texts(&doc, 4);
        // blank, header, two items with the same rate, totals, blank
        assert_eq!(vat.len(), 6);
        assert_eq!(vat[2][0], "23");
        assert_eq!(vat[3][0], "23");
        assert_eq!(vat[4][0], "Razem");
    }

    #[test]
    fn vat_breakdown_can_group_by_rate() {
        let yaml = SAMPLE.replace("vat_rate: 8.0", "vat_rate: 23")
            + "group_vat_by_rate: true\n";
        let doc = build(&yaml);
        let vat = table_texts(&doc, 4);
        assert_eq!(vat.len(), 5);
        assert_eq!(vat[2], vec!["23", "229,98", "52,90", "282,88"]);
    }

    #[test]
    fn summary_block() {
        let doc = build(SAMPLE);
        let summary = table_texts(&doc, 5);
        assert_eq!(summary[0][0], "Do zapłaty: 278,38 PLN");
        assert_eq!(
            summary[1][0],
            "Słownie: dwieście siedemdziesiąt osiem zł, trzydzieści osiem groszy"
        );
        assert_eq!(summary[3][0], "Typ płatności: Przelew");
        assert_eq!(summary[4][0], "Termin płatności: 2024-03-15");
    }

    #[test]
    fn signature_cells_have_top_rule_only() {
        let doc = build(SAMPLE);
        let table = doc.tables().last().unwrap();
        let row = &table.rows[0];
        assert_eq!(row[0].borders, Borders::top_only(RULE));
        assert!(row[1].borders.is_none());
        assert_eq!(row[2].content.text, "Podpis osoby upoważnionej do odbioru");
    }
}
