//! XML product import.
//!
//! Reads an `abasData > recordSet > record` document: each record carries a
//! `header` of fields (`swd`, `descrOperLang`, `salesprice`) and zero or
//! more `row` elements (`productListElem`, `elemQty`) filling the product
//! list. Fields come either as named child elements (`<swd>CHAIR</swd>`) or
//! in the host's export shape, `<field name="swd">CHAIR</field>`; both read
//! the same. The import is all or nothing: every record is parsed and
//! checked first, and a single duplicate search word rolls the whole run
//! back.

use std::io;
use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use serde::Serialize;
use thiserror::Error;

use kontor_core::DomainError;
use kontor_parts::{NewProduct, PartStore, ProcurementMode, ProductListRow};

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("xml parse error: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("malformed import file: {0}")]
    Malformed(String),
    #[error(transparent)]
    Store(#[from] DomainError),
}

/// How an import run ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportOutcome {
    Committed,
    RolledBack { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatedProduct {
    pub swd: String,
    pub idno: String,
}

/// Outcome of one import run: what was read, what was created, and the log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub recordset_attrs: Vec<(String, String)>,
    pub created: Vec<CreatedProduct>,
    pub outcome: ImportOutcome,
    pub log: Vec<String>,
}

impl ImportReport {
    fn new(recordset_attrs: Vec<(String, String)>) -> Self {
        Self {
            recordset_attrs,
            created: Vec::new(),
            outcome: ImportOutcome::Committed,
            log: Vec::new(),
        }
    }

    fn log(&mut self, line: impl Into<String>) {
        let line = line.into();
        tracing::debug!(target: "kontor::import", "{line}");
        self.log.push(line);
    }

    fn roll_back(&mut self, reason: impl Into<String>) {
        let reason = reason.into();
        self.log(format!("rolled back: {reason}"));
        self.outcome = ImportOutcome::RolledBack { reason };
    }

    pub fn is_committed(&self) -> bool {
        self.outcome == ImportOutcome::Committed
    }

    /// Write the log lines to an output stream, one per line.
    pub fn write_log_to<W: io::Write>(&self, w: &mut W) -> io::Result<()> {
        for line in &self.log {
            writeln!(w, "{line}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Default, Clone)]
struct RecordDraft {
    swd: String,
    description: String,
    sales_price: Option<u64>,
    rows: Vec<ProductListRow>,
}

#[derive(Debug, Default)]
struct PendingRow {
    elem: Option<String>,
    qty: Option<i64>,
}

/// Parse a decimal price into smallest-currency-unit integers:
/// "199.99" becomes 19999. At most two fraction digits.
pub fn parse_price_cents(raw: &str) -> Result<u64, ImportError> {
    let trimmed = raw.trim();
    let (whole, frac) = match trimmed.split_once('.') {
        Some((w, f)) => (w, f),
        None => (trimmed, ""),
    };
    if whole.is_empty() && frac.is_empty() {
        return Err(ImportError::Malformed(format!("invalid price '{raw}'")));
    }
    if frac.len() > 2 {
        return Err(ImportError::Malformed(format!(
            "price '{raw}' has more than two fraction digits"
        )));
    }
    // Digits only on both sides; `u64::from_str` would wave through a
    // leading `+`.
    if !whole.bytes().all(|b| b.is_ascii_digit()) || !frac.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ImportError::Malformed(format!("invalid price '{raw}'")));
    }
    let whole_value: u64 = if whole.is_empty() {
        0
    } else {
        whole
            .parse()
            .map_err(|_| ImportError::Malformed(format!("invalid price '{raw}'")))?
    };
    let frac_value: u64 = if frac.is_empty() {
        0
    } else {
        let digits: u64 = frac
            .parse()
            .map_err(|_| ImportError::Malformed(format!("invalid price '{raw}'")))?;
        if frac.len() == 1 { digits * 10 } else { digits }
    };
    whole_value
        .checked_mul(100)
        .and_then(|cents| cents.checked_add(frac_value))
        .ok_or_else(|| ImportError::Malformed(format!("price '{raw}' out of range")))
}

fn apply_field(
    path: &[String],
    text: &str,
    record: &mut Option<RecordDraft>,
    row: &mut Option<PendingRow>,
) -> Result<(), ImportError> {
    let Some(field) = path.last() else {
        return Ok(());
    };
    let parent = path.iter().rev().nth(1);

    if parent.is_some_and(|p| p == "header") {
        let Some(rec) = record.as_mut() else {
            return Err(ImportError::Malformed(
                "header field outside a record".into(),
            ));
        };
        // Unknown header fields are carried by real exports; only the
        // mapped ones matter here.
        match field.as_str() {
            "swd" => rec.swd = text.to_string(),
            "descrOperLang" => rec.description = text.to_string(),
            "salesprice" => rec.sales_price = Some(parse_price_cents(text)?),
            _ => {}
        }
    } else if parent.is_some_and(|p| p == "row") {
        let Some(pending) = row.as_mut() else {
            return Err(ImportError::Malformed("row field outside a row".into()));
        };
        match field.as_str() {
            "productListElem" => pending.elem = Some(text.to_string()),
            "elemQty" => {
                pending.qty = Some(text.parse().map_err(|_| {
                    ImportError::Malformed(format!("invalid quantity '{text}'"))
                })?);
            }
            _ => {}
        }
    }
    Ok(())
}

fn capture_attrs(e: &BytesStart<'_>, into: &mut Vec<(String, String)>) {
    for attr in e.attributes().flatten() {
        let key = std::str::from_utf8(attr.key.as_ref())
            .unwrap_or("")
            .to_string();
        let value = std::str::from_utf8(&attr.value).unwrap_or("").to_string();
        into.push((key, value));
    }
}

fn field_name(e: &BytesStart<'_>) -> Option<String> {
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() == b"name" {
            return std::str::from_utf8(&attr.value).ok().map(String::from);
        }
    }
    None
}

fn parse_records(xml: &str) -> Result<(Vec<(String, String)>, Vec<RecordDraft>), ImportError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut path: Vec<String> = Vec::new();
    let mut recordset_attrs: Vec<(String, String)> = Vec::new();
    let mut records: Vec<RecordDraft> = Vec::new();
    let mut record: Option<RecordDraft> = None;
    let mut row: Option<PendingRow> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                let name = std::str::from_utf8(e.name().as_ref())
                    .unwrap_or("")
                    .to_string();
                if path.is_empty() && name != "abasData" {
                    return Err(ImportError::Malformed(format!(
                        "unexpected root element '{name}'"
                    )));
                }
                match name.as_str() {
                    "recordSet" => capture_attrs(e, &mut recordset_attrs),
                    "record" => record = Some(RecordDraft::default()),
                    "row" => row = Some(PendingRow::default()),
                    _ => {}
                }
                // The host's exports spell fields as
                // `<field name="swd">..</field>`; track the element under its
                // field name so both shapes read the same.
                if name == "field" {
                    path.push(field_name(e).unwrap_or(name));
                } else {
                    path.push(name);
                }
            }
            Ok(Event::Empty(ref e)) => {
                let name = std::str::from_utf8(e.name().as_ref())
                    .unwrap_or("")
                    .to_string();
                if path.is_empty() && name != "abasData" {
                    return Err(ImportError::Malformed(format!(
                        "unexpected root element '{name}'"
                    )));
                }
                // A self-closing element is its own start and end.
                match name.as_str() {
                    "recordSet" => capture_attrs(e, &mut recordset_attrs),
                    "record" => {
                        return Err(ImportError::Malformed("record has no swd".into()));
                    }
                    "row" => {
                        return Err(ImportError::Malformed(
                            "row needs productListElem and elemQty".into(),
                        ));
                    }
                    _ => {}
                }
            }
            Ok(Event::Text(ref e)) => {
                let text = e.unescape().unwrap_or_default().to_string();
                if !text.is_empty() {
                    apply_field(&path, &text, &mut record, &mut row)?;
                }
            }
            Ok(Event::End(_)) => {
                let ended = path.pop().unwrap_or_default();
                match ended.as_str() {
                    "row" => {
                        let pending = row.take().ok_or_else(|| {
                            ImportError::Malformed("row end without start".into())
                        })?;
                        let (Some(elem), Some(qty)) = (pending.elem, pending.qty) else {
                            return Err(ImportError::Malformed(
                                "row needs productListElem and elemQty".into(),
                            ));
                        };
                        let Some(rec) = record.as_mut() else {
                            return Err(ImportError::Malformed("row outside a record".into()));
                        };
                        rec.rows.push(ProductListRow {
                            component_swd: elem,
                            quantity: qty,
                        });
                    }
                    "record" => {
                        let rec = record.take().ok_or_else(|| {
                            ImportError::Malformed("record end without start".into())
                        })?;
                        if rec.swd.is_empty() {
                            return Err(ImportError::Malformed("record has no swd".into()));
                        }
                        records.push(rec);
                    }
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ImportError::Xml(e)),
            _ => {}
        }
    }

    Ok((recordset_attrs, records))
}

/// Import products from an XML string into `parts`, all or nothing.
///
/// Every record is parsed and checked before the first write. A search word
/// already on file, or appearing twice in the file, rolls the run back and
/// nothing is created.
pub fn import_products(xml: &str, parts: &dyn PartStore) -> Result<ImportReport, ImportError> {
    let (recordset_attrs, drafts) = parse_records(xml)?;
    let mut report = ImportReport::new(recordset_attrs);
    report.log(format!("read {} record(s)", drafts.len()));

    let mut seen = std::collections::HashSet::new();
    for draft in &drafts {
        if parts.find_product_by_swd(&draft.swd)?.is_some() {
            report.roll_back(format!("product '{}' already exists", draft.swd));
            return Ok(report);
        }
        if !seen.insert(draft.swd.clone()) {
            report.roll_back(format!("file contains '{}' twice", draft.swd));
            return Ok(report);
        }
    }

    for draft in drafts {
        let product = parts.create_product(NewProduct {
            swd: draft.swd,
            description: draft.description,
            procurement: ProcurementMode::InhouseProduction,
            sales_price: draft.sales_price,
            product_list: draft.rows,
        })?;
        report.log(format!(
            "created product '{}' with number {}",
            product.swd(),
            product.idno()
        ));
        report.created.push(CreatedProduct {
            swd: product.swd().to_string(),
            idno: product.idno().to_string(),
        });
    }
    report.log(format!("committed {} product(s)", report.created.len()));
    Ok(report)
}

/// Read an XML file from disk and import it.
pub fn import_products_from_path(
    path: &Path,
    parts: &dyn PartStore,
) -> Result<ImportReport, ImportError> {
    let xml = std::fs::read_to_string(path)?;
    import_products(&xml, parts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryParts;
    use std::io::Write as _;

    const TWO_RECORDS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<abasData>
  <recordSet action="new" database="part">
    <record>
      <header>
        <swd>CHAIR</swd>
        <descrOperLang>Conference chair</descrOperLang>
        <salesprice>199.99</salesprice>
      </header>
      <row>
        <productListElem>LEG</productListElem>
        <elemQty>4</elemQty>
      </row>
      <row>
        <productListElem>SEAT</productListElem>
        <elemQty>1</elemQty>
      </row>
    </record>
    <record>
      <header>
        <swd>TABLE</swd>
        <descrOperLang>Meeting table</descrOperLang>
        <salesprice>450</salesprice>
      </header>
    </record>
  </recordSet>
</abasData>"#;

    #[test]
    fn imports_records_with_product_lists() {
        let parts = InMemoryParts::new();
        let report = import_products(TWO_RECORDS, &parts).unwrap();

        assert!(report.is_committed());
        assert_eq!(report.created.len(), 2);
        assert_eq!(report.created[0].swd, "CHAIR");
        assert!(
            report
                .recordset_attrs
                .contains(&("action".to_string(), "new".to_string()))
        );

        let chair = parts.find_product_by_swd("CHAIR").unwrap().unwrap();
        assert_eq!(chair.description(), "Conference chair");
        assert_eq!(chair.sales_price(), Some(19999));
        assert_eq!(chair.product_list().len(), 2);
        assert_eq!(chair.product_list()[0].component_swd, "LEG");
        assert_eq!(chair.product_list()[0].quantity, 4);

        let table = parts.find_product_by_swd("TABLE").unwrap().unwrap();
        assert_eq!(table.sales_price(), Some(45000));
        assert!(table.product_list().is_empty());
    }

    #[test]
    fn reads_the_field_element_export_shape() {
        let xml = r#"<abasData>
  <recordSet source="ajo" type="import">
    <record>
      <header>
        <field name="swd">BENCH</field>
        <field name="descrOperLang">Workshop bench</field>
        <field name="salesprice">89.50</field>
      </header>
      <row>
        <field name="productListElem">TOP</field>
        <field name="elemQty">2</field>
      </row>
    </record>
  </recordSet>
</abasData>"#;
        let parts = InMemoryParts::new();
        let report = import_products(xml, &parts).unwrap();

        assert!(report.is_committed());
        assert!(
            report
                .recordset_attrs
                .contains(&("source".to_string(), "ajo".to_string()))
        );

        let bench = parts.find_product_by_swd("BENCH").unwrap().unwrap();
        assert_eq!(bench.description(), "Workshop bench");
        assert_eq!(bench.sales_price(), Some(8950));
        assert_eq!(bench.product_list().len(), 1);
        assert_eq!(bench.product_list()[0].component_swd, "TOP");
        assert_eq!(bench.product_list()[0].quantity, 2);
    }

    #[test]
    fn duplicate_on_file_rolls_the_whole_run_back() {
        let parts = InMemoryParts::new();
        parts
            .create_product(kontor_parts::NewProduct::named("TABLE", "already here"))
            .unwrap();

        let report = import_products(TWO_RECORDS, &parts).unwrap();

        assert_eq!(
            report.outcome,
            ImportOutcome::RolledBack {
                reason: "product 'TABLE' already exists".into()
            }
        );
        assert!(report.created.is_empty());
        assert_eq!(parts.count().unwrap(), 1);
        assert!(parts.find_product_by_swd("CHAIR").unwrap().is_none());
    }

    #[test]
    fn duplicate_inside_the_file_rolls_back() {
        let xml = r#"<abasData><recordSet>
            <record><header><swd>CHAIR</swd></header></record>
            <record><header><swd>CHAIR</swd></header></record>
        </recordSet></abasData>"#;
        let parts = InMemoryParts::new();
        let report = import_products(xml, &parts).unwrap();
        assert!(!report.is_committed());
        assert_eq!(parts.count().unwrap(), 0);
    }

    #[test]
    fn rejects_a_foreign_root_element() {
        let parts = InMemoryParts::new();
        let err = import_products("<invoiceData></invoiceData>", &parts).unwrap_err();
        assert!(matches!(err, ImportError::Malformed(msg) if msg.contains("root")));

        let err = import_products("<invoiceData/>", &parts).unwrap_err();
        assert!(matches!(err, ImportError::Malformed(msg) if msg.contains("root")));
    }

    #[test]
    fn handles_self_closing_elements() {
        let parts = InMemoryParts::new();

        let report = import_products("<abasData/>", &parts).unwrap();
        assert!(report.is_committed());
        assert!(report.created.is_empty());

        let err = import_products(
            "<abasData><recordSet><record/></recordSet></abasData>",
            &parts,
        )
        .unwrap_err();
        assert!(matches!(err, ImportError::Malformed(msg) if msg.contains("swd")));

        let xml = r#"<abasData><recordSet><record>
            <header><swd>CHAIR</swd></header>
            <row/>
        </record></recordSet></abasData>"#;
        assert!(import_products(xml, &parts).is_err());
        assert_eq!(parts.count().unwrap(), 0);
    }

    #[test]
    fn rejects_records_without_a_search_word() {
        let xml = "<abasData><recordSet><record><header></header></record></recordSet></abasData>";
        let parts = InMemoryParts::new();
        let err = import_products(xml, &parts).unwrap_err();
        assert!(matches!(err, ImportError::Malformed(msg) if msg.contains("swd")));
    }

    #[test]
    fn rejects_malformed_quantities() {
        let xml = r#"<abasData><recordSet><record>
            <header><swd>CHAIR</swd></header>
            <row><productListElem>LEG</productListElem><elemQty>four</elemQty></row>
        </record></recordSet></abasData>"#;
        let parts = InMemoryParts::new();
        assert!(import_products(xml, &parts).is_err());
        assert_eq!(parts.count().unwrap(), 0);
    }

    #[test]
    fn price_parsing_handles_the_usual_shapes() {
        assert_eq!(parse_price_cents("199.99").unwrap(), 19999);
        assert_eq!(parse_price_cents("12").unwrap(), 1200);
        assert_eq!(parse_price_cents("0.5").unwrap(), 50);
        assert_eq!(parse_price_cents(" 7.00 ").unwrap(), 700);
        assert!(parse_price_cents("1.234").is_err());
        assert!(parse_price_cents("abc").is_err());
        assert!(parse_price_cents("").is_err());
        assert!(parse_price_cents("-3").is_err());
        assert!(parse_price_cents("+3").is_err());
        assert!(parse_price_cents("1.+5").is_err());
    }

    #[test]
    fn imports_from_a_file_on_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(TWO_RECORDS.as_bytes()).unwrap();

        let parts = InMemoryParts::new();
        let report = import_products_from_path(file.path(), &parts).unwrap();
        assert!(report.is_committed());
        assert_eq!(parts.count().unwrap(), 2);

        let mut sink = Vec::new();
        report.write_log_to(&mut sink).unwrap();
        let log = String::from_utf8(sink).unwrap();
        assert!(log.contains("created product 'CHAIR'"));
    }
}
