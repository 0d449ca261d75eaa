//! # Invoice Record Model
//!
//! The input representation for the renderer. A TOML document is parsed into
//! a raw [`toml::Table`], and [`InvoiceRecord::from_table`] extracts the typed
//! sections from it, filling every optional field with its default.
//!
//! Only presence is validated here. The four required sections (`[sender]`,
//! `[client]`, `[invoice]`, `[[items]]`) must exist; numeric fields are kept
//! in their raw form and only converted when the financial calculator needs
//! them, so a malformed quantity surfaces as a numeric error rather than a
//! validation error.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use rust_decimal::Decimal;
use toml::{Table, Value};

use crate::error::InvoiceError;

pub const DEFAULT_CURRENCY_SYMBOL: &str = "$";
const NOT_AVAILABLE: &str = "N/A";

/// Read and parse an input document.
pub fn load_table(path: &Path) -> Result<Table, InvoiceError> {
    let content = fs::read_to_string(path).map_err(|source| InvoiceError::InputNotFound {
        path: path.to_path_buf(),
        source,
    })?;
    content
        .parse::<Table>()
        .map_err(|source| InvoiceError::InputParse {
            path: path.to_path_buf(),
            source,
        })
}

/// The output file name used when none is given:
/// `Invoice-<ClientName>-<IssueDate>.pdf` in the current directory.
///
/// Works on the raw mapping so it can run before validation.
pub fn default_output_path(table: &Table) -> PathBuf {
    let field = |section: &str, key: &str| {
        table
            .get(section)
            .and_then(Value::as_table)
            .and_then(|t| t.get(key))
            .and_then(value_text)
    };
    let client = field("client", "name")
        .unwrap_or_else(|| "Client".to_string())
        .replace(' ', "_")
        .replace(',', "");
    let date = field("invoice", "issue_date")
        .unwrap_or_else(|| "date".to_string())
        .replace(' ', "_");
    PathBuf::from(format!("Invoice-{}-{}.pdf", client, date))
}

/// A numeric field as written in the input, converted on demand.
#[derive(Debug, Clone, PartialEq)]
pub enum RawNumber {
    Integer(i64),
    Float(f64),
    Text(String),
    /// Any other TOML value (boolean, array, table, datetime).
    Invalid(String),
}

impl Default for RawNumber {
    fn default() -> Self {
        RawNumber::Integer(0)
    }
}

impl RawNumber {
    fn from_value(value: Option<&Value>) -> Self {
        match value {
            None => RawNumber::default(),
            Some(Value::Integer(i)) => RawNumber::Integer(*i),
            Some(Value::Float(f)) => RawNumber::Float(*f),
            Some(Value::String(s)) => RawNumber::Text(s.clone()),
            Some(other) => RawNumber::Invalid(other.to_string()),
        }
    }

    /// Convert to an exact decimal. Floats go through their shortest
    /// round-trip text form, so `9.99` becomes exactly `9.99` and `2.0`
    /// keeps its one fractional digit.
    pub fn to_decimal(&self, field: &str) -> Result<Decimal, InvoiceError> {
        match self {
            RawNumber::Integer(i) => Ok(Decimal::from(*i)),
            RawNumber::Float(f) => {
                // Debug formatting always carries a fraction or an exponent.
                let text = format!("{:?}", f);
                if !f.is_finite() {
                    return Err(InvoiceError::numeric(field, text));
                }
                Decimal::from_str(&text)
                    .or_else(|_| Decimal::from_scientific(&text))
                    .map_err(|_| InvoiceError::numeric(field, text))
            }
            RawNumber::Text(s) => {
                let trimmed = s.trim();
                Decimal::from_str(trimmed)
                    .or_else(|_| Decimal::from_scientific(trimmed))
                    .map_err(|_| InvoiceError::numeric(field, format!("{:?}", s)))
            }
            RawNumber::Invalid(raw) => Err(InvoiceError::numeric(field, raw.clone())),
        }
    }
}

impl From<i64> for RawNumber {
    fn from(v: i64) -> Self {
        RawNumber::Integer(v)
    }
}

impl From<i32> for RawNumber {
    fn from(v: i32) -> Self {
        RawNumber::Integer(v.into())
    }
}

impl From<f64> for RawNumber {
    fn from(v: f64) -> Self {
        RawNumber::Float(v)
    }
}

impl From<&str> for RawNumber {
    fn from(v: &str) -> Self {
        RawNumber::Text(v.to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sender {
    pub name: Option<String>,
    pub address: Vec<String>,
}

impl Sender {
    /// Name as shown in the page header.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Sender Name Missing")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Client {
    pub name: String,
    pub address: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceMeta {
    pub number: String,
    pub issue_date: String,
    pub due_date: String,
    pub currency_symbol: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    pub description: String,
    pub quantity: RawNumber,
    pub rate: RawNumber,
}

impl LineItem {
    pub fn new(
        description: impl Into<String>,
        quantity: impl Into<RawNumber>,
        rate: impl Into<RawNumber>,
    ) -> Self {
        Self {
            description: description.into(),
            quantity: quantity.into(),
            rate: rate.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FinancialParams {
    /// Percentage, e.g. `8.5` for 8.5%.
    pub tax_rate: RawNumber,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Terms {
    pub notes: String,
}

/// A complete, validated invoice ready for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceRecord {
    pub sender: Sender,
    pub client: Client,
    pub invoice: InvoiceMeta,
    pub items: Vec<LineItem>,
    pub financials: FinancialParams,
    pub terms: Terms,
}

impl InvoiceRecord {
    /// Extract the typed record from a parsed input document.
    pub fn from_table(table: &Table) -> Result<Self, InvoiceError> {
        let sender = required_section(table, "sender")?;
        let client = required_section(table, "client")?;
        let invoice = required_section(table, "invoice")?;
        let items = match table.get("items") {
            Some(Value::Array(entries)) => entries,
            _ => return Err(missing_section("[[items]]")),
        };

        let empty = Table::new();
        let financials = optional_section(table, "financials").unwrap_or(&empty);
        let terms = optional_section(table, "terms").unwrap_or(&empty);

        Ok(Self {
            sender: Sender {
                name: text_field(sender, "name"),
                address: text_field(sender, "address")
                    .map(|a| split_lines(&a))
                    .unwrap_or_default(),
            },
            client: Client {
                name: text_or(client, "name", "Client Name Missing"),
                address: split_lines(&text_or(client, "address", "Client Address Missing")),
            },
            invoice: InvoiceMeta {
                number: text_or(invoice, "number", NOT_AVAILABLE),
                issue_date: text_or(invoice, "issue_date", NOT_AVAILABLE),
                due_date: text_or(invoice, "due_date", NOT_AVAILABLE),
                currency_symbol: text_or(invoice, "currency_symbol", DEFAULT_CURRENCY_SYMBOL),
            },
            items: items
                .iter()
                .map(|entry| {
                    let item = entry.as_table().unwrap_or(&empty);
                    LineItem {
                        description: text_or(item, "description", NOT_AVAILABLE),
                        quantity: RawNumber::from_value(item.get("quantity")),
                        rate: RawNumber::from_value(item.get("rate")),
                    }
                })
                .collect(),
            financials: FinancialParams {
                tax_rate: RawNumber::from_value(financials.get("tax_rate")),
            },
            terms: Terms {
                notes: text_or(terms, "notes", ""),
            },
        })
    }

    /// Document title: `Invoice #<number> from <sender name>`.
    pub fn title(&self) -> String {
        format!(
            "Invoice #{} from {}",
            self.invoice.number,
            self.sender.name.as_deref().unwrap_or(NOT_AVAILABLE)
        )
    }
}

fn missing_section(name: &str) -> InvoiceError {
    InvoiceError::Validation(format!(
        "Error: TOML file is missing the required section {}. \
         An invoice needs [sender], [client], [invoice] and [[items]].",
        name
    ))
}

fn required_section<'a>(table: &'a Table, key: &str) -> Result<&'a Table, InvoiceError> {
    match table.get(key).and_then(Value::as_table) {
        Some(section) if !section.is_empty() => Ok(section),
        _ => Err(missing_section(&format!("[{}]", key))),
    }
}

fn optional_section<'a>(table: &'a Table, key: &str) -> Option<&'a Table> {
    table.get(key).and_then(Value::as_table)
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Integer(_) | Value::Float(_) | Value::Boolean(_) | Value::Datetime(_) => {
            Some(value.to_string())
        }
        Value::Array(_) | Value::Table(_) => None,
    }
}

fn text_field(table: &Table, key: &str) -> Option<String> {
    table.get(key).and_then(value_text)
}

fn text_or(table: &Table, key: &str, default: &str) -> String {
    text_field(table, key).unwrap_or_else(|| default.to_string())
}

/// Trim the block, split on line breaks, trim each line.
fn split_lines(text: &str) -> Vec<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    trimmed.lines().map(|l| l.trim().to_string()).collect()
}
