// 📥 Source adapters - SQLite, CSV, flat file and HTTP readers
//
// Every adapter returns a SourceLoad: either the full table or a typed
// reason why the source was unavailable. A failed source never stops the
// pipeline; `into_table` logs the reason and substitutes an empty table.

use crate::error::SourceError;
use crate::model::{Customer, Discount, Employee, Product, Sale};
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

// ============================================================================
// CORE TYPES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Customers,
    Products,
    Sales,
    Discounts,
    Employees,
}

impl SourceKind {
    pub fn name(&self) -> &str {
        match self {
            SourceKind::Customers => "customers",
            SourceKind::Products => "products",
            SourceKind::Sales => "sales",
            SourceKind::Discounts => "discounts",
            SourceKind::Employees => "employees",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of reading one source.
#[derive(Debug)]
pub enum SourceLoad<T> {
    Loaded(Vec<T>),
    Unavailable { source: SourceKind, reason: SourceError },
}

impl<T> SourceLoad<T> {
    fn from_result(source: SourceKind, result: Result<Vec<T>, SourceError>) -> Self {
        match result {
            Ok(rows) => {
                info!(source = %source, rows = rows.len(), "Loaded records");
                SourceLoad::Loaded(rows)
            }
            Err(reason) => SourceLoad::Unavailable { source, reason },
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, SourceLoad::Loaded(_))
    }

    /// The loaded rows, or an empty table (with a warning) on failure.
    pub fn into_table(self) -> Vec<T> {
        match self {
            SourceLoad::Loaded(rows) => rows,
            SourceLoad::Unavailable { source, reason } => {
                warn!(source = %source, reason = %reason, "Source unavailable, using empty table");
                Vec::new()
            }
        }
    }
}

// ============================================================================
// SQLITE: CUSTOMERS
// ============================================================================

pub fn load_customers(sqlite_path: &Path) -> SourceLoad<Customer> {
    info!(path = %sqlite_path.display(), "Connecting to SQLite database...");
    SourceLoad::from_result(SourceKind::Customers, read_customers(sqlite_path))
}

fn read_customers(sqlite_path: &Path) -> Result<Vec<Customer>, SourceError> {
    // Read-only so a missing file is an error instead of a fresh empty database
    let conn = Connection::open_with_flags(sqlite_path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
    let mut stmt = conn.prepare("SELECT * FROM customers")?;
    let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

    let customers = stmt
        .query_map([], |row| {
            let mut customer = Customer {
                customer_id: None,
                attributes: BTreeMap::new(),
            };
            for (idx, name) in columns.iter().enumerate() {
                let value = sql_value_to_json(row.get_ref(idx)?);
                if name == "customer_id" {
                    customer.customer_id = value.as_i64();
                } else {
                    customer.attributes.insert(name.clone(), value);
                }
            }
            Ok(customer)
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(customers)
}

fn sql_value_to_json(value: ValueRef<'_>) -> serde_json::Value {
    match value {
        ValueRef::Null => serde_json::Value::Null,
        ValueRef::Integer(i) => serde_json::json!(i),
        ValueRef::Real(f) => serde_json::json!(f),
        ValueRef::Text(bytes) => serde_json::json!(String::from_utf8_lossy(bytes)),
        ValueRef::Blob(bytes) => serde_json::json!(bytes),
    }
}

// ============================================================================
// CSV: PRODUCTS, SALES
// ============================================================================

pub fn load_products(path: &Path) -> SourceLoad<Product> {
    info!(path = %path.display(), "Reading products CSV...");
    SourceLoad::from_result(SourceKind::Products, read_csv(path))
}

pub fn load_sales(path: &Path) -> SourceLoad<Sale> {
    info!(path = %path.display(), "Reading sales CSV...");
    SourceLoad::from_result(SourceKind::Sales, read_csv(path))
}

fn read_csv<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, SourceError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?;

    let rows = rdr.deserialize().collect::<Result<Vec<T>, _>>()?;
    Ok(rows)
}

// ============================================================================
// FLAT FILE: DISCOUNTS
// ============================================================================

/// Header-less file: `product_id,discount_percent`, the percent may be
/// missing on any row.
pub fn load_discounts(path: &Path) -> SourceLoad<Discount> {
    info!(path = %path.display(), "Reading flat file for discounts...");
    SourceLoad::from_result(SourceKind::Discounts, read_discounts(path))
}

fn read_discounts(path: &Path) -> Result<Vec<Discount>, SourceError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let mut discounts = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        let record = result?;
        match parse_discount_record(&record) {
            Some(discount) => discounts.push(discount),
            None => warn!(line = idx + 1, "Skipping discount row with invalid product id"),
        }
    }

    Ok(discounts)
}

/// `None` when the product id is missing or not an integer. An unreadable
/// percent becomes a null percent.
pub fn parse_discount_record(record: &csv::StringRecord) -> Option<Discount> {
    let product_id = record.get(0)?.parse::<i64>().ok()?;
    let discount_percent = record
        .get(1)
        .filter(|value| !value.is_empty())
        .and_then(|value| value.parse::<f64>().ok());

    Some(Discount {
        product_id,
        discount_percent,
    })
}

// ============================================================================
// HTTP: EMPLOYEES
// ============================================================================

#[derive(Debug, Deserialize)]
struct EmployeeEnvelope {
    data: Vec<Employee>,
}

pub fn fetch_employees(url: &str, timeout: Duration) -> SourceLoad<Employee> {
    info!(url, "Fetching employee data from API...");
    SourceLoad::from_result(SourceKind::Employees, request_employees(url, timeout))
}

fn request_employees(url: &str, timeout: Duration) -> Result<Vec<Employee>, SourceError> {
    let client = reqwest::blocking::Client::builder().timeout(timeout).build()?;
    let response = client.get(url).send()?;

    let status = response.status();
    if !status.is_success() {
        return Err(SourceError::HttpStatus(status.as_u16()));
    }

    let body = response.text()?;
    parse_employee_envelope(&body)
}

/// Decode `{"data": [{"id": .., "employee_name": ..}, ..]}`. Extra fields
/// on the envelope or the records are ignored.
pub fn parse_employee_envelope(body: &str) -> Result<Vec<Employee>, SourceError> {
    let envelope: EmployeeEnvelope = serde_json::from_str(body)?;
    Ok(envelope.data)
}

// ============================================================================
// TESTS
// ============================================================================
