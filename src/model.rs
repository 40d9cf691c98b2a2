// 📦 Row types for every table that flows through the pipeline
//
// Source rows (Customer, Product, Sale, Discount, Employee) are read once and
// never changed. ReconciledRecord is the join output, UnifiedRecord the
// transformed output, and the *Summary types are the three roll-ups.

use chrono::{Datelike, NaiveDate};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// SOURCE ROWS
// ============================================================================

/// Customer row from the SQLite store. Only `customer_id` is named; every
/// other column is kept as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub customer_id: Option<i64>,

    #[serde(default)]
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub product_id: i64,
    pub product_name: String,

    /// The products file may not carry prices at all
    #[serde(default)]
    pub unit_price: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    pub sale_id: i64,
    pub product_id: i64,

    #[serde(default)]
    pub employee_id: Option<i64>,

    pub quantity: i64,

    /// Free-form text, validated by the transformer
    pub sale_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Discount {
    pub product_id: i64,
    pub discount_percent: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    #[serde(deserialize_with = "deserialize_flexible_id")]
    pub id: i64,
    pub employee_name: String,
}

/// Employee APIs are inconsistent about ids: accept `7` and `"7"`.
fn deserialize_flexible_id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(i64),
        Text(String),
    }

    match RawId::deserialize(deserializer)? {
        RawId::Number(n) => Ok(n),
        RawId::Text(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| de::Error::custom(format!("invalid employee id: {}", s))),
    }
}

/// The five input tables, each possibly empty.
#[derive(Debug, Clone, Default)]
pub struct SourceTables {
    pub customers: Vec<Customer>,
    pub products: Vec<Product>,
    pub sales: Vec<Sale>,
    pub discounts: Vec<Discount>,
    pub employees: Vec<Employee>,
}

// ============================================================================
// RECONCILED / UNIFIED RECORDS
// ============================================================================

/// One sale after the three left joins. Right-side fields are `None` when
/// nothing matched; defaults are resolved later by the transformer.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconciledRecord {
    pub sale: Sale,
    pub product_name: Option<String>,
    pub unit_price: Option<f64>,
    pub discount_percent: Option<f64>,
    pub employee_name: Option<String>,
}

/// Row of the "full" dataset. Column order here is the column order of
/// `full_sales_data.csv`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnifiedRecord {
    pub sale_id: i64,
    pub product_id: i64,
    pub employee_id: Option<i64>,
    pub quantity: i64,
    pub sale_date: NaiveDate,
    pub product_name: Option<String>,
    pub unit_price: f64,
    pub discount_percent: f64,
    pub employee_name: Option<String>,
    pub total_price: f64,
    pub discounted_price: f64,
    pub month: Month,
}

// ============================================================================
// MONTH BUCKET
// ============================================================================

/// Calendar month (year + month). Orders chronologically and renders as
/// `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Month {
    pub year: i32,
    pub month: u32,
}

impl Month {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if (1..=12).contains(&month) {
            Some(Month { year, month })
        } else {
            None
        }
    }
}

impl From<NaiveDate> for Month {
    fn from(date: NaiveDate) -> Self {
        Month {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for Month {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| format!("invalid month: {}", s))?;
        let year = year.parse::<i32>().map_err(|_| format!("invalid year in month: {}", s))?;
        let month = month.parse::<u32>().map_err(|_| format!("invalid month: {}", s))?;
        Month::new(year, month).ok_or_else(|| format!("month out of range: {}", s))
    }
}

impl Serialize for Month {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Month {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

// ============================================================================
// SUMMARIES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSalesSummary {
    pub product_name: Option<String>,
    pub total_quantity: i64,
    pub total_sales: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeSalesSummary {
    pub employee_name: Option<String>,
    pub total_quantity: i64,
    pub total_sales: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySalesSummary {
    pub month: Month,
    pub total_sales: f64,
}

/// The three roll-ups produced from one set of unified records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SalesReport {
    pub by_product: Vec<ProductSalesSummary>,
    pub by_employee: Vec<EmployeeSalesSummary>,
    pub by_month: Vec<MonthlySalesSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_display_and_parse() {
        let month = Month::from(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        assert_eq!(month.to_string(), "2024-01");
        assert_eq!("2024-01".parse::<Month>().unwrap(), month);
        assert!("2024-13".parse::<Month>().is_err());
        assert!("January".parse::<Month>().is_err());
    }

    #[test]
    fn test_month_orders_chronologically() {
        let mut months = vec![
            Month::new(2024, 2).unwrap(),
            Month::new(2023, 12).unwrap(),
            Month::new(2024, 1).unwrap(),
        ];
        months.sort();

        let rendered: Vec<String> = months.iter().map(|m| m.to_string()).collect();
        assert_eq!(rendered, vec!["2023-12", "2024-01", "2024-02"]);
    }

    #[test]
    fn test_month_serializes_as_string() {
        let summary = MonthlySalesSummary {
            month: Month::new(2024, 3).unwrap(),
            total_sales: 12.5,
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["month"], "2024-03");
    }

    #[test]
    fn test_employee_id_accepts_number_or_string() {
        let from_number: Employee =
            serde_json::from_str(r#"{"id": 7, "employee_name": "Tiger Nixon"}"#).unwrap();
        let from_text: Employee =
            serde_json::from_str(r#"{"id": "7", "employee_name": "Tiger Nixon"}"#).unwrap();

        assert_eq!(from_number, from_text);
        assert!(serde_json::from_str::<Employee>(r#"{"id": "x", "employee_name": "A"}"#).is_err());
    }
}
