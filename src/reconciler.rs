// 🔗 Reconciler - merge Sales with Products, Discounts and Employees
//
// Three chained left-outer joins driven by Sales:
//   sales ⟕ products  ON product_id
//         ⟕ discounts ON product_id
//         ⟕ employees ON employee_id = id
//
// No join ever drops a sale. Every right-side match yields one output row,
// so duplicate right keys multiply rows (duplicate discounts are not
// de-duplicated).

use crate::model::{Discount, Employee, Product, ReconciledRecord, Sale};
use std::collections::HashMap;
use std::hash::Hash;
use tracing::{debug, info};

/// Employee name used on every record when the employee source is empty.
pub const UNKNOWN_EMPLOYEE: &str = "Unknown";

impl ReconciledRecord {
    /// A sale with no right-side data attached yet.
    pub fn from_sale(sale: Sale) -> Self {
        ReconciledRecord {
            sale,
            product_name: None,
            unit_price: None,
            discount_percent: None,
            employee_name: None,
        }
    }
}

// ============================================================================
// RECONCILE
// ============================================================================

pub fn reconcile(
    sales: &[Sale],
    products: &[Product],
    discounts: &[Discount],
    employees: &[Employee],
) -> Vec<ReconciledRecord> {
    info!("Merging data...");

    let records: Vec<ReconciledRecord> =
        sales.iter().cloned().map(ReconciledRecord::from_sale).collect();

    let records = join_products(records, products);
    let records = join_discounts(records, discounts);
    let records = if employees.is_empty() {
        debug!("Employee source empty, using '{}' for every record", UNKNOWN_EMPLOYEE);
        assign_unknown_employee(records)
    } else {
        join_employees(records, employees)
    };

    info!(
        sales = sales.len(),
        records = records.len(),
        "Merged sales with products, discounts and employees"
    );

    records
}

pub fn join_products(records: Vec<ReconciledRecord>, products: &[Product]) -> Vec<ReconciledRecord> {
    left_join(
        records,
        products,
        |record| Some(record.sale.product_id),
        |product| product.product_id,
        |mut record, product| {
            record.product_name = Some(product.product_name.clone());
            record.unit_price = product.unit_price;
            record
        },
    )
}

pub fn join_discounts(
    records: Vec<ReconciledRecord>,
    discounts: &[Discount],
) -> Vec<ReconciledRecord> {
    left_join(
        records,
        discounts,
        |record| Some(record.sale.product_id),
        |discount| discount.product_id,
        |mut record, discount| {
            record.discount_percent = discount.discount_percent;
            record
        },
    )
}

/// Unmatched employee ids keep `employee_name = None`; only an empty
/// employee source produces the "Unknown" sentinel.
pub fn join_employees(
    records: Vec<ReconciledRecord>,
    employees: &[Employee],
) -> Vec<ReconciledRecord> {
    left_join(
        records,
        employees,
        |record| record.sale.employee_id,
        |employee| employee.id,
        |mut record, employee| {
            record.employee_name = Some(employee.employee_name.clone());
            record
        },
    )
}

fn assign_unknown_employee(records: Vec<ReconciledRecord>) -> Vec<ReconciledRecord> {
    records
        .into_iter()
        .map(|mut record| {
            record.employee_name = Some(UNKNOWN_EMPLOYEE.to_string());
            record
        })
        .collect()
}

// ============================================================================
// JOIN HELPER
// ============================================================================

/// Left-outer join of `records` against `right`. Output keeps the order of
/// `records`, then the order of matches in `right`. A `None` left key never
/// matches.
fn left_join<R, K>(
    records: Vec<ReconciledRecord>,
    right: &[R],
    left_key: impl Fn(&ReconciledRecord) -> Option<K>,
    right_key: impl Fn(&R) -> K,
    merge: impl Fn(ReconciledRecord, &R) -> ReconciledRecord,
) -> Vec<ReconciledRecord>
where
    K: Eq + Hash,
{
    let mut index: HashMap<K, Vec<&R>> = HashMap::new();
    for row in right {
        index.entry(right_key(row)).or_default().push(row);
    }

    let mut joined = Vec::with_capacity(records.len());
    for record in records {
        match left_key(&record).and_then(|key| index.get(&key)) {
            Some(matches) => {
                for row in matches {
                    joined.push(merge(record.clone(), row));
                }
            }
            None => joined.push(record),
        }
    }

    joined
}

// ============================================================================
// TESTS
// ============================================================================
