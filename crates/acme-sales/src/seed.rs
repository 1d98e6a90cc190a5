//! Deterministic demo fixtures.
//!
//! The demonstration sequence refers to rows by hardcoded id (customer 3,
//! customer 10, employee 20, furniture 30 and 50, order 5). Seeding a fresh
//! database makes those ids exist.

use acme_db::{Session, StoreError};
use acme_types::{Entity, NewCustomer, NewEmployee, NewFurniture, NewOrder, NewOrderDetail};
use chrono::{Duration, NaiveDate, NaiveDateTime};

pub const EMPLOYEE_COUNT: usize = 20;
pub const FURNITURE_COUNT: usize = 50;
pub const CUSTOMER_COUNT: usize = 12;
pub const ORDERS_PER_CUSTOMER: usize = 2;

const POSITIONS: &[&str] = &["Sales Manager", "Consultant", "Senior Consultant", "Courier"];
const EDUCATION: &[&str] = &["Higher", "Secondary vocational", "Secondary"];
const FURNITURE_KINDS: &[&str] = &["Chair", "Table", "Wardrobe", "Sofa", "Shelf"];

/// Row counts written by [`seed_demo_data`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub employees: usize,
    pub furniture: usize,
    pub customers: usize,
    pub orders: usize,
    pub order_details: usize,
}

/// Populates an empty database with demo rows.
///
/// Returns `Ok(None)` and writes nothing if any employee, furniture item or
/// customer already exists. Ids are never reused, so a partially emptied
/// database is left alone rather than seeded at shifted ids.
///
/// Reference rows (employees, furniture, customers) commit first; orders are
/// then built from the ids that commit generated and commit second.
pub fn seed_demo_data(session: &mut Session) -> Result<Option<SeedSummary>, StoreError> {
    let (employees, furniture, customers): (i64, i64, i64) = session.connection().query_row(
        "SELECT (SELECT COUNT(*) FROM employees),
                (SELECT COUNT(*) FROM furniture),
                (SELECT COUNT(*) FROM customers)",
        [],
        |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
    )?;
    if employees + furniture + customers > 0 {
        tracing::debug!(
            employees,
            furniture,
            customers,
            "database already populated, skipping seed"
        );
        return Ok(None);
    }

    for n in 1..=EMPLOYEE_COUNT {
        session.add_employee(NewEmployee {
            last_name: format!("Employee{n}"),
            first_name: format!("Name{n}"),
            middle_name: format!("Patronymic{n}"),
            position: POSITIONS[n % POSITIONS.len()].to_string(),
            education: EDUCATION[n % EDUCATION.len()].to_string(),
        });
    }
    for n in 1..=FURNITURE_COUNT {
        session.add_furniture(NewFurniture {
            name: format!("{} {n}", FURNITURE_KINDS[n % FURNITURE_KINDS.len()]),
            price: (100 + n * 10) as f64,
            weight: (5 + n % 7 * 3) as f64,
        });
    }
    for n in 1..=CUSTOMER_COUNT {
        session.add_customer(NewCustomer {
            company_name: format!("Company{n}"),
            representative_last_name: format!("Representative{n}"),
            representative_first_name: format!("First{n}"),
            representative_middle_name: format!("Middle{n}"),
            phone_number: format!("555-01{n:02}"),
            address: format!("{n} Industrial Ave"),
        });
    }
    let references = session.commit()?;

    let employees: Vec<i64> = references.ids(Entity::Employee).collect();
    let furniture: Vec<i64> = references.ids(Entity::Furniture).collect();
    let customers: Vec<i64> = references.ids(Entity::Customer).collect();

    let mut k = 0usize;
    for &customer_id in &customers {
        for _ in 0..ORDERS_PER_CUSTOMER {
            k += 1;
            let order = NewOrder {
                order_date: order_date(k),
                special_discount: [0.0, 0.05, 0.1][k % 3],
                is_completed: k % 2 == 0,
                customer_id,
                responsible_employee_id: employees[(k - 1) % employees.len()],
            };
            let details = vec![
                NewOrderDetail {
                    furniture_id: furniture[(k * 7) % furniture.len()],
                    quantity: (k % 3 + 1) as i64,
                },
                NewOrderDetail {
                    furniture_id: furniture[(k * 13) % furniture.len()],
                    quantity: 1,
                },
            ];
            session.add_order(order, details);
        }
    }
    let orders = session.commit()?;

    let summary = SeedSummary {
        employees: employees.len(),
        furniture: furniture.len(),
        customers: customers.len(),
        orders: orders.ids(Entity::Order).count(),
        order_details: orders.ids(Entity::OrderDetail).count(),
    };
    tracing::info!(?summary, "seeded demo data");
    Ok(Some(summary))
}

/// The k-th order is placed `2k` days after 2022-05-01, at noon.
fn order_date(k: usize) -> NaiveDateTime {
    let start = NaiveDate::from_ymd_opt(2022, 5, 1)
        .and_then(|d| d.and_hms_opt(12, 0, 0))
        .unwrap_or_default();
    start + Duration::days(2 * k as i64)
}
