//! Read operations over an open session.
//!
//! Every query returns an empty `Vec` when nothing matches. The only failure
//! mode besides a broken connection is a SQLite error, surfaced as
//! `StoreError::Database`.

use acme_db::rows::{map_row_to_customer, map_row_to_order, CUSTOMER_COLUMNS, ORDER_COLUMNS};
use acme_db::{Session, StoreError};
use acme_types::{
    Customer, CustomerAveragePrice, CustomerOrderDate, EmployeeTotalCostWeight, Order,
    OrderDetail,
};
use chrono::NaiveDateTime;
use rusqlite::{params, Row};

/// Lists every customer, ordered by id.
pub fn list_customers(session: &Session) -> Result<Vec<Customer>, StoreError> {
    let mut stmt = session.connection().prepare(&format!(
        "SELECT {CUSTOMER_COLUMNS} FROM customers ORDER BY customer_id ASC"
    ))?;

    let rows = stmt.query_map([], map_row_to_customer)?;
    let mut customers = Vec::new();
    for row in rows {
        customers.push(row?);
    }
    tracing::debug!(count = customers.len(), "listed customers");
    Ok(customers)
}

/// Customers whose company name starts with `prefix`.
///
/// The match is literal and case-sensitive: `%` and `_` in `prefix` have no
/// wildcard meaning, and comparison uses SQLite's default BINARY collation.
pub fn find_customers_by_name_prefix(
    session: &Session,
    prefix: &str,
) -> Result<Vec<Customer>, StoreError> {
    let mut stmt = session.connection().prepare(&format!(
        "SELECT {CUSTOMER_COLUMNS} FROM customers
         WHERE substr(company_name, 1, length(?1)) = ?1
         ORDER BY customer_id ASC"
    ))?;

    let rows = stmt.query_map([prefix], map_row_to_customer)?;
    let mut customers = Vec::new();
    for row in rows {
        customers.push(row?);
    }
    tracing::debug!(prefix, count = customers.len(), "filtered customers by prefix");
    Ok(customers)
}

/// Mean furniture price over all order lines, grouped by the customer that
/// owns each line's order.
///
/// Each line counts once regardless of its quantity. Customers without
/// order lines do not appear.
pub fn average_order_price_by_customer(
    session: &Session,
) -> Result<Vec<CustomerAveragePrice>, StoreError> {
    let mut stmt = session.connection().prepare(
        "SELECT o.customer_id, AVG(f.price)
         FROM order_details od
         JOIN furniture f ON f.furniture_id = od.furniture_id
         JOIN orders o ON o.order_id = od.order_id
         GROUP BY o.customer_id
         ORDER BY o.customer_id ASC",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok(CustomerAveragePrice {
            customer_id: row.get(0)?,
            average_price: row.get(1)?,
        })
    })?;
    let mut averages = Vec::new();
    for row in rows {
        averages.push(row?);
    }
    Ok(averages)
}

/// Inner join of customers and orders: one row per order.
pub fn customer_order_dates(session: &Session) -> Result<Vec<CustomerOrderDate>, StoreError> {
    let mut stmt = session.connection().prepare(
        "SELECT c.company_name, o.order_date
         FROM customers c
         JOIN orders o ON o.customer_id = c.customer_id
         ORDER BY c.customer_id ASC, o.order_id ASC",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok(CustomerOrderDate {
            company_name: row.get(0)?,
            order_date: row.get(1)?,
        })
    })?;
    let mut entries = Vec::new();
    for row in rows {
        entries.push(row?);
    }
    Ok(entries)
}

/// Orders of one customer dated at or after `cutoff`.
pub fn orders_for_customer_after(
    session: &Session,
    customer_id: i64,
    cutoff: NaiveDateTime,
) -> Result<Vec<Order>, StoreError> {
    let mut stmt = session.connection().prepare(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders
         WHERE customer_id = ?1 AND order_date >= ?2
         ORDER BY order_date ASC, order_id ASC"
    ))?;

    let rows = stmt.query_map(params![customer_id, cutoff], map_row_to_order)?;
    let mut orders = Vec::new();
    for row in rows {
        orders.push(row?);
    }
    Ok(orders)
}

/// Line items of one order.
pub fn order_details_for_order(
    session: &Session,
    order_id: i64,
) -> Result<Vec<OrderDetail>, StoreError> {
    session.details_of_order(order_id)
}

/// Cost and weight totals per employee, from the
/// `employee_total_cost_weight` view.
pub fn employee_total_cost_weight(
    session: &Session,
) -> Result<Vec<EmployeeTotalCostWeight>, StoreError> {
    let mut stmt = session.connection().prepare(
        "SELECT employee_id, last_name, first_name, middle_name, position, education,
                total_cost, total_weight
         FROM employee_total_cost_weight
         ORDER BY employee_id ASC",
    )?;

    let rows = stmt.query_map([], map_row_to_employee_totals)?;
    let mut totals = Vec::new();
    for row in rows {
        totals.push(row?);
    }
    Ok(totals)
}

fn map_row_to_employee_totals(row: &Row) -> rusqlite::Result<EmployeeTotalCostWeight> {
    Ok(EmployeeTotalCostWeight {
        employee_id: row.get(0)?,
        last_name: row.get(1)?,
        first_name: row.get(2)?,
        middle_name: row.get(3)?,
        position: row.get(4)?,
        education: row.get(5)?,
        total_cost: row.get(6)?,
        total_weight: row.get(7)?,
    })
}
