//! The fixed demonstration sequence.
//!
//! Ten calls run in order against one session, each printing plain result
//! lines. Ids and names are hardcoded; a missing target for the two
//! cascading deletes is reported and skipped, any other error stops the run.

use std::io::Write;

use acme_db::{Session, StoreError};
use acme_sales::{
    average_order_price_by_customer, customer_order_dates, delete_customer_cascade,
    delete_order_cascade, employee_total_cost_weight, find_customers_by_name_prefix,
    insert_customer, insert_order_with_details, list_customers, orders_for_customer_after,
    update_customers_by_name, CascadeSummary,
};
use acme_types::{CustomerUpdate, NewCustomer, NewOrder, NewOrderDetail};
use chrono::{Local, NaiveDate, NaiveDateTime};
use thiserror::Error;

pub const PREFIX_FILTER: &str = "Company1";
pub const FILTER_CUSTOMER_ID: i64 = 3;
pub const ORDER_CUSTOMER_ID: i64 = 10;
pub const ORDER_EMPLOYEE_ID: i64 = 20;
pub const ORDER_LINES: [NewOrderDetail; 2] = [
    NewOrderDetail {
        furniture_id: 30,
        quantity: 2,
    },
    NewOrderDetail {
        furniture_id: 50,
        quantity: 1,
    },
];
pub const DELETE_CUSTOMER_ID: i64 = 1;
pub const DELETE_ORDER_ID: i64 = 5;
pub const UPDATE_COMPANY_NAME: &str = "Company10";

/// Errors that stop the demonstration.
#[derive(Debug, Error)]
pub enum DemoError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("failed to write demo output: {0}")]
    Output(#[from] std::io::Error),
}

/// Orders on or after this moment are listed in step 5.
pub fn filter_cutoff() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2022, 5, 10)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

/// Runs the demonstration sequence, writing result lines to `out`.
pub fn run_demo<W: Write>(session: &mut Session, out: &mut W) -> Result<(), DemoError> {
    writeln!(out, "== 1. all customers ==")?;
    for c in list_customers(session)? {
        writeln!(out, "ID: {}, Company: {}", c.customer_id, c.company_name)?;
    }

    writeln!(out, "== 2. customers starting with {PREFIX_FILTER:?} ==")?;
    for c in find_customers_by_name_prefix(session, PREFIX_FILTER)? {
        writeln!(out, "ID: {}, Company: {}", c.customer_id, c.company_name)?;
    }

    writeln!(out, "== 3. average furniture price per customer ==")?;
    for avg in average_order_price_by_customer(session)? {
        writeln!(
            out,
            "CustomerID: {}, AveragePrice: {:.2}",
            avg.customer_id, avg.average_price
        )?;
    }

    writeln!(out, "== 4. customer order dates ==")?;
    for entry in customer_order_dates(session)? {
        writeln!(
            out,
            "Customer Name: {}, Order Date: {}",
            entry.company_name, entry.order_date
        )?;
    }

    let cutoff = filter_cutoff();
    writeln!(
        out,
        "== 5. orders of customer {FILTER_CUSTOMER_ID} since {} ==",
        cutoff.date()
    )?;
    for order in orders_for_customer_after(session, FILTER_CUSTOMER_ID, cutoff)? {
        writeln!(
            out,
            "Order ID: {}, Order Date: {}",
            order.order_id, order.order_date
        )?;
    }

    writeln!(out, "== 6. insert customer ==")?;
    let customer_id = insert_customer(
        session,
        NewCustomer {
            company_name: "New Company".to_string(),
            representative_last_name: "Last Name".to_string(),
            representative_first_name: "First Name".to_string(),
            representative_middle_name: "Middle Name".to_string(),
            phone_number: "123-456-7890".to_string(),
            address: "Address".to_string(),
        },
    )?;
    writeln!(out, "Inserted customer ID: {customer_id}")?;

    writeln!(out, "== 7. insert order with details ==")?;
    let order_id = insert_order_with_details(
        session,
        NewOrder {
            order_date: Local::now().naive_local(),
            special_discount: 0.1,
            is_completed: false,
            customer_id: ORDER_CUSTOMER_ID,
            responsible_employee_id: ORDER_EMPLOYEE_ID,
        },
        ORDER_LINES.to_vec(),
    )?;
    writeln!(
        out,
        "Inserted order ID: {order_id} with {} details",
        ORDER_LINES.len()
    )?;

    writeln!(out, "== 8. delete customer {DELETE_CUSTOMER_ID} ==")?;
    let deleted = delete_customer_cascade(session, DELETE_CUSTOMER_ID);
    report_cascade(out, "customer", DELETE_CUSTOMER_ID, deleted)?;

    writeln!(out, "== 9. delete order {DELETE_ORDER_ID} ==")?;
    let deleted = delete_order_cascade(session, DELETE_ORDER_ID);
    report_cascade(out, "order", DELETE_ORDER_ID, deleted)?;

    writeln!(out, "== 10. update customers named {UPDATE_COMPANY_NAME:?} ==")?;
    let update = CustomerUpdate {
        representative_last_name: Some("New Last Name".to_string()),
        representative_first_name: Some("New First Name".to_string()),
        representative_middle_name: Some("New Middle Name".to_string()),
        phone_number: Some("New Phone".to_string()),
        address: Some("New Address".to_string()),
        ..Default::default()
    };
    let matched = update_customers_by_name(session, UPDATE_COMPANY_NAME, &update)?;
    writeln!(out, "Updated customers: {matched}")?;

    writeln!(out, "== employee totals ==")?;
    for row in employee_total_cost_weight(session)? {
        writeln!(
            out,
            "EmployeeID: {}, Name: {} {}, TotalCost: {}, TotalWeight: {}",
            row.employee_id,
            row.last_name,
            row.first_name,
            format_total(row.total_cost),
            format_total(row.total_weight)
        )?;
    }

    Ok(())
}

fn report_cascade<W: Write>(
    out: &mut W,
    what: &str,
    id: i64,
    result: Result<CascadeSummary, StoreError>,
) -> Result<(), DemoError> {
    match result {
        Ok(summary) => writeln!(
            out,
            "Deleted {what} {id}: {} orders, {} order details",
            summary.orders, summary.order_details
        )?,
        Err(e) if e.is_not_found() => {
            tracing::warn!(what, id, "delete target not found");
            writeln!(out, "No {what} with ID {id}, nothing deleted")?
        }
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

fn format_total(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"))
}
