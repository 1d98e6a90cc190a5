//! Row shapes returned by the reporting queries.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Mean furniture price over all order lines of one customer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomerAveragePrice {
    pub customer_id: i64,
    pub average_price: f64,
}

/// One row of the customer/order join.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomerOrderDate {
    pub company_name: String,
    pub order_date: NaiveDateTime,
}

/// Totals over the orders an employee is responsible for.
///
/// Backed by the `employee_total_cost_weight` view. Totals are `None` for
/// employees without any order lines.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmployeeTotalCostWeight {
    pub employee_id: i64,
    pub last_name: String,
    pub first_name: String,
    pub middle_name: String,
    pub position: String,
    pub education: String,
    /// Sum of `price * quantity` after each order's special discount.
    pub total_cost: Option<f64>,
    /// Sum of `weight * quantity`.
    pub total_weight: Option<f64>,
}
