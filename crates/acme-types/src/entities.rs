//! Persisted entities and their insert/update parameters.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A customer company.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Customer {
    /// Database ID.
    pub customer_id: i64,
    /// Company name. Not unique.
    pub company_name: String,
    pub representative_last_name: String,
    pub representative_first_name: String,
    pub representative_middle_name: String,
    pub phone_number: String,
    pub address: String,
}

/// Parameters for inserting a customer.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct NewCustomer {
    pub company_name: String,
    pub representative_last_name: String,
    pub representative_first_name: String,
    pub representative_middle_name: String,
    pub phone_number: String,
    pub address: String,
}

/// Explicit field updates for a customer.
///
/// Only fields that are `Some` are written. An update with every field `None`
/// changes nothing and issues no statement.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct CustomerUpdate {
    pub company_name: Option<String>,
    pub representative_last_name: Option<String>,
    pub representative_first_name: Option<String>,
    pub representative_middle_name: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
}

impl CustomerUpdate {
    /// Returns `true` if no field is set.
    pub fn is_empty(&self) -> bool {
        self.columns().next().is_none()
    }

    /// Iterates over `(column, value)` pairs for every set field, in
    /// table column order.
    pub fn columns(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("company_name", self.company_name.as_deref()),
            (
                "representative_last_name",
                self.representative_last_name.as_deref(),
            ),
            (
                "representative_first_name",
                self.representative_first_name.as_deref(),
            ),
            (
                "representative_middle_name",
                self.representative_middle_name.as_deref(),
            ),
            ("phone_number", self.phone_number.as_deref()),
            ("address", self.address.as_deref()),
        ]
        .into_iter()
        .filter_map(|(column, value)| value.map(|v| (column, v)))
    }

    /// Applies the update to an in-memory customer.
    ///
    /// Returns the update restricted to the fields whose value actually
    /// changed, so that persisting it names only modified columns.
    pub fn apply_to(&self, customer: &mut Customer) -> CustomerUpdate {
        fn set(target: &mut String, value: &Option<String>) -> Option<String> {
            match value {
                Some(v) if v != target => {
                    target.clone_from(v);
                    Some(v.clone())
                }
                _ => None,
            }
        }

        CustomerUpdate {
            company_name: set(&mut customer.company_name, &self.company_name),
            representative_last_name: set(
                &mut customer.representative_last_name,
                &self.representative_last_name,
            ),
            representative_first_name: set(
                &mut customer.representative_first_name,
                &self.representative_first_name,
            ),
            representative_middle_name: set(
                &mut customer.representative_middle_name,
                &self.representative_middle_name,
            ),
            phone_number: set(&mut customer.phone_number, &self.phone_number),
            address: set(&mut customer.address, &self.address),
        }
    }
}

/// An order placed by a customer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    /// Database ID.
    pub order_id: i64,
    pub order_date: NaiveDateTime,
    /// Discount as a fraction in `[0, 1]`.
    pub special_discount: f64,
    pub is_completed: bool,
    pub customer_id: i64,
    pub responsible_employee_id: i64,
}

/// Parameters for inserting an order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewOrder {
    pub order_date: NaiveDateTime,
    pub special_discount: f64,
    pub is_completed: bool,
    pub customer_id: i64,
    pub responsible_employee_id: i64,
}

/// A line item of an order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderDetail {
    /// Database ID.
    pub order_detail_id: i64,
    pub order_id: i64,
    pub furniture_id: i64,
    pub quantity: i64,
}

/// Parameters for a line item inserted together with its order.
///
/// The owning order id is assigned when the order itself is written.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewOrderDetail {
    pub furniture_id: i64,
    pub quantity: i64,
}

/// A catalog furniture item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Furniture {
    /// Database ID.
    pub furniture_id: i64,
    pub name: String,
    pub price: f64,
    pub weight: f64,
}

/// Parameters for inserting a furniture item.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct NewFurniture {
    pub name: String,
    pub price: f64,
    pub weight: f64,
}

/// An employee responsible for orders.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Employee {
    /// Database ID.
    pub employee_id: i64,
    pub last_name: String,
    pub first_name: String,
    pub middle_name: String,
    pub position: String,
    pub education: String,
}

/// Parameters for inserting an employee.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct NewEmployee {
    pub last_name: String,
    pub first_name: String,
    pub middle_name: String,
    pub position: String,
    pub education: String,
}
