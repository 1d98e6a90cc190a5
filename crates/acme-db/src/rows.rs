//! Column lists and row mappers shared by every query over the entity tables.
//!
//! Each `*_COLUMNS` constant lists columns in the order the matching mapper
//! reads them. Queries that alias a table must prefix the list themselves.

use acme_types::{Customer, Employee, Furniture, Order, OrderDetail};
use rusqlite::Row;

pub const CUSTOMER_COLUMNS: &str = "customer_id, company_name, representative_last_name, \
     representative_first_name, representative_middle_name, phone_number, address";

pub const ORDER_COLUMNS: &str =
    "order_id, order_date, special_discount, is_completed, customer_id, responsible_employee_id";

pub const ORDER_DETAIL_COLUMNS: &str = "order_detail_id, order_id, furniture_id, quantity";

pub const FURNITURE_COLUMNS: &str = "furniture_id, name, price, weight";

pub const EMPLOYEE_COLUMNS: &str =
    "employee_id, last_name, first_name, middle_name, position, education";

pub fn map_row_to_customer(row: &Row) -> rusqlite::Result<Customer> {
    Ok(Customer {
        customer_id: row.get(0)?,
        company_name: row.get(1)?,
        representative_last_name: row.get(2)?,
        representative_first_name: row.get(3)?,
        representative_middle_name: row.get(4)?,
        phone_number: row.get(5)?,
        address: row.get(6)?,
    })
}

pub fn map_row_to_order(row: &Row) -> rusqlite::Result<Order> {
    Ok(Order {
        order_id: row.get(0)?,
        order_date: row.get(1)?,
        special_discount: row.get(2)?,
        is_completed: row.get(3)?,
        customer_id: row.get(4)?,
        responsible_employee_id: row.get(5)?,
    })
}

pub fn map_row_to_order_detail(row: &Row) -> rusqlite::Result<OrderDetail> {
    Ok(OrderDetail {
        order_detail_id: row.get(0)?,
        order_id: row.get(1)?,
        furniture_id: row.get(2)?,
        quantity: row.get(3)?,
    })
}

pub fn map_row_to_furniture(row: &Row) -> rusqlite::Result<Furniture> {
    Ok(Furniture {
        furniture_id: row.get(0)?,
        name: row.get(1)?,
        price: row.get(2)?,
        weight: row.get(3)?,
    })
}

pub fn map_row_to_employee(row: &Row) -> rusqlite::Result<Employee> {
    Ok(Employee {
        employee_id: row.get(0)?,
        last_name: row.get(1)?,
        first_name: row.get(2)?,
        middle_name: row.get(3)?,
        position: row.get(4)?,
        education: row.get(5)?,
    })
}
