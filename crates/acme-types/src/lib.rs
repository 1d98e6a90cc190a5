//! Shared schema model for the Acme sales database.
//!
//! This crate defines the five persisted entities (customers, orders, order
//! details, furniture, employees), the parameter structs used to insert and
//! update them, and the row shapes returned by the reporting queries.
//!
//! Relationships are expressed as plain foreign-key ids. There are no
//! navigation properties: related rows are always fetched through an explicit
//! lookup on a database session, never by touching a field.

use serde::{Deserialize, Serialize};

mod entities;
mod reports;

pub use entities::{
    Customer, CustomerUpdate, Employee, Furniture, NewCustomer, NewEmployee, NewFurniture,
    NewOrder, NewOrderDetail, Order, OrderDetail,
};
pub use reports::{CustomerAveragePrice, CustomerOrderDate, EmployeeTotalCostWeight};

/// The persisted entity kinds.
///
/// Used to tag generated ids and `NotFound` errors with the table they
/// belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Entity {
    /// A customer company.
    Customer,
    /// An order placed by a customer.
    Order,
    /// A line item of an order.
    OrderDetail,
    /// A catalog furniture item.
    Furniture,
    /// An employee responsible for orders.
    Employee,
}

impl Entity {
    /// Returns the SQL table backing this entity.
    pub fn table(self) -> &'static str {
        match self {
            Self::Customer => "customers",
            Self::Order => "orders",
            Self::OrderDetail => "order_details",
            Self::Furniture => "furniture",
            Self::Employee => "employees",
        }
    }

    /// Returns the primary key column of the backing table.
    pub fn id_column(self) -> &'static str {
        match self {
            Self::Customer => "customer_id",
            Self::Order => "order_id",
            Self::OrderDetail => "order_detail_id",
            Self::Furniture => "furniture_id",
            Self::Employee => "employee_id",
        }
    }

    /// Returns a lowercase label for log fields and error messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Order => "order",
            Self::OrderDetail => "order detail",
            Self::Furniture => "furniture",
            Self::Employee => "employee",
        }
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_tables_are_distinct() {
        let all = [
            Entity::Customer,
            Entity::Order,
            Entity::OrderDetail,
            Entity::Furniture,
            Entity::Employee,
        ];
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert_ne!(a.table(), b.table());
                assert_ne!(a.id_column(), b.id_column());
            }
        }
    }

    #[test]
    fn entity_labels() {
        assert_eq!(Entity::Customer.to_string(), "customer");
        assert_eq!(Entity::OrderDetail.to_string(), "order detail");
        assert_eq!(Entity::Order.table(), "orders");
        assert_eq!(Entity::Order.id_column(), "order_id");
    }
}
