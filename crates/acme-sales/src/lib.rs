//! Data-access operations for the Acme sales database.
//!
//! All operations take an open [`acme_db::Session`]:
//!
//! - [`queries`]: listing, prefix filtering, per-customer average price,
//!   customer/order join, date-filtered orders, employee totals.
//! - [`mutations`]: customer insert, order-with-details insert, cascading
//!   deletes, and the conditional customer update.
//! - [`seed`]: deterministic fixtures for an empty database.
//!
//! # Usage
//!
//! ```rust,ignore
//! use acme_db::Session;
//! use acme_sales::{find_customers_by_name_prefix, delete_customer_cascade};
//!
//! let mut session = Session::open(&pool)?;
//! for customer in find_customers_by_name_prefix(&session, "Company1")? {
//!     println!("{}: {}", customer.customer_id, customer.company_name);
//! }
//! delete_customer_cascade(&mut session, 1)?;
//! ```

pub mod mutations;
pub mod queries;
pub mod seed;

pub use mutations::{
    delete_customer_cascade, delete_order_cascade, insert_customer, insert_order_with_details,
    update_customers_by_name, CascadeSummary, MIN_ORDER_DETAILS,
};
pub use queries::{
    average_order_price_by_customer, customer_order_dates, employee_total_cost_weight,
    find_customers_by_name_prefix, list_customers, order_details_for_order,
    orders_for_customer_after,
};
pub use seed::{seed_demo_data, SeedSummary};
