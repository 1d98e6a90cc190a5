//! Write operations. Each one stages its changes on the session and commits
//! them as a single unit of work.

use acme_db::{CommitSummary, Session, StoreError};
use acme_types::{CustomerUpdate, Entity, NewCustomer, NewOrder, NewOrderDetail};

/// Fewest line items an order may be inserted with.
pub const MIN_ORDER_DETAILS: usize = 2;

/// Rows removed by a cascading delete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CascadeSummary {
    pub order_details: usize,
    pub orders: usize,
    pub customers: usize,
}

/// Inserts a customer and returns its generated id.
pub fn insert_customer(session: &mut Session, customer: NewCustomer) -> Result<i64, StoreError> {
    session.add_customer(customer);
    let summary = session.commit()?;
    let customer_id = generated_id(&summary, Entity::Customer)?;

    tracing::info!(customer_id, "inserted customer");
    Ok(customer_id)
}

/// Inserts an order together with its line items, atomically.
///
/// Referenced customer, employee and furniture ids are not checked up front;
/// storage rejects dangling references at commit with
/// `StoreError::ConstraintViolation` and nothing is written.
///
/// # Errors
///
/// Returns `StoreError::InvalidInput` without touching storage if `details`
/// has fewer than [`MIN_ORDER_DETAILS`] rows.
pub fn insert_order_with_details(
    session: &mut Session,
    order: NewOrder,
    details: Vec<NewOrderDetail>,
) -> Result<i64, StoreError> {
    if details.len() < MIN_ORDER_DETAILS {
        return Err(StoreError::InvalidInput(format!(
            "an order needs at least {MIN_ORDER_DETAILS} detail rows, got {}",
            details.len()
        )));
    }
    let detail_count = details.len();

    session.add_order(order, details);
    let summary = session.commit()?;
    let order_id = generated_id(&summary, Entity::Order)?;

    tracing::info!(order_id, details = detail_count, "inserted order");
    Ok(order_id)
}

/// Deletes a customer, its orders, and their line items in one transaction.
///
/// Deletes are staged details first, then orders, then the customer.
///
/// # Errors
///
/// Returns `StoreError::NotFound` with no writes if the customer does not exist.
pub fn delete_customer_cascade(
    session: &mut Session,
    customer_id: i64,
) -> Result<CascadeSummary, StoreError> {
    if session.customer(customer_id)?.is_none() {
        return Err(StoreError::NotFound {
            entity: Entity::Customer,
            id: customer_id,
        });
    }

    let orders = session.orders_of_customer(customer_id)?;
    let mut details = Vec::new();
    for order in &orders {
        details.extend(session.details_of_order(order.order_id)?);
    }

    for detail in &details {
        session.remove_order_detail(detail.order_detail_id);
    }
    for order in &orders {
        session.remove_order(order.order_id);
    }
    session.remove_customer(customer_id);
    session.commit()?;

    let summary = CascadeSummary {
        order_details: details.len(),
        orders: orders.len(),
        customers: 1,
    };
    tracing::info!(
        customer_id,
        orders = summary.orders,
        order_details = summary.order_details,
        "deleted customer with dependents"
    );
    Ok(summary)
}

/// Deletes an order and its line items in one transaction.
///
/// # Errors
///
/// Returns `StoreError::NotFound` with no writes if the order does not exist.
pub fn delete_order_cascade(
    session: &mut Session,
    order_id: i64,
) -> Result<CascadeSummary, StoreError> {
    if session.order(order_id)?.is_none() {
        return Err(StoreError::NotFound {
            entity: Entity::Order,
            id: order_id,
        });
    }

    let details = session.details_of_order(order_id)?;
    for detail in &details {
        session.remove_order_detail(detail.order_detail_id);
    }
    session.remove_order(order_id);
    session.commit()?;

    tracing::info!(order_id, order_details = details.len(), "deleted order");
    Ok(CascadeSummary {
        order_details: details.len(),
        orders: 1,
        customers: 0,
    })
}

/// Applies `update` to every customer named exactly `company_name`.
///
/// Each customer is loaded, updated in memory, and persisted with an UPDATE
/// naming only the columns whose value changed. All updates commit together.
/// Returns the number of matching customers; zero matches is a no-op.
pub fn update_customers_by_name(
    session: &mut Session,
    company_name: &str,
    update: &CustomerUpdate,
) -> Result<usize, StoreError> {
    let mut customers = session.customers_named(company_name)?;
    for customer in &mut customers {
        let changed = update.apply_to(customer);
        session.update_customer(customer.customer_id, changed);
    }
    session.commit()?;

    tracing::info!(company_name, matched = customers.len(), "updated customers");
    Ok(customers.len())
}

/// The id of the last `entity` row inserted by a commit. Earlier staged
/// inserts on the same session come first, so the operation's own row is last.
fn generated_id(summary: &CommitSummary, entity: Entity) -> Result<i64, StoreError> {
    summary
        .ids(entity)
        .last()
        .ok_or_else(|| StoreError::InvalidInput(format!("commit generated no {entity} id")))
}
