//! Connection-scoped unit of work.
//!
//! A [`Session`] owns one pooled connection. Reads run immediately against
//! it. Writes are staged as [`PendingChange`]s and only reach storage when
//! [`Session::commit`] applies the whole queue inside a single transaction.
//! Other sessions never observe a partially applied queue.

use acme_types::{
    Customer, CustomerUpdate, Employee, Entity, Furniture, NewCustomer, NewEmployee, NewFurniture,
    NewOrder, NewOrderDetail, Order, OrderDetail,
};
use r2d2::PooledConnection;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, Connection, OptionalExtension, Transaction};

use crate::error::StoreError;
use crate::pool::DbPool;
use crate::rows::{
    map_row_to_customer, map_row_to_employee, map_row_to_furniture, map_row_to_order,
    map_row_to_order_detail, CUSTOMER_COLUMNS, EMPLOYEE_COLUMNS, FURNITURE_COLUMNS,
    ORDER_COLUMNS, ORDER_DETAIL_COLUMNS,
};

/// A write staged on a session, applied on commit in staging order.
#[derive(Debug, Clone, PartialEq)]
pub enum PendingChange {
    InsertCustomer(NewCustomer),
    /// An order together with its line items. The details receive the
    /// order's generated id.
    InsertOrder {
        order: NewOrder,
        details: Vec<NewOrderDetail>,
    },
    InsertFurniture(NewFurniture),
    InsertEmployee(NewEmployee),
    UpdateCustomer {
        customer_id: i64,
        update: CustomerUpdate,
    },
    Delete {
        entity: Entity,
        id: i64,
    },
}

/// An id generated by an insert during commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratedId {
    pub entity: Entity,
    pub id: i64,
}

/// What a successful commit wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitSummary {
    /// Generated ids, in the order the inserts were applied.
    pub generated: Vec<GeneratedId>,
    /// Total rows inserted, updated, or deleted.
    pub rows_affected: usize,
}

impl CommitSummary {
    /// Returns every generated id of the given entity, in insert order.
    pub fn ids(&self, entity: Entity) -> impl Iterator<Item = i64> + '_ {
        self.generated
            .iter()
            .filter(move |g| g.entity == entity)
            .map(|g| g.id)
    }

    /// Returns the first generated id of the given entity.
    pub fn first_id(&self, entity: Entity) -> Option<i64> {
        self.ids(entity).next()
    }

    fn record(&mut self, entity: Entity, id: i64) {
        self.generated.push(GeneratedId { entity, id });
        self.rows_affected += 1;
    }
}

/// A unit of work over one pooled connection.
pub struct Session {
    conn: PooledConnection<SqliteConnectionManager>,
    pending: Vec<PendingChange>,
}

impl Session {
    /// Opens a session by checking a connection out of the pool.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::StorageUnavailable` if no connection can be
    /// obtained within the pool's connection timeout.
    pub fn open(pool: &DbPool) -> Result<Self, StoreError> {
        let conn = pool.get()?;
        tracing::debug!("opened session");
        Ok(Self {
            conn,
            pending: Vec::new(),
        })
    }

    /// The underlying connection, for read queries.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Number of staged, uncommitted changes.
    pub fn pending_changes(&self) -> usize {
        self.pending.len()
    }

    /// Stages a raw change.
    pub fn stage(&mut self, change: PendingChange) {
        self.pending.push(change);
    }

    pub fn add_customer(&mut self, customer: NewCustomer) {
        self.stage(PendingChange::InsertCustomer(customer));
    }

    pub fn add_order(&mut self, order: NewOrder, details: Vec<NewOrderDetail>) {
        self.stage(PendingChange::InsertOrder { order, details });
    }

    pub fn add_furniture(&mut self, furniture: NewFurniture) {
        self.stage(PendingChange::InsertFurniture(furniture));
    }

    pub fn add_employee(&mut self, employee: NewEmployee) {
        self.stage(PendingChange::InsertEmployee(employee));
    }

    /// Stages an explicit column update. An empty update is dropped.
    pub fn update_customer(&mut self, customer_id: i64, update: CustomerUpdate) {
        if update.is_empty() {
            return;
        }
        self.stage(PendingChange::UpdateCustomer {
            customer_id,
            update,
        });
    }

    pub fn remove_order_detail(&mut self, order_detail_id: i64) {
        self.stage(PendingChange::Delete {
            entity: Entity::OrderDetail,
            id: order_detail_id,
        });
    }

    pub fn remove_order(&mut self, order_id: i64) {
        self.stage(PendingChange::Delete {
            entity: Entity::Order,
            id: order_id,
        });
    }

    pub fn remove_customer(&mut self, customer_id: i64) {
        self.stage(PendingChange::Delete {
            entity: Entity::Customer,
            id: customer_id,
        });
    }

    /// Applies every staged change inside one transaction.
    ///
    /// The queue is cleared whether or not the commit succeeds. On failure
    /// the transaction is rolled back and nothing from the queue persists.
    ///
    /// # Errors
    ///
    /// - `StoreError::ConstraintViolation` if storage rejects any change.
    /// - `StoreError::NotFound` if a staged update or delete matches no row.
    /// - `StoreError::Database` for any other SQLite failure.
    pub fn commit(&mut self) -> Result<CommitSummary, StoreError> {
        let pending = std::mem::take(&mut self.pending);
        if pending.is_empty() {
            tracing::debug!("nothing to commit");
            return Ok(CommitSummary::default());
        }

        let tx = self.conn.transaction()?;
        let mut summary = CommitSummary::default();
        for change in &pending {
            apply_change(&tx, change, &mut summary)?;
        }
        tx.commit()?;

        tracing::info!(
            changes = pending.len(),
            rows_affected = summary.rows_affected,
            "committed unit of work"
        );
        Ok(summary)
    }

    /// Releases the connection back to the pool, discarding staged changes.
    pub fn close(self) {}

    /// Looks up a customer by id.
    pub fn customer(&self, customer_id: i64) -> Result<Option<Customer>, StoreError> {
        let customer = self
            .conn
            .query_row(
                &format!("SELECT {CUSTOMER_COLUMNS} FROM customers WHERE customer_id = ?1"),
                [customer_id],
                map_row_to_customer,
            )
            .optional()?;
        Ok(customer)
    }

    /// Looks up an order by id.
    pub fn order(&self, order_id: i64) -> Result<Option<Order>, StoreError> {
        let order = self
            .conn
            .query_row(
                &format!("SELECT {ORDER_COLUMNS} FROM orders WHERE order_id = ?1"),
                [order_id],
                map_row_to_order,
            )
            .optional()?;
        Ok(order)
    }

    /// Looks up a furniture item by id.
    pub fn furniture(&self, furniture_id: i64) -> Result<Option<Furniture>, StoreError> {
        let furniture = self
            .conn
            .query_row(
                &format!("SELECT {FURNITURE_COLUMNS} FROM furniture WHERE furniture_id = ?1"),
                [furniture_id],
                map_row_to_furniture,
            )
            .optional()?;
        Ok(furniture)
    }

    /// Looks up an employee by id.
    pub fn employee(&self, employee_id: i64) -> Result<Option<Employee>, StoreError> {
        let employee = self
            .conn
            .query_row(
                &format!("SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE employee_id = ?1"),
                [employee_id],
                map_row_to_employee,
            )
            .optional()?;
        Ok(employee)
    }

    /// Orders belonging to a customer, oldest first.
    pub fn orders_of_customer(&self, customer_id: i64) -> Result<Vec<Order>, StoreError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE customer_id = ?1
             ORDER BY order_date ASC, order_id ASC"
        ))?;
        let rows = stmt.query_map([customer_id], map_row_to_order)?;
        let mut orders = Vec::new();
        for row in rows {
            orders.push(row?);
        }
        Ok(orders)
    }

    /// Line items of an order.
    pub fn details_of_order(&self, order_id: i64) -> Result<Vec<OrderDetail>, StoreError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {ORDER_DETAIL_COLUMNS} FROM order_details WHERE order_id = ?1
             ORDER BY order_detail_id ASC"
        ))?;
        let rows = stmt.query_map([order_id], map_row_to_order_detail)?;
        let mut details = Vec::new();
        for row in rows {
            details.push(row?);
        }
        Ok(details)
    }

    /// Customers whose company name equals `company_name` exactly.
    pub fn customers_named(&self, company_name: &str) -> Result<Vec<Customer>, StoreError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE company_name = ?1
             ORDER BY customer_id ASC"
        ))?;
        let rows = stmt.query_map([company_name], map_row_to_customer)?;
        let mut customers = Vec::new();
        for row in rows {
            customers.push(row?);
        }
        Ok(customers)
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if !self.pending.is_empty() {
            tracing::warn!(
                discarded = self.pending.len(),
                "session closed with uncommitted changes"
            );
        }
    }
}

fn apply_change(
    tx: &Transaction<'_>,
    change: &PendingChange,
    summary: &mut CommitSummary,
) -> Result<(), StoreError> {
    match change {
        PendingChange::InsertCustomer(c) => {
            tx.execute(
                "INSERT INTO customers (
                    company_name, representative_last_name, representative_first_name,
                    representative_middle_name, phone_number, address
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    c.company_name,
                    c.representative_last_name,
                    c.representative_first_name,
                    c.representative_middle_name,
                    c.phone_number,
                    c.address,
                ],
            )?;
            summary.record(Entity::Customer, tx.last_insert_rowid());
        }
        PendingChange::InsertOrder { order, details } => {
            tx.execute(
                "INSERT INTO orders (
                    order_date, special_discount, is_completed,
                    customer_id, responsible_employee_id
                ) VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    order.order_date,
                    order.special_discount,
                    order.is_completed,
                    order.customer_id,
                    order.responsible_employee_id,
                ],
            )?;
            let order_id = tx.last_insert_rowid();
            summary.record(Entity::Order, order_id);

            let mut stmt = tx.prepare_cached(
                "INSERT INTO order_details (order_id, furniture_id, quantity)
                 VALUES (?1, ?2, ?3)",
            )?;
            for detail in details {
                stmt.execute(params![order_id, detail.furniture_id, detail.quantity])?;
                summary.record(Entity::OrderDetail, tx.last_insert_rowid());
            }
        }
        PendingChange::InsertFurniture(f) => {
            tx.execute(
                "INSERT INTO furniture (name, price, weight) VALUES (?1, ?2, ?3)",
                params![f.name, f.price, f.weight],
            )?;
            summary.record(Entity::Furniture, tx.last_insert_rowid());
        }
        PendingChange::InsertEmployee(e) => {
            tx.execute(
                "INSERT INTO employees (last_name, first_name, middle_name, position, education)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    e.last_name,
                    e.first_name,
                    e.middle_name,
                    e.position,
                    e.education,
                ],
            )?;
            summary.record(Entity::Employee, tx.last_insert_rowid());
        }
        PendingChange::UpdateCustomer {
            customer_id,
            update,
        } => {
            summary.rows_affected += update_customer_columns(tx, *customer_id, update)?;
        }
        PendingChange::Delete { entity, id } => {
            let count = tx.execute(
                &format!(
                    "DELETE FROM {} WHERE {} = ?1",
                    entity.table(),
                    entity.id_column()
                ),
                [id],
            )?;
            if count == 0 {
                return Err(StoreError::NotFound {
                    entity: *entity,
                    id: *id,
                });
            }
            summary.rows_affected += count;
        }
    }
    Ok(())
}

/// Issues one UPDATE naming exactly the columns set in `update`.
fn update_customer_columns(
    tx: &Transaction<'_>,
    customer_id: i64,
    update: &CustomerUpdate,
) -> Result<usize, StoreError> {
    let columns: Vec<(&'static str, &str)> = update.columns().collect();
    if columns.is_empty() {
        return Ok(0);
    }

    let set_parts: Vec<String> = columns
        .iter()
        .enumerate()
        .map(|(i, (column, _))| format!("{column} = ?{}", i + 1))
        .collect();
    let mut values: Vec<&dyn rusqlite::types::ToSql> = columns
        .iter()
        .map(|(_, value)| value as &dyn rusqlite::types::ToSql)
        .collect();

    let sql = format!(
        "UPDATE customers SET {} WHERE customer_id = ?{}",
        set_parts.join(", "),
        values.len() + 1
    );
    values.push(&customer_id);

    let count = tx.execute(&sql, values.as_slice())?;
    if count == 0 {
        return Err(StoreError::NotFound {
            entity: Entity::Customer,
            id: customer_id,
        });
    }
    Ok(count)
}
