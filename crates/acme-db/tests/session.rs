use acme_db::{create_pool, run_migrations, DbPool, DbRuntimeSettings, Session, StoreError};
use acme_types::{
    CustomerUpdate, Entity, NewCustomer, NewEmployee, NewFurniture, NewOrder, NewOrderDetail,
};
use chrono::NaiveDate;
use tempfile::TempDir;

fn setup_pool() -> (TempDir, DbPool) {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = dir.path().join("acme.db");
    let pool = create_pool(
        path.to_str().expect("temp path should be utf-8"),
        DbRuntimeSettings::default(),
    )
    .expect("failed to create pool");
    let conn = pool.get().expect("failed to get connection");
    run_migrations(&conn).expect("failed to run migrations");
    (dir, pool)
}

fn new_customer(name: &str) -> NewCustomer {
    NewCustomer {
        company_name: name.to_string(),
        representative_last_name: "Petrov".to_string(),
        representative_first_name: "Petr".to_string(),
        representative_middle_name: "Petrovich".to_string(),
        phone_number: "555-0100".to_string(),
        address: "1 Market St".to_string(),
    }
}

fn new_order(customer_id: i64, employee_id: i64) -> NewOrder {
    NewOrder {
        order_date: NaiveDate::from_ymd_opt(2022, 5, 12)
            .and_then(|d| d.and_hms_opt(9, 30, 0))
            .expect("valid date"),
        special_discount: 0.1,
        is_completed: false,
        customer_id,
        responsible_employee_id: employee_id,
    }
}

/// Seeds one employee, two furniture items and one customer; returns
/// `(customer_id, employee_id, [furniture ids])`.
fn seed_references(session: &mut Session) -> (i64, i64, Vec<i64>) {
    session.add_employee(NewEmployee {
        last_name: "Sidorov".to_string(),
        position: "Manager".to_string(),
        ..Default::default()
    });
    session.add_furniture(NewFurniture {
        name: "Chair".to_string(),
        price: 10.0,
        weight: 4.5,
    });
    session.add_furniture(NewFurniture {
        name: "Table".to_string(),
        price: 30.0,
        weight: 20.0,
    });
    session.add_customer(new_customer("Company1"));
    let summary = session.commit().expect("seed commit failed");

    (
        summary.first_id(Entity::Customer).expect("customer id"),
        summary.first_id(Entity::Employee).expect("employee id"),
        summary.ids(Entity::Furniture).collect(),
    )
}

fn count(session: &Session, table: &str) -> i64 {
    session
        .connection()
        .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
            row.get(0)
        })
        .expect("count query failed")
}

#[test]
fn db_initialization_creates_entity_tables() {
    let (_dir, pool) = setup_pool();
    let conn = pool.get().expect("failed to get connection");

    let mut stmt = conn
        .prepare(
            "SELECT name FROM sqlite_master
             WHERE type='table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )
        .expect("failed to prepare table query");
    let tables: Vec<String> = stmt
        .query_map([], |row| row.get(0))
        .expect("failed to execute table query")
        .map(|r| r.expect("failed to read table name"))
        .collect();

    assert_eq!(
        tables,
        vec![
            "_acme_migrations",
            "customers",
            "employees",
            "furniture",
            "order_details",
            "orders"
        ]
    );
}

#[test]
fn commit_returns_generated_ids_in_insert_order() {
    let (_dir, pool) = setup_pool();
    let mut session = Session::open(&pool).expect("open failed");
    let (customer_id, employee_id, furniture) = seed_references(&mut session);

    session.add_order(
        new_order(customer_id, employee_id),
        vec![
            NewOrderDetail {
                furniture_id: furniture[0],
                quantity: 2,
            },
            NewOrderDetail {
                furniture_id: furniture[1],
                quantity: 1,
            },
        ],
    );
    assert_eq!(session.pending_changes(), 1);

    let summary = session.commit().expect("commit failed");
    assert_eq!(session.pending_changes(), 0);
    assert_eq!(summary.rows_affected, 3);

    let order_id = summary.first_id(Entity::Order).expect("order id");
    let details = session.details_of_order(order_id).expect("details failed");
    let detail_ids: Vec<i64> = summary.ids(Entity::OrderDetail).collect();
    assert_eq!(
        details.iter().map(|d| d.order_detail_id).collect::<Vec<_>>(),
        detail_ids
    );
    assert!(details.iter().all(|d| d.order_id == order_id));

    let order = session.order(order_id).expect("order lookup").expect("order exists");
    assert_eq!(order.customer_id, customer_id);
    assert_eq!(order.special_discount, 0.1);
    assert!(!order.is_completed);
}

#[test]
fn staged_changes_are_invisible_until_commit() {
    let (_dir, pool) = setup_pool();
    let mut writer = Session::open(&pool).expect("open failed");
    let reader = Session::open(&pool).expect("open failed");

    writer.add_customer(new_customer("Staged"));
    assert!(reader.customers_named("Staged").expect("query").is_empty());
    assert!(writer.customers_named("Staged").expect("query").is_empty());

    writer.commit().expect("commit failed");
    assert_eq!(reader.customers_named("Staged").expect("query").len(), 1);
}

#[test]
fn closing_discards_staged_changes() {
    let (_dir, pool) = setup_pool();
    let mut session = Session::open(&pool).expect("open failed");
    session.add_customer(new_customer("Discarded"));
    session.close();

    let session = Session::open(&pool).expect("open failed");
    assert_eq!(count(&session, "customers"), 0);
}

#[test]
fn empty_commit_is_noop() {
    let (_dir, pool) = setup_pool();
    let mut session = Session::open(&pool).expect("open failed");
    let summary = session.commit().expect("empty commit should succeed");
    assert_eq!(summary, Default::default());
}

#[test]
fn out_of_order_delete_rolls_back_whole_commit() {
    let (_dir, pool) = setup_pool();
    let mut session = Session::open(&pool).expect("open failed");
    let (customer_id, employee_id, furniture) = seed_references(&mut session);
    session.add_order(
        new_order(customer_id, employee_id),
        vec![NewOrderDetail {
            furniture_id: furniture[0],
            quantity: 1,
        }],
    );
    session.commit().expect("order commit failed");

    // The insert is applied first, then the customer delete trips the
    // orders foreign key.
    session.add_customer(new_customer("RolledBack"));
    session.remove_customer(customer_id);
    let err = session.commit().expect_err("parent delete should be rejected");
    assert!(
        matches!(err, StoreError::ConstraintViolation(_)),
        "unexpected error: {err:?}"
    );

    assert_eq!(session.pending_changes(), 0);
    assert!(session.customer(customer_id).expect("lookup").is_some());
    assert!(session.customers_named("RolledBack").expect("query").is_empty());
}

#[test]
fn dangling_foreign_key_is_rejected() {
    let (_dir, pool) = setup_pool();
    let mut session = Session::open(&pool).expect("open failed");

    session.add_order(
        new_order(10, 20),
        vec![NewOrderDetail {
            furniture_id: 30,
            quantity: 2,
        }],
    );
    let err = session.commit().expect_err("missing references should fail");
    assert!(matches!(err, StoreError::ConstraintViolation(_)));
    assert_eq!(count(&session, "orders"), 0);
    assert_eq!(count(&session, "order_details"), 0);
}

#[test]
fn update_writes_only_named_columns() {
    let (_dir, pool) = setup_pool();
    let mut session = Session::open(&pool).expect("open failed");
    let (customer_id, _, _) = seed_references(&mut session);

    session.update_customer(
        customer_id,
        CustomerUpdate {
            phone_number: Some("555-0199".to_string()),
            ..Default::default()
        },
    );
    let summary = session.commit().expect("update failed");
    assert_eq!(summary.rows_affected, 1);

    let customer = session
        .customer(customer_id)
        .expect("lookup")
        .expect("customer exists");
    assert_eq!(customer.phone_number, "555-0199");
    assert_eq!(customer.company_name, "Company1");
    assert_eq!(customer.address, "1 Market St");
}

#[test]
fn empty_update_is_not_staged() {
    let (_dir, pool) = setup_pool();
    let mut session = Session::open(&pool).expect("open failed");
    session.update_customer(1, CustomerUpdate::default());
    assert_eq!(session.pending_changes(), 0);
}

#[test]
fn update_or_delete_of_missing_row_is_not_found() {
    let (_dir, pool) = setup_pool();
    let mut session = Session::open(&pool).expect("open failed");

    session.update_customer(
        404,
        CustomerUpdate {
            address: Some("nowhere".to_string()),
            ..Default::default()
        },
    );
    let err = session.commit().expect_err("missing customer");
    assert!(matches!(
        err,
        StoreError::NotFound {
            entity: Entity::Customer,
            id: 404
        }
    ));

    session.add_customer(new_customer("Ghost"));
    session.remove_order(404);
    let err = session.commit().expect_err("missing order");
    assert!(matches!(
        err,
        StoreError::NotFound {
            entity: Entity::Order,
            id: 404
        }
    ));
    assert!(session.customers_named("Ghost").expect("query").is_empty());
}

#[test]
fn lookups_return_none_for_missing_ids() {
    let (_dir, pool) = setup_pool();
    let session = Session::open(&pool).expect("open failed");

    assert!(session.customer(1).expect("lookup").is_none());
    assert!(session.order(1).expect("lookup").is_none());
    assert!(session.furniture(1).expect("lookup").is_none());
    assert!(session.employee(1).expect("lookup").is_none());
    assert!(session.orders_of_customer(1).expect("lookup").is_empty());
    assert!(session.details_of_order(1).expect("lookup").is_empty());
}

#[test]
fn exhausted_pool_reports_storage_unavailable() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = dir.path().join("acme.db");
    let pool = create_pool(
        path.to_str().expect("temp path should be utf-8"),
        DbRuntimeSettings {
            pool_max_size: 1,
            connection_timeout_ms: 100,
            ..Default::default()
        },
    )
    .expect("failed to create pool");

    let held = Session::open(&pool).expect("first session should open");
    let err = match Session::open(&pool) {
        Ok(_) => panic!("second session should time out while the only connection is held"),
        Err(e) => e,
    };
    assert!(matches!(err, StoreError::StorageUnavailable(_)));

    held.close();
    assert!(Session::open(&pool).is_ok());
}
