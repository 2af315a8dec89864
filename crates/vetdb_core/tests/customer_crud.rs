use rusqlite::Connection;
use vetdb_core::db::schema::schema_version;
use vetdb_core::db::open_db_in_memory;
use vetdb_core::{
    CustomerDetails, CustomerField, CustomerPatch, CustomerRepository, RepoError,
    SqliteCustomerRepository,
};

fn john_doe() -> CustomerDetails {
    CustomerDetails {
        fname: "John".to_string(),
        lname: "Doe".to_string(),
        phone: "5551234567".to_string(),
        email: "john@doe.com".to_string(),
        address: "1 Main St".to_string(),
        city: "Springfield".to_string(),
        postalcode: "A1A1A1".to_string(),
    }
}

fn jane_roe() -> CustomerDetails {
    CustomerDetails {
        fname: "Jane".to_string(),
        lname: "Roe".to_string(),
        phone: "5559876543".to_string(),
        email: "jane@roe.ca".to_string(),
        address: "2 Oak Ave".to_string(),
        city: "Springfield".to_string(),
        postalcode: "V8W 1N6".to_string(),
    }
}

#[test]
fn create_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCustomerRepository::try_new(&conn).unwrap();

    let id = repo.create_customer(&john_doe()).unwrap();

    let loaded = repo.get_customer(id).unwrap().unwrap();
    assert_eq!(loaded.id, id);
    assert_eq!(loaded.details, john_doe());
}

#[test]
fn get_missing_customer_returns_none() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCustomerRepository::try_new(&conn).unwrap();

    assert!(repo.get_customer(42).unwrap().is_none());
}

#[test]
fn null_columns_read_back_as_empty_strings() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO customers (fname, email) VALUES ('Solo', 'solo@vet.ca');",
        [],
    )
    .unwrap();
    let repo = SqliteCustomerRepository::try_new(&conn).unwrap();

    let found = repo.find_by_any_field("Solo").unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].details.lname, "");
    assert_eq!(found[0].details.postalcode, "");
}

#[test]
fn find_by_any_field_matches_each_column_exactly() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCustomerRepository::try_new(&conn).unwrap();
    let id = repo.create_customer(&john_doe()).unwrap();

    for field in CustomerField::ALL {
        let term = john_doe().get(field).to_string();
        let found = repo.find_by_any_field(&term).unwrap();
        assert_eq!(found.len(), 1, "no match via {field:?}");
        assert_eq!(found[0].id, id);
    }

    assert!(repo.find_by_any_field("Spring").unwrap().is_empty());
    assert!(repo.find_by_any_field("john").unwrap().is_empty());
    assert!(repo.find_by_any_field("nobody").unwrap().is_empty());
}

#[test]
fn find_by_any_field_returns_all_matches_in_id_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCustomerRepository::try_new(&conn).unwrap();
    let first = repo.create_customer(&john_doe()).unwrap();
    let second = repo.create_customer(&jane_roe()).unwrap();

    let found = repo.find_by_any_field("Springfield").unwrap();
    let ids: Vec<_> = found.iter().map(|customer| customer.id).collect();
    assert_eq!(ids, vec![first, second]);
}

#[test]
fn find_by_phone_or_email_matches_either_column() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCustomerRepository::try_new(&conn).unwrap();
    let id = repo.create_customer(&john_doe()).unwrap();

    let by_phone = repo
        .find_by_phone_or_email("5551234567", "other@mail.com")
        .unwrap();
    assert_eq!(by_phone.len(), 1);
    assert_eq!(by_phone[0].id, id);

    let by_email = repo
        .find_by_phone_or_email("0000000000", "john@doe.com")
        .unwrap();
    assert_eq!(by_email.len(), 1);

    assert!(repo
        .find_by_phone_or_email("0000000000", "other@mail.com")
        .unwrap()
        .is_empty());
}

#[test]
fn contact_conflicts_skip_the_customer_being_edited() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCustomerRepository::try_new(&conn).unwrap();
    let john = repo.create_customer(&john_doe()).unwrap();
    let jane = repo.create_customer(&jane_roe()).unwrap();

    let own = repo
        .find_contact_conflicts(john, Some("5551234567"), Some("john@doe.com"))
        .unwrap();
    assert!(own.is_empty());

    let by_phone = repo
        .find_contact_conflicts(jane, Some("5551234567"), None)
        .unwrap();
    assert_eq!(by_phone.len(), 1);
    assert_eq!(by_phone[0].id, john);

    let by_email = repo
        .find_contact_conflicts(john, None, Some("jane@roe.ca"))
        .unwrap();
    assert_eq!(by_email[0].id, jane);

    assert!(repo.find_contact_conflicts(john, None, None).unwrap().is_empty());
}

#[test]
fn find_by_last_name_lists_collisions() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCustomerRepository::try_new(&conn).unwrap();
    repo.create_customer(&john_doe()).unwrap();
    repo.create_customer(&jane_roe()).unwrap();

    let found = repo.find_by_last_name("Doe").unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].details.fname, "John");
}

#[test]
fn duplicate_email_insert_is_rejected_by_storage() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCustomerRepository::try_new(&conn).unwrap();
    repo.create_customer(&john_doe()).unwrap();

    let mut clash = jane_roe();
    clash.email = "john@doe.com".to_string();
    let err = repo.create_customer(&clash).unwrap_err();

    assert!(matches!(err, RepoError::DuplicateEmail));
    assert_eq!(repo.count_customers().unwrap(), 1);
}

#[test]
fn partial_update_rewrites_only_patched_columns() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCustomerRepository::try_new(&conn).unwrap();
    let id = repo.create_customer(&john_doe()).unwrap();

    let patch = CustomerPatch::new().with(CustomerField::FirstName, "New");
    repo.update_customer(id, &patch).unwrap();

    let loaded = repo.get_customer(id).unwrap().unwrap();
    let mut expected = john_doe();
    expected.fname = "New".to_string();
    assert_eq!(loaded.details, expected);
}

#[test]
fn full_replace_update_rewrites_every_column() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCustomerRepository::try_new(&conn).unwrap();
    let id = repo.create_customer(&john_doe()).unwrap();

    repo.update_customer(id, &CustomerPatch::replace_all(&jane_roe()))
        .unwrap();

    let loaded = repo.get_customer(id).unwrap().unwrap();
    assert_eq!(loaded.id, id);
    assert_eq!(loaded.details, jane_roe());
}

#[test]
fn update_not_found_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCustomerRepository::try_new(&conn).unwrap();

    let patch = CustomerPatch::new().with(CustomerField::City, "Metropolis");
    let err = repo.update_customer(7, &patch).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(7)));

    let err = repo.update_customer(7, &CustomerPatch::new()).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(7)));
}

#[test]
fn update_to_taken_email_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCustomerRepository::try_new(&conn).unwrap();
    repo.create_customer(&john_doe()).unwrap();
    let jane = repo.create_customer(&jane_roe()).unwrap();

    let patch = CustomerPatch::new().with(CustomerField::Email, "john@doe.com");
    let err = repo.update_customer(jane, &patch).unwrap_err();
    assert!(matches!(err, RepoError::DuplicateEmail));

    let loaded = repo.get_customer(jane).unwrap().unwrap();
    assert_eq!(loaded.details.email, "jane@roe.ca");
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteCustomerRepository::try_new(&conn) {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert_eq!(expected_version, schema_version()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_customers_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", schema_version()))
        .unwrap();

    let result = SqliteCustomerRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredTable("customers"))
    ));
}

#[test]
fn repository_rejects_connection_missing_customer_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE customers (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            fname TEXT,
            lname TEXT,
            phone TEXT,
            email TEXT UNIQUE,
            address TEXT,
            city TEXT
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", schema_version()))
        .unwrap();

    let result = SqliteCustomerRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredColumn {
            table: "customers",
            column: "postalcode"
        })
    ));
}
