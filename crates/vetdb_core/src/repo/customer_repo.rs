//! Customer repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide insert, lookup and update APIs over the `customers` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Lookups compare with exact string equality, never substring matching.
//! - Multi-row results are ordered by ascending id.
//! - Updates only touch the columns named by the patch.
//! - `NULL` text columns are read back as empty strings.

use crate::db::schema::{schema_version, stored_schema_version};
use crate::db::DbError;
use crate::model::customer::{Customer, CustomerDetails, CustomerField, CustomerId, CustomerPatch};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, ErrorCode, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const CUSTOMER_SELECT_SQL: &str = "SELECT
    id,
    fname,
    lname,
    phone,
    email,
    address,
    city,
    postalcode
FROM customers";

const REQUIRED_CUSTOMER_COLUMNS: &[&str] = &[
    "id",
    "fname",
    "lname",
    "phone",
    "email",
    "address",
    "city",
    "postalcode",
];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for customer persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound(CustomerId),
    /// The write would give two customers the same email.
    DuplicateEmail,
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "customer not found: {id}"),
            Self::DuplicateEmail => write!(f, "a customer with this email already exists"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; open it with db::open_db"
            ),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        if is_unique_violation(&value) {
            return Self::DuplicateEmail;
        }
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for customer operations.
pub trait CustomerRepository {
    fn create_customer(&self, details: &CustomerDetails) -> RepoResult<CustomerId>;
    fn get_customer(&self, id: CustomerId) -> RepoResult<Option<Customer>>;
    /// Customers with `term` equal to any of the seven text fields.
    fn find_by_any_field(&self, term: &str) -> RepoResult<Vec<Customer>>;
    /// Customers sharing the phone number or the email.
    fn find_by_phone_or_email(&self, phone: &str, email: &str) -> RepoResult<Vec<Customer>>;
    /// Customers other than `id` holding the given phone or email.
    ///
    /// A `None` key is not compared.
    fn find_contact_conflicts(
        &self,
        id: CustomerId,
        phone: Option<&str>,
        email: Option<&str>,
    ) -> RepoResult<Vec<Customer>>;
    fn find_by_last_name(&self, lname: &str) -> RepoResult<Vec<Customer>>;
    fn update_customer(&self, id: CustomerId, patch: &CustomerPatch) -> RepoResult<()>;
    fn count_customers(&self) -> RepoResult<u64>;
}

/// SQLite-backed customer repository borrowing a caller-owned connection.
pub struct SqliteCustomerRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCustomerRepository<'conn> {
    /// Constructs a repository from a connection returned by `db::open_db*`.
    ///
    /// # Errors
    /// - `UninitializedConnection` when the schema version is not current.
    /// - `MissingRequiredTable`/`MissingRequiredColumn` when the schema is damaged.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_customer_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl CustomerRepository for SqliteCustomerRepository<'_> {
    fn create_customer(&self, details: &CustomerDetails) -> RepoResult<CustomerId> {
        self.conn.execute(
            "INSERT INTO customers (
                fname,
                lname,
                phone,
                email,
                address,
                city,
                postalcode
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                details.fname.as_str(),
                details.lname.as_str(),
                details.phone.as_str(),
                details.email.as_str(),
                details.address.as_str(),
                details.city.as_str(),
                details.postalcode.as_str(),
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn get_customer(&self, id: CustomerId) -> RepoResult<Option<Customer>> {
        let customers = self.query_customers(
            &format!("{CUSTOMER_SELECT_SQL} WHERE id = ?1;"),
            vec![Value::Integer(id)],
        )?;
        Ok(customers.into_iter().next())
    }

    fn find_by_any_field(&self, term: &str) -> RepoResult<Vec<Customer>> {
        self.query_customers(
            &format!(
                "{CUSTOMER_SELECT_SQL}
                 WHERE fname = ?1
                    OR lname = ?1
                    OR phone = ?1
                    OR email = ?1
                    OR city = ?1
                    OR address = ?1
                    OR postalcode = ?1
                 ORDER BY id ASC;"
            ),
            vec![Value::Text(term.to_string())],
        )
    }

    fn find_by_phone_or_email(&self, phone: &str, email: &str) -> RepoResult<Vec<Customer>> {
        self.query_customers(
            &format!("{CUSTOMER_SELECT_SQL} WHERE phone = ?1 OR email = ?2 ORDER BY id ASC;"),
            vec![Value::Text(phone.to_string()), Value::Text(email.to_string())],
        )
    }

    fn find_contact_conflicts(
        &self,
        id: CustomerId,
        phone: Option<&str>,
        email: Option<&str>,
    ) -> RepoResult<Vec<Customer>> {
        let text_or_null = |value: Option<&str>| match value {
            Some(value) => Value::Text(value.to_string()),
            None => Value::Null,
        };
        self.query_customers(
            &format!(
                "{CUSTOMER_SELECT_SQL}
                 WHERE id != ?1
                   AND (phone = ?2 OR email = ?3)
                 ORDER BY id ASC;"
            ),
            vec![Value::Integer(id), text_or_null(phone), text_or_null(email)],
        )
    }

    fn find_by_last_name(&self, lname: &str) -> RepoResult<Vec<Customer>> {
        self.query_customers(
            &format!("{CUSTOMER_SELECT_SQL} WHERE lname = ?1 ORDER BY id ASC;"),
            vec![Value::Text(lname.to_string())],
        )
    }

    fn update_customer(&self, id: CustomerId, patch: &CustomerPatch) -> RepoResult<()> {
        if patch.is_empty() {
            let exists: i64 = self.conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM customers WHERE id = ?1);",
                [id],
                |row| row.get(0),
            )?;
            if exists == 0 {
                return Err(RepoError::NotFound(id));
            }
            return Ok(());
        }

        let mut assignments = Vec::with_capacity(patch.len());
        let mut bind_values: Vec<Value> = Vec::with_capacity(patch.len() + 1);
        for (field, value) in patch.iter() {
            assignments.push(format!("{} = ?", field.column()));
            bind_values.push(Value::Text(value.to_string()));
        }
        bind_values.push(Value::Integer(id));

        let sql = format!(
            "UPDATE customers SET {} WHERE id = ?;",
            assignments.join(", ")
        );
        let changed = self.conn.execute(&sql, params_from_iter(bind_values))?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn count_customers(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM customers;", [], |row| row.get(0))?;
        Ok(count.max(0) as u64)
    }
}

impl SqliteCustomerRepository<'_> {
    fn query_customers(&self, sql: &str, bind_values: Vec<Value>) -> RepoResult<Vec<Customer>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut customers = Vec::new();

        while let Some(row) = rows.next()? {
            customers.push(parse_customer_row(row)?);
        }

        Ok(customers)
    }
}

fn parse_customer_row(row: &Row<'_>) -> RepoResult<Customer> {
    let mut details = CustomerDetails::default();
    for field in CustomerField::ALL {
        let value: Option<String> = row.get(field.column())?;
        details.set(field, value.unwrap_or_default());
    }

    Ok(Customer::new(row.get("id")?, details))
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(inner, _)
            if inner.code == ErrorCode::ConstraintViolation
                && inner.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

fn ensure_customer_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = schema_version();
    let actual_version = stored_schema_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, "customers")? {
        return Err(RepoError::MissingRequiredTable("customers"));
    }

    for &column in REQUIRED_CUSTOMER_COLUMNS {
        if !table_has_column(conn, "customers", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "customers",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
