use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use merx_core::repository::{CustomerRepository, RepoResult};
use merx_customer::{Customer, NewCustomer};

pub struct PgCustomerRepository {
    pool: PgPool,
}

impl PgCustomerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal struct for type-safe querying
#[derive(sqlx::FromRow)]
struct CustomerRow {
    id: Uuid,
    name: String,
    email: String,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Customer {
            id: row.id,
            name: row.name,
            email: row.email,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const CUSTOMER_COLUMNS: &str = "id, name, email, created_at, updated_at";

#[async_trait]
impl CustomerRepository for PgCustomerRepository {
    async fn create_customer(&self, customer: &NewCustomer) -> RepoResult<Customer> {
        let row = sqlx::query_as::<_, CustomerRow>(&format!(
            "INSERT INTO customers (id, name, email) VALUES ($1, $2, $3) RETURNING {}",
            CUSTOMER_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(&customer.name)
        .bind(&customer.email)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Customer>> {
        let row = sqlx::query_as::<_, CustomerRow>(&format!(
            "SELECT {} FROM customers WHERE id = $1",
            CUSTOMER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Customer::from))
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<Customer>> {
        let row = sqlx::query_as::<_, CustomerRow>(&format!(
            "SELECT {} FROM customers WHERE email = $1",
            CUSTOMER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Customer::from))
    }
}
