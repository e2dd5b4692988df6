use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use merx_core::repository::{OrderRepository, RepoResult};
use merx_customer::Customer;
use merx_order::{Order, OrderLineItem};

pub struct PgOrderRepository {
    pool: PgPool,
}

impl PgOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal structs for type-safe querying
#[derive(sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    created_at: chrono::DateTime<chrono::Utc>,
    customer_id: Uuid,
    customer_name: String,
    customer_email: String,
    customer_created_at: chrono::DateTime<chrono::Utc>,
    customer_updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(sqlx::FromRow)]
struct OrderItemRow {
    product_id: Uuid,
    quantity: i32,
    price_cents: i64,
}

#[async_trait]
impl OrderRepository for PgOrderRepository {
    async fn create_order(
        &self,
        customer: &Customer,
        items: &[OrderLineItem],
    ) -> RepoResult<Order> {
        let order_id = Uuid::new_v4();

        let mut tx = self.pool.begin().await?;

        let (created_at,): (chrono::DateTime<chrono::Utc>,) = sqlx::query_as(
            "INSERT INTO orders (id, customer_id) VALUES ($1, $2) RETURNING created_at",
        )
        .bind(order_id)
        .bind(customer.id)
        .fetch_one(&mut *tx)
        .await?;

        // `position` keeps the request's line ordering stable on read-back.
        for (position, item) in items.iter().enumerate() {
            sqlx::query(
                "INSERT INTO order_items (id, order_id, product_id, quantity, price_cents, position) \
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(Uuid::new_v4())
            .bind(order_id)
            .bind(item.product_id)
            .bind(item.quantity)
            .bind(item.price_cents)
            .bind(position as i32)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(Order {
            id: order_id,
            customer: customer.clone(),
            items: items.to_vec(),
            created_at,
        })
    }

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Order>> {
        let row = sqlx::query_as::<_, OrderRow>(
            "SELECT o.id, o.created_at, \
                    c.id AS customer_id, c.name AS customer_name, c.email AS customer_email, \
                    c.created_at AS customer_created_at, c.updated_at AS customer_updated_at \
             FROM orders o \
             JOIN customers c ON c.id = o.customer_id \
             WHERE o.id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let item_rows = sqlx::query_as::<_, OrderItemRow>(
            "SELECT product_id, quantity, price_cents FROM order_items \
             WHERE order_id = $1 ORDER BY position",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(Order {
            id: row.id,
            customer: Customer {
                id: row.customer_id,
                name: row.customer_name,
                email: row.customer_email,
                created_at: row.customer_created_at,
                updated_at: row.customer_updated_at,
            },
            items: item_rows
                .into_iter()
                .map(|item| OrderLineItem {
                    product_id: item.product_id,
                    quantity: item.quantity,
                    price_cents: item.price_cents,
                })
                .collect(),
            created_at: row.created_at,
        }))
    }
}
