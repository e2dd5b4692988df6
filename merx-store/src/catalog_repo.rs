use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use merx_catalog::{NewProduct, Product, ProductError, QuantityUpdate};
use merx_core::repository::{ProductRepository, RepoResult};

pub struct PgProductRepository {
    pool: PgPool,
}

impl PgProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal struct for type-safe querying
#[derive(sqlx::FromRow)]
struct ProductRow {
    id: Uuid,
    name: String,
    price_cents: i64,
    quantity: i32,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            name: row.name,
            price_cents: row.price_cents,
            quantity: row.quantity,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const PRODUCT_COLUMNS: &str = "id, name, price_cents, quantity, created_at, updated_at";

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn create_product(&self, product: &NewProduct) -> RepoResult<Product> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "INSERT INTO products (id, name, price_cents, quantity) VALUES ($1, $2, $3, $4) RETURNING {}",
            PRODUCT_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(&product.name)
        .bind(product.price_cents)
        .bind(product.quantity)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn find_by_name(&self, name: &str) -> RepoResult<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {} FROM products WHERE name = $1",
            PRODUCT_COLUMNS
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    async fn find_all_by_id(&self, ids: &[Uuid]) -> RepoResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {} FROM products WHERE id = ANY($1)",
            PRODUCT_COLUMNS
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn update_quantity(&self, updates: &[QuantityUpdate]) -> RepoResult<Vec<Product>> {
        let ids: Vec<Uuid> = updates.iter().map(|update| update.id).collect();

        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {} FROM products WHERE id = ANY($1)",
            PRODUCT_COLUMNS
        ))
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut products: Vec<Product> = rows.into_iter().map(Product::from).collect();

        // Every update must still have a live catalog row; a miss means the
        // product vanished between the caller's fetch and this write.
        for update in updates {
            let product = products
                .iter_mut()
                .find(|product| product.id == update.id)
                .ok_or_else(|| ProductError::NotFound(update.id.to_string()))?;
            product.quantity = update.quantity;
        }

        let mut tx = self.pool.begin().await?;
        for product in &products {
            sqlx::query("UPDATE products SET quantity = $2, updated_at = now() WHERE id = $1")
                .bind(product.id)
                .bind(product.quantity)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;

        Ok(products)
    }
}
