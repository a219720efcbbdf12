//! MySQL-backed catalog store.

use async_trait::async_trait;
use sqlx::mysql::{MySqlPool, MySqlPoolOptions};

use super::store::{validate_featured_ids, CatalogStore, StoreError};
use super::{
    decode_images, total_pages, Category, Product, ProductDetail, ProductPage, ProductQuery,
    SortOrder, MAX_FEATURED,
};

/// Columns shared by every product listing query, in `ProductRow` order
const PRODUCT_COLUMNS: &str = "p.id, p.nombre, COALESCE(p.descripcion, ''), p.descuento,
    p.imagen_principal, p.disponible, c.nombre, p.categoria_id";

type ProductRow = (
    i64,
    String,
    String,
    Option<f64>,
    Option<String>,
    bool,
    String,
    i64,
);

pub struct MySqlStore {
    pool: MySqlPool,
    max_featured: usize,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self {
            pool,
            max_featured: MAX_FEATURED,
        }
    }

    /// Connect to the database at `url`
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = MySqlPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await?;
        tracing::info!(max_connections, "Connected to MySQL catalog");
        Ok(Self::new(pool))
    }

    pub fn with_max_featured(mut self, max_featured: usize) -> Self {
        self.max_featured = max_featured;
        self
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    /// Create the catalog tables if they are missing
    pub async fn init(&self) -> Result<(), StoreError> {
        let statements = [
            "CREATE TABLE IF NOT EXISTS categorias (
                id     BIGINT AUTO_INCREMENT PRIMARY KEY,
                nombre VARCHAR(120) NOT NULL
            )",
            "CREATE TABLE IF NOT EXISTS productos (
                id               BIGINT AUTO_INCREMENT PRIMARY KEY,
                categoria_id     BIGINT NOT NULL,
                nombre           VARCHAR(200) NOT NULL,
                descripcion      TEXT,
                descuento        DOUBLE,
                imagen_principal VARCHAR(500),
                imagenes         TEXT,
                estilo           VARCHAR(80),
                disponible       BOOLEAN NOT NULL DEFAULT TRUE,
                INDEX idx_productos_categoria (categoria_id),
                FOREIGN KEY (categoria_id) REFERENCES categorias (id)
            )",
            "CREATE TABLE IF NOT EXISTS producto_caracteristicas (
                id             BIGINT AUTO_INCREMENT PRIMARY KEY,
                producto_id    BIGINT NOT NULL,
                caracteristica VARCHAR(200) NOT NULL,
                FOREIGN KEY (producto_id) REFERENCES productos (id) ON DELETE CASCADE
            )",
            "CREATE TABLE IF NOT EXISTS producto_etiquetas (
                id          BIGINT AUTO_INCREMENT PRIMARY KEY,
                producto_id BIGINT NOT NULL,
                etiqueta    VARCHAR(80) NOT NULL,
                FOREIGN KEY (producto_id) REFERENCES productos (id) ON DELETE CASCADE
            )",
            "CREATE TABLE IF NOT EXISTS productos_destacados (
                producto_id BIGINT PRIMARY KEY,
                orden       INT NOT NULL,
                FOREIGN KEY (producto_id) REFERENCES productos (id) ON DELETE CASCADE
            )",
        ];
        for statement in statements {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    async fn features(&self, product_id: i64) -> Result<Vec<String>, StoreError> {
        let rows = sqlx::query_as::<_, (String,)>(
            "SELECT caracteristica FROM producto_caracteristicas
             WHERE producto_id = ? ORDER BY id",
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|r| r.0).collect())
    }

    async fn tags(&self, product_id: i64) -> Result<Vec<String>, StoreError> {
        let rows = sqlx::query_as::<_, (String,)>(
            "SELECT etiqueta FROM producto_etiquetas WHERE producto_id = ? ORDER BY id",
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|r| r.0).collect())
    }

    /// Turn a listing row into a product, loading its related rows
    async fn hydrate(&self, row: ProductRow) -> Result<Product, StoreError> {
        let (id, name, description, discount, main_image, available, category, category_id) =
            row;
        Ok(Product {
            id,
            name,
            description,
            discount,
            main_image,
            available,
            category,
            category_id,
            features: self.features(id).await?,
            tags: self.tags(id).await?,
        })
    }
}

fn order_by(sort: SortOrder) -> &'static str {
    match sort {
        SortOrder::Newest => "p.id DESC",
        SortOrder::NameAsc => "p.nombre ASC, p.id DESC",
        SortOrder::NameDesc => "p.nombre DESC, p.id DESC",
        SortOrder::Discount => "p.descuento IS NULL, p.descuento DESC, p.id DESC",
    }
}

fn style_clause(query: &ProductQuery) -> &'static str {
    if query.style.is_some() {
        " AND LOWER(p.estilo) = LOWER(?)"
    } else {
        ""
    }
}

#[async_trait]
impl CatalogStore for MySqlStore {
    async fn categories(&self) -> Result<Vec<Category>, StoreError> {
        let rows = sqlx::query_as::<_, (i64, String)>(
            "SELECT id, nombre FROM categorias ORDER BY nombre",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(|(id, name)| Category { id, name })
            .collect())
    }

    async fn products_by_category(
        &self,
        category_id: i64,
        query: &ProductQuery,
    ) -> Result<ProductPage, StoreError> {
        let count_sql = format!(
            "SELECT COUNT(*) FROM productos p WHERE p.categoria_id = ?{}",
            style_clause(query)
        );
        let mut count_query = sqlx::query_as::<_, (i64,)>(&count_sql).bind(category_id);
        if let Some(style) = &query.style {
            count_query = count_query.bind(style);
        }
        let (total,) = count_query.fetch_one(&self.pool).await?;
        let total = total.max(0) as u64;

        let list_sql = format!(
            "SELECT {PRODUCT_COLUMNS}
             FROM productos p JOIN categorias c ON c.id = p.categoria_id
             WHERE p.categoria_id = ?{}
             ORDER BY {}
             LIMIT ? OFFSET ?",
            style_clause(query),
            order_by(query.sort)
        );
        let mut list_query = sqlx::query_as::<_, ProductRow>(&list_sql).bind(category_id);
        if let Some(style) = &query.style {
            list_query = list_query.bind(style);
        }
        let rows = list_query
            .bind(u64::from(query.limit))
            .bind(query.offset())
            .fetch_all(&self.pool)
            .await?;

        let mut products = Vec::with_capacity(rows.len());
        for row in rows {
            products.push(self.hydrate(row).await?);
        }

        tracing::debug!(
            category_id,
            page = query.page,
            total,
            returned = products.len(),
            "Listed category products"
        );

        Ok(ProductPage {
            products,
            total_pages: total_pages(total, query.limit),
            current_page: query.page,
            total_products: total,
        })
    }

    async fn product_detail(&self, id: i64) -> Result<Option<ProductDetail>, StoreError> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS}, p.estilo, p.imagenes
             FROM productos p JOIN categorias c ON c.id = p.categoria_id
             WHERE p.id = ?"
        );
        let row = sqlx::query_as::<
            _,
            (
                i64,
                String,
                String,
                Option<f64>,
                Option<String>,
                bool,
                String,
                i64,
                Option<String>,
                Option<String>,
            ),
        >(&sql)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(r) = row else {
            return Ok(None);
        };
        let product = self.hydrate((r.0, r.1, r.2, r.3, r.4, r.5, r.6, r.7)).await?;
        Ok(Some(ProductDetail {
            product,
            style: r.8,
            images: decode_images(r.9.as_deref()),
        }))
    }

    async fn featured(&self) -> Result<Vec<Product>, StoreError> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS}
             FROM productos_destacados d
             JOIN productos p ON p.id = d.producto_id
             JOIN categorias c ON c.id = p.categoria_id
             ORDER BY d.orden
             LIMIT ?"
        );
        let rows = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(self.max_featured as u64)
            .fetch_all(&self.pool)
            .await?;

        let mut products = Vec::with_capacity(rows.len());
        for row in rows {
            products.push(self.hydrate(row).await?);
        }
        Ok(products)
    }

    async fn replace_featured(&self, ids: &[i64]) -> Result<(), StoreError> {
        validate_featured_ids(ids, self.max_featured)?;

        let mut tx = self.pool.begin().await?;

        for id in ids {
            let exists = sqlx::query_as::<_, (i64,)>("SELECT id FROM productos WHERE id = ?")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
            if exists.is_none() {
                // Dropping the transaction rolls it back
                return Err(StoreError::UnknownProduct(*id));
            }
        }

        sqlx::query("DELETE FROM productos_destacados")
            .execute(&mut *tx)
            .await?;

        for (position, id) in ids.iter().enumerate() {
            sqlx::query("INSERT INTO productos_destacados (producto_id, orden) VALUES (?, ?)")
                .bind(id)
                .bind((position + 1) as i32)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        tracing::info!(featured = ?ids, "Replaced featured products");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_by_is_deterministic() {
        for sort in SortOrder::all() {
            assert!(order_by(*sort).ends_with("p.id DESC"));
        }
    }

    #[test]
    fn test_style_clause_only_when_filtering() {
        assert_eq!(style_clause(&ProductQuery::default()), "");
        let query = ProductQuery {
            style: Some("moderno".to_string()),
            ..ProductQuery::default()
        };
        assert!(style_clause(&query).contains("LOWER(p.estilo)"));
    }
}
