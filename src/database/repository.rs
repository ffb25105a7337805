use serde::Serialize;
use serde_json::{json, Value};
use sqlx::{postgres::PgRow, FromRow, PgPool};
use uuid::Uuid;

use crate::config::FilterConfig;
use crate::database::manager::DatabaseError;
use crate::database::query_builder;
use crate::filter::Filter;

/// One page of results plus the total under the same filters
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub per_page: u32,
    pub total: i64,
}

/// Typed, filter-driven reads over one table
pub struct Repository<T> {
    table: &'static str,
    pool: PgPool,
    filter_config: FilterConfig,
    _row: std::marker::PhantomData<T>,
}

impl<T> Repository<T>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    pub fn new(table: &'static str, pool: PgPool, filter_config: FilterConfig) -> Self {
        Self { table, pool, filter_config, _row: std::marker::PhantomData }
    }

    /// Every row matching `where_doc`, in `order`
    pub async fn select_where(&self, where_doc: Value, order: &str) -> Result<Vec<T>, DatabaseError> {
        let filter = Filter::new(self.table)?.matching(where_doc)?.order_by(order)?;
        query_builder::fetch_all(&self.pool, &filter.to_sql()?).await
    }

    pub async fn select_id(&self, id: Uuid) -> Result<Option<T>, DatabaseError> {
        let filter = Filter::new(self.table)?
            .matching(json!({ "id": { "$teq": id.to_string() } }))?
            .window(1, 0, &self.filter_config);
        query_builder::fetch_optional(&self.pool, &filter.to_sql()?).await
    }

    /// Count and fetch one page concurrently under the same where document
    pub async fn select_page(
        &self,
        where_doc: Value,
        order: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Page<T>, DatabaseError> {
        let offset = page.saturating_sub(1).saturating_mul(per_page);
        let filter = Filter::new(self.table)?
            .matching(where_doc)?
            .order_by(order)?
            .window(per_page, offset, &self.filter_config);
        let (count_sql, page_sql) = (filter.to_count_sql()?, filter.to_sql()?);

        let (total, items) = futures::try_join!(
            query_builder::fetch_count(&self.pool, &count_sql),
            query_builder::fetch_all::<T>(&self.pool, &page_sql),
        )?;
        Ok(Page { items, page, per_page, total })
    }
}
