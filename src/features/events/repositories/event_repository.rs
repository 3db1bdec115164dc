use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};

use crate::core::error::{AppError, Result};
use crate::features::events::models::{
    EventCategory, EventChanges, EventDetail, EventFilter, EventRecord, NewEvent, StatusChange,
};
use crate::shared::types::PaginationQuery;
use crate::shared::validation::like_pattern;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Filtered listing. With `page` the result is one page plus the total
    /// match count; without it every match is returned.
    async fn search(
        &self,
        filter: EventFilter,
        page: Option<PaginationQuery>,
    ) -> Result<(Vec<EventDetail>, i64)>;

    async fn find_by_id(&self, id: i64) -> Result<Option<EventDetail>>;

    /// Insert the event and its category links in one transaction
    async fn create(&self, event: NewEvent) -> Result<EventDetail>;

    /// Write all mutable columns, re-linking categories when given, in one transaction
    async fn update(&self, id: i64, changes: EventChanges) -> Result<Option<EventDetail>>;

    async fn set_status(&self, id: i64, change: StatusChange) -> Result<Option<EventDetail>>;

    async fn delete(&self, id: i64) -> Result<bool>;
}

const SELECT_EVENT: &str = r#"
    SELECT e.id, e.name, e.description, e.start_date_time, e.end_date_time,
           e.venue_id, e.organizer_id, e.ticket_price, e.is_free, e.website,
           e.ticketing_link, e.image_url, e.status, e.admin_notes,
           e.approved_at, e.rejected_at, e.created_at, e.updated_at,
           v.name AS venue_name, v.address AS venue_address,
           v.latitude AS venue_latitude, v.longitude AS venue_longitude,
           v.capacity AS venue_capacity,
           u.name AS organizer_name, u.email AS organizer_email
    FROM events e
    JOIN venues v ON v.id = e.venue_id
    JOIN users u ON u.id = e.organizer_id
"#;

const FILTER_WHERE: &str = r#"
    WHERE ($1::TEXT IS NULL OR e.name ILIKE $1 OR e.description ILIKE $1)
      AND ($2::BIGINT[] IS NULL OR EXISTS (
            SELECT 1 FROM category_event ce
            WHERE ce.event_id = e.id AND ce.category_id = ANY($2)
          ))
      AND ($3::BIGINT IS NULL OR e.venue_id = $3)
      AND ($4::BIGINT IS NULL OR e.organizer_id = $4)
      AND ($5::DATE IS NULL OR (e.start_date_time AT TIME ZONE 'UTC')::DATE = $5)
      AND ($6::BOOLEAN IS NULL OR e.is_free = $6)
      AND ($7::event_status IS NULL OR e.status = $7)
      AND ($8::TIMESTAMPTZ IS NULL OR e.start_date_time >= $8)
      AND ($9::TIMESTAMPTZ IS NULL OR e.start_date_time < $9)
"#;

/// Bind the nine `FILTER_WHERE` parameters in order
macro_rules! bind_filter {
    ($query:expr, $filter:expr) => {{
        let filter: &EventFilter = $filter;
        let categories = if filter.category_ids.is_empty() {
            None
        } else {
            Some(filter.category_ids.clone())
        };
        $query
            .bind(filter.search.as_deref().map(like_pattern))
            .bind(categories)
            .bind(filter.venue_id)
            .bind(filter.organizer_id)
            .bind(filter.date)
            .bind(filter.is_free)
            .bind(filter.status)
            .bind(filter.starts_from)
            .bind(filter.starts_before)
    }};
}

pub struct PgEventRepository {
    pool: PgPool,
}

impl PgEventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Attach categories to already loaded event rows
    async fn hydrate(&self, records: Vec<EventRecord>) -> Result<Vec<EventDetail>> {
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = records.iter().map(|r| r.event.id).collect();
        let categories = sqlx::query_as::<_, EventCategory>(
            r#"
            SELECT ce.event_id, c.id, c.name, c.color
            FROM category_event ce
            JOIN categories c ON c.id = ce.category_id
            WHERE ce.event_id = ANY($1)
            ORDER BY c.name
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load event categories: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(records
            .into_iter()
            .map(|record| EventDetail::from_record(record, &categories))
            .collect())
    }

    async fn link_categories(
        tx: &mut Transaction<'_, Postgres>,
        event_id: i64,
        category_ids: &[i64],
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO category_event (category_id, event_id)
            SELECT DISTINCT UNNEST($1::BIGINT[]), $2
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(category_ids)
        .bind(event_id)
        .execute(&mut **tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to link event categories: {:?}", e);
            AppError::Database(e)
        })?;
        Ok(())
    }
}

#[async_trait]
impl EventRepository for PgEventRepository {
    async fn search(
        &self,
        filter: EventFilter,
        page: Option<PaginationQuery>,
    ) -> Result<(Vec<EventDetail>, i64)> {
        let order = format!(
            "ORDER BY {} {}, e.id {}",
            filter.sort.as_sql(),
            filter.direction.as_sql(),
            filter.direction.as_sql()
        );

        let Some(page) = page else {
            let query = format!("{} {} {}", SELECT_EVENT, FILTER_WHERE, order);
            let records: Vec<EventRecord> =
                bind_filter!(sqlx::query_as::<_, EventRecord>(&query), &filter)
                    .fetch_all(&self.pool)
                    .await
                    .map_err(|e| {
                        tracing::error!("Failed to list events: {:?}", e);
                        AppError::Database(e)
                    })?;
            let events = self.hydrate(records).await?;
            let total = events.len() as i64;
            return Ok((events, total));
        };

        let count_query = format!("SELECT COUNT(*) FROM events e {}", FILTER_WHERE);
        let total: i64 = bind_filter!(sqlx::query_scalar::<_, i64>(&count_query), &filter)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count events: {:?}", e);
                AppError::Database(e)
            })?;

        let query = format!(
            "{} {} {} LIMIT $10 OFFSET $11",
            SELECT_EVENT, FILTER_WHERE, order
        );
        let records: Vec<EventRecord> =
            bind_filter!(sqlx::query_as::<_, EventRecord>(&query), &filter)
                .bind(page.limit())
                .bind(page.offset())
                .fetch_all(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to list events: {:?}", e);
                    AppError::Database(e)
                })?;

        Ok((self.hydrate(records).await?, total))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<EventDetail>> {
        let query = format!("{} WHERE e.id = $1", SELECT_EVENT);
        let record = sqlx::query_as::<_, EventRecord>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get event by id: {:?}", e);
                AppError::Database(e)
            })?;

        match record {
            Some(record) => Ok(self.hydrate(vec![record]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn create(&self, event: NewEvent) -> Result<EventDetail> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO events (
                name, description, start_date_time, end_date_time, venue_id,
                organizer_id, ticket_price, is_free, website, ticketing_link,
                image_url, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING id
            "#,
        )
        .bind(&event.name)
        .bind(&event.description)
        .bind(event.start_date_time)
        .bind(event.end_date_time)
        .bind(event.venue_id)
        .bind(event.organizer_id)
        .bind(event.ticket_price)
        .bind(event.is_free)
        .bind(&event.website)
        .bind(&event.ticketing_link)
        .bind(&event.image_url)
        .bind(event.status)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create event: {:?}", e);
            AppError::Database(e)
        })?;

        Self::link_categories(&mut tx, id, &event.category_ids).await?;

        tx.commit().await.map_err(AppError::Database)?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Internal(format!("Event {} vanished after insert", id)))
    }

    async fn update(&self, id: i64, changes: EventChanges) -> Result<Option<EventDetail>> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let result = sqlx::query(
            r#"
            UPDATE events
            SET name = $2, description = $3, start_date_time = $4, end_date_time = $5,
                venue_id = $6, ticket_price = $7, is_free = $8, website = $9,
                ticketing_link = $10, image_url = $11, status = $12,
                approved_at = $13, rejected_at = $14, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&changes.name)
        .bind(&changes.description)
        .bind(changes.start_date_time)
        .bind(changes.end_date_time)
        .bind(changes.venue_id)
        .bind(changes.ticket_price)
        .bind(changes.is_free)
        .bind(&changes.website)
        .bind(&changes.ticketing_link)
        .bind(&changes.image_url)
        .bind(changes.status)
        .bind(changes.approved_at)
        .bind(changes.rejected_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update event: {:?}", e);
            AppError::Database(e)
        })?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        if let Some(category_ids) = &changes.category_ids {
            sqlx::query("DELETE FROM category_event WHERE event_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(AppError::Database)?;
            Self::link_categories(&mut tx, id, category_ids).await?;
        }

        tx.commit().await.map_err(AppError::Database)?;

        self.find_by_id(id).await
    }

    async fn set_status(&self, id: i64, change: StatusChange) -> Result<Option<EventDetail>> {
        let result = sqlx::query(
            r#"
            UPDATE events
            SET status = $2,
                admin_notes = COALESCE($3, admin_notes),
                approved_at = COALESCE($4, approved_at),
                rejected_at = COALESCE($5, rejected_at),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(change.status)
        .bind(change.admin_notes)
        .bind(change.approved_at)
        .bind(change.rejected_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update event status: {:?}", e);
            AppError::Database(e)
        })?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.find_by_id(id).await
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete event: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(result.rows_affected() > 0)
    }
}
