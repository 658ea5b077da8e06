use async_trait::async_trait;
use axum_helpers::pagination::Pagination;
use database::redis::search::{Filter, SearchQuery};
use database::redis::ConnectionManager;
use database::DatabaseError;
use redis::AsyncCommands;
use std::collections::HashMap;
use uuid::Uuid;

use crate::error::EventResult;
use crate::models::{event_key, index_schema, Event, EVENT_INDEX};
use crate::repository::{EventFilter, EventRepository};

/// Event repository over Redis hashes at `event:<id>`, with filtered
/// queries served by the search index declared in
/// [`index_schema`](crate::models::index_schema).
#[derive(Clone)]
pub struct RedisEventRepository {
    conn: ConnectionManager,
}

impl RedisEventRepository {
    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn }
    }

    /// Create the event search index if it does not exist. Called once
    /// at startup, before the service accepts requests.
    pub async fn ensure_index(&self) -> EventResult<()> {
        let mut conn = self.conn.clone();
        index_schema().ensure(&mut conn).await?;
        Ok(())
    }

    fn query(filter: &EventFilter) -> SearchQuery {
        SearchQuery::new(EVENT_INDEX).filter(to_store_filter(filter))
    }
}

fn to_store_filter(filter: &EventFilter) -> Filter {
    match filter {
        EventFilter::All => Filter::All,
        EventFilter::Owner(user_id) => Filter::Tag {
            field: "userId",
            value: user_id.clone(),
        },
        EventFilter::Category(category) => Filter::Tag {
            field: "category",
            value: category.clone(),
        },
        EventFilter::Title(title) => Filter::Text {
            field: "title",
            value: title.clone(),
        },
        EventFilter::Near {
            longitude,
            latitude,
            radius_km,
        } => Filter::GeoRadius {
            field: "locationPoint",
            longitude: *longitude,
            latitude: *latitude,
            radius_km: *radius_km,
        },
    }
}

fn doc_to_event(key: &str, fields: &HashMap<String, String>) -> Result<Event, DatabaseError> {
    Event::from_field_map(fields).ok_or_else(|| DatabaseError::CorruptRecord {
        key: key.to_string(),
        details: "event hash is missing required fields".to_string(),
    })
}

#[async_trait]
impl EventRepository for RedisEventRepository {
    async fn create(&self, event: Event) -> EventResult<Event> {
        let mut conn = self.conn.clone();

        let fields = event.to_field_map();
        conn.hset_multiple::<_, _, _, ()>(event.key(), &fields)
            .await
            .map_err(DatabaseError::from)?;

        tracing::info!(event_id = %event.id, title = %event.title, "Created event");
        Ok(event)
    }

    async fn get_by_id(&self, id: Uuid) -> EventResult<Option<Event>> {
        let mut conn = self.conn.clone();
        let key = event_key(&id);

        let fields: HashMap<String, String> = conn
            .hgetall(&key)
            .await
            .map_err(DatabaseError::from)?;

        if fields.is_empty() {
            return Ok(None);
        }

        Ok(Some(doc_to_event(&key, &fields)?))
    }

    async fn search(&self, filter: &EventFilter, page: Pagination) -> EventResult<Vec<Event>> {
        let mut conn = self.conn.clone();

        let reply = Self::query(filter)
            .sort_descending("createdAt")
            .page(page.offset, page.limit)
            .fetch(&mut conn)
            .await?;

        let mut events = Vec::with_capacity(reply.docs.len());
        for doc in &reply.docs {
            events.push(doc_to_event(&doc.key, &doc.fields)?);
        }
        Ok(events)
    }

    async fn count(&self, filter: &EventFilter) -> EventResult<u64> {
        let mut conn = self.conn.clone();
        Ok(Self::query(filter).count(&mut conn).await?)
    }
}
