use async_trait::async_trait;
use axum_helpers::pagination::Pagination;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::EventResult;
use crate::models::Event;

/// The single filter dimension a query applies. Filters never combine
/// in current scope.
#[derive(Debug, Clone, PartialEq)]
pub enum EventFilter {
    /// Every event
    All,
    /// Events created by the given account key
    Owner(String),
    /// Exact match on the (lowercased) category
    Category(String),
    /// Full-text match on the (lowercased) title
    Title(String),
    /// Events within `radius_km` of the center
    Near {
        longitude: f64,
        latitude: f64,
        radius_km: f64,
    },
}

/// Repository trait for Event persistence and indexed queries.
///
/// All multi-record reads are sorted newest-`createdAt`-first. Fetching
/// a page and counting the matches are independent reads; the caller
/// tolerates the small window between them.
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Persist a new event
    async fn create(&self, event: Event) -> EventResult<Event>;

    /// Get an event by its id
    async fn get_by_id(&self, id: Uuid) -> EventResult<Option<Event>>;

    /// Fetch one page of events matching the filter, newest first
    async fn search(&self, filter: &EventFilter, page: Pagination) -> EventResult<Vec<Event>>;

    /// Total number of events matching the filter
    async fn count(&self, filter: &EventFilter) -> EventResult<u64>;
}

/// In-memory implementation of EventRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryEventRepository {
    events: Arc<RwLock<HashMap<Uuid, Event>>>,
}

impl InMemoryEventRepository {
    pub fn new() -> Self {
        Self {
            events: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    async fn matching(&self, filter: &EventFilter) -> Vec<Event> {
        let events = self.events.read().await;
        let mut matched: Vec<Event> = events
            .values()
            .filter(|event| matches(event, filter))
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matched
    }
}

fn matches(event: &Event, filter: &EventFilter) -> bool {
    match filter {
        EventFilter::All => true,
        EventFilter::Owner(user_id) => event.user_id == *user_id,
        EventFilter::Category(category) => event.category == *category,
        EventFilter::Title(needle) => event.title.contains(needle.as_str()),
        EventFilter::Near {
            longitude,
            latitude,
            radius_km,
        } => {
            haversine_km(
                *latitude,
                *longitude,
                event.location_point.latitude,
                event.location_point.longitude,
            ) <= *radius_km
        }
    }
}

/// Great-circle distance between two coordinates in kilometers.
fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    const EARTH_RADIUS_KM: f64 = 6371.0;

    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_KM * a.sqrt().atan2((1.0 - a).sqrt())
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    async fn create(&self, event: Event) -> EventResult<Event> {
        let mut events = self.events.write().await;
        events.insert(event.id, event.clone());

        tracing::info!(event_id = %event.id, title = %event.title, "Created event");
        Ok(event)
    }

    async fn get_by_id(&self, id: Uuid) -> EventResult<Option<Event>> {
        let events = self.events.read().await;
        Ok(events.get(&id).cloned())
    }

    async fn search(&self, filter: &EventFilter, page: Pagination) -> EventResult<Vec<Event>> {
        let matched = self.matching(filter).await;
        Ok(matched
            .into_iter()
            .skip(page.offset as usize)
            .take(page.limit as usize)
            .collect())
    }

    async fn count(&self, filter: &EventFilter) -> EventResult<u64> {
        Ok(self.matching(filter).await.len() as u64)
    }
}
