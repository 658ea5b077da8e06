use axum_helpers::pagination::{prepare_pagination, total_pages, PageParams};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{EventError, EventResult};
use crate::models::{CreateEvent, Event, LocationParams};
use crate::repository::{EventFilter, EventRepository};

/// Default radius for the near-me search, applied when `distanceInKm`
/// is absent, non-numeric, or non-positive.
pub const DEFAULT_RADIUS_KM: f64 = 10.0;

/// One page of events plus the totals the listing endpoints report.
#[derive(Debug, Clone)]
pub struct EventPage {
    pub items: Vec<Event>,
    pub total_events: u64,
    pub total_pages: u64,
}

/// Service layer composing the event repository with pagination: create,
/// fetch-by-id, and the filtered listings.
pub struct EventService<R: EventRepository> {
    repository: Arc<R>,
}

impl<R: EventRepository> Clone for EventService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: EventRepository> EventService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Create an event owned by `user_id` (the authenticated account's
    /// store key). Lowercases `title` and `category` and stamps the
    /// record timestamps.
    pub async fn create_event(&self, user_id: &str, input: CreateEvent) -> EventResult<Event> {
        let now = Utc::now();
        let event = Event {
            id: Uuid::now_v7(),
            title: input.title.to_lowercase(),
            description: input.description,
            category: input.category.to_lowercase(),
            venue: input.venue,
            location_point: input.location_point,
            start_date: input.start_date,
            end_date: input.end_date,
            image_url: input.image_url,
            user_id: user_id.to_string(),
            created_at: now,
            updated_at: now,
        };

        self.repository.create(event).await
    }

    /// Fetch a single event; an unparseable id reads as missing.
    pub async fn get_event(&self, id: &str) -> EventResult<Event> {
        let id: Uuid = id.parse().map_err(|_| EventError::NotFound)?;

        self.repository
            .get_by_id(id)
            .await?
            .ok_or(EventError::NotFound)
    }

    /// All events, newest first, paged.
    pub async fn list_all(&self, params: &PageParams) -> EventResult<EventPage> {
        self.list(EventFilter::All, params).await
    }

    /// Events owned by the given account key, newest first, paged.
    pub async fn list_by_owner(&self, user_id: &str, params: &PageParams) -> EventResult<EventPage> {
        self.list(EventFilter::Owner(user_id.to_string()), params)
            .await
    }

    /// Events within a radius of the given center, newest first, paged.
    ///
    /// `lon` and `lat` are required; the radius falls back to
    /// [`DEFAULT_RADIUS_KM`] when absent or non-positive.
    pub async fn list_near(
        &self,
        location: &LocationParams,
        params: &PageParams,
    ) -> EventResult<EventPage> {
        let (Some(longitude), Some(latitude)) = (location.lon, location.lat) else {
            return Err(EventError::Validation(
                "lon and lat query parameters are required".to_string(),
            ));
        };

        let radius_km = location
            .distance_in_km
            .filter(|d| d.is_finite() && *d > 0.0)
            .unwrap_or(DEFAULT_RADIUS_KM);

        self.list(
            EventFilter::Near {
                longitude,
                latitude,
                radius_km,
            },
            params,
        )
        .await
    }

    /// Dispatch a search on the first recognized query parameter.
    ///
    /// `page` and `limit` are pagination, not search fields, and are
    /// skipped. With no search field at all this behaves as `list_all`;
    /// `category` is an exact match and `title` a full-text match, both
    /// lowercased. Any other field is rejected.
    pub async fn search(
        &self,
        query_params: &[(String, String)],
        params: &PageParams,
    ) -> EventResult<EventPage> {
        let Some((key, value)) = search_field(query_params) else {
            return self.list_all(params).await;
        };

        let filter = match key.to_lowercase().as_str() {
            "category" => EventFilter::Category(value.to_lowercase()),
            "title" => EventFilter::Title(value.to_lowercase()),
            other => {
                return Err(EventError::Validation(format!(
                    "unsupported search field '{}'; use 'category' or 'title'",
                    other
                )))
            }
        };

        self.list(filter, params).await
    }

    async fn list(&self, filter: EventFilter, params: &PageParams) -> EventResult<EventPage> {
        let page = prepare_pagination(params);

        let items = self.repository.search(&filter, page).await?;
        let total_events = self.repository.count(&filter).await?;

        Ok(EventPage {
            items,
            total_events,
            total_pages: total_pages(total_events, page.limit),
        })
    }
}

/// The first query parameter naming a search field. `page` and `limit`
/// are pagination, not search fields, and are skipped; `None` means the
/// request carried no search criteria at all.
pub fn search_field(query_params: &[(String, String)]) -> Option<&(String, String)> {
    query_params
        .iter()
        .find(|(key, _)| !matches!(key.to_lowercase().as_str(), "page" | "limit"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GeoPoint;
    use crate::repository::InMemoryEventRepository;

    fn service() -> EventService<InMemoryEventRepository> {
        EventService::new(InMemoryEventRepository::new())
    }

    fn create(title: &str, category: &str) -> CreateEvent {
        CreateEvent {
            title: title.to_string(),
            description: "desc".to_string(),
            category: category.to_string(),
            venue: "venue".to_string(),
            location_point: GeoPoint {
                longitude: -74.0,
                latitude: 40.7,
            },
            start_date: Utc::now(),
            end_date: Utc::now(),
            image_url: String::new(),
        }
    }

    #[tokio::test]
    async fn test_create_lowercases_title_and_category() {
        let service = service();

        let event = service
            .create_event("user:a", create("Jazz Night", "Music"))
            .await
            .unwrap();

        assert_eq!(event.title, "jazz night");
        assert_eq!(event.category, "music");
        assert_eq!(event.user_id, "user:a");
        assert_eq!(event.created_at, event.updated_at);
    }

    #[tokio::test]
    async fn test_get_event_with_bad_id_is_not_found() {
        let service = service();
        let result = service.get_event("not-a-uuid").await;
        assert!(matches!(result, Err(EventError::NotFound)));
    }

    #[tokio::test]
    async fn test_list_all_reports_totals() {
        let service = service();
        for i in 0..12 {
            service
                .create_event("user:a", create(&format!("event {}", i), "music"))
                .await
                .unwrap();
        }

        let page = service.list_all(&PageParams::default()).await.unwrap();

        assert_eq!(page.items.len(), 10);
        assert_eq!(page.total_events, 12);
        assert_eq!(page.total_pages, 2);
    }

    #[tokio::test]
    async fn test_list_near_requires_center() {
        let service = service();

        let result = service
            .list_near(&LocationParams::default(), &PageParams::default())
            .await;

        assert!(matches!(result, Err(EventError::Validation(_))));
    }

    #[tokio::test]
    async fn test_list_near_defaults_radius() {
        let service = service();
        service
            .create_event("user:a", create("close by", "music"))
            .await
            .unwrap();

        // Zero distance falls back to the 10 km default, which covers
        // the event at the same coordinates.
        let page = service
            .list_near(
                &LocationParams {
                    lon: Some(-74.0),
                    lat: Some(40.7),
                    distance_in_km: Some(0.0),
                },
                &PageParams::default(),
            )
            .await
            .unwrap();

        assert_eq!(page.items.len(), 1);
    }

    #[tokio::test]
    async fn test_search_by_category_matches_lowercased() {
        let service = service();
        service
            .create_event("user:a", create("concert", "Music"))
            .await
            .unwrap();
        service
            .create_event("user:a", create("derby", "Sports"))
            .await
            .unwrap();

        let page = service
            .search(
                &[("category".to_string(), "Music".to_string())],
                &PageParams::default(),
            )
            .await
            .unwrap();

        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].title, "concert");
    }

    #[tokio::test]
    async fn test_search_skips_pagination_keys() {
        let service = service();
        service
            .create_event("user:a", create("concert", "music"))
            .await
            .unwrap();

        let page = service
            .search(
                &[
                    ("page".to_string(), "1".to_string()),
                    ("category".to_string(), "music".to_string()),
                ],
                &PageParams::default(),
            )
            .await
            .unwrap();

        assert_eq!(page.items.len(), 1);
    }

    #[tokio::test]
    async fn test_search_without_field_lists_all() {
        let service = service();
        service
            .create_event("user:a", create("concert", "music"))
            .await
            .unwrap();

        let page = service.search(&[], &PageParams::default()).await.unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.total_events, 1);
    }

    #[tokio::test]
    async fn test_search_rejects_unknown_field() {
        let service = service();

        let result = service
            .search(
                &[("venue".to_string(), "Blue Note".to_string())],
                &PageParams::default(),
            )
            .await;

        assert!(matches!(result, Err(EventError::Validation(_))));
    }
}
