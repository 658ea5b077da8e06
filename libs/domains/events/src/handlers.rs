//! HTTP endpoints for event creation and the listing/search queries.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use axum_helpers::{
    auth::{auth_guard, Claims, JwtAuth},
    pagination::PageParams,
    response::ApiResponse,
    ValidatedJson,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{CreateEvent, Event, GeoPoint, LocationParams};
use crate::repository::EventRepository;
use crate::service::{EventPage, EventService};

/// OpenAPI definitions for the event endpoints.
#[derive(utoipa::OpenApi)]
#[openapi(
    paths(
        create_event,
        get_all_events,
        get_user_events,
        get_events_near_me,
        search_events,
        get_event_by_id,
    ),
    components(schemas(
        CreateEvent,
        Event,
        GeoPoint,
        AllEventsData,
        UserEventsData,
        EventsNearMeData,
        SearchEventsData,
    ))
)]
pub struct ApiDoc;

/// Build the events router. Creation and the owner listing require a
/// valid bearer token; the other queries are public.
pub fn router<R: EventRepository + 'static>(service: EventService<R>, jwt: JwtAuth) -> Router {
    let protected = Router::new()
        .route("/", post(create_event::<R>))
        .route("/users", get(get_user_events::<R>))
        .route_layer(middleware::from_fn_with_state(jwt, auth_guard));

    Router::new()
        .route("/", get(get_all_events::<R>))
        .route("/locations", get(get_events_near_me::<R>))
        .route("/search", get(search_events::<R>))
        .route("/{event_id}", get(get_event_by_id::<R>))
        .merge(protected)
        .with_state(service)
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AllEventsData {
    pub all_events: Vec<Event>,
    pub total_events: u64,
    pub total_pages: u64,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserEventsData {
    pub user_events: Vec<Event>,
    pub total_events: u64,
    pub total_pages: u64,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventsNearMeData {
    pub events_near_me: Vec<Event>,
    pub total_events: u64,
    pub total_pages: u64,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchEventsData {
    pub events: Vec<Event>,
    pub total_events: u64,
    pub total_pages: u64,
}

/// Create an event owned by the authenticated account.
#[utoipa::path(
    post,
    path = "/api/v1/events",
    request_body = CreateEvent,
    responses(
        (status = 201, description = "Event created", body = ApiResponse<Event>),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Missing or invalid token"),
    ),
    security(("bearer_token" = [])),
    tag = "events"
)]
async fn create_event<R: EventRepository>(
    State(service): State<EventService<R>>,
    Extension(claims): Extension<Claims>,
    ValidatedJson(payload): ValidatedJson<CreateEvent>,
) -> impl IntoResponse {
    match service.create_event(&claims.user_id, payload).await {
        Ok(event) => (
            StatusCode::CREATED,
            Json(ApiResponse::ok("Event successfully created", event)),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

/// All events, newest first, paged.
#[utoipa::path(
    get,
    path = "/api/v1/events",
    params(PageParams),
    responses((status = 200, description = "Events retrieved", body = ApiResponse<AllEventsData>)),
    tag = "events"
)]
async fn get_all_events<R: EventRepository>(
    State(service): State<EventService<R>>,
    Query(params): Query<PageParams>,
) -> impl IntoResponse {
    match service.list_all(&params).await {
        Ok(page) => Json(ApiResponse::ok(
            "Events retrieved successfully",
            AllEventsData {
                all_events: page.items,
                total_events: page.total_events,
                total_pages: page.total_pages,
            },
        ))
        .into_response(),
        Err(e) => e.into_response(),
    }
}

/// Events created by the authenticated account, newest first, paged.
#[utoipa::path(
    get,
    path = "/api/v1/events/users",
    params(PageParams),
    responses(
        (status = 200, description = "Events retrieved", body = ApiResponse<UserEventsData>),
        (status = 401, description = "Missing or invalid token"),
    ),
    security(("bearer_token" = [])),
    tag = "events"
)]
async fn get_user_events<R: EventRepository>(
    State(service): State<EventService<R>>,
    Extension(claims): Extension<Claims>,
    Query(params): Query<PageParams>,
) -> impl IntoResponse {
    match service.list_by_owner(&claims.user_id, &params).await {
        Ok(page) => Json(ApiResponse::ok(
            "Events retrieved successfully",
            UserEventsData {
                user_events: page.items,
                total_events: page.total_events,
                total_pages: page.total_pages,
            },
        ))
        .into_response(),
        Err(e) => e.into_response(),
    }
}

/// Events within a radius of the supplied coordinates.
#[utoipa::path(
    get,
    path = "/api/v1/events/locations",
    params(LocationParams, PageParams),
    responses(
        (status = 200, description = "Events retrieved", body = ApiResponse<EventsNearMeData>),
        (status = 400, description = "Missing coordinates"),
    ),
    tag = "events"
)]
async fn get_events_near_me<R: EventRepository>(
    State(service): State<EventService<R>>,
    Query(location): Query<LocationParams>,
    Query(params): Query<PageParams>,
) -> impl IntoResponse {
    match service.list_near(&location, &params).await {
        Ok(page) => Json(ApiResponse::ok(
            "Here are the events happening near you.",
            EventsNearMeData {
                events_near_me: page.items,
                total_events: page.total_events,
                total_pages: page.total_pages,
            },
        ))
        .into_response(),
        Err(e) => e.into_response(),
    }
}

/// Search on the first recognized query field (`category` or `title`).
#[utoipa::path(
    get,
    path = "/api/v1/events/search",
    params(PageParams),
    responses(
        (status = 200, description = "Events retrieved", body = ApiResponse<SearchEventsData>),
        (status = 400, description = "Unsupported search field"),
    ),
    tag = "events"
)]
async fn search_events<R: EventRepository>(
    State(service): State<EventService<R>>,
    Query(query_params): Query<Vec<(String, String)>>,
    Query(params): Query<PageParams>,
) -> impl IntoResponse {
    // With no search field the original endpoint answers as the plain
    // listing, envelope included.
    if crate::service::search_field(&query_params).is_none() {
        return get_all_events(State(service), Query(params)).await.into_response();
    }

    match service.search(&query_params, &params).await {
        Ok(page) => Json(ApiResponse::ok(
            "Events based on your search criteria.",
            SearchEventsData {
                events: page.items,
                total_events: page.total_events,
                total_pages: page.total_pages,
            },
        ))
        .into_response(),
        Err(e) => e.into_response(),
    }
}

/// Fetch a single event by id.
#[utoipa::path(
    get,
    path = "/api/v1/events/{event_id}",
    params(("event_id" = String, Path, description = "Event id")),
    responses(
        (status = 200, description = "Event retrieved", body = ApiResponse<Event>),
        (status = 404, description = "No event with that id"),
    ),
    tag = "events"
)]
async fn get_event_by_id<R: EventRepository>(
    State(service): State<EventService<R>>,
    Path(event_id): Path<String>,
) -> impl IntoResponse {
    match service.get_event(&event_id).await {
        Ok(event) => {
            Json(ApiResponse::ok("Event retrieved successfully", event)).into_response()
        }
        Err(e) => e.into_response(),
    }
}
