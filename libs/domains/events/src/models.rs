use chrono::{DateTime, TimeZone, Utc};
use database::redis::search::{IndexField, IndexSchema};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Name of the search index over event records.
pub const EVENT_INDEX: &str = "events-idx";

/// Hash key prefix covered by the event index.
pub const EVENT_KEY_PREFIX: &str = "event:";

/// Store key for an event record: `event:<id>`.
pub fn event_key(id: &Uuid) -> String {
    format!("{}{}", EVENT_KEY_PREFIX, id)
}

/// Search index declaration for event records.
///
/// `category` and `userId` are exact-match tags, `title` and
/// `description` are full-text, `locationPoint` supports radius queries,
/// and the date fields are numeric (unix milliseconds) so they sort.
pub fn index_schema() -> IndexSchema {
    IndexSchema {
        name: EVENT_INDEX,
        key_prefix: EVENT_KEY_PREFIX,
        fields: vec![
            IndexField::Text("title"),
            IndexField::Text("description"),
            IndexField::Tag("category"),
            IndexField::Tag("venue"),
            IndexField::Tag("userId"),
            IndexField::Geo("locationPoint"),
            IndexField::Numeric {
                name: "startDate",
                sortable: true,
            },
            IndexField::Numeric {
                name: "endDate",
                sortable: true,
            },
            IndexField::Numeric {
                name: "createdAt",
                sortable: true,
            },
            IndexField::Numeric {
                name: "updatedAt",
                sortable: true,
            },
        ],
    }
}

/// A geographic coordinate, serialized as `{longitude, latitude}` and
/// stored as the `lon,lat` string the geo index expects.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct GeoPoint {
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
}

impl GeoPoint {
    /// Wire form used in the store: `lon,lat`.
    pub fn to_store_string(&self) -> String {
        format!("{},{}", self.longitude, self.latitude)
    }

    pub fn from_store_string(raw: &str) -> Option<Self> {
        let (lon, lat) = raw.split_once(',')?;
        Some(Self {
            longitude: lon.trim().parse().ok()?,
            latitude: lat.trim().parse().ok()?,
        })
    }
}

/// Event entity, stored as a hash at `event:<id>`.
///
/// `title` and `category` are lowercased before persisting so tag and
/// text matches are case-insensitive. Events are created once by their
/// owner and never updated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Unique, time-ordered identifier (UUIDv7)
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    pub venue: String,
    pub location_point: GeoPoint,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub image_url: String,
    /// Store key of the owning account
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Store key of this record.
    pub fn key(&self) -> String {
        event_key(&self.id)
    }

    /// Hash field layout persisted under `event:<id>`.
    ///
    /// Timestamps are stored as unix milliseconds so the numeric index
    /// can sort on them.
    pub fn to_field_map(&self) -> Vec<(&'static str, String)> {
        vec![
            ("id", self.id.to_string()),
            ("title", self.title.clone()),
            ("description", self.description.clone()),
            ("category", self.category.clone()),
            ("venue", self.venue.clone()),
            ("locationPoint", self.location_point.to_store_string()),
            ("startDate", self.start_date.timestamp_millis().to_string()),
            ("endDate", self.end_date.timestamp_millis().to_string()),
            ("imageUrl", self.image_url.clone()),
            ("userId", self.user_id.clone()),
            ("createdAt", self.created_at.timestamp_millis().to_string()),
            ("updatedAt", self.updated_at.timestamp_millis().to_string()),
        ]
    }

    /// Rebuild an event from its stored hash fields.
    pub fn from_field_map(fields: &HashMap<String, String>) -> Option<Self> {
        Some(Self {
            id: fields.get("id")?.parse().ok()?,
            title: fields.get("title")?.clone(),
            description: fields.get("description")?.clone(),
            category: fields.get("category")?.clone(),
            venue: fields.get("venue")?.clone(),
            location_point: GeoPoint::from_store_string(fields.get("locationPoint")?)?,
            start_date: parse_millis(fields.get("startDate")?)?,
            end_date: parse_millis(fields.get("endDate")?)?,
            image_url: fields.get("imageUrl")?.clone(),
            user_id: fields.get("userId")?.clone(),
            created_at: parse_millis(fields.get("createdAt")?)?,
            updated_at: parse_millis(fields.get("updatedAt")?)?,
        })
    }
}

fn parse_millis(raw: &str) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(raw.parse().ok()?).single()
}

/// DTO for event creation. The owner is taken from the validated token,
/// not the body.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEvent {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(max = 5000))]
    pub description: String,
    #[validate(length(min = 1, max = 100))]
    pub category: String,
    #[validate(length(min = 1, max = 200))]
    pub venue: String,
    #[validate(nested)]
    pub location_point: GeoPoint,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[validate(length(max = 2000))]
    pub image_url: String,
}

/// Raw `?lon=&lat=&distanceInKm=` query parameters for the radius
/// search. Non-numeric values coerce to `None`.
#[derive(Debug, Default, Clone, Deserialize, IntoParams)]
pub struct LocationParams {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub lon: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub lat: Option<f64>,
    #[serde(rename = "distanceInKm", default, deserialize_with = "lenient_f64")]
    pub distance_in_km: Option<f64>,
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.trim().parse().ok()))
}
