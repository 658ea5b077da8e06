//! RediSearch query layer.
//!
//! The store keeps records as hashes and exposes secondary indexes through
//! the RediSearch module (`FT.CREATE` / `FT.SEARCH`). This module turns an
//! explicit query specification ([`SearchQuery`]: filter, sort, offset,
//! limit) into the wire command and parses the reply back into keyed
//! field maps. Callers describe *what* to match; the rendering of the
//! query string stays in one place.

use redis::aio::ConnectionManager;
use redis::Value;
use std::collections::HashMap;
use tracing::{debug, info};

use crate::common::{DatabaseError, DatabaseResult};

/// A field declared on a search index.
#[derive(Clone, Debug)]
pub enum IndexField {
    /// Full-text searchable field
    Text(&'static str),
    /// Exact-match (tag) field
    Tag(&'static str),
    /// Geographic point field, stored as "lon,lat"
    Geo(&'static str),
    /// Numeric field; `sortable` enables SORTBY on it
    Numeric { name: &'static str, sortable: bool },
}

/// Declaration of a RediSearch index over a hash key prefix.
#[derive(Clone, Debug)]
pub struct IndexSchema {
    pub name: &'static str,
    pub key_prefix: &'static str,
    pub fields: Vec<IndexField>,
}

impl IndexSchema {
    /// Create the index on the server if it does not exist yet.
    ///
    /// An "Index already exists" reply is treated as success so startup
    /// is idempotent.
    pub async fn ensure(&self, conn: &mut ConnectionManager) -> DatabaseResult<()> {
        let mut cmd = redis::cmd("FT.CREATE");
        cmd.arg(self.name)
            .arg("ON")
            .arg("HASH")
            .arg("PREFIX")
            .arg(1)
            .arg(self.key_prefix)
            .arg("SCHEMA");

        for field in &self.fields {
            match field {
                IndexField::Text(name) => {
                    cmd.arg(name).arg("TEXT");
                }
                IndexField::Tag(name) => {
                    cmd.arg(name).arg("TAG");
                }
                IndexField::Geo(name) => {
                    cmd.arg(name).arg("GEO");
                }
                IndexField::Numeric { name, sortable } => {
                    cmd.arg(name).arg("NUMERIC");
                    if *sortable {
                        cmd.arg("SORTABLE");
                    }
                }
            }
        }

        match cmd.query_async::<()>(conn).await {
            Ok(()) => {
                info!(index = self.name, "Created search index");
                Ok(())
            }
            Err(e) if e.to_string().contains("already exists") => {
                debug!(index = self.name, "Search index already exists");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// A single filter dimension of a search query.
#[derive(Clone, Debug, PartialEq)]
pub enum Filter {
    /// Match every document in the index
    All,
    /// Exact match on a tag field
    Tag { field: &'static str, value: String },
    /// Full-text match on a text field
    Text { field: &'static str, value: String },
    /// Documents whose geo field lies within `radius_km` of the center
    GeoRadius {
        field: &'static str,
        longitude: f64,
        latitude: f64,
        radius_km: f64,
    },
}

impl Filter {
    fn render(&self) -> String {
        match self {
            Filter::All => "*".to_string(),
            Filter::Tag { field, value } => {
                format!("@{}:{{{}}}", field, escape_value(value, true))
            }
            Filter::Text { field, value } => {
                format!("@{}:({})", field, escape_value(value, false))
            }
            Filter::GeoRadius {
                field,
                longitude,
                latitude,
                radius_km,
            } => format!("@{}:[{} {} {} km]", field, longitude, latitude, radius_km),
        }
    }
}

/// Explicit query specification: filter, sort, offset, limit.
///
/// Built with the struct-update methods and executed with [`fetch`] or
/// [`count`]. Filters AND-combine on the server side, but callers here
/// only ever apply one dimension per query.
///
/// [`fetch`]: SearchQuery::fetch
/// [`count`]: SearchQuery::count
#[derive(Clone, Debug)]
pub struct SearchQuery {
    index: &'static str,
    filter: Filter,
    sort_desc: Option<&'static str>,
    offset: u64,
    limit: u64,
}

impl SearchQuery {
    pub fn new(index: &'static str) -> Self {
        Self {
            index,
            filter: Filter::All,
            sort_desc: None,
            offset: 0,
            limit: 10,
        }
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = filter;
        self
    }

    /// Sort results by a sortable field, newest/highest first.
    pub fn sort_descending(mut self, field: &'static str) -> Self {
        self.sort_desc = Some(field);
        self
    }

    pub fn page(mut self, offset: u64, limit: u64) -> Self {
        self.offset = offset;
        self.limit = limit;
        self
    }

    /// The rendered RediSearch query string (without the index name).
    pub fn query_string(&self) -> String {
        self.filter.render()
    }

    /// Run the query and return the matching page of documents.
    pub async fn fetch(&self, conn: &mut ConnectionManager) -> DatabaseResult<SearchReply> {
        let mut cmd = redis::cmd("FT.SEARCH");
        cmd.arg(self.index).arg(self.query_string());

        if let Some(field) = self.sort_desc {
            cmd.arg("SORTBY").arg(field).arg("DESC");
        }

        cmd.arg("LIMIT").arg(self.offset).arg(self.limit);

        let value: Value = cmd.query_async(conn).await?;
        SearchReply::from_value(value)
    }

    /// Run the query with `LIMIT 0 0`, returning only the total match count.
    pub async fn count(&self, conn: &mut ConnectionManager) -> DatabaseResult<u64> {
        let value: Value = redis::cmd("FT.SEARCH")
            .arg(self.index)
            .arg(self.query_string())
            .arg("LIMIT")
            .arg(0)
            .arg(0)
            .query_async(conn)
            .await?;

        Ok(SearchReply::from_value(value)?.total)
    }
}

/// One document of a search reply: its key and hash fields.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchDoc {
    pub key: String,
    pub fields: HashMap<String, String>,
}

/// Parsed `FT.SEARCH` reply.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SearchReply {
    /// Total number of matches in the index (not just this page)
    pub total: u64,
    pub docs: Vec<SearchDoc>,
}

impl SearchReply {
    /// Parse the RESP reply: `[total, key1, [f1, v1, ...], key2, ...]`.
    pub fn from_value(value: Value) -> DatabaseResult<Self> {
        let items = match value {
            Value::Array(items) => items,
            other => {
                return Err(DatabaseError::Generic(format!(
                    "unexpected FT.SEARCH reply: {:?}",
                    other
                )))
            }
        };

        let mut iter = items.into_iter();

        let total = match iter.next() {
            Some(Value::Int(n)) if n >= 0 => n as u64,
            other => {
                return Err(DatabaseError::Generic(format!(
                    "FT.SEARCH reply missing total count: {:?}",
                    other
                )))
            }
        };

        let mut docs = Vec::new();
        while let Some(key_value) = iter.next() {
            let key = value_to_string(&key_value).ok_or_else(|| {
                DatabaseError::Generic("FT.SEARCH reply: document key is not a string".to_string())
            })?;

            let fields = match iter.next() {
                Some(Value::Array(pairs)) => pairs_to_map(&key, pairs)?,
                other => {
                    return Err(DatabaseError::Generic(format!(
                        "FT.SEARCH reply: missing field list for '{}': {:?}",
                        key, other
                    )))
                }
            };

            docs.push(SearchDoc { key, fields });
        }

        Ok(Self { total, docs })
    }
}

fn pairs_to_map(key: &str, pairs: Vec<Value>) -> DatabaseResult<HashMap<String, String>> {
    if pairs.len() % 2 != 0 {
        return Err(DatabaseError::CorruptRecord {
            key: key.to_string(),
            details: "odd number of field/value entries".to_string(),
        });
    }

    let mut fields = HashMap::with_capacity(pairs.len() / 2);
    let mut iter = pairs.into_iter();
    while let (Some(name), Some(value)) = (iter.next(), iter.next()) {
        let name = value_to_string(&name).ok_or_else(|| DatabaseError::CorruptRecord {
            key: key.to_string(),
            details: "field name is not a string".to_string(),
        })?;
        let value = value_to_string(&value).ok_or_else(|| DatabaseError::CorruptRecord {
            key: key.to_string(),
            details: format!("value of '{}' is not a string", name),
        })?;
        fields.insert(name, value);
    }

    Ok(fields)
}

fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::BulkString(bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
        Value::SimpleString(s) => Some(s.clone()),
        Value::Int(n) => Some(n.to_string()),
        Value::Double(d) => Some(d.to_string()),
        _ => None,
    }
}

/// Escape RediSearch query syntax characters in a user-supplied value.
///
/// Tag values additionally escape spaces, since a tag is a single token.
fn escape_value(value: &str, tag: bool) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        let is_syntax = matches!(
            ch,
            ',' | '.' | '<' | '>' | '{' | '}' | '[' | ']' | '"' | '\'' | ':' | ';' | '!' | '@'
                | '#' | '$' | '%' | '^' | '&' | '*' | '(' | ')' | '-' | '+' | '=' | '~' | '|'
                | '/' | '\\'
        );
        if is_syntax || (tag && ch == ' ') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_all() {
        let query = SearchQuery::new("idx");
        assert_eq!(query.query_string(), "*");
    }

    #[test]
    fn test_render_tag_filter_escapes_value() {
        let query = SearchQuery::new("idx").filter(Filter::Tag {
            field: "category",
            value: "rock-music".to_string(),
        });
        assert_eq!(query.query_string(), "@category:{rock\\-music}");
    }

    #[test]
    fn test_render_tag_filter_escapes_spaces() {
        let query = SearchQuery::new("idx").filter(Filter::Tag {
            field: "category",
            value: "open mic".to_string(),
        });
        assert_eq!(query.query_string(), "@category:{open\\ mic}");
    }

    #[test]
    fn test_render_text_filter() {
        let query = SearchQuery::new("idx").filter(Filter::Text {
            field: "title",
            value: "summer festival".to_string(),
        });
        assert_eq!(query.query_string(), "@title:(summer festival)");
    }

    #[test]
    fn test_render_geo_filter() {
        let query = SearchQuery::new("idx").filter(Filter::GeoRadius {
            field: "locationPoint",
            longitude: -0.1278,
            latitude: 51.5074,
            radius_km: 10.0,
        });
        assert_eq!(
            query.query_string(),
            "@locationPoint:[-0.1278 51.5074 10 km]"
        );
    }

    #[test]
    fn test_parse_reply() {
        let value = Value::Array(vec![
            Value::Int(2),
            Value::BulkString(b"event:a".to_vec()),
            Value::Array(vec![
                Value::BulkString(b"title".to_vec()),
                Value::BulkString(b"jazz night".to_vec()),
            ]),
            Value::BulkString(b"event:b".to_vec()),
            Value::Array(vec![
                Value::BulkString(b"title".to_vec()),
                Value::BulkString(b"open mic".to_vec()),
            ]),
        ]);

        let reply = SearchReply::from_value(value).unwrap();
        assert_eq!(reply.total, 2);
        assert_eq!(reply.docs.len(), 2);
        assert_eq!(reply.docs[0].key, "event:a");
        assert_eq!(reply.docs[0].fields["title"], "jazz night");
        assert_eq!(reply.docs[1].key, "event:b");
    }

    #[test]
    fn test_parse_empty_reply() {
        let reply = SearchReply::from_value(Value::Array(vec![Value::Int(0)])).unwrap();
        assert_eq!(reply.total, 0);
        assert!(reply.docs.is_empty());
    }

    #[test]
    fn test_parse_count_only_reply() {
        // LIMIT 0 0 returns just the total
        let reply = SearchReply::from_value(Value::Array(vec![Value::Int(42)])).unwrap();
        assert_eq!(reply.total, 42);
        assert!(reply.docs.is_empty());
    }

    #[test]
    fn test_parse_rejects_non_array() {
        let result = SearchReply::from_value(Value::Int(1));
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_rejects_odd_field_list() {
        let value = Value::Array(vec![
            Value::Int(1),
            Value::BulkString(b"event:a".to_vec()),
            Value::Array(vec![Value::BulkString(b"title".to_vec())]),
        ]);
        assert!(SearchReply::from_value(value).is_err());
    }
}
