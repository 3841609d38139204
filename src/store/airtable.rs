//! Airtable REST adapter: the remote row-store backend.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::FeedbackStore;
use crate::domain::{EntryId, FeedbackEntry, StoreKind};
use crate::error::Result;

/// Airtable caps page size at 100 rows per request.
const PAGE_SIZE: usize = 100;

/// Feedback store backed by the Airtable records API.
pub struct AirtableStore {
    client: Client,
    base_url: String,
    token: String,
}

impl AirtableStore {
    pub fn new(base_id: &str, table: &str, token: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: format!("https://api.airtable.com/v0/{base_id}/{table}"),
            token: token.into(),
        }
    }

}

#[derive(Serialize)]
struct CreateRecords<'a> {
    records: Vec<NewRecord<'a>>,
    typecast: bool,
}

#[derive(Serialize)]
struct NewRecord<'a> {
    fields: NewFields<'a>,
}

#[derive(Serialize)]
struct NewFields<'a> {
    timestamp: String,
    feedback: &'a str,
}

#[derive(Deserialize)]
struct ListResponse {
    #[serde(default)]
    records: Vec<Record>,
}

#[derive(Deserialize)]
struct Record {
    id: String,
    #[serde(rename = "createdTime")]
    created_time: String,
    #[serde(default)]
    fields: RecordFields,
}

#[derive(Deserialize, Default)]
struct RecordFields {
    #[serde(default)]
    timestamp: Option<String>,
    #[serde(default)]
    feedback: Option<String>,
}

impl Record {
    /// The writer-assigned timestamp field, or Airtable's own record
    /// creation time when the field is blank or unparseable.
    fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.fields
            .timestamp
            .as_deref()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .or_else(|| DateTime::parse_from_rfc3339(&self.created_time).ok())
            .map(|ts| ts.with_timezone(&Utc))
    }
}

#[async_trait]
impl FeedbackStore for AirtableStore {
    fn kind(&self) -> StoreKind {
        StoreKind::Airtable
    }

    async fn append(&self, entry: &FeedbackEntry) -> Result<()> {
        let payload = CreateRecords {
            records: vec![NewRecord {
                fields: NewFields {
                    timestamp: entry.timestamp.to_rfc3339(),
                    feedback: &entry.text,
                },
            }],
            typecast: true,
        };

        self.client
            .post(&self.base_url)
            .bearer_auth(&self.token)
            .json(&payload)
            .send()
            .await?
            .error_for_status()?;

        debug!("entry appended to airtable");
        Ok(())
    }

    async fn list(&self, limit: usize) -> Result<Vec<FeedbackEntry>> {
        let page_size = limit.min(PAGE_SIZE);
        let response: ListResponse = self
            .client
            .get(&self.base_url)
            .bearer_auth(&self.token)
            .query(&[
                ("pageSize", page_size.to_string().as_str()),
                ("sort[0][field]", "timestamp"),
                ("sort[0][direction]", "desc"),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        debug!(count = response.records.len(), "fetched airtable records");

        let mut entries: Vec<FeedbackEntry> = response
            .records
            .into_iter()
            .filter_map(|record| {
                let timestamp = record.timestamp()?;
                // Rows with a blank feedback field are noise, skip them.
                let text = record.fields.feedback.as_deref()?.to_string();
                if text.is_empty() {
                    return None;
                }
                Some(FeedbackEntry::new(timestamp, text).with_id(EntryId::new(record.id)))
            })
            .collect();

        entries.truncate(limit);
        Ok(entries)
    }

    async fn delete(&self, id: &EntryId) -> Result<bool> {
        let response = self
            .client
            .delete(format!("{}/{}", self.base_url, id))
            .bearer_auth(&self.token)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        response.error_for_status()?;
        Ok(true)
    }
}
