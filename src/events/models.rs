// Domain event models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Kind of change an event records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    #[serde(rename = "company.created")]
    CompanyCreated,
    #[serde(rename = "company.updated")]
    CompanyUpdated,
    #[serde(rename = "company.deleted")]
    CompanyDeleted,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::CompanyCreated => "company.created",
            EventType::CompanyUpdated => "company.updated",
            EventType::CompanyDeleted => "company.deleted",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Append-only record of a successful company mutation
///
/// `entity_id` is a weak reference: the company may be gone by the time the
/// event is read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub timestamp: DateTime<Utc>,
    pub entity_id: Uuid,
}

impl Event {
    pub fn new(event_type: EventType, entity_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            event_type,
            timestamp: Utc::now(),
            entity_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type_wire_names() {
        assert_eq!(
            serde_json::to_string(&EventType::CompanyCreated).unwrap(),
            "\"company.created\""
        );
        assert_eq!(EventType::CompanyUpdated.to_string(), "company.updated");
        assert_eq!(EventType::CompanyDeleted.as_str(), "company.deleted");
    }

    #[test]
    fn test_new_events_get_fresh_ids() {
        let entity = Uuid::new_v4();
        let a = Event::new(EventType::CompanyCreated, entity);
        let b = Event::new(EventType::CompanyCreated, entity);
        assert_ne!(a.id, b.id);
        assert_eq!(a.entity_id, entity);
        assert!(a.timestamp <= b.timestamp);
    }
}
