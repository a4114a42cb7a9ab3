//! Timeline event repository.
//!
//! # Invariants
//! - `list_events` order is `event_at ASC` (undated first), then
//!   `created_at ASC, uuid ASC`; layout relies on it as a stable input order.
//! - `save_offsets` writes all offsets of one layout pass or none.

use super::{bool_to_int, ensure_connection_ready, parse_flag, parse_uuid, RepoError, RepoResult};
use crate::model::event::{AutoOffset, EventId, EventOffset, EventSize, TimelineEvent};
use crate::model::timeline::TimelineId;
use rusqlite::{params, Connection, Row};

const EVENT_SELECT_SQL: &str = "SELECT
    uuid,
    timeline_uuid,
    title,
    description,
    image_url,
    color,
    size,
    event_at,
    x_offset,
    y_offset,
    auto_layouted,
    auto_perpendicular,
    auto_axis,
    is_deleted
FROM timeline_events";

/// Storage contract for timeline events.
pub trait EventRepository {
    fn create_event(&self, event: &TimelineEvent) -> RepoResult<EventId>;
    fn update_event(&self, event: &TimelineEvent) -> RepoResult<()>;
    fn get_event(&self, id: EventId, include_deleted: bool) -> RepoResult<Option<TimelineEvent>>;
    fn list_events(&self, timeline_id: TimelineId) -> RepoResult<Vec<TimelineEvent>>;
    fn soft_delete_event(&self, id: EventId) -> RepoResult<()>;
    /// Persists position fields only, atomically. Returns rows updated.
    fn save_offsets(&self, events: &[TimelineEvent]) -> RepoResult<usize>;
}

/// SQLite-backed event repository.
pub struct SqliteEventRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEventRepository<'conn> {
    /// Wraps a connection opened through `open_db`/`open_db_in_memory`.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl EventRepository for SqliteEventRepository<'_> {
    fn create_event(&self, event: &TimelineEvent) -> RepoResult<EventId> {
        event.validate()?;

        self.conn.execute(
            "INSERT INTO timeline_events (
                uuid,
                timeline_uuid,
                title,
                description,
                image_url,
                color,
                size,
                event_at,
                x_offset,
                y_offset,
                auto_layouted,
                auto_perpendicular,
                auto_axis,
                is_deleted
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14);",
            params![
                event.uuid.to_string(),
                event.timeline_uuid.to_string(),
                event.title.as_str(),
                event.description.as_str(),
                event.image_url.as_deref(),
                event.color.as_str(),
                event.size.as_str(),
                event.date,
                event.offset.map(|offset| offset.x),
                event.offset.map(|offset| offset.y),
                bool_to_int(event.auto_layouted),
                event.auto_offset.map(|auto| auto.perpendicular),
                event.auto_offset.map(|auto| auto.axis),
                bool_to_int(event.is_deleted),
            ],
        )?;

        Ok(event.uuid)
    }

    fn update_event(&self, event: &TimelineEvent) -> RepoResult<()> {
        event.validate()?;

        let changed = self.conn.execute(
            "UPDATE timeline_events
             SET
                title = ?1,
                description = ?2,
                image_url = ?3,
                color = ?4,
                size = ?5,
                event_at = ?6,
                x_offset = ?7,
                y_offset = ?8,
                auto_layouted = ?9,
                auto_perpendicular = ?10,
                auto_axis = ?11,
                is_deleted = ?12,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?13;",
            params![
                event.title.as_str(),
                event.description.as_str(),
                event.image_url.as_deref(),
                event.color.as_str(),
                event.size.as_str(),
                event.date,
                event.offset.map(|offset| offset.x),
                event.offset.map(|offset| offset.y),
                bool_to_int(event.auto_layouted),
                event.auto_offset.map(|auto| auto.perpendicular),
                event.auto_offset.map(|auto| auto.axis),
                bool_to_int(event.is_deleted),
                event.uuid.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(event.uuid));
        }
        Ok(())
    }

    fn get_event(&self, id: EventId, include_deleted: bool) -> RepoResult<Option<TimelineEvent>> {
        let mut stmt = self.conn.prepare(&format!(
            "{EVENT_SELECT_SQL}
             WHERE uuid = ?1
               AND (?2 = 1 OR is_deleted = 0);"
        ))?;

        let mut rows = stmt.query(params![id.to_string(), bool_to_int(include_deleted)])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_event_row(row)?)),
            None => Ok(None),
        }
    }

    fn list_events(&self, timeline_id: TimelineId) -> RepoResult<Vec<TimelineEvent>> {
        let mut stmt = self.conn.prepare(&format!(
            "{EVENT_SELECT_SQL}
             WHERE timeline_uuid = ?1 AND is_deleted = 0
             ORDER BY event_at ASC, created_at ASC, uuid ASC;"
        ))?;

        let mut rows = stmt.query([timeline_id.to_string()])?;
        let mut events = Vec::new();
        while let Some(row) = rows.next()? {
            events.push(parse_event_row(row)?);
        }
        Ok(events)
    }

    fn soft_delete_event(&self, id: EventId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE timeline_events
             SET
                is_deleted = 1,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1;",
            [id.to_string()],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }

    fn save_offsets(&self, events: &[TimelineEvent]) -> RepoResult<usize> {
        let tx = self.conn.unchecked_transaction()?;
        let mut updated = 0;
        {
            let mut stmt = tx.prepare(
                "UPDATE timeline_events
                 SET
                    x_offset = ?1,
                    y_offset = ?2,
                    auto_layouted = ?3,
                    auto_perpendicular = ?4,
                    auto_axis = ?5,
                    updated_at = (strftime('%s', 'now') * 1000)
                 WHERE uuid = ?6;",
            )?;
            for event in events {
                event.validate()?;
                let changed = stmt.execute(params![
                    event.offset.map(|offset| offset.x),
                    event.offset.map(|offset| offset.y),
                    bool_to_int(event.auto_layouted),
                    event.auto_offset.map(|auto| auto.perpendicular),
                    event.auto_offset.map(|auto| auto.axis),
                    event.uuid.to_string(),
                ])?;
                if changed == 0 {
                    return Err(RepoError::NotFound(event.uuid));
                }
                updated += changed;
            }
        }
        tx.commit()?;
        Ok(updated)
    }
}

fn parse_event_row(row: &Row<'_>) -> RepoResult<TimelineEvent> {
    let uuid_text: String = row.get("uuid")?;
    let timeline_text: String = row.get("timeline_uuid")?;

    let size_text: String = row.get("size")?;
    let size = EventSize::parse(&size_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid size `{size_text}` in timeline_events.size"))
    })?;

    let offset = match (
        row.get::<_, Option<f64>>("x_offset")?,
        row.get::<_, Option<f64>>("y_offset")?,
    ) {
        (Some(x), Some(y)) => Some(EventOffset { x, y }),
        (None, None) => None,
        _ => {
            return Err(RepoError::InvalidData(format!(
                "event {uuid_text} has only one of x_offset/y_offset"
            )));
        }
    };

    let auto_layouted = parse_flag(row.get("auto_layouted")?, "timeline_events.auto_layouted")?;
    let auto_offset = match (
        row.get::<_, Option<f64>>("auto_perpendicular")?,
        row.get::<_, Option<f64>>("auto_axis")?,
    ) {
        (Some(perpendicular), Some(axis)) if auto_layouted => Some(AutoOffset {
            perpendicular,
            axis,
        }),
        _ => None,
    };

    let event = TimelineEvent {
        uuid: parse_uuid(&uuid_text, "timeline_events.uuid")?,
        timeline_uuid: parse_uuid(&timeline_text, "timeline_events.timeline_uuid")?,
        title: row.get("title")?,
        description: row.get("description")?,
        image_url: row.get("image_url")?,
        color: row.get("color")?,
        size,
        date: row.get("event_at")?,
        offset,
        auto_layouted,
        auto_offset,
        is_deleted: parse_flag(row.get("is_deleted")?, "timeline_events.is_deleted")?,
    };
    event.validate()?;
    Ok(event)
}
