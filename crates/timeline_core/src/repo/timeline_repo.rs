//! Timeline repository.

use super::{bool_to_int, ensure_connection_ready, parse_flag, parse_uuid, RepoError, RepoResult};
use crate::model::bounds::TimelineBounds;
use crate::model::timeline::{IntervalSettings, Timeline, TimelineId};
use rusqlite::{params, Connection, Row};

const TIMELINE_SELECT_SQL: &str = "SELECT
    uuid,
    title,
    start_at,
    end_at,
    orientation,
    interval_type,
    interval_count,
    is_deleted
FROM timelines";

/// Storage contract for timelines.
pub trait TimelineRepository {
    fn create_timeline(&self, timeline: &Timeline) -> RepoResult<TimelineId>;
    fn update_timeline(&self, timeline: &Timeline) -> RepoResult<()>;
    fn get_timeline(&self, id: TimelineId, include_deleted: bool) -> RepoResult<Option<Timeline>>;
    /// Lists timelines by `updated_at DESC, uuid ASC`.
    fn list_timelines(&self, include_deleted: bool) -> RepoResult<Vec<Timeline>>;
    fn soft_delete_timeline(&self, id: TimelineId) -> RepoResult<()>;
}

/// SQLite-backed timeline repository.
pub struct SqliteTimelineRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTimelineRepository<'conn> {
    /// Wraps a connection opened through `open_db`/`open_db_in_memory`.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl TimelineRepository for SqliteTimelineRepository<'_> {
    fn create_timeline(&self, timeline: &Timeline) -> RepoResult<TimelineId> {
        timeline.validate()?;

        self.conn.execute(
            "INSERT INTO timelines (
                uuid,
                title,
                start_at,
                end_at,
                orientation,
                interval_type,
                interval_count,
                is_deleted
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
            params![
                timeline.uuid.to_string(),
                timeline.title.as_str(),
                timeline.bounds.start(),
                timeline.bounds.end(),
                timeline.orientation.as_str(),
                timeline.interval.kind.as_str(),
                timeline.interval.even_count,
                bool_to_int(timeline.is_deleted),
            ],
        )?;

        Ok(timeline.uuid)
    }

    fn update_timeline(&self, timeline: &Timeline) -> RepoResult<()> {
        timeline.validate()?;

        let changed = self.conn.execute(
            "UPDATE timelines
             SET
                title = ?1,
                start_at = ?2,
                end_at = ?3,
                orientation = ?4,
                interval_type = ?5,
                interval_count = ?6,
                is_deleted = ?7,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?8;",
            params![
                timeline.title.as_str(),
                timeline.bounds.start(),
                timeline.bounds.end(),
                timeline.orientation.as_str(),
                timeline.interval.kind.as_str(),
                timeline.interval.even_count,
                bool_to_int(timeline.is_deleted),
                timeline.uuid.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(timeline.uuid));
        }
        Ok(())
    }

    fn get_timeline(&self, id: TimelineId, include_deleted: bool) -> RepoResult<Option<Timeline>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TIMELINE_SELECT_SQL}
             WHERE uuid = ?1
               AND (?2 = 1 OR is_deleted = 0);"
        ))?;

        let mut rows = stmt.query(params![id.to_string(), bool_to_int(include_deleted)])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_timeline_row(row)?)),
            None => Ok(None),
        }
    }

    fn list_timelines(&self, include_deleted: bool) -> RepoResult<Vec<Timeline>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TIMELINE_SELECT_SQL}
             WHERE (?1 = 1 OR is_deleted = 0)
             ORDER BY updated_at DESC, uuid ASC;"
        ))?;

        let mut rows = stmt.query([bool_to_int(include_deleted)])?;
        let mut timelines = Vec::new();
        while let Some(row) = rows.next()? {
            timelines.push(parse_timeline_row(row)?);
        }
        Ok(timelines)
    }

    fn soft_delete_timeline(&self, id: TimelineId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE timelines
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
}

fn parse_timeline_row(row: &Row<'_>) -> RepoResult<Timeline> {
    let uuid_text: String = row.get("uuid")?;
    let uuid = parse_uuid(&uuid_text, "timelines.uuid")?;

    let start = row.get("start_at")?;
    let end = row.get("end_at")?;
    let bounds = TimelineBounds::new(start, end).map_err(|err| {
        RepoError::InvalidData(format!("timeline {uuid_text} has invalid bounds: {err}"))
    })?;

    let orientation_text: String = row.get("orientation")?;
    let orientation = orientation_text.parse().map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid orientation `{orientation_text}` in timelines.orientation"
        ))
    })?;

    let interval_text: String = row.get("interval_type")?;
    let kind = interval_text.parse().map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid interval type `{interval_text}` in timelines.interval_type"
        ))
    })?;

    let timeline = Timeline {
        uuid,
        title: row.get("title")?,
        bounds,
        orientation,
        interval: IntervalSettings {
            kind,
            even_count: row.get("interval_count")?,
        },
        is_deleted: parse_flag(row.get("is_deleted")?, "timelines.is_deleted")?,
    };
    timeline.validate()?;
    Ok(timeline)
}
