/// Primary keys of marketplace tables (jobs, applications, posts) are BIGSERIAL.
pub type DbId = i64;

/// Identity-provider user ids; also the primary key of profile rows.
pub type UserId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
