/// All primary keys are UUIDs generated by the application at creation time.
///
/// Version 7 ids are used so that sorting by id follows creation order.
pub type DbId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Calendar date of a class, in the studio's local timezone.
pub type ClassDate = chrono::NaiveDate;

/// Clock-of-day start time of a class, in the studio's local timezone.
pub type ClassTime = chrono::NaiveTime;

/// Generate a fresh primary key.
pub fn new_id() -> DbId {
    uuid::Uuid::now_v7()
}
