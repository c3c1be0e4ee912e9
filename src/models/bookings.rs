use crate::schema::bookings;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use diesel::prelude::*;

pub const BOOKING_STATUS_SCHEDULED: &str = "scheduled";
pub const BOOKING_STATUS_DONE: &str = "done";
pub const BOOKING_STATUS_CANCELLED: &str = "cancelled";

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Identifiable)]
#[diesel(table_name = bookings)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Booking {
    pub id: i32,
    pub patient_id: i32,
    pub professional_id: i32,
    pub schedule_id: Option<i32>,
    pub slot_id: Option<i32>,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub status: String,
    pub is_remote: bool,
    pub remote_link: Option<String>,
    pub created_at: NaiveDateTime,
}

impl Booking {
    pub fn is_scheduled(&self) -> bool {
        self.status == BOOKING_STATUS_SCHEDULED
    }
}

#[derive(Insertable)]
#[diesel(table_name = bookings)]
pub struct NewBooking {
    pub patient_id: i32,
    pub professional_id: i32,
    pub schedule_id: Option<i32>,
    pub slot_id: Option<i32>,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub status: String,
    pub is_remote: bool,
    pub created_at: NaiveDateTime,
}
