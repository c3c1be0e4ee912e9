use crate::schema::{schedules, slots};
use chrono::{NaiveDate, NaiveTime};
use diesel::prelude::*;

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Identifiable)]
#[diesel(table_name = schedules)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Schedule {
    pub id: i32,
    pub professional_id: i32,
    pub date: NaiveDate,
}

#[derive(Insertable)]
#[diesel(table_name = schedules)]
pub struct NewSchedule {
    pub professional_id: i32,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Identifiable)]
#[diesel(table_name = slots)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Slot {
    pub id: i32,
    pub schedule_id: i32,
    pub time: NaiveTime,
    pub available: bool,
}

#[derive(Insertable)]
#[diesel(table_name = slots)]
pub struct NewSlot {
    pub schedule_id: i32,
    pub time: NaiveTime,
    pub available: bool,
}
