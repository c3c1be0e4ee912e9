//! Schedules and the slots published on them.

use chrono::{NaiveDate, NaiveTime};
use diesel::prelude::*;
use tracing::{info, warn};

use crate::{
    auth::Identity,
    database::assert,
    error::ServiceError,
    models::{
        bookings::{Booking, BOOKING_STATUS_CANCELLED},
        schedules::{NewSchedule, NewSlot, Schedule, Slot},
    },
    utils::parse_time_str,
};

/// Result of a `publish_slots` batch.
#[derive(Debug, Default)]
pub struct PublishOutcome {
    pub created: Vec<Slot>,
    /// Times that already had a slot, as sent by the caller.
    pub ignored: Vec<String>,
}

/// A schedule with its slots and every booking made on it.
#[derive(Debug)]
pub struct ScheduleDetail {
    pub schedule: Schedule,
    pub slots: Vec<Slot>,
    pub bookings: Vec<Booking>,
}

pub(crate) fn load_schedule(
    conn: &mut SqliteConnection,
    schedule_id: i32,
) -> Result<Schedule, ServiceError> {
    use crate::schema::schedules;

    schedules::table
        .find(schedule_id)
        .first::<Schedule>(conn)
        .optional()?
        .ok_or_else(|| ServiceError::not_found(format!("schedule {}", schedule_id)))
}

pub fn create_schedule(
    conn: &mut SqliteConnection,
    who: &Identity,
    professional_id: i32,
    date: NaiveDate,
) -> Result<Schedule, ServiceError> {
    use crate::schema::schedules;

    who.require_schedule_owner(professional_id)?;

    conn.immediate_transaction(|conn| {
        assert::assert_professional(conn, professional_id)?;

        let existing = schedules::table
            .filter(schedules::professional_id.eq(professional_id))
            .filter(schedules::date.eq(date))
            .first::<Schedule>(conn)
            .optional()?;
        if let Some(existing) = existing {
            warn!(
                schedule_id = existing.id,
                professional_id, "schedule already exists for this date"
            );
            return Err(ServiceError::Conflict(format!(
                "professional {} already has schedule {} on {}",
                professional_id, existing.id, date
            )));
        }

        let schedule = diesel::insert_into(schedules::table)
            .values(&NewSchedule {
                professional_id,
                date,
            })
            .returning(Schedule::as_returning())
            .get_result(conn)?;

        info!(schedule_id = schedule.id, professional_id, %date, "schedule created");
        Ok(schedule)
    })
}

pub fn publish_slots<S: AsRef<str>>(
    conn: &mut SqliteConnection,
    who: &Identity,
    schedule_id: i32,
    times: &[S],
) -> Result<PublishOutcome, ServiceError> {
    use crate::schema::slots;

    let parsed = times
        .iter()
        .map(|raw| parse_time_str(raw).map(|time| (raw.as_ref().to_string(), time)))
        .collect::<Result<Vec<(String, NaiveTime)>, _>>()?;

    conn.immediate_transaction(|conn| {
        let schedule = load_schedule(conn, schedule_id)?;
        who.require_schedule_owner(schedule.professional_id)?;

        let mut outcome = PublishOutcome::default();
        for (raw, time) in parsed {
            let exists = slots::table
                .filter(slots::schedule_id.eq(schedule_id))
                .filter(slots::time.eq(time))
                .count()
                .get_result::<i64>(conn)?;
            if exists > 0 {
                outcome.ignored.push(raw);
                continue;
            }

            let slot = diesel::insert_into(slots::table)
                .values(&NewSlot {
                    schedule_id,
                    time,
                    available: true,
                })
                .returning(Slot::as_returning())
                .get_result(conn)?;
            outcome.created.push(slot);
        }

        info!(
            schedule_id,
            created = outcome.created.len(),
            ignored = outcome.ignored.len(),
            "slots published"
        );
        Ok(outcome)
    })
}

pub fn delete_schedule(
    conn: &mut SqliteConnection,
    who: &Identity,
    schedule_id: i32,
) -> Result<(), ServiceError> {
    use crate::schema::{bookings, schedules, slots};

    conn.immediate_transaction(|conn| {
        let schedule = load_schedule(conn, schedule_id)?;
        who.require_schedule_owner(schedule.professional_id)?;

        let taken = bookings::table
            .filter(bookings::schedule_id.eq(schedule_id))
            .filter(bookings::status.ne(BOOKING_STATUS_CANCELLED))
            .count()
            .get_result::<i64>(conn)?;
        if taken > 0 {
            return Err(ServiceError::Conflict(format!(
                "schedule {} has {} active or completed bookings",
                schedule_id, taken
            )));
        }

        diesel::delete(slots::table.filter(slots::schedule_id.eq(schedule_id))).execute(conn)?;
        diesel::delete(schedules::table.find(schedule_id)).execute(conn)?;

        info!(schedule_id, "schedule deleted");
        Ok(())
    })
}

pub fn list_schedules(
    conn: &mut SqliteConnection,
    who: &Identity,
    professional_id: i32,
    date: Option<NaiveDate>,
) -> Result<Vec<Schedule>, ServiceError> {
    use crate::schema::schedules;

    who.require_schedule_owner(professional_id)?;

    let mut query = schedules::table
        .filter(schedules::professional_id.eq(professional_id))
        .into_boxed();
    if let Some(date) = date {
        query = query.filter(schedules::date.eq(date));
    }

    Ok(query.order(schedules::date.asc()).load::<Schedule>(conn)?)
}

pub fn schedule_detail(
    conn: &mut SqliteConnection,
    who: &Identity,
    schedule_id: i32,
) -> Result<ScheduleDetail, ServiceError> {
    use crate::schema::{bookings, slots};

    let schedule = load_schedule(conn, schedule_id)?;
    who.require_schedule_owner(schedule.professional_id)?;

    let slots = slots::table
        .filter(slots::schedule_id.eq(schedule_id))
        .order(slots::time.asc())
        .load::<Slot>(conn)?;
    let bookings = bookings::table
        .filter(bookings::schedule_id.eq(schedule_id))
        .order(bookings::time.asc())
        .load::<Booking>(conn)?;

    Ok(ScheduleDetail {
        schedule,
        slots,
        bookings,
    })
}

/// Every schedule with at least one free slot, ordered by date then professional.
pub fn available_slots(
    conn: &mut SqliteConnection,
) -> Result<Vec<(Schedule, Vec<Slot>)>, ServiceError> {
    use crate::schema::{schedules, slots};

    let rows = schedules::table
        .inner_join(slots::table)
        .filter(slots::available.eq(true))
        .order((
            schedules::date.asc(),
            schedules::professional_id.asc(),
            schedules::id.asc(),
            slots::time.asc(),
        ))
        .load::<(Schedule, Slot)>(conn)?;

    let mut open: Vec<(Schedule, Vec<Slot>)> = Vec::new();
    for (schedule, slot) in rows {
        if let Some((last, list)) = open.last_mut() {
            if last.id == schedule.id {
                list.push(slot);
                continue;
            }
        }
        open.push((schedule, vec![slot]));
    }
    Ok(open)
}
