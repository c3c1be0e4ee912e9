//! Booking engine: claims, releases and moves slots on behalf of patients.
//!
//! Every mutation runs in a single `BEGIN IMMEDIATE` transaction, so the slot
//! flag and the booking row always change together. Slot claims are
//! conditional updates; losing a race shows up as `SlotUnavailable`.

pub mod registry;

use chrono::{NaiveTime, Utc};
use diesel::prelude::*;
use tracing::info;

use crate::{
    auth::{Identity, Role},
    database::assert,
    error::ServiceError,
    models::{
        bookings::{
            Booking, NewBooking, BOOKING_STATUS_CANCELLED, BOOKING_STATUS_DONE,
            BOOKING_STATUS_SCHEDULED,
        },
        notifications::NewNotification,
        schedules::Slot,
    },
    utils::{format_date, format_time},
};

#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub schedule_id: i32,
    pub time: NaiveTime,
    pub patient_id: i32,
    pub is_remote: bool,
}

/// Link handed to both sides of a remote booking.
pub fn session_link(base_url: &str, booking_id: i32) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), booking_id)
}

fn load_booking(conn: &mut SqliteConnection, booking_id: i32) -> Result<Booking, ServiceError> {
    use crate::schema::bookings;

    bookings::table
        .find(booking_id)
        .first::<Booking>(conn)
        .optional()?
        .ok_or_else(|| ServiceError::not_found(format!("booking {}", booking_id)))
}

fn load_slot(conn: &mut SqliteConnection, slot_id: i32) -> Result<Slot, ServiceError> {
    use crate::schema::slots;

    slots::table
        .find(slot_id)
        .first::<Slot>(conn)
        .optional()?
        .ok_or_else(|| ServiceError::not_found(format!("slot {}", slot_id)))
}

/// Flips a free slot to taken. Zero affected rows means somebody else got it.
fn claim_slot(conn: &mut SqliteConnection, slot_id: i32) -> Result<(), ServiceError> {
    use crate::schema::slots;

    let updated = diesel::update(
        slots::table
            .filter(slots::id.eq(slot_id))
            .filter(slots::available.eq(true)),
    )
    .set(slots::available.eq(false))
    .execute(conn)?;
    if updated != 1 {
        return Err(ServiceError::SlotUnavailable);
    }
    Ok(())
}

fn release_slot(conn: &mut SqliteConnection, slot_id: Option<i32>) -> Result<(), ServiceError> {
    use crate::schema::slots;

    if let Some(slot_id) = slot_id {
        diesel::update(slots::table.find(slot_id))
            .set(slots::available.eq(true))
            .execute(conn)?;
    }
    Ok(())
}

fn notify_patient(
    conn: &mut SqliteConnection,
    patient_id: i32,
    title: &str,
    message: String,
) -> Result<(), ServiceError> {
    use crate::schema::notifications;

    diesel::insert_into(notifications::table)
        .values(&NewNotification {
            patient_id: Some(patient_id),
            title: title.to_string(),
            message,
            read: false,
            created_at: Utc::now().naive_utc(),
        })
        .execute(conn)?;
    Ok(())
}

/// The booking's patient, its professional, or an admin.
fn require_party(who: &Identity, booking: &Booking) -> Result<(), ServiceError> {
    who.require(&[Role::Patient, Role::Professional, Role::Admin])?;
    let allowed = match who.role {
        Role::Admin => true,
        Role::Patient => who.id == booking.patient_id,
        Role::Professional => who.id == booking.professional_id,
    };
    if !allowed {
        return Err(ServiceError::Forbidden(format!(
            "booking {} belongs to someone else",
            booking.id
        )));
    }
    Ok(())
}

fn require_scheduled(booking: &Booking) -> Result<(), ServiceError> {
    if booking.is_scheduled() {
        Ok(())
    } else if booking.status == BOOKING_STATUS_CANCELLED {
        Err(ServiceError::AlreadyCancelled(booking.id))
    } else {
        Err(ServiceError::NotScheduled(booking.id))
    }
}

pub fn book(
    conn: &mut SqliteConnection,
    who: &Identity,
    req: BookingRequest,
    telemedicine_base_url: &str,
) -> Result<Booking, ServiceError> {
    use crate::schema::{bookings, slots};

    who.require(&[Role::Patient, Role::Admin])?;
    who.require_patient_self(req.patient_id)?;

    conn.immediate_transaction(|conn| {
        assert::assert_patient(conn, req.patient_id)?;
        let schedule = registry::load_schedule(conn, req.schedule_id)?;

        let slot = slots::table
            .filter(slots::schedule_id.eq(req.schedule_id))
            .filter(slots::time.eq(req.time))
            .filter(slots::available.eq(true))
            .first::<Slot>(conn)
            .optional()?
            .ok_or(ServiceError::SlotUnavailable)?;
        claim_slot(conn, slot.id)?;

        let mut booking = diesel::insert_into(bookings::table)
            .values(&NewBooking {
                patient_id: req.patient_id,
                professional_id: schedule.professional_id,
                schedule_id: Some(schedule.id),
                slot_id: Some(slot.id),
                date: schedule.date,
                time: slot.time,
                status: BOOKING_STATUS_SCHEDULED.to_string(),
                is_remote: req.is_remote,
                created_at: Utc::now().naive_utc(),
            })
            .returning(Booking::as_returning())
            .get_result(conn)?;

        if req.is_remote {
            booking = diesel::update(bookings::table.find(booking.id))
                .set(bookings::remote_link.eq(session_link(telemedicine_base_url, booking.id)))
                .returning(Booking::as_returning())
                .get_result(conn)?;
        }

        notify_patient(
            conn,
            booking.patient_id,
            "Appointment booked",
            format!(
                "Your appointment is booked for {} at {}.",
                format_date(&booking.date),
                format_time(&booking.time)
            ),
        )?;

        info!(
            booking_id = booking.id,
            slot_id = slot.id,
            patient_id = booking.patient_id,
            "booking created"
        );
        Ok(booking)
    })
}

pub fn cancel(
    conn: &mut SqliteConnection,
    who: &Identity,
    booking_id: i32,
) -> Result<Booking, ServiceError> {
    use crate::schema::bookings;

    conn.immediate_transaction(|conn| {
        let booking = load_booking(conn, booking_id)?;
        require_party(who, &booking)?;
        require_scheduled(&booking)?;

        release_slot(conn, booking.slot_id)?;
        let booking = diesel::update(bookings::table.find(booking_id))
            .set(bookings::status.eq(BOOKING_STATUS_CANCELLED))
            .returning(Booking::as_returning())
            .get_result(conn)?;

        notify_patient(
            conn,
            booking.patient_id,
            "Appointment cancelled",
            format!(
                "Your appointment on {} at {} was cancelled.",
                format_date(&booking.date),
                format_time(&booking.time)
            ),
        )?;

        info!(booking_id, slot_id = ?booking.slot_id, "booking cancelled");
        Ok(booking)
    })
}

pub fn reschedule(
    conn: &mut SqliteConnection,
    who: &Identity,
    booking_id: i32,
    new_slot_id: i32,
) -> Result<Booking, ServiceError> {
    use crate::schema::bookings;

    conn.immediate_transaction(|conn| {
        let booking = load_booking(conn, booking_id)?;
        require_party(who, &booking)?;
        require_scheduled(&booking)?;

        let slot = load_slot(conn, new_slot_id)?;
        if !slot.available {
            return Err(ServiceError::SlotUnavailable);
        }
        let schedule = registry::load_schedule(conn, slot.schedule_id)?;
        if schedule.professional_id != booking.professional_id {
            return Err(ServiceError::ProviderMismatch);
        }

        release_slot(conn, booking.slot_id)?;
        claim_slot(conn, slot.id)?;
        let booking = diesel::update(bookings::table.find(booking_id))
            .set((
                bookings::slot_id.eq(Some(slot.id)),
                bookings::schedule_id.eq(Some(schedule.id)),
                bookings::date.eq(schedule.date),
                bookings::time.eq(slot.time),
            ))
            .returning(Booking::as_returning())
            .get_result(conn)?;

        notify_patient(
            conn,
            booking.patient_id,
            "Appointment rescheduled",
            format!(
                "Your appointment moved to {} at {}.",
                format_date(&booking.date),
                format_time(&booking.time)
            ),
        )?;

        info!(booking_id, new_slot_id, "booking rescheduled");
        Ok(booking)
    })
}

/// Marks an appointment as held. The slot stays taken.
pub fn complete(
    conn: &mut SqliteConnection,
    who: &Identity,
    booking_id: i32,
) -> Result<Booking, ServiceError> {
    use crate::schema::bookings;

    who.require(&[Role::Professional, Role::Admin])?;

    conn.immediate_transaction(|conn| {
        let booking = load_booking(conn, booking_id)?;
        require_party(who, &booking)?;
        require_scheduled(&booking)?;

        let booking = diesel::update(bookings::table.find(booking_id))
            .set(bookings::status.eq(BOOKING_STATUS_DONE))
            .returning(Booking::as_returning())
            .get_result(conn)?;

        notify_patient(
            conn,
            booking.patient_id,
            "Appointment completed",
            format!(
                "Your appointment on {} at {} was completed.",
                format_date(&booking.date),
                format_time(&booking.time)
            ),
        )?;

        info!(booking_id, "booking completed");
        Ok(booking)
    })
}

pub fn provider_bookings(
    conn: &mut SqliteConnection,
    who: &Identity,
    professional_id: i32,
) -> Result<Vec<Booking>, ServiceError> {
    use crate::schema::bookings;

    who.require(&[Role::Professional, Role::Admin])?;
    if who.role == Role::Professional && who.id != professional_id {
        return Err(ServiceError::Forbidden(
            "professionals may only list their own bookings".to_string(),
        ));
    }

    Ok(bookings::table
        .filter(bookings::professional_id.eq(professional_id))
        .order((bookings::date.asc(), bookings::time.asc()))
        .load::<Booking>(conn)?)
}

pub fn patient_history(
    conn: &mut SqliteConnection,
    who: &Identity,
    patient_id: i32,
) -> Result<Vec<Booking>, ServiceError> {
    use crate::schema::bookings;

    who.require_patient_self(patient_id)?;
    assert::assert_patient(conn, patient_id)?;

    Ok(bookings::table
        .filter(bookings::patient_id.eq(patient_id))
        .order((bookings::date.desc(), bookings::time.desc()))
        .load::<Booking>(conn)?)
}

/// Video link of a remote booking.
pub fn remote_link(
    conn: &mut SqliteConnection,
    who: &Identity,
    booking_id: i32,
) -> Result<String, ServiceError> {
    let booking = load_booking(conn, booking_id)?;
    require_party(who, &booking)?;

    match (booking.is_remote, booking.remote_link) {
        (true, Some(link)) => Ok(link),
        _ => Err(ServiceError::invalid(format!(
            "booking {} is not a remote appointment",
            booking_id
        ))),
    }
}
