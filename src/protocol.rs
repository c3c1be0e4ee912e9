use serde::Serialize;

use crate::{
    models::{bookings::Booking, schedules::Slot},
    utils::{format_date, format_time},
};

#[derive(Default, Serialize)]
pub struct SimpleResponse {
    pub success: bool,
    pub msg: String,
}

impl SimpleResponse {
    pub fn ok<S: ToString>(msg: S) -> Self {
        Self {
            success: true,
            msg: msg.to_string(),
        }
    }

    pub fn err<S: ToString>(msg: S) -> Self {
        Self {
            success: false,
            msg: msg.to_string(),
        }
    }
}

/// Reply for endpoints that create a single record.
#[derive(Default, Serialize)]
pub struct CreatedResponse {
    pub success: bool,
    pub msg: String,
    pub id: i32,
}

impl CreatedResponse {
    pub fn new<S: ToString>(msg: S, id: i32) -> Self {
        Self {
            success: true,
            msg: msg.to_string(),
            id,
        }
    }
}

#[derive(Debug, Default, Serialize)]
pub struct BookingItem {
    pub id: i32,
    pub patient_id: i32,
    pub professional_id: i32,
    pub schedule_id: Option<i32>,
    pub slot_id: Option<i32>,
    pub date: String,
    pub time: String,
    pub status: String,
    pub is_remote: bool,
    pub remote_link: Option<String>,
}

impl From<Booking> for BookingItem {
    fn from(booking: Booking) -> Self {
        Self {
            id: booking.id,
            patient_id: booking.patient_id,
            professional_id: booking.professional_id,
            schedule_id: booking.schedule_id,
            slot_id: booking.slot_id,
            date: format_date(&booking.date),
            time: format_time(&booking.time),
            status: booking.status,
            is_remote: booking.is_remote,
            remote_link: booking.remote_link,
        }
    }
}

#[derive(Debug, Default, Serialize)]
pub struct SlotItem {
    pub id: i32,
    pub time: String,
    pub available: bool,
}

impl From<Slot> for SlotItem {
    fn from(slot: Slot) -> Self {
        Self {
            id: slot.id,
            time: format_time(&slot.time),
            available: slot.available,
        }
    }
}

/// One booking as the reply to a booking mutation.
#[derive(Default, Serialize)]
pub struct BookingResponse {
    pub success: bool,
    pub msg: String,
    pub booking: BookingItem,
}

impl BookingResponse {
    pub fn new<S: ToString>(msg: S, booking: Booking) -> Self {
        Self {
            success: true,
            msg: msg.to_string(),
            booking: booking.into(),
        }
    }
}

#[derive(Default, Serialize)]
pub struct BookingListResponse {
    pub success: bool,
    pub bookings: Vec<BookingItem>,
}

impl From<Vec<Booking>> for BookingListResponse {
    fn from(bookings: Vec<Booking>) -> Self {
        Self {
            success: true,
            bookings: bookings.into_iter().map(BookingItem::from).collect(),
        }
    }
}

#[derive(Default, Serialize)]
pub struct LinkResponse {
    pub success: bool,
    pub msg: String,
    pub video_link: String,
}

impl LinkResponse {
    pub fn new<S: ToString>(msg: S, video_link: String) -> Self {
        Self {
            success: true,
            msg: msg.to_string(),
            video_link,
        }
    }
}
