pub mod beds;
pub mod bookings;
pub mod exams;
pub mod notifications;
pub mod patients;
pub mod professionals;
pub mod records;
pub mod schedules;
pub mod users;
