use blake2::{Blake2b512, Digest};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use subtle::ConstantTimeEq;

use crate::error::ServiceError;

const DATE_FMT: &str = "%Y-%m-%d";
const TIME_FMT: &str = "%H:%M";
const TIME_FMT_SECS: &str = "%H:%M:%S";
const DATETIME_FMT: &str = "%Y-%m-%dT%H:%M:%S";

pub fn parse_date_str<S: AsRef<str>>(s: S) -> Result<NaiveDate, ServiceError> {
    NaiveDate::parse_from_str(s.as_ref().trim(), DATE_FMT).map_err(|_| {
        ServiceError::invalid(format!(
            "invalid date '{}', expected YYYY-MM-DD",
            s.as_ref()
        ))
    })
}

/// Accepts `HH:MM` and `HH:MM:SS`.
pub fn parse_time_str<S: AsRef<str>>(s: S) -> Result<NaiveTime, ServiceError> {
    let s = s.as_ref().trim();
    NaiveTime::parse_from_str(s, TIME_FMT)
        .or_else(|_| NaiveTime::parse_from_str(s, TIME_FMT_SECS))
        .map_err(|_| ServiceError::invalid(format!("invalid time '{}', expected HH:MM", s)))
}

/// Accepts a full `YYYY-MM-DDTHH:MM:SS` or a bare date (midnight).
pub fn parse_datetime_str<S: AsRef<str>>(s: S) -> Result<NaiveDateTime, ServiceError> {
    let s = s.as_ref().trim();
    if let Ok(time) = NaiveDateTime::parse_from_str(s, DATETIME_FMT) {
        return Ok(time);
    }
    parse_date_str(s)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| {
            ServiceError::invalid(format!(
                "invalid datetime '{}', expected YYYY-MM-DDTHH:MM:SS",
                s
            ))
        })
}

pub fn format_date(date: &NaiveDate) -> String {
    date.format(DATE_FMT).to_string()
}

pub fn format_time(time: &NaiveTime) -> String {
    time.format(TIME_FMT).to_string()
}

pub fn format_datetime(time: &NaiveDateTime) -> String {
    time.format(DATETIME_FMT).to_string()
}

pub fn get_str_pattern<S: AsRef<str>>(s: S) -> String {
    format!("%{}%", s.as_ref())
}

fn digest_password(salt: &str, password: &str) -> Vec<u8> {
    Blake2b512::new()
        .chain_update(salt.as_bytes())
        .chain_update(password.as_bytes())
        .finalize()
        .to_vec()
}

/// Stored as `salt$hex(blake2b512(salt || password))`.
pub fn hash_password(password: &str) -> String {
    let salt = uuid::Uuid::new_v4().simple().to_string();
    format!("{}${}", salt, hex::encode(digest_password(&salt, password)))
}

/// Compares digest bytes in constant time.
pub fn verify_password(stored: &str, password: &str) -> bool {
    let Some((salt, hashed)) = stored.split_once('$') else {
        return false;
    };
    match hex::decode(hashed) {
        Ok(expected) => digest_password(salt, password)
            .as_slice()
            .ct_eq(expected.as_slice())
            .into(),
        Err(_) => false,
    }
}

/// Rejects blank strings in required body fields.
pub fn require_field(name: &str, value: &str) -> Result<(), ServiceError> {
    if value.trim().is_empty() {
        return Err(ServiceError::invalid(format!("'{}' is required", name)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_accepts_both_formats() {
        let short = parse_time_str("09:30").unwrap();
        let long = parse_time_str("09:30:00").unwrap();
        assert_eq!(short, long);
        assert_eq!(format_time(&short), "09:30");
    }

    #[test]
    fn malformed_time_is_invalid_input() {
        assert!(matches!(
            parse_time_str("9h30"),
            Err(ServiceError::InvalidInput(_))
        ));
        assert!(parse_time_str("25:00").is_err());
    }

    #[test]
    fn date_round_trips_through_format() {
        let date = parse_date_str("2024-01-10").unwrap();
        assert_eq!(format_date(&date), "2024-01-10");
        assert!(parse_date_str("10/01/2024").is_err());
    }

    #[test]
    fn datetime_falls_back_to_midnight() {
        let time = parse_datetime_str("2024-03-01").unwrap();
        assert_eq!(format_datetime(&time), "2024-03-01T00:00:00");
        let time = parse_datetime_str("2024-03-01T14:15:00").unwrap();
        assert_eq!(format_datetime(&time), "2024-03-01T14:15:00");
    }

    #[test]
    fn password_hash_is_salted_and_verifiable() {
        let first = hash_password("s3cret");
        let second = hash_password("s3cret");
        assert_ne!(first, second);
        assert!(verify_password(&first, "s3cret"));
        assert!(!verify_password(&first, "wrong"));
        assert!(!verify_password("no-salt", "s3cret"));
    }

    #[test]
    fn password_check_rejects_tampered_digests() {
        let stored = hash_password("s3cret");
        let (salt, hashed) = stored.split_once('$').unwrap();
        assert_eq!(hashed.len(), 128);

        assert!(!verify_password(&format!("{}$zz", salt), "s3cret"));
        assert!(!verify_password(&format!("{}${}", salt, &hashed[..64]), "s3cret"));
        let mut flipped = hashed.to_string();
        let last = if flipped.ends_with('0') { "1" } else { "0" };
        flipped.replace_range(127.., last);
        assert!(!verify_password(&format!("{}${}", salt, flipped), "s3cret"));
    }

    #[test]
    fn blank_field_is_rejected() {
        assert!(require_field("name", "  ").is_err());
        assert!(require_field("name", "Ana").is_ok());
    }
}
