//! 营业时间解析 — 每租户时区内的开门/最后入座窗口
//!
//! Hours are same-day windows (open < close). The bookable window on a date
//! is [open, close − last_seating_offset]; a request past last seating is
//! OUTSIDE_HOURS even though the restaurant is still serving.

use chrono::{Datelike, NaiveDate};
use shared::models::Restaurant;

use crate::utils::time::{date_time_to_millis, parse_hhmm};

/// Bookable window on one local date, in Unix millis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceWindow {
    pub open: i64,
    /// Last seating moment (inclusive)
    pub last_seating: i64,
}

/// Where a requested time falls relative to the service window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoursVerdict {
    /// No hours that weekday
    Closed,
    /// Open that day, but the time is before open or past last seating
    OutsideHours(ServiceWindow),
    /// Bookable
    Within(ServiceWindow),
}

/// Resolve the bookable window for a local date, if the restaurant opens
pub fn service_window(restaurant: &Restaurant, date: NaiveDate) -> Option<ServiceWindow> {
    let hours = restaurant.hours();
    let day = hours.for_weekday(date.weekday())?;

    let open_time = parse_hhmm(&day.open)?;
    let close_time = parse_hhmm(&day.close)?;
    if close_time <= open_time {
        // 跨午夜营业不建模为可预订窗口
        return None;
    }

    let offset = chrono::Duration::minutes(restaurant.last_seating_offset_min.max(0));
    let last_seating_time = close_time - offset;
    if last_seating_time <= open_time {
        return None;
    }

    let tz = restaurant.tz();
    Some(ServiceWindow {
        open: date_time_to_millis(date, open_time, tz),
        last_seating: date_time_to_millis(date, last_seating_time, tz),
    })
}

/// Classify a requested time against the date's service window
pub fn classify(restaurant: &Restaurant, date: NaiveDate, requested_millis: i64) -> HoursVerdict {
    match service_window(restaurant, date) {
        None => HoursVerdict::Closed,
        Some(window) => {
            if requested_millis < window.open || requested_millis > window.last_seating {
                HoursVerdict::OutsideHours(window)
            } else {
                HoursVerdict::Within(window)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use shared::models::WeeklyHours;

    fn restaurant(hours_json: &str, offset_min: i64) -> Restaurant {
        Restaurant {
            id: 1,
            name: "Test".into(),
            timezone: "Europe/Madrid".into(),
            weekly_hours: hours_json.into(),
            max_party_size: 20,
            large_party_threshold: 8,
            last_seating_offset_min: offset_min,
            booking_horizon_days: 90,
            is_active: true,
            created_at: 0,
            updated_at: 0,
        }
    }

    fn fri_17_to_23() -> String {
        r#"{"fri":{"open":"17:00","close":"23:00"}}"#.into()
    }

    fn local(date: NaiveDate, h: u32, m: u32) -> i64 {
        date_time_to_millis(
            date,
            NaiveTime::from_hms_opt(h, m, 0).unwrap(),
            chrono_tz::Europe::Madrid,
        )
    }

    // 2026-09-04 is a Friday
    fn friday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 9, 4).unwrap()
    }

    #[test]
    fn closed_weekday_has_no_window() {
        let r = restaurant(&fri_17_to_23(), 60);
        let saturday = friday().succ_opt().unwrap();
        assert!(service_window(&r, saturday).is_none());
        assert_eq!(classify(&r, saturday, local(saturday, 19, 0)), HoursVerdict::Closed);
    }

    #[test]
    fn window_ends_at_last_seating() {
        let r = restaurant(&fri_17_to_23(), 60);
        let window = service_window(&r, friday()).unwrap();
        assert_eq!(window.open, local(friday(), 17, 0));
        assert_eq!(window.last_seating, local(friday(), 22, 0));
    }

    #[test]
    fn request_past_last_seating_is_outside_hours() {
        let r = restaurant(&fri_17_to_23(), 60);
        // 22:45 请求，最后入座 22:00
        let verdict = classify(&r, friday(), local(friday(), 22, 45));
        assert!(matches!(verdict, HoursVerdict::OutsideHours(_)));

        // 边界: 恰好 22:00 可订
        let verdict = classify(&r, friday(), local(friday(), 22, 0));
        assert!(matches!(verdict, HoursVerdict::Within(_)));

        // 开门前不可订
        let verdict = classify(&r, friday(), local(friday(), 16, 30));
        assert!(matches!(verdict, HoursVerdict::OutsideHours(_)));
    }

    #[test]
    fn degenerate_hours_read_as_closed() {
        // close <= open
        let r = restaurant(r#"{"fri":{"open":"23:00","close":"02:00"}}"#, 60);
        assert!(service_window(&r, friday()).is_none());

        // 偏移吃掉整个窗口
        let r = restaurant(r#"{"fri":{"open":"17:00","close":"17:30"}}"#, 60);
        assert!(service_window(&r, friday()).is_none());

        // 坏的 HH:MM
        let r = restaurant(r#"{"fri":{"open":"5pm","close":"23:00"}}"#, 60);
        assert!(service_window(&r, friday()).is_none());
    }
}
