//! 时间工具函数 — 业务时区转换
//!
//! 所有时间戳在存储层都是 `i64` Unix millis (UTC)；
//! 租户本地时间的解释统一在这里完成。

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Timelike};
use chrono_tz::Tz;

use super::{AppError, AppResult};

/// 预订网格粒度：30 分钟
pub const GRID_MINUTES: i64 = 30;

/// Unix millis → 租户本地时间
///
/// 越界的毫秒值按 epoch 处理
pub fn millis_to_local(millis: i64, tz: Tz) -> DateTime<Tz> {
    let utc = DateTime::from_timestamp_millis(millis).unwrap_or_default();
    tz.from_utc_datetime(&utc.naive_utc())
}

/// 本地日期字符串 (YYYY-MM-DD)
pub fn local_date_str(millis: i64, tz: Tz) -> String {
    millis_to_local(millis, tz).format("%Y-%m-%d").to_string()
}

/// 本地小时 (0-23)，用于按小时直方图
pub fn local_hour(millis: i64, tz: Tz) -> u32 {
    millis_to_local(millis, tz).hour()
}

/// 解析日期字符串 (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {}", date)))
}

/// 解析 HH:MM 时间字符串
pub fn parse_hhmm(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M").ok()
}

/// 本地 naive 时间 → Unix millis
///
/// DST gap fallback: 如果本地时间不存在 (夏令时跳跃)，fallback 到 UTC。
pub fn local_naive_to_millis(naive: chrono::NaiveDateTime, tz: Tz) -> i64 {
    naive
        .and_local_timezone(tz)
        .latest()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| naive.and_utc().timestamp_millis())
}

/// 日期 + HH:MM → Unix millis (业务时区)
pub fn date_time_to_millis(date: NaiveDate, time: NaiveTime, tz: Tz) -> i64 {
    local_naive_to_millis(date.and_time(time), tz)
}

/// Normalize a timestamp to the nearest 30-minute grid point in the
/// tenant's timezone; exact midpoints (:15 / :45) round up.
///
/// Rounding runs in local time — the grid is local, and not every timezone
/// offset is a whole number of hours.
pub fn round_to_grid(millis: i64, tz: Tz) -> i64 {
    let local = millis_to_local(millis, tz);
    let naive = local.naive_local();
    let date = naive.date();

    let secs_into_day =
        i64::from(naive.time().num_seconds_from_midnight());
    let grid_secs = GRID_MINUTES * 60;
    let rem = secs_into_day % grid_secs;
    let rounded = if rem * 2 >= grid_secs {
        secs_into_day - rem + grid_secs
    } else {
        secs_into_day - rem
    };

    // 四舍五入可能越过午夜 (23:50 → 次日 00:00)
    let midnight = date.and_time(NaiveTime::MIN);
    local_naive_to_millis(midnight + Duration::seconds(rounded), tz)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TZ: Tz = chrono_tz::Europe::Madrid;

    fn local_millis(y: i32, m: u32, d: u32, h: u32, min: u32) -> i64 {
        let date = NaiveDate::from_ymd_opt(y, m, d).unwrap();
        let time = NaiveTime::from_hms_opt(h, min, 0).unwrap();
        date_time_to_millis(date, time, TZ)
    }

    fn grid_str(millis: i64) -> String {
        millis_to_local(round_to_grid(millis, TZ), TZ)
            .format("%H:%M")
            .to_string()
    }

    #[test]
    fn rounds_down_below_midpoint() {
        assert_eq!(grid_str(local_millis(2026, 9, 4, 19, 10)), "19:00");
        assert_eq!(grid_str(local_millis(2026, 9, 4, 19, 44)), "19:30");
    }

    #[test]
    fn rounds_up_above_midpoint() {
        assert_eq!(grid_str(local_millis(2026, 9, 4, 19, 20)), "19:30");
        assert_eq!(grid_str(local_millis(2026, 9, 4, 19, 50)), "20:00");
    }

    #[test]
    fn ties_round_up() {
        assert_eq!(grid_str(local_millis(2026, 9, 4, 19, 15)), "19:30");
        assert_eq!(grid_str(local_millis(2026, 9, 4, 19, 45)), "20:00");
    }

    #[test]
    fn exact_grid_points_are_unchanged() {
        let exact = local_millis(2026, 9, 4, 19, 0);
        assert_eq!(round_to_grid(exact, TZ), exact);
        let half = local_millis(2026, 9, 4, 19, 30);
        assert_eq!(round_to_grid(half, TZ), half);
    }

    #[test]
    fn rollover_past_midnight() {
        let late = local_millis(2026, 9, 4, 23, 50);
        let rounded = millis_to_local(round_to_grid(late, TZ), TZ);
        assert_eq!(rounded.format("%Y-%m-%d %H:%M").to_string(), "2026-09-05 00:00");
    }

    #[test]
    fn local_hour_uses_tenant_timezone() {
        // 19:00 Madrid 夏令时 = 17:00 UTC
        let millis = local_millis(2026, 7, 10, 19, 0);
        assert_eq!(local_hour(millis, TZ), 19);
        assert_eq!(local_hour(millis, chrono_tz::UTC), 17);
    }

    #[test]
    fn parse_helpers() {
        assert!(parse_date("2026-08-07").is_ok());
        assert!(parse_date("07/08/2026").is_err());
        assert_eq!(
            parse_hhmm("17:00"),
            NaiveTime::from_hms_opt(17, 0, 0)
        );
        assert_eq!(parse_hhmm("25:00"), None);
    }
}
