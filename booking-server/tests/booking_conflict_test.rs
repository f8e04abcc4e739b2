//! 预订并发冲突测试
//!
//! 多个并发来电抢同一时段的最后一张桌：恰好一个成功，其余拿到
//! conflict，容量计数器不超过总容量。

use booking_server::booking;
use booking_server::db::DbService;
use booking_server::db::repository::{reservation, restaurant, time_slot};
use chrono::{Datelike, Duration, NaiveTime, Weekday};
use shared::models::{
    DayHours, ReservationStatus, RestaurantCreate, SeatingArea, TimeSlotCreate, WeeklyHours,
};
use shared::request::{BookingCustomer, BookingDetails, CreateBookingRequest};
use shared::response::BookingStatus;
use sqlx::SqlitePool;

const CONCURRENCY: usize = 8;

fn all_week_hours() -> WeeklyHours {
    let day = DayHours {
        open: "17:00".into(),
        close: "23:00".into(),
    };
    WeeklyHours {
        mon: Some(day.clone()),
        tue: Some(day.clone()),
        wed: Some(day.clone()),
        thu: Some(day.clone()),
        fri: Some(day.clone()),
        sat: Some(day.clone()),
        sun: Some(day),
    }
}

/// 下一个至少 7 天之后的周五 19:00 (Madrid)
fn next_friday_19h() -> i64 {
    let tz = chrono_tz::Europe::Madrid;
    let mut date = chrono::Utc::now().with_timezone(&tz).date_naive() + Duration::days(7);
    while date.weekday() != Weekday::Fri {
        date += Duration::days(1);
    }
    date.and_time(NaiveTime::from_hms_opt(19, 0, 0).unwrap())
        .and_local_timezone(tz)
        .latest()
        .unwrap()
        .timestamp_millis()
}

async fn setup(dir: &tempfile::TempDir) -> (SqlitePool, i64) {
    let db_path = dir.path().join("booking.db");
    let db = DbService::new(db_path.to_str().unwrap()).await.unwrap();

    let r = restaurant::create(
        &db.pool,
        RestaurantCreate {
            name: "La Terraza".into(),
            timezone: "Europe/Madrid".into(),
            weekly_hours: all_week_hours(),
            max_party_size: None,
            large_party_threshold: None,
            last_seating_offset_min: None,
            booking_horizon_days: None,
        },
    )
    .await
    .unwrap();

    (db.pool, r.id)
}

fn booking_request(restaurant_id: i64, slot_id: i64, party: i64, phone: &str) -> CreateBookingRequest {
    CreateBookingRequest {
        restaurant_id,
        call_record_id: None,
        customer: BookingCustomer {
            name: "Test Caller".into(),
            phone: phone.into(),
            email: None,
            contact_consent: true,
        },
        booking: BookingDetails {
            time_slot_id: Some(slot_id),
            desired_time: None,
            party_size: party,
            seating_area: None,
            special_requests: None,
        },
    }
}

#[tokio::test]
async fn last_table_goes_to_exactly_one_caller() {
    let dir = tempfile::tempdir().unwrap();
    let (pool, restaurant_id) = setup(&dir).await;

    // 容量 4，每个来电都要 4 人桌: 只能成一单
    let slot = time_slot::create(
        &pool,
        TimeSlotCreate {
            restaurant_id,
            start_time: next_friday_19h(),
            seating_area: SeatingArea::Indoor,
            total_capacity: 4,
        },
    )
    .await
    .unwrap();

    let mut handles = Vec::new();
    for i in 0..CONCURRENCY {
        let pool = pool.clone();
        let req = booking_request(restaurant_id, slot.id, 4, &format!("+3460012340{i}"));
        handles.push(tokio::spawn(async move {
            booking::create_booking(&pool, &req).await
        }));
    }

    let mut booked = 0;
    let mut conflicts = 0;
    for handle in handles {
        let response = handle.await.unwrap().unwrap();
        match response.status {
            BookingStatus::Booked => {
                booked += 1;
                assert!(response.confirmation_code.is_some());
                assert!(response.reservation_id.is_some());
            }
            BookingStatus::Conflict => conflicts += 1,
            BookingStatus::Error => panic!("unexpected error outcome: {}", response.message),
        }
    }

    assert_eq!(booked, 1, "exactly one caller gets the table");
    assert_eq!(conflicts, CONCURRENCY - 1);

    let after = time_slot::find_by_id(&pool, slot.id).await.unwrap().unwrap();
    assert_eq!(after.booked_capacity, 4);
    assert_eq!(after.available_capacity(), 0);
}

#[tokio::test]
async fn capacity_fills_across_sequential_bookings() {
    let dir = tempfile::tempdir().unwrap();
    let (pool, restaurant_id) = setup(&dir).await;

    let slot = time_slot::create(
        &pool,
        TimeSlotCreate {
            restaurant_id,
            start_time: next_friday_19h(),
            seating_area: SeatingArea::Outdoor,
            total_capacity: 6,
        },
    )
    .await
    .unwrap();

    let mut codes = Vec::new();
    for i in 0..3 {
        let req = booking_request(restaurant_id, slot.id, 2, &format!("+3460099910{i}"));
        let response = booking::create_booking(&pool, &req).await.unwrap();
        assert_eq!(response.status, BookingStatus::Booked, "{}", response.message);
        codes.push(response.confirmation_code.unwrap());
    }

    // 确认码两两不同
    codes.sort();
    codes.dedup();
    assert_eq!(codes.len(), 3);

    // 6 座已满，第 4 单冲突
    let req = booking_request(restaurant_id, slot.id, 2, "+34600999103");
    let response = booking::create_booking(&pool, &req).await.unwrap();
    assert_eq!(response.status, BookingStatus::Conflict);

    let after = time_slot::find_by_id(&pool, slot.id).await.unwrap().unwrap();
    assert_eq!(after.booked_capacity, 6);
}

#[tokio::test]
async fn cancel_releases_the_seats_for_rebooking() {
    let dir = tempfile::tempdir().unwrap();
    let (pool, restaurant_id) = setup(&dir).await;

    let slot = time_slot::create(
        &pool,
        TimeSlotCreate {
            restaurant_id,
            start_time: next_friday_19h(),
            seating_area: SeatingArea::Indoor,
            total_capacity: 4,
        },
    )
    .await
    .unwrap();

    let first = booking::create_booking(
        &pool,
        &booking_request(restaurant_id, slot.id, 4, "+34600111222"),
    )
    .await
    .unwrap();
    assert_eq!(first.status, BookingStatus::Booked);

    // 满了
    let blocked = booking::create_booking(
        &pool,
        &booking_request(restaurant_id, slot.id, 4, "+34600111333"),
    )
    .await
    .unwrap();
    assert_eq!(blocked.status, BookingStatus::Conflict);

    // 取消释放容量
    reservation::update_status(
        &pool,
        first.reservation_id.unwrap(),
        ReservationStatus::Cancelled,
    )
    .await
    .unwrap();

    let after = time_slot::find_by_id(&pool, slot.id).await.unwrap().unwrap();
    assert_eq!(after.booked_capacity, 0);

    // 重新可订
    let retry = booking::create_booking(
        &pool,
        &booking_request(restaurant_id, slot.id, 4, "+34600111333"),
    )
    .await
    .unwrap();
    assert_eq!(retry.status, BookingStatus::Booked);
}

#[tokio::test]
async fn same_phone_reuses_the_customer_row() {
    let dir = tempfile::tempdir().unwrap();
    let (pool, restaurant_id) = setup(&dir).await;

    let start = next_friday_19h();
    let slot_a = time_slot::create(
        &pool,
        TimeSlotCreate {
            restaurant_id,
            start_time: start,
            seating_area: SeatingArea::Indoor,
            total_capacity: 8,
        },
    )
    .await
    .unwrap();
    let slot_b = time_slot::create(
        &pool,
        TimeSlotCreate {
            restaurant_id,
            start_time: start + 30 * 60 * 1000,
            seating_area: SeatingArea::Indoor,
            total_capacity: 8,
        },
    )
    .await
    .unwrap();

    // 同一号码不同格式: 规范化后指纹一致
    let first = booking::create_booking(
        &pool,
        &booking_request(restaurant_id, slot_a.id, 2, "+34 600-123-456"),
    )
    .await
    .unwrap();
    let second = booking::create_booking(
        &pool,
        &booking_request(restaurant_id, slot_b.id, 2, "+34600123456"),
    )
    .await
    .unwrap();

    assert_eq!(first.customer_id, second.customer_id);

    let customer =
        booking_server::db::repository::customer::find_by_id(&pool, first.customer_id.unwrap())
            .await
            .unwrap()
            .unwrap();
    assert_eq!(customer.visit_count, 2);
}
