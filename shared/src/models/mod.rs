//! Domain models
//!
//! Entity structs mirror their SQLite tables one-to-one; every entity comes
//! with Create/Update payload structs beside it. Timestamps are `i64` Unix
//! millis UTC — tenant-local interpretation happens at the service layer.

mod call_record;
mod callback;
mod customer;
mod daily_stats;
mod reservation;
mod restaurant;
mod time_slot;

pub use call_record::{CallOutcome, CallOutcomeLog, CallRecord, CallStatus};
pub use callback::{
    Callback, CallbackCause, CallbackCreate, CallbackResolve, CallbackStatus,
};
pub use customer::{Customer, CustomerUpsert};
pub use daily_stats::{DailyStats, StatsDelta};
pub use reservation::{Reservation, ReservationCreate, ReservationStatus};
pub use restaurant::{
    DateBlock, DateBlockCreate, DayHours, Restaurant, RestaurantCreate, RestaurantSettings,
    RestaurantUpdate, WeeklyHours,
};
pub use time_slot::{SeatingArea, TimeSlot, TimeSlotCreate};
