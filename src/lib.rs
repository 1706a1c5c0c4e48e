// Front-desk record keeper for a single-tenant hotel: rooms, guests,
// reservations, housekeeping and feedback, each persisted as a flat table.

pub mod config;
pub mod desk;
pub mod error;
pub mod model;
pub mod schedule;
pub mod shell;
pub mod store;

// Re-export key types for convenience
pub use config::DeskConfig;
pub use desk::{Audience, FrontDesk, MembershipOutcome};
pub use error::DeskError;
pub use model::{
    CheckInState, Feedback, Guest, HousekeepingEntry, Reservation, Room, RoomStatus, RoomType,
    TimeWindow,
};
pub use schedule::{build_daily_schedule, default_window, ScheduleSlot, SlotSource};
pub use shell::Shell;
