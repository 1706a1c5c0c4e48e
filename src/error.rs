// Error types for front-desk operations
use thiserror::Error;

use crate::model::RoomType;

#[derive(Error, Debug)]
pub enum DeskError {
    #[error("room {number} ({room_type}) already exists")]
    RoomExists { number: u32, room_type: RoomType },

    #[error("room {0} not found")]
    RoomNotFound(u32),

    #[error("no available {0} to assign")]
    NoRoomAvailable(RoomType),

    #[error("no un-checked-in reservation with id {0}")]
    ReservationNotFound(String),

    #[error("no checked-in reservation for room {0}")]
    NothingToCheckOut(u32),

    #[error("guest {name} ({contact}) not found")]
    GuestNotFound { name: String, contact: u64 },

    #[error("reservation date must be in the future")]
    DateNotInFuture,

    #[error("stay length must be at least one night")]
    EmptyStay,

    #[error("rating must be between 1 and 10, got {0}")]
    RatingOutOfRange(i64),

    #[error("housekeeping hour must be between 0 and 24, got {0}")]
    HourOutOfRange(i64),

    #[error("malformed row in {table} table: {reason}")]
    MalformedRow { table: &'static str, reason: String },

    #[error("config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
