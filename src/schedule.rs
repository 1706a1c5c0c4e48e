// Housekeeping schedule assembly: requested slots merged with the default
// slot every available room gets, ordered into one daily timetable.
use chrono::NaiveDate;

use crate::model::{HousekeepingEntry, Room, RoomStatus, RoomType, TimeWindow};

// Fixed default window per room type when no explicit request exists.
pub fn default_window(room_type: RoomType) -> TimeWindow {
    match room_type {
        RoomType::Single | RoomType::Double => TimeWindow::new(9 * 60, 14 * 60),
        RoomType::Luxury => TimeWindow::new(7 * 60, 9 * 60),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotSource {
    Requested,
    Default,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleSlot {
    pub room_number: u32,
    pub window: TimeWindow,
    // Live room status at display time; None when the requested room is not
    // in the room table.
    pub status: Option<RoomStatus>,
    pub source: SlotSource,
}

// Union of still-relevant requested entries and a synthesized default slot
// for every Available room, sorted ascending by window start. A room with
// both a request and a default slot appears twice; there is no dedup.
pub fn build_daily_schedule(
    requests: &[HousekeepingEntry],
    rooms: &[Room],
    today: NaiveDate,
) -> Vec<ScheduleSlot> {
    let status_of = |number: u32| rooms.iter().find(|r| r.number == number).map(|r| r.status);

    let mut slots: Vec<ScheduleSlot> = requests
        .iter()
        .filter(|e| e.date >= today)
        .map(|e| ScheduleSlot {
            room_number: e.room_number,
            window: e.window,
            status: status_of(e.room_number),
            source: SlotSource::Requested,
        })
        .collect();

    slots.extend(
        rooms
            .iter()
            .filter(|r| r.status == RoomStatus::Available)
            .map(|r| ScheduleSlot {
                room_number: r.number,
                window: default_window(r.room_type),
                status: Some(r.status),
                source: SlotSource::Default,
            }),
    );

    slots.sort_by_key(|s| s.window.start_min);
    slots
}
