// Entity records for the front desk: rooms, guests, reservations,
// housekeeping entries and feedback, plus their persisted string forms.
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};

use chrono::{Local, NaiveDate};

use crate::error::DeskError;
use crate::store::Record;

// Room types with their fixed list price per night
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoomType {
    Single,
    Double,
    Luxury,
}

impl RoomType {
    pub const ALL: [RoomType; 3] = [RoomType::Single, RoomType::Double, RoomType::Luxury];

    pub fn price_per_night(self) -> f64 {
        match self {
            RoomType::Single => 150.0,
            RoomType::Double => 250.0,
            RoomType::Luxury => 500.0,
        }
    }
}

impl fmt::Display for RoomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RoomType::Single => "SingleRoom",
            RoomType::Double => "DoubleRoom",
            RoomType::Luxury => "LuxuryRoom",
        };
        // pad() rather than write_str() so table formatting like {:<12} works
        f.pad(label)
    }
}

impl FromStr for RoomType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "SingleRoom" => Ok(RoomType::Single),
            "DoubleRoom" => Ok(RoomType::Double),
            "LuxuryRoom" => Ok(RoomType::Luxury),
            other => Err(format!("unknown room type {other:?}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomStatus {
    Available,
    Occupied,
}

impl RoomStatus {
    pub fn toggled(self) -> Self {
        match self {
            RoomStatus::Available => RoomStatus::Occupied,
            RoomStatus::Occupied => RoomStatus::Available,
        }
    }
}

impl fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RoomStatus::Available => "Available",
            RoomStatus::Occupied => "Occupied",
        })
    }
}

impl FromStr for RoomStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Available" => Ok(RoomStatus::Available),
            "Occupied" => Ok(RoomStatus::Occupied),
            other => Err(format!("unknown room status {other:?}")),
        }
    }
}

// A physical room. Room numbers are treated as globally unique when looking
// up by number alone; the (number, type) pair is the uniqueness key on insert.
#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    pub number: u32,
    pub room_type: RoomType,
    pub status: RoomStatus,
}

impl Room {
    pub fn new(number: u32, room_type: RoomType) -> Self {
        Self {
            number,
            room_type,
            status: RoomStatus::Available,
        }
    }

    pub fn price_per_night(&self) -> f64 {
        self.room_type.price_per_night()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Guest {
    pub name: String,
    pub contact: u64,
    pub membership: bool,
}

impl Guest {
    pub fn new(name: impl Into<String>, contact: u64) -> Self {
        Self {
            name: name.into(),
            contact,
            membership: false,
        }
    }
}

// Forward-only reservation lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckInState {
    NotCheckedIn,
    CheckedIn,
    CheckedOut,
}

impl fmt::Display for CheckInState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CheckInState::NotCheckedIn => "un-check-in",
            CheckInState::CheckedIn => "Checked-in",
            CheckInState::CheckedOut => "Checked-out",
        })
    }
}

impl FromStr for CheckInState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "un-check-in" => Ok(CheckInState::NotCheckedIn),
            "Checked-in" => Ok(CheckInState::CheckedIn),
            "Checked-out" => Ok(CheckInState::CheckedOut),
            other => Err(format!("unknown check-in state {other:?}")),
        }
    }
}

// Placeholder written to the reservations table until check-in assigns a room.
pub const UNASSIGNED_ROOM: &str = "unassigned";

static RESERVATION_COUNTER: AtomicU32 = AtomicU32::new(0);

// Reservation ids keep the external timestamp shape (YYMMDDHHMMSS) but carry
// a process-local counter suffix so two bookings in the same second differ.
fn next_reservation_id(now: chrono::DateTime<Local>) -> String {
    let seq = RESERVATION_COUNTER.fetch_add(1, Ordering::Relaxed) % 1000;
    format!("{}{:03}", now.format("%y%m%d%H%M%S"), seq)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reservation {
    pub id: String,
    pub guest_name: String,
    pub contact: u64,
    pub room_number: Option<u32>,
    pub room_type: RoomType,
    pub reserved_date: NaiveDate,
    pub nights: u32,
    pub state: CheckInState,
    pub order_amount: f64,
}

impl Reservation {
    // The order amount is fixed here from the type's list price and is never
    // recomputed afterwards.
    pub fn new(
        guest_name: impl Into<String>,
        contact: u64,
        room_type: RoomType,
        reserved_date: NaiveDate,
        nights: u32,
    ) -> Self {
        Self {
            id: next_reservation_id(Local::now()),
            guest_name: guest_name.into(),
            contact,
            room_number: None,
            room_type,
            reserved_date,
            nights,
            state: CheckInState::NotCheckedIn,
            order_amount: room_type.price_per_night() * f64::from(nights),
        }
    }

    pub fn checkout_date(&self) -> NaiveDate {
        self.reserved_date + chrono::Duration::days(i64::from(self.nights))
    }
}

// One-hour (or type-default) housekeeping window, "HH:MM-HH:MM". Hour 24 is a
// legal request and renders as 24:00-25:00, so this is minute-based rather
// than built on chrono::NaiveTime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TimeWindow {
    pub start_min: u16,
    pub end_min: u16,
}

impl TimeWindow {
    pub fn new(start_min: u16, end_min: u16) -> Self {
        Self { start_min, end_min }
    }

    pub fn from_hour(hour: u32) -> Self {
        debug_assert!(hour <= 24, "hour {hour} out of range, callers validate 0..=24");
        Self {
            start_min: (hour * 60) as u16,
            end_min: ((hour + 1) * 60) as u16,
        }
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}-{:02}:{:02}",
            self.start_min / 60,
            self.start_min % 60,
            self.end_min / 60,
            self.end_min % 60
        )
    }
}

impl FromStr for TimeWindow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        fn minutes(part: &str) -> Result<u16, String> {
            let (h, m) = part
                .split_once(':')
                .ok_or_else(|| format!("bad time {part:?}"))?;
            let h: u16 = h.parse().map_err(|_| format!("bad hour in {part:?}"))?;
            let m: u16 = m.parse().map_err(|_| format!("bad minute in {part:?}"))?;
            if m >= 60 {
                return Err(format!("bad minute in {part:?}"));
            }
            Ok(h * 60 + m)
        }

        let (start, end) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| format!("bad time window {s:?}"))?;
        Ok(TimeWindow {
            start_min: minutes(start)?,
            end_min: minutes(end)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HousekeepingEntry {
    pub room_number: u32,
    pub window: TimeWindow,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Feedback {
    pub name: String,
    pub contact: u64,
    pub rating: u8,
    pub comment: String,
}

const DATE_FMT: &str = "%Y-%m-%d";

fn col<'a>(table: &'static str, row: &'a [String], idx: usize) -> Result<&'a str, DeskError> {
    row.get(idx)
        .map(|s| s.as_str())
        .ok_or_else(|| DeskError::MalformedRow {
            table,
            reason: format!("expected at least {} columns, got {}", idx + 1, row.len()),
        })
}

fn parse_col<T>(table: &'static str, name: &str, value: &str) -> Result<T, DeskError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    value.trim().parse().map_err(|e| DeskError::MalformedRow {
        table,
        reason: format!("{name}: {e}"),
    })
}

fn parse_date(table: &'static str, name: &str, value: &str) -> Result<NaiveDate, DeskError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FMT).map_err(|e| DeskError::MalformedRow {
        table,
        reason: format!("{name}: {e}"),
    })
}

impl Record for Room {
    const TABLE: &'static str = "rooms";
    const HEADER: &'static [&'static str] = &["room_number", "room_type", "status"];

    fn to_row(&self) -> Vec<String> {
        vec![
            self.number.to_string(),
            self.room_type.to_string(),
            self.status.to_string(),
        ]
    }

    fn from_row(row: &[String]) -> Result<Self, DeskError> {
        Ok(Room {
            number: parse_col(Self::TABLE, "room_number", col(Self::TABLE, row, 0)?)?,
            room_type: parse_col(Self::TABLE, "room_type", col(Self::TABLE, row, 1)?)?,
            status: parse_col(Self::TABLE, "status", col(Self::TABLE, row, 2)?)?,
        })
    }
}

impl Record for Guest {
    const TABLE: &'static str = "guests";
    const HEADER: &'static [&'static str] = &["name", "contact", "membership"];

    fn to_row(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.contact.to_string(),
            self.membership.to_string(),
        ]
    }

    fn from_row(row: &[String]) -> Result<Self, DeskError> {
        Ok(Guest {
            name: col(Self::TABLE, row, 0)?.to_string(),
            contact: parse_col(Self::TABLE, "contact", col(Self::TABLE, row, 1)?)?,
            membership: parse_col(Self::TABLE, "membership", col(Self::TABLE, row, 2)?)?,
        })
    }
}

impl Record for Reservation {
    const TABLE: &'static str = "reservations";
    const HEADER: &'static [&'static str] = &[
        "reservation_id",
        "guest_name",
        "contact",
        "room_number",
        "room_type",
        "reserved_date",
        "stay_length_days",
        "check_in_state",
        "order_amount",
    ];

    fn to_row(&self) -> Vec<String> {
        let room = match self.room_number {
            Some(n) => n.to_string(),
            None => UNASSIGNED_ROOM.to_string(),
        };
        vec![
            self.id.clone(),
            self.guest_name.clone(),
            self.contact.to_string(),
            room,
            self.room_type.to_string(),
            self.reserved_date.format(DATE_FMT).to_string(),
            self.nights.to_string(),
            self.state.to_string(),
            self.order_amount.to_string(),
        ]
    }

    fn from_row(row: &[String]) -> Result<Self, DeskError> {
        let room_field = col(Self::TABLE, row, 3)?.trim();
        let room_number = if room_field == UNASSIGNED_ROOM {
            None
        } else {
            Some(parse_col(Self::TABLE, "room_number", room_field)?)
        };
        Ok(Reservation {
            id: col(Self::TABLE, row, 0)?.to_string(),
            guest_name: col(Self::TABLE, row, 1)?.to_string(),
            contact: parse_col(Self::TABLE, "contact", col(Self::TABLE, row, 2)?)?,
            room_number,
            room_type: parse_col(Self::TABLE, "room_type", col(Self::TABLE, row, 4)?)?,
            reserved_date: parse_date(Self::TABLE, "reserved_date", col(Self::TABLE, row, 5)?)?,
            nights: parse_col(Self::TABLE, "stay_length_days", col(Self::TABLE, row, 6)?)?,
            state: parse_col(Self::TABLE, "check_in_state", col(Self::TABLE, row, 7)?)?,
            order_amount: parse_col(Self::TABLE, "order_amount", col(Self::TABLE, row, 8)?)?,
        })
    }
}

impl Record for HousekeepingEntry {
    const TABLE: &'static str = "housekeeping";
    const HEADER: &'static [&'static str] = &["room_number", "scheduled_time", "date"];

    fn to_row(&self) -> Vec<String> {
        vec![
            self.room_number.to_string(),
            self.window.to_string(),
            self.date.format(DATE_FMT).to_string(),
        ]
    }

    fn from_row(row: &[String]) -> Result<Self, DeskError> {
        Ok(HousekeepingEntry {
            room_number: parse_col(Self::TABLE, "room_number", col(Self::TABLE, row, 0)?)?,
            window: parse_col(Self::TABLE, "scheduled_time", col(Self::TABLE, row, 1)?)?,
            date: parse_date(Self::TABLE, "date", col(Self::TABLE, row, 2)?)?,
        })
    }
}

impl Record for Feedback {
    const TABLE: &'static str = "feedback";
    const HEADER: &'static [&'static str] = &["name", "contact", "rating", "comment"];

    fn to_row(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.contact.to_string(),
            self.rating.to_string(),
            self.comment.clone(),
        ]
    }

    fn from_row(row: &[String]) -> Result<Self, DeskError> {
        Ok(Feedback {
            name: col(Self::TABLE, row, 0)?.to_string(),
            contact: parse_col(Self::TABLE, "contact", col(Self::TABLE, row, 1)?)?,
            rating: parse_col(Self::TABLE, "rating", col(Self::TABLE, row, 2)?)?,
            comment: col(Self::TABLE, row, 3)?.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("SingleRoom", RoomType::Single)]
    #[test_case("DoubleRoom", RoomType::Double)]
    #[test_case("LuxuryRoom", RoomType::Luxury)]
    fn room_type_round_trips_through_its_label(label: &str, expected: RoomType) {
        assert_eq!(label.parse::<RoomType>().unwrap(), expected);
        assert_eq!(expected.to_string(), label);
    }

    #[test]
    fn unknown_room_type_is_rejected() {
        assert!("PenthouseRoom".parse::<RoomType>().is_err());
    }

    #[test]
    fn room_type_display_honors_column_width() {
        assert_eq!(format!("{:<12}", RoomType::Single), "SingleRoom  ");
    }

    #[test_case(RoomType::Single, 150.0)]
    #[test_case(RoomType::Double, 250.0)]
    #[test_case(RoomType::Luxury, 500.0)]
    fn list_prices_are_fixed_per_type(room_type: RoomType, price: f64) {
        assert_eq!(room_type.price_per_night(), price);
    }

    #[test]
    fn status_toggle_flips_both_ways() {
        assert_eq!(RoomStatus::Available.toggled(), RoomStatus::Occupied);
        assert_eq!(RoomStatus::Occupied.toggled(), RoomStatus::Available);
    }

    #[test]
    fn time_window_formats_and_parses() {
        let w = TimeWindow::from_hour(9);
        assert_eq!(w.to_string(), "09:00-10:00");
        assert_eq!("09:00-10:00".parse::<TimeWindow>().unwrap(), w);
    }

    #[test]
    fn hour_24_window_is_representable() {
        let w = TimeWindow::from_hour(24);
        assert_eq!(w.to_string(), "24:00-25:00");
        assert_eq!("24:00-25:00".parse::<TimeWindow>().unwrap(), w);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn hour_past_24_is_rejected() {
        let _ = TimeWindow::from_hour(25);
    }

    #[test_case("0900-1400")]
    #[test_case("09:00")]
    #[test_case("09:61-14:00")]
    #[test_case("nine-ten")]
    fn bad_time_windows_are_rejected(input: &str) {
        assert!(input.parse::<TimeWindow>().is_err());
    }

    #[test]
    fn order_amount_is_price_times_nights() {
        let date = NaiveDate::from_ymd_opt(2099, 1, 15).unwrap();
        let r = Reservation::new("Alice", 555, RoomType::Single, date, 3);
        assert_eq!(r.order_amount, 450.0);
        assert_eq!(r.state, CheckInState::NotCheckedIn);
        assert_eq!(r.room_number, None);
        assert_eq!(r.checkout_date(), NaiveDate::from_ymd_opt(2099, 1, 18).unwrap());
    }

    #[test]
    fn reservation_ids_differ_within_one_second() {
        let date = NaiveDate::from_ymd_opt(2099, 1, 15).unwrap();
        let a = Reservation::new("Alice", 555, RoomType::Single, date, 1);
        let b = Reservation::new("Alice", 555, RoomType::Single, date, 1);
        assert_ne!(a.id, b.id);
        // Timestamp prefix plus three-digit counter.
        assert_eq!(a.id.len(), 15);
    }

    #[test]
    fn reservation_row_round_trip_preserves_every_field() {
        let date = NaiveDate::from_ymd_opt(2099, 1, 15).unwrap();
        let mut r = Reservation::new("Alice", 555, RoomType::Double, date, 2);
        r.room_number = Some(204);
        r.state = CheckInState::CheckedIn;
        let back = Reservation::from_row(&r.to_row()).unwrap();
        assert_eq!(back, r);
    }

    #[test]
    fn unassigned_room_survives_the_row_form() {
        let date = NaiveDate::from_ymd_opt(2099, 1, 15).unwrap();
        let r = Reservation::new("Bob", 777, RoomType::Luxury, date, 1);
        let row = r.to_row();
        assert_eq!(row[3], UNASSIGNED_ROOM);
        assert_eq!(Reservation::from_row(&row).unwrap().room_number, None);
    }

    #[test]
    fn short_row_reports_a_malformed_table() {
        let row = vec!["101".to_string(), "SingleRoom".to_string()];
        let err = Room::from_row(&row).unwrap_err();
        assert!(matches!(err, DeskError::MalformedRow { table: "rooms", .. }));
    }
}
