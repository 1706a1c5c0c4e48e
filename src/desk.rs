// Operation layer: every front-desk procedure reads the in-memory tables,
// applies its change, and rewrites the backing file before returning. One
// interactive session at a time is assumed; there is no locking.
use std::str::FromStr;

use chrono::{Local, NaiveDate};
use tracing::{info, warn};

use crate::config::DeskConfig;
use crate::error::DeskError;
use crate::model::{
    CheckInState, Feedback, Guest, HousekeepingEntry, Reservation, Room, RoomStatus, RoomType,
    TimeWindow,
};
use crate::schedule::{self, ScheduleSlot};
use crate::store;

// Recipient selection for broadcast messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    Member,
    Regular,
    All,
}

impl FromStr for Audience {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "member" => Ok(Audience::Member),
            "regular" => Ok(Audience::Regular),
            "all" => Ok(Audience::All),
            other => Err(format!("unknown audience {other:?}")),
        }
    }
}

// Outcome of a membership registration attempt for a known guest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipOutcome {
    Upgraded,
    AlreadyMember,
}

pub struct FrontDesk {
    config: DeskConfig,
    rooms: Vec<Room>,
    guests: Vec<Guest>,
    reservations: Vec<Reservation>,
    housekeeping: Vec<HousekeepingEntry>,
    feedback: Vec<Feedback>,
}

impl FrontDesk {
    pub fn open(config: DeskConfig) -> Result<Self, DeskError> {
        let rooms = store::load(&config.rooms_path())?;
        let guests = store::load(&config.guests_path())?;
        let reservations = store::load(&config.reservations_path())?;
        let housekeeping = store::load(&config.housekeeping_path())?;
        let feedback = store::load(&config.feedback_path())?;
        Ok(Self {
            config,
            rooms,
            guests,
            reservations,
            housekeeping,
            feedback,
        })
    }

    fn save_rooms(&self) -> Result<(), DeskError> {
        store::save(&self.config.rooms_path(), &self.rooms)
    }

    fn save_guests(&self) -> Result<(), DeskError> {
        store::save(&self.config.guests_path(), &self.guests)
    }

    fn save_reservations(&self) -> Result<(), DeskError> {
        store::save(&self.config.reservations_path(), &self.reservations)
    }

    fn save_housekeeping(&self) -> Result<(), DeskError> {
        store::save(&self.config.housekeeping_path(), &self.housekeeping)
    }

    fn save_feedback(&self) -> Result<(), DeskError> {
        store::save(&self.config.feedback_path(), &self.feedback)
    }

    // ----- rooms -----

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn add_room(&mut self, number: u32, room_type: RoomType) -> Result<(), DeskError> {
        if self
            .rooms
            .iter()
            .any(|r| r.number == number && r.room_type == room_type)
        {
            return Err(DeskError::RoomExists { number, room_type });
        }
        self.rooms.push(Room::new(number, room_type));
        self.save_rooms()?;
        info!(room = number, %room_type, "room added");
        Ok(())
    }

    pub fn available_rooms(&self) -> Vec<&Room> {
        self.rooms
            .iter()
            .filter(|r| r.status == RoomStatus::Available)
            .collect()
    }

    pub fn available_count(&self, room_type: RoomType) -> usize {
        self.rooms
            .iter()
            .filter(|r| r.status == RoomStatus::Available && r.room_type == room_type)
            .count()
    }

    // Lookup is by number alone; room numbers are globally unique by
    // convention.
    pub fn toggle_room_status(
        &mut self,
        number: u32,
    ) -> Result<(RoomStatus, RoomStatus), DeskError> {
        let room = self
            .rooms
            .iter_mut()
            .find(|r| r.number == number)
            .ok_or(DeskError::RoomNotFound(number))?;
        let old = room.status;
        room.status = old.toggled();
        let new = room.status;
        self.save_rooms()?;
        info!(room = number, from = %old, to = %new, "room status changed");
        Ok((old, new))
    }

    // ----- reservations -----

    pub fn reservations(&self) -> &[Reservation] {
        &self.reservations
    }

    pub fn make_reservation(
        &mut self,
        guest_name: &str,
        contact: u64,
        room_type: RoomType,
        reserved_date: NaiveDate,
        nights: u32,
    ) -> Result<Reservation, DeskError> {
        if reserved_date <= Local::now().date_naive() {
            return Err(DeskError::DateNotInFuture);
        }
        if nights == 0 {
            return Err(DeskError::EmptyStay);
        }

        let reservation = Reservation::new(guest_name, contact, room_type, reserved_date, nights);
        info!(
            id = %reservation.id,
            guest = guest_name,
            %room_type,
            date = %reserved_date,
            nights,
            amount = reservation.order_amount,
            "reservation created"
        );
        self.reservations.push(reservation.clone());
        self.save_reservations()?;
        Ok(reservation)
    }

    // Assigns the first available room of the reserved type in table order.
    // With no room free the reservation stays un-checked-in and the call can
    // be retried later.
    pub fn check_in(&mut self, reservation_id: &str) -> Result<u32, DeskError> {
        let idx = self
            .reservations
            .iter()
            .position(|r| r.id == reservation_id && r.state == CheckInState::NotCheckedIn)
            .ok_or_else(|| DeskError::ReservationNotFound(reservation_id.to_string()))?;

        let room_type = self.reservations[idx].room_type;
        let room_number = self
            .rooms
            .iter()
            .find(|r| r.status == RoomStatus::Available && r.room_type == room_type)
            .map(|r| r.number)
            .ok_or(DeskError::NoRoomAvailable(room_type))?;

        let reservation = &mut self.reservations[idx];
        reservation.room_number = Some(room_number);
        reservation.state = CheckInState::CheckedIn;
        self.save_reservations()?;
        self.toggle_room_status(room_number)?;
        info!(id = reservation_id, room = room_number, "checked in");
        Ok(room_number)
    }

    // Returns the amount fixed at reservation time. The room is set back to
    // Available unconditionally.
    pub fn check_out(&mut self, room_number: u32) -> Result<f64, DeskError> {
        let reservation = self
            .reservations
            .iter_mut()
            .find(|r| r.room_number == Some(room_number) && r.state == CheckInState::CheckedIn)
            .ok_or(DeskError::NothingToCheckOut(room_number))?;

        let amount = reservation.order_amount;
        let id = reservation.id.clone();
        reservation.state = CheckInState::CheckedOut;
        self.save_reservations()?;

        if let Some(room) = self.rooms.iter_mut().find(|r| r.number == room_number) {
            room.status = RoomStatus::Available;
            self.save_rooms()?;
        } else {
            warn!(room = room_number, "checked out of a room missing from the room table");
        }
        info!(id = %id, room = room_number, amount, "checked out");
        Ok(amount)
    }

    // ----- guests -----

    pub fn guests(&self) -> &[Guest] {
        &self.guests
    }

    // Idempotent on (name, contact): returns false when the guest already
    // exists, without touching the table.
    pub fn add_guest(&mut self, name: &str, contact: u64) -> Result<bool, DeskError> {
        if self
            .guests
            .iter()
            .any(|g| g.name == name && g.contact == contact)
        {
            return Ok(false);
        }
        self.guests.push(Guest::new(name, contact));
        self.save_guests()?;
        info!(guest = name, contact, "guest added");
        Ok(true)
    }

    pub fn register_to_member(
        &mut self,
        name: &str,
        contact: u64,
    ) -> Result<MembershipOutcome, DeskError> {
        let guest = self
            .guests
            .iter_mut()
            .find(|g| g.name == name && g.contact == contact)
            .ok_or_else(|| DeskError::GuestNotFound {
                name: name.to_string(),
                contact,
            })?;
        if guest.membership {
            return Ok(MembershipOutcome::AlreadyMember);
        }
        guest.membership = true;
        self.save_guests()?;
        info!(guest = name, contact, "upgraded to membership");
        Ok(MembershipOutcome::Upgraded)
    }

    pub fn members(&self) -> Vec<&Guest> {
        self.guests.iter().filter(|g| g.membership).collect()
    }

    // ----- housekeeping -----

    // Rooms the caller currently occupies; the shell uses this to
    // disambiguate multi-room guests before booking a window.
    pub fn checked_in_rooms(&self, name: &str, contact: u64) -> Vec<u32> {
        self.reservations
            .iter()
            .filter(|r| {
                r.guest_name == name && r.contact == contact && r.state == CheckInState::CheckedIn
            })
            .filter_map(|r| r.room_number)
            .collect()
    }

    // Books the one-hour window [hour:00, hour+1:00) for today. Overlapping
    // entries for the same room are allowed to coexist.
    pub fn request_housekeeping(
        &mut self,
        room_number: u32,
        hour: u32,
    ) -> Result<HousekeepingEntry, DeskError> {
        if hour > 24 {
            return Err(DeskError::HourOutOfRange(i64::from(hour)));
        }
        let entry = HousekeepingEntry {
            room_number,
            window: TimeWindow::from_hour(hour),
            date: Local::now().date_naive(),
        };
        self.housekeeping.push(entry.clone());
        self.save_housekeeping()?;
        info!(room = room_number, window = %entry.window, "housekeeping requested");
        Ok(entry)
    }

    pub fn today_schedule(&self) -> Vec<ScheduleSlot> {
        schedule::build_daily_schedule(&self.housekeeping, &self.rooms, Local::now().date_naive())
    }

    // ----- feedback & messaging -----

    pub fn submit_feedback(
        &mut self,
        name: &str,
        contact: u64,
        rating: u8,
        comment: &str,
    ) -> Result<(), DeskError> {
        if !(1..=10).contains(&rating) {
            return Err(DeskError::RatingOutOfRange(i64::from(rating)));
        }
        self.feedback.push(Feedback {
            name: name.to_string(),
            contact,
            rating,
            comment: comment.to_string(),
        });
        self.save_feedback()?;
        info!(guest = name, rating, "feedback recorded");
        Ok(())
    }

    pub fn feedback(&self) -> &[Feedback] {
        &self.feedback
    }

    // Reporting only; there is no real transport behind this.
    pub fn broadcast(&self, audience: Audience, message: &str) -> Vec<&Guest> {
        let recipients: Vec<&Guest> = self
            .guests
            .iter()
            .filter(|g| match audience {
                Audience::Member => g.membership,
                Audience::Regular => !g.membership,
                Audience::All => true,
            })
            .collect();
        info!(
            ?audience,
            recipients = recipients.len(),
            message,
            "broadcast delivered"
        );
        recipients
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    struct TempDesk {
        dir: PathBuf,
        desk: FrontDesk,
    }

    impl TempDesk {
        fn new() -> Self {
            let dir = std::env::temp_dir().join(format!("frontdesk-desk-{}", rand::random::<u64>()));
            fs::create_dir_all(&dir).unwrap();
            let desk = FrontDesk::open(DeskConfig::in_dir(&dir)).unwrap();
            TempDesk { dir, desk }
        }

        fn reopen(&mut self) {
            self.desk = FrontDesk::open(DeskConfig::in_dir(&self.dir)).unwrap();
        }
    }

    impl Drop for TempDesk {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.dir);
        }
    }

    fn future_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2099, 1, 15).unwrap()
    }

    #[test]
    fn duplicate_room_is_rejected_and_table_size_unchanged() {
        let mut t = TempDesk::new();
        t.desk.add_room(101, RoomType::Single).unwrap();
        let err = t.desk.add_room(101, RoomType::Single).unwrap_err();
        assert!(matches!(err, DeskError::RoomExists { number: 101, .. }));
        assert_eq!(t.desk.rooms().len(), 1);

        // Same number with a different type is a distinct room.
        t.desk.add_room(101, RoomType::Double).unwrap();
        assert_eq!(t.desk.rooms().len(), 2);
    }

    #[test]
    fn toggle_flips_status_and_unknown_room_errors() {
        let mut t = TempDesk::new();
        t.desk.add_room(101, RoomType::Single).unwrap();

        let (old, new) = t.desk.toggle_room_status(101).unwrap();
        assert_eq!((old, new), (RoomStatus::Available, RoomStatus::Occupied));
        let (old, new) = t.desk.toggle_room_status(101).unwrap();
        assert_eq!((old, new), (RoomStatus::Occupied, RoomStatus::Available));

        assert!(matches!(
            t.desk.toggle_room_status(999),
            Err(DeskError::RoomNotFound(999))
        ));
    }

    #[test]
    fn full_stay_lifecycle_matches_the_front_desk_ledger() {
        let mut t = TempDesk::new();
        t.desk.add_room(101, RoomType::Single).unwrap();
        assert_eq!(t.desk.available_count(RoomType::Single), 1);

        let reservation = t
            .desk
            .make_reservation("Alice", 555, RoomType::Single, future_date(), 3)
            .unwrap();
        assert_eq!(reservation.order_amount, 450.0);
        assert_eq!(reservation.state, CheckInState::NotCheckedIn);

        let room = t.desk.check_in(&reservation.id).unwrap();
        assert_eq!(room, 101);
        assert_eq!(t.desk.rooms()[0].status, RoomStatus::Occupied);
        let checked_in = &t.desk.reservations()[0];
        assert_eq!(checked_in.room_number, Some(101));
        assert_eq!(checked_in.state, CheckInState::CheckedIn);

        let amount = t.desk.check_out(101).unwrap();
        assert_eq!(amount, 450.0);
        assert_eq!(t.desk.reservations()[0].state, CheckInState::CheckedOut);
        assert_eq!(t.desk.rooms()[0].status, RoomStatus::Available);
    }

    #[test]
    fn lifecycle_state_survives_a_reopen() {
        let mut t = TempDesk::new();
        t.desk.add_room(101, RoomType::Single).unwrap();
        let reservation = t
            .desk
            .make_reservation("Alice", 555, RoomType::Single, future_date(), 3)
            .unwrap();
        t.desk.check_in(&reservation.id).unwrap();

        t.reopen();
        assert_eq!(t.desk.rooms()[0].status, RoomStatus::Occupied);
        assert_eq!(t.desk.reservations()[0].state, CheckInState::CheckedIn);
        assert_eq!(t.desk.check_out(101).unwrap(), 450.0);
    }

    #[test]
    fn check_in_never_assigns_an_occupied_room() {
        let mut t = TempDesk::new();
        t.desk.add_room(101, RoomType::Single).unwrap();
        t.desk.add_room(102, RoomType::Single).unwrap();
        t.desk.toggle_room_status(101).unwrap(); // 101 occupied

        let reservation = t
            .desk
            .make_reservation("Alice", 555, RoomType::Single, future_date(), 1)
            .unwrap();
        assert_eq!(t.desk.check_in(&reservation.id).unwrap(), 102);
    }

    #[test]
    fn check_in_without_a_free_room_is_retryable() {
        let mut t = TempDesk::new();
        t.desk.add_room(201, RoomType::Double).unwrap();
        t.desk.toggle_room_status(201).unwrap();

        let reservation = t
            .desk
            .make_reservation("Bob", 777, RoomType::Double, future_date(), 2)
            .unwrap();
        assert!(matches!(
            t.desk.check_in(&reservation.id),
            Err(DeskError::NoRoomAvailable(RoomType::Double))
        ));
        // Nothing changed, so freeing a room makes the retry succeed.
        assert_eq!(t.desk.reservations()[0].state, CheckInState::NotCheckedIn);
        t.desk.toggle_room_status(201).unwrap();
        assert_eq!(t.desk.check_in(&reservation.id).unwrap(), 201);
    }

    #[test]
    fn check_in_ignores_rooms_of_another_type() {
        let mut t = TempDesk::new();
        t.desk.add_room(101, RoomType::Single).unwrap();
        let reservation = t
            .desk
            .make_reservation("Bob", 777, RoomType::Luxury, future_date(), 1)
            .unwrap();
        assert!(matches!(
            t.desk.check_in(&reservation.id),
            Err(DeskError::NoRoomAvailable(RoomType::Luxury))
        ));
    }

    #[test]
    fn checked_in_reservation_cannot_check_in_again() {
        let mut t = TempDesk::new();
        t.desk.add_room(101, RoomType::Single).unwrap();
        t.desk.add_room(102, RoomType::Single).unwrap();
        let reservation = t
            .desk
            .make_reservation("Alice", 555, RoomType::Single, future_date(), 1)
            .unwrap();
        t.desk.check_in(&reservation.id).unwrap();
        assert!(matches!(
            t.desk.check_in(&reservation.id),
            Err(DeskError::ReservationNotFound(_))
        ));
    }

    #[test]
    fn check_out_requires_a_checked_in_reservation() {
        let mut t = TempDesk::new();
        t.desk.add_room(101, RoomType::Single).unwrap();
        assert!(matches!(
            t.desk.check_out(101),
            Err(DeskError::NothingToCheckOut(101))
        ));
    }

    #[test]
    fn reservation_validation_rejects_past_dates_and_zero_nights() {
        let mut t = TempDesk::new();
        let yesterday = Local::now().date_naive() - chrono::Duration::days(1);
        assert!(matches!(
            t.desk
                .make_reservation("Alice", 555, RoomType::Single, yesterday, 1),
            Err(DeskError::DateNotInFuture)
        ));
        let today = Local::now().date_naive();
        assert!(matches!(
            t.desk
                .make_reservation("Alice", 555, RoomType::Single, today, 1),
            Err(DeskError::DateNotInFuture)
        ));
        assert!(matches!(
            t.desk
                .make_reservation("Alice", 555, RoomType::Single, future_date(), 0),
            Err(DeskError::EmptyStay)
        ));
        assert!(t.desk.reservations().is_empty());
    }

    #[test]
    fn order_amount_stays_fixed_after_creation() {
        let mut t = TempDesk::new();
        t.desk.add_room(301, RoomType::Luxury).unwrap();
        let reservation = t
            .desk
            .make_reservation("Carol", 888, RoomType::Luxury, future_date(), 4)
            .unwrap();
        assert_eq!(reservation.order_amount, 2000.0);

        t.desk.check_in(&reservation.id).unwrap();
        t.reopen();
        // The persisted amount is what check-out reports.
        assert_eq!(t.desk.check_out(301).unwrap(), 2000.0);
    }

    #[test]
    fn add_guest_is_idempotent_on_name_and_contact() {
        let mut t = TempDesk::new();
        assert!(t.desk.add_guest("Alice", 555).unwrap());
        assert!(!t.desk.add_guest("Alice", 555).unwrap());
        assert_eq!(t.desk.guests().len(), 1);
        // Same name, different contact is a different guest.
        assert!(t.desk.add_guest("Alice", 556).unwrap());
        assert_eq!(t.desk.guests().len(), 2);
    }

    #[test]
    fn membership_upgrade_is_idempotent_and_needs_an_existing_guest() {
        let mut t = TempDesk::new();
        assert!(matches!(
            t.desk.register_to_member("Ghost", 1),
            Err(DeskError::GuestNotFound { .. })
        ));

        t.desk.add_guest("Alice", 555).unwrap();
        assert_eq!(
            t.desk.register_to_member("Alice", 555).unwrap(),
            MembershipOutcome::Upgraded
        );
        assert_eq!(
            t.desk.register_to_member("Alice", 555).unwrap(),
            MembershipOutcome::AlreadyMember
        );
        assert!(t.desk.guests()[0].membership);
        assert_eq!(t.desk.members().len(), 1);
    }

    #[test]
    fn checked_in_rooms_lists_only_the_callers_current_stays() {
        let mut t = TempDesk::new();
        t.desk.add_room(101, RoomType::Single).unwrap();
        t.desk.add_room(102, RoomType::Single).unwrap();
        let r1 = t
            .desk
            .make_reservation("Alice", 555, RoomType::Single, future_date(), 1)
            .unwrap();
        let r2 = t
            .desk
            .make_reservation("Alice", 555, RoomType::Single, future_date(), 1)
            .unwrap();
        t.desk
            .make_reservation("Bob", 777, RoomType::Single, future_date(), 1)
            .unwrap();

        t.desk.check_in(&r1.id).unwrap();
        t.desk.check_in(&r2.id).unwrap();

        assert_eq!(t.desk.checked_in_rooms("Alice", 555), vec![101, 102]);
        assert!(t.desk.checked_in_rooms("Bob", 777).is_empty());

        t.desk.check_out(101).unwrap();
        assert_eq!(t.desk.checked_in_rooms("Alice", 555), vec![102]);
    }

    #[test]
    fn housekeeping_request_books_a_one_hour_window_today() {
        let mut t = TempDesk::new();
        let entry = t.desk.request_housekeeping(101, 10).unwrap();
        assert_eq!(entry.window.to_string(), "10:00-11:00");
        assert_eq!(entry.date, Local::now().date_naive());

        // Overlapping requests coexist.
        t.desk.request_housekeeping(101, 10).unwrap();
        assert!(matches!(
            t.desk.request_housekeeping(101, 25),
            Err(DeskError::HourOutOfRange(25))
        ));
    }

    #[test]
    fn today_schedule_merges_requests_and_defaults() {
        let mut t = TempDesk::new();
        t.desk.add_room(101, RoomType::Single).unwrap();
        t.desk.add_room(102, RoomType::Single).unwrap();
        t.desk.toggle_room_status(101).unwrap(); // occupied
        t.desk.request_housekeeping(101, 10).unwrap();

        let slots = t.desk.today_schedule();
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].room_number, 102);
        assert_eq!(slots[0].window.to_string(), "09:00-14:00");
        assert_eq!(slots[1].room_number, 101);
        assert_eq!(slots[1].status, Some(RoomStatus::Occupied));
    }

    #[test]
    fn feedback_rating_must_be_in_range() {
        let mut t = TempDesk::new();
        assert!(matches!(
            t.desk.submit_feedback("Alice", 555, 0, "meh"),
            Err(DeskError::RatingOutOfRange(0))
        ));
        assert!(matches!(
            t.desk.submit_feedback("Alice", 555, 11, "great"),
            Err(DeskError::RatingOutOfRange(11))
        ));
        t.desk.submit_feedback("Alice", 555, 9, "lovely, thanks").unwrap();
        assert_eq!(t.desk.feedback().len(), 1);
    }

    #[test]
    fn broadcast_selects_by_membership() {
        let mut t = TempDesk::new();
        t.desk.add_guest("Alice", 555).unwrap();
        t.desk.add_guest("Bob", 777).unwrap();
        t.desk.register_to_member("Alice", 555).unwrap();

        let members = t.desk.broadcast(Audience::Member, "sale");
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].name, "Alice");

        let regulars = t.desk.broadcast(Audience::Regular, "join us");
        assert_eq!(regulars.len(), 1);
        assert_eq!(regulars[0].name, "Bob");

        assert_eq!(t.desk.broadcast(Audience::All, "hello").len(), 2);
    }

    #[test]
    fn audience_parses_case_insensitively() {
        assert_eq!("Member".parse::<Audience>().unwrap(), Audience::Member);
        assert_eq!("ALL".parse::<Audience>().unwrap(), Audience::All);
        assert!("vip".parse::<Audience>().is_err());
    }
}
