// Interactive shell: nested line-based menus dispatching to the operation
// layer. All validation here is re-prompt-in-place; domain failures are
// printed and never fatal. EOF on input winds the whole shell down cleanly.
use std::io::{self, BufRead, Write};
use std::str::FromStr;

use chrono::{Local, NaiveDate};

use crate::desk::{Audience, FrontDesk, MembershipOutcome};
use crate::error::DeskError;
use crate::model::{Reservation, Room, RoomType};

pub struct Shell<R, W> {
    desk: FrontDesk,
    input: R,
    out: W,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(desk: FrontDesk, input: R, out: W) -> Self {
        Self { desk, input, out }
    }

    pub fn into_desk(self) -> FrontDesk {
        self.desk
    }

    pub fn run(&mut self) -> io::Result<()> {
        writeln!(self.out, "Welcome to the hotel front desk.")?;
        loop {
            writeln!(self.out, "\nOptions:")?;
            writeln!(self.out, "  1. Customer")?;
            writeln!(self.out, "  2. Administrator")?;
            writeln!(self.out, "  E. Exit")?;
            let Some(choice) = self.prompt("Enter your choice >> ")? else {
                return Ok(());
            };
            match choice.as_str() {
                "1" => {
                    if self.customer_session()?.is_none() {
                        return Ok(());
                    }
                }
                "2" => {
                    if self.admin_menu()?.is_none() {
                        return Ok(());
                    }
                }
                c if c.eq_ignore_ascii_case("e") => return Ok(()),
                _ => writeln!(self.out, "Invalid choice. Please try again.")?,
            }
        }
    }

    // ----- prompt helpers -----

    // None means EOF; every caller unwinds without further prompting.
    fn prompt(&mut self, msg: &str) -> io::Result<Option<String>> {
        write!(self.out, "{msg}")?;
        self.out.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn prompt_number<T: FromStr>(&mut self, msg: &str) -> io::Result<Option<T>> {
        loop {
            let Some(text) = self.prompt(msg)? else {
                return Ok(None);
            };
            match text.parse::<T>() {
                Ok(value) => return Ok(Some(value)),
                Err(_) => writeln!(self.out, "Invalid input! Please enter a number.")?,
            }
        }
    }

    fn prompt_room_type(&mut self) -> io::Result<Option<RoomType>> {
        writeln!(self.out, "What type of room would you like?")?;
        writeln!(self.out, "  1. Single room ($150 per night)")?;
        writeln!(self.out, "  2. Double room ($250 per night)")?;
        writeln!(self.out, "  3. Luxury room ($500 per night)")?;
        loop {
            let Some(choice) = self.prompt("Your option >> ")? else {
                return Ok(None);
            };
            match choice.as_str() {
                "1" => return Ok(Some(RoomType::Single)),
                "2" => return Ok(Some(RoomType::Double)),
                "3" => return Ok(Some(RoomType::Luxury)),
                _ => writeln!(self.out, "Wrong input! Please try again.")?,
            }
        }
    }

    fn prompt_future_date(&mut self) -> io::Result<Option<NaiveDate>> {
        loop {
            let Some(text) = self.prompt("Please enter the reservation date (YYYYMMDD) >> ")?
            else {
                return Ok(None);
            };
            match NaiveDate::parse_from_str(&text, "%Y%m%d") {
                Ok(date) if date > Local::now().date_naive() => return Ok(Some(date)),
                Ok(_) => writeln!(
                    self.out,
                    "The reservation date must be in the future. Please try again."
                )?,
                Err(_) => writeln!(self.out, "Invalid date format! Please use YYYYMMDD.")?,
            }
        }
    }

    fn prompt_nights(&mut self) -> io::Result<Option<u32>> {
        loop {
            let Some(nights) = self.prompt_number::<u32>("Please enter the number of nights >> ")?
            else {
                return Ok(None);
            };
            if nights > 0 {
                return Ok(Some(nights));
            }
            writeln!(self.out, "The number of nights must be greater than zero.")?;
        }
    }

    fn prompt_hour(&mut self) -> io::Result<Option<u32>> {
        loop {
            let Some(hour) =
                self.prompt_number::<u32>("Please enter the preferred hour (0-24) >> ")?
            else {
                return Ok(None);
            };
            if hour <= 24 {
                return Ok(Some(hour));
            }
            writeln!(self.out, "Please enter an hour between 0 and 24.")?;
        }
    }

    fn report(&mut self, err: DeskError) -> io::Result<()> {
        writeln!(self.out, "{err}")
    }

    // ----- customer path -----

    fn customer_session(&mut self) -> io::Result<Option<()>> {
        let Some(name) = self.prompt("Please enter your name >> ")? else {
            return Ok(None);
        };
        let Some(contact) = self.prompt_number::<u64>("Please enter your contact number >> ")?
        else {
            return Ok(None);
        };
        match self.desk.add_guest(&name, contact) {
            Ok(true) => writeln!(self.out, "Customer {name} added successfully.")?,
            Ok(false) => writeln!(self.out, "Welcome back, {name}.")?,
            Err(e) => self.report(e)?,
        }

        loop {
            writeln!(self.out, "\nCustomer options:")?;
            writeln!(self.out, "  1. Make a reservation")?;
            writeln!(self.out, "  2. Register membership")?;
            writeln!(self.out, "  3. Request housekeeping")?;
            writeln!(self.out, "  4. Leave feedback")?;
            writeln!(self.out, "  E. Back to the main menu")?;
            let Some(choice) = self.prompt("Enter your choice >> ")? else {
                return Ok(None);
            };
            match choice.as_str() {
                "1" => {
                    if self.reservation_flow(&name, contact)?.is_none() {
                        return Ok(None);
                    }
                }
                "2" => match self.desk.register_to_member(&name, contact) {
                    Ok(MembershipOutcome::Upgraded) => {
                        writeln!(self.out, "Customer {name} has been upgraded to membership.")?
                    }
                    Ok(MembershipOutcome::AlreadyMember) => writeln!(
                        self.out,
                        "Dear {name}, you are already a member; no need to apply again."
                    )?,
                    Err(e) => self.report(e)?,
                },
                "3" => {
                    if self.housekeeping_flow(&name, contact)?.is_none() {
                        return Ok(None);
                    }
                }
                "4" => {
                    if self.feedback_flow(&name, contact)?.is_none() {
                        return Ok(None);
                    }
                }
                c if c.eq_ignore_ascii_case("e") => return Ok(Some(())),
                _ => writeln!(self.out, "Invalid choice. Please try again.")?,
            }
        }
    }

    fn reservation_flow(&mut self, name: &str, contact: u64) -> io::Result<Option<()>> {
        let Some(room_type) = self.prompt_room_type()? else {
            return Ok(None);
        };
        let Some(date) = self.prompt_future_date()? else {
            return Ok(None);
        };
        let Some(nights) = self.prompt_nights()? else {
            return Ok(None);
        };
        match self
            .desk
            .make_reservation(name, contact, room_type, date, nights)
        {
            Ok(reservation) => {
                writeln!(
                    self.out,
                    "Dear {name}, your reservation of one {room_type} from {} to {} is received.",
                    reservation.reserved_date,
                    reservation.checkout_date()
                )?;
                writeln!(self.out, "Order number: {}", reservation.id)?;
                writeln!(self.out, "Order amount: ${}", reservation.order_amount)?;
            }
            Err(e) => self.report(e)?,
        }
        Ok(Some(()))
    }

    fn housekeeping_flow(&mut self, name: &str, contact: u64) -> io::Result<Option<()>> {
        let rooms = self.desk.checked_in_rooms(name, contact);
        let room = match rooms.len() {
            0 => {
                writeln!(self.out, "Dear {name}, no check-in record was found.")?;
                return Ok(Some(()));
            }
            1 => rooms[0],
            _ => {
                writeln!(self.out, "You are checked in to the following rooms:")?;
                for r in &rooms {
                    writeln!(self.out, "  {r}")?;
                }
                loop {
                    let Some(number) = self
                        .prompt_number::<u32>("Please enter the room number for housekeeping >> ")?
                    else {
                        return Ok(None);
                    };
                    if rooms.contains(&number) {
                        break number;
                    }
                    writeln!(self.out, "Please pick one of your checked-in rooms.")?;
                }
            }
        };
        let Some(hour) = self.prompt_hour()? else {
            return Ok(None);
        };
        match self.desk.request_housekeeping(room, hour) {
            Ok(entry) => writeln!(
                self.out,
                "Dear {name}, housekeeping for room {room} is scheduled within {}.",
                entry.window
            )?,
            Err(e) => self.report(e)?,
        }
        Ok(Some(()))
    }

    fn feedback_flow(&mut self, name: &str, contact: u64) -> io::Result<Option<()>> {
        let rating = loop {
            let Some(rating) =
                self.prompt_number::<u8>("Please rate your experience with us (1-10) >> ")?
            else {
                return Ok(None);
            };
            if (1..=10).contains(&rating) {
                break rating;
            }
            writeln!(self.out, "Please enter a rating between 1 and 10.")?;
        };
        let Some(comment) = self.prompt("Please feel free to leave a comment >> ")? else {
            return Ok(None);
        };
        match self.desk.submit_feedback(name, contact, rating, &comment) {
            Ok(()) => writeln!(self.out, "Thank you for your feedback!")?,
            Err(e) => self.report(e)?,
        }
        Ok(Some(()))
    }

    // ----- administrator path -----

    fn admin_menu(&mut self) -> io::Result<Option<()>> {
        loop {
            writeln!(self.out, "\nAdministrator options:")?;
            writeln!(self.out, "  1. Manage reservations")?;
            writeln!(self.out, "  2. Check in")?;
            writeln!(self.out, "  3. Check out")?;
            writeln!(self.out, "  4. Today's housekeeping schedule")?;
            writeln!(self.out, "  5. Manage rooms")?;
            writeln!(self.out, "  6. Customer relationship management")?;
            writeln!(self.out, "  E. Back to the main menu")?;
            let Some(choice) = self.prompt("Enter your choice >> ")? else {
                return Ok(None);
            };
            match choice.as_str() {
                "1" => {
                    if self.reservations_menu()?.is_none() {
                        return Ok(None);
                    }
                }
                "2" => {
                    if self.check_in_flow()?.is_none() {
                        return Ok(None);
                    }
                }
                "3" => {
                    if self.check_out_flow()?.is_none() {
                        return Ok(None);
                    }
                }
                "4" => self.show_schedule()?,
                "5" => {
                    if self.rooms_menu()?.is_none() {
                        return Ok(None);
                    }
                }
                "6" => {
                    if self.crm_menu()?.is_none() {
                        return Ok(None);
                    }
                }
                c if c.eq_ignore_ascii_case("e") => return Ok(Some(())),
                _ => writeln!(self.out, "Invalid choice. Please try again.")?,
            }
        }
    }

    fn reservations_menu(&mut self) -> io::Result<Option<()>> {
        loop {
            writeln!(self.out, "\nReservation options:")?;
            writeln!(self.out, "  1. Make a reservation")?;
            writeln!(self.out, "  2. View reservations")?;
            writeln!(self.out, "  E. Back to the administrator menu")?;
            let Some(choice) = self.prompt("Enter your choice >> ")? else {
                return Ok(None);
            };
            match choice.as_str() {
                "1" => {
                    let Some(name) = self.prompt("Please enter the guest name >> ")? else {
                        return Ok(None);
                    };
                    let Some(contact) =
                        self.prompt_number::<u64>("Please enter the guest contact >> ")?
                    else {
                        return Ok(None);
                    };
                    if self.reservation_flow(&name, contact)?.is_none() {
                        return Ok(None);
                    }
                }
                "2" => self.show_reservations()?,
                c if c.eq_ignore_ascii_case("e") => return Ok(Some(())),
                _ => writeln!(self.out, "Invalid choice. Please try again.")?,
            }
        }
    }

    fn show_reservations(&mut self) -> io::Result<()> {
        let reservations: Vec<Reservation> = self.desk.reservations().to_vec();
        writeln!(self.out, "Current reservations:")?;
        if reservations.is_empty() {
            writeln!(self.out, "  (none)")?;
            return Ok(());
        }
        for r in reservations {
            let room = match r.room_number {
                Some(n) => n.to_string(),
                None => "unassigned".to_string(),
            };
            writeln!(
                self.out,
                "  {}  {} ({})  {}  room {}  {}  {} night(s)  {}  ${}",
                r.id,
                r.guest_name,
                r.contact,
                r.room_type,
                room,
                r.reserved_date,
                r.nights,
                r.state,
                r.order_amount
            )?;
        }
        Ok(())
    }

    fn check_in_flow(&mut self) -> io::Result<Option<()>> {
        loop {
            let Some(input) = self.prompt("Enter the reservation id (or 'back') >> ")? else {
                return Ok(None);
            };
            if input.eq_ignore_ascii_case("back") {
                return Ok(Some(()));
            }
            match self.desk.check_in(&input) {
                Ok(room) => {
                    writeln!(self.out, "Room {room} has been assigned for this order.")?;
                    return Ok(Some(()));
                }
                Err(e @ DeskError::NoRoomAvailable(_)) => {
                    // Retryable later once a room frees up; the reservation
                    // stays un-checked-in.
                    self.report(e)?;
                    return Ok(Some(()));
                }
                Err(e) => self.report(e)?,
            }
        }
    }

    fn check_out_flow(&mut self) -> io::Result<Option<()>> {
        loop {
            let Some(input) = self.prompt("Enter the room number (or 'back') >> ")? else {
                return Ok(None);
            };
            if input.eq_ignore_ascii_case("back") {
                return Ok(Some(()));
            }
            let Ok(room) = input.parse::<u32>() else {
                writeln!(self.out, "Invalid input! Please enter a room number.")?;
                continue;
            };
            match self.desk.check_out(room) {
                Ok(amount) => {
                    writeln!(self.out, "The amount for this order is ${amount}.")?;
                    return Ok(Some(()));
                }
                Err(e) => self.report(e)?,
            }
        }
    }

    fn show_schedule(&mut self) -> io::Result<()> {
        let slots = self.desk.today_schedule();
        writeln!(self.out, "Today's housekeeping schedule:")?;
        if slots.is_empty() {
            writeln!(self.out, "  (nothing scheduled)")?;
        }
        for slot in slots {
            let status = match slot.status {
                Some(s) => s.to_string(),
                None => "unknown".to_string(),
            };
            let source = match slot.source {
                crate::schedule::SlotSource::Requested => "requested",
                crate::schedule::SlotSource::Default => "default",
            };
            writeln!(
                self.out,
                "  {}  room {:<6} {:<10} ({source})",
                slot.window, slot.room_number, status
            )?;
        }
        Ok(())
    }

    fn rooms_menu(&mut self) -> io::Result<Option<()>> {
        loop {
            writeln!(self.out, "\nRoom options:")?;
            writeln!(self.out, "  1. View available rooms")?;
            writeln!(self.out, "  2. View all rooms")?;
            writeln!(self.out, "  3. Toggle room status")?;
            writeln!(self.out, "  4. Add a room")?;
            writeln!(self.out, "  E. Back to the administrator menu")?;
            let Some(choice) = self.prompt("Enter your choice >> ")? else {
                return Ok(None);
            };
            match choice.as_str() {
                "1" => self.show_available_rooms()?,
                "2" => self.show_all_rooms()?,
                "3" => {
                    let Some(number) = self.prompt_number::<u32>("Room number >> ")? else {
                        return Ok(None);
                    };
                    match self.desk.toggle_room_status(number) {
                        Ok((old, new)) => writeln!(
                            self.out,
                            "Room {number} status changed from {old} to {new}."
                        )?,
                        Err(e) => self.report(e)?,
                    }
                }
                "4" => {
                    let Some(number) = self.prompt_number::<u32>("Room number >> ")? else {
                        return Ok(None);
                    };
                    let Some(room_type) = self.prompt_room_type()? else {
                        return Ok(None);
                    };
                    match self.desk.add_room(number, room_type) {
                        Ok(()) => writeln!(self.out, "Room {number} added successfully.")?,
                        Err(e) => self.report(e)?,
                    }
                }
                c if c.eq_ignore_ascii_case("e") => return Ok(Some(())),
                _ => writeln!(self.out, "Invalid choice. Please try again.")?,
            }
        }
    }

    fn show_available_rooms(&mut self) -> io::Result<()> {
        for room_type in RoomType::ALL {
            let count = self.desk.available_count(room_type);
            writeln!(self.out, "{count} available {room_type}(s)")?;
        }
        let rooms: Vec<Room> = self.desk.available_rooms().into_iter().cloned().collect();
        writeln!(self.out, "Available room list:")?;
        for room in rooms {
            writeln!(self.out, "  {:<6} {}", room.number, room.room_type)?;
        }
        Ok(())
    }

    fn show_all_rooms(&mut self) -> io::Result<()> {
        let rooms: Vec<Room> = self.desk.rooms().to_vec();
        writeln!(self.out, "All rooms:")?;
        if rooms.is_empty() {
            writeln!(self.out, "  (none)")?;
        }
        for room in rooms {
            writeln!(
                self.out,
                "  {:<6} {:<12} {}",
                room.number, room.room_type, room.status
            )?;
        }
        Ok(())
    }

    fn crm_menu(&mut self) -> io::Result<Option<()>> {
        loop {
            writeln!(self.out, "\nCRM options:")?;
            writeln!(self.out, "  1. View members")?;
            writeln!(self.out, "  2. Upgrade a guest to membership")?;
            writeln!(self.out, "  3. Message guests")?;
            writeln!(self.out, "  E. Back to the administrator menu")?;
            let Some(choice) = self.prompt("Enter your choice >> ")? else {
                return Ok(None);
            };
            match choice.as_str() {
                "1" => {
                    let members: Vec<String> = self
                        .desk
                        .members()
                        .iter()
                        .map(|g| format!("  {} ({})", g.name, g.contact))
                        .collect();
                    writeln!(self.out, "Members:")?;
                    if members.is_empty() {
                        writeln!(self.out, "  (none)")?;
                    }
                    for line in members {
                        writeln!(self.out, "{line}")?;
                    }
                }
                "2" => {
                    let Some(name) = self.prompt("Guest name >> ")? else {
                        return Ok(None);
                    };
                    let Some(contact) = self.prompt_number::<u64>("Guest contact >> ")? else {
                        return Ok(None);
                    };
                    match self.desk.register_to_member(&name, contact) {
                        Ok(MembershipOutcome::Upgraded) => {
                            writeln!(self.out, "Guest {name} has been upgraded to membership.")?
                        }
                        Ok(MembershipOutcome::AlreadyMember) => {
                            writeln!(self.out, "Guest {name} is already a member.")?
                        }
                        Err(e) => self.report(e)?,
                    }
                }
                "3" => {
                    if self.broadcast_flow()?.is_none() {
                        return Ok(None);
                    }
                }
                c if c.eq_ignore_ascii_case("e") => return Ok(Some(())),
                _ => writeln!(self.out, "Invalid choice. Please try again.")?,
            }
        }
    }

    fn broadcast_flow(&mut self) -> io::Result<Option<()>> {
        let audience = loop {
            let Some(text) = self.prompt("Audience (all / member / regular) >> ")? else {
                return Ok(None);
            };
            match text.parse::<Audience>() {
                Ok(audience) => break audience,
                Err(_) => writeln!(self.out, "Please answer all, member or regular.")?,
            }
        };
        let Some(message) = self.prompt("Message content >> ")? else {
            return Ok(None);
        };
        let recipients: Vec<String> = self
            .desk
            .broadcast(audience, &message)
            .iter()
            .map(|g| format!("  {} ({})", g.name, g.contact))
            .collect();
        writeln!(
            self.out,
            "Message delivered to {} customer(s):",
            recipients.len()
        )?;
        for line in recipients {
            writeln!(self.out, "{line}")?;
        }
        Ok(Some(()))
    }
}
