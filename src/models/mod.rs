pub mod booking;
pub mod event;
pub mod user;

pub use booking::UserBooking;
pub use event::Event;
pub use user::{Role, User};
