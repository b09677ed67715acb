pub mod appointment;
pub mod availability;
pub mod provider;
pub mod session;
pub mod user;

pub use appointment::{Appointment, AppointmentRequest};
pub use availability::{AvailabilitySlot, DayAvailability, HourSlot};
pub use provider::Provider;
pub use session::{Session, SignInCredentials};
pub use user::{NewUser, ProfileUpdate, User, UserPatch};
