pub mod name;
pub use name::{Gender, NameStatistics};
pub mod phone;
pub use phone::{Carrier, PhoneError, PhoneStatistics};
