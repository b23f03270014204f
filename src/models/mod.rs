pub mod diagnosis;
pub mod enums;
pub mod expert;
pub mod reservation;
pub mod user;

pub use diagnosis::*;
pub use expert::*;
pub use reservation::*;
pub use user::*;
