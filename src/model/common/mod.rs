//! Types shared between the database, the API and the engine.

mod choice;
mod status;

pub use choice::Choice;
pub use status::MemberStatus;
