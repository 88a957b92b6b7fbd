//! DB-compatible (e.g. de/serialisable) types.
//!
//! The types in this module are serialised in an DB-friendly way, e.g.:
//!
//! - IDs and datetimes are serialised in MongoDB's own format.
//!
//! This service only reads these collections; they are written by the
//! question, group and membership management services.

mod group;
pub use group::{Group, Membership};

mod member;
pub use member::{Member, MemberCore};

mod question;
pub use question::{Question, QuestionCore};

mod response;
pub use response::Response;

mod tag;
pub use tag::Tag;
