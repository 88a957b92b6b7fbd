use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// One of the two options of a balance question.
///
/// Stored and transmitted as the strings `"A"` and `"B"`; anything else fails
/// to deserialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Choice {
    A,
    B,
}

impl Display for Choice {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::A => write!(f, "A"),
            Self::B => write!(f, "B"),
        }
    }
}

#[cfg(test)]
mod tests {
    use mongodb::bson::{to_bson, Bson};
    use rocket::serde::json::serde_json;

    use super::*;

    #[test]
    fn serialises_as_bare_letter() {
        assert_eq!(serde_json::to_string(&Choice::A).unwrap(), "\"A\"");
        assert_eq!(to_bson(&Choice::B).unwrap(), Bson::String("B".to_string()));
    }

    #[test]
    fn rejects_anything_but_a_or_b() {
        assert_eq!(serde_json::from_str::<Choice>("\"B\"").unwrap(), Choice::B);
        assert!(serde_json::from_str::<Choice>("\"C\"").is_err());
        assert!(serde_json::from_str::<Choice>("\"a\"").is_err());
        assert!(serde_json::from_str::<Choice>("1").is_err());
    }
}
