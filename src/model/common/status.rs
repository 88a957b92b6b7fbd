use serde::{Deserialize, Serialize};

/// Account states of a member.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    /// An ordinary, active account.
    #[default]
    Normal,
    /// Dormant; hidden from rankings and unable to sign in.
    Inactive,
    /// Left the service.
    Withdrawn,
}

impl MemberStatus {
    pub fn is_normal(self) -> bool {
        self == Self::Normal
    }
}
