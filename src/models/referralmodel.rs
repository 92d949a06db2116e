use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferralStatus {
    Pending,
    SignedUp,
    Rewarded,
    Other(String),
}

impl ReferralStatus {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "pending" => ReferralStatus::Pending,
            "signed_up" => ReferralStatus::SignedUp,
            "rewarded" => ReferralStatus::Rewarded,
            other => ReferralStatus::Other(other.to_string()),
        }
    }

    pub fn to_str(&self) -> &str {
        match self {
            ReferralStatus::Pending => "pending",
            ReferralStatus::SignedUp => "signed_up",
            ReferralStatus::Rewarded => "rewarded",
            ReferralStatus::Other(raw) => raw,
        }
    }

    /// Invitee has not yet produced a reward.
    pub fn is_pending(&self) -> bool {
        matches!(self, ReferralStatus::Pending | ReferralStatus::SignedUp)
    }

    pub fn is_qualified(&self) -> bool {
        matches!(self, ReferralStatus::Rewarded)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, sqlx::FromRow)]
pub struct Referral {
    pub id: Uuid,
    pub referrer_id: Uuid,
    pub referral_code: String,
    pub referred_email: Option<String>,
    pub status: String,
    pub has_published_site: bool,
    pub has_pro_subscription: bool,
    pub credits_awarded: i32,
    pub created_at: DateTime<Utc>,
    pub qualified_at: Option<DateTime<Utc>>,
    pub rewarded_at: Option<DateTime<Utc>>,
}

impl Referral {
    pub fn status(&self) -> ReferralStatus {
        ReferralStatus::parse(&self.status)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReferralSummary {
    pub referral_code: Option<String>,
    pub referrals: Vec<Referral>,
    pub total_credits_earned: i64,
    pub pending_referrals: usize,
    pub qualified_referrals: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_statuses_parse() {
        assert_eq!(ReferralStatus::parse("pending"), ReferralStatus::Pending);
        assert_eq!(ReferralStatus::parse("signed_up"), ReferralStatus::SignedUp);
        assert_eq!(ReferralStatus::parse("rewarded"), ReferralStatus::Rewarded);
    }

    #[test]
    fn unknown_status_is_kept_but_not_counted() {
        let status = ReferralStatus::parse("expired");
        assert_eq!(status.to_str(), "expired");
        assert!(!status.is_pending());
        assert!(!status.is_qualified());
    }
}
