use serde::{Deserialize, Serialize};

use crate::models::referralmodel::{Referral, ReferralSummary};

#[derive(Debug, Serialize, Deserialize)]
pub struct ReferralOverviewDto {
    pub referral_code: Option<String>,
    pub referral_link: String,
    pub total_credits_earned: i64,
    pub pending_referrals: usize,
    pub qualified_referrals: usize,
    pub referrals: Vec<Referral>,
}

impl ReferralOverviewDto {
    pub fn from_summary(summary: ReferralSummary, referral_link: String) -> Self {
        ReferralOverviewDto {
            referral_code: summary.referral_code,
            referral_link,
            total_credits_earned: summary.total_credits_earned,
            pending_referrals: summary.pending_referrals,
            qualified_referrals: summary.qualified_referrals,
            referrals: summary.referrals,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReferralLinkDto {
    pub referral_code: Option<String>,
    pub referral_link: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReferralResponseDto<T> {
    pub status: String,
    pub data: T,
}
