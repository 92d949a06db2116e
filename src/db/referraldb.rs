// db/referraldb.rs
use async_trait::async_trait;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::referralmodel::{Referral, ReferralStatus};

#[async_trait]
pub trait ReferralExt: Send + Sync {
    /// Atomic server-side allocation. `None` means the procedure ran but had no code to hand out.
    async fn get_or_create_referral_code(
        &self,
        user_id: Uuid,
    ) -> Result<Option<String>, sqlx::Error>;

    async fn insert_referral(
        &self,
        referrer_id: Uuid,
        referral_code: &str,
        status: ReferralStatus,
    ) -> Result<Referral, sqlx::Error>;

    /// Newest first.
    async fn get_referrals_by_referrer(
        &self,
        referrer_id: Uuid,
    ) -> Result<Vec<Referral>, sqlx::Error>;
}

#[async_trait]
impl ReferralExt for DBClient {
    async fn get_or_create_referral_code(
        &self,
        user_id: Uuid,
    ) -> Result<Option<String>, sqlx::Error> {
        sqlx::query_scalar::<_, Option<String>>(
            r#"SELECT get_or_create_referral_code($1)"#
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn insert_referral(
        &self,
        referrer_id: Uuid,
        referral_code: &str,
        status: ReferralStatus,
    ) -> Result<Referral, sqlx::Error> {
        sqlx::query_as::<_, Referral>(
            r#"
            INSERT INTO referrals (referrer_id, referral_code, status)
            VALUES ($1, $2, $3)
            RETURNING
                id, referrer_id, referral_code, referred_email, status,
                has_published_site, has_pro_subscription, credits_awarded,
                created_at, qualified_at, rewarded_at
            "#
        )
        .bind(referrer_id)
        .bind(referral_code)
        .bind(status.to_str())
        .fetch_one(&self.pool)
        .await
    }

    async fn get_referrals_by_referrer(
        &self,
        referrer_id: Uuid,
    ) -> Result<Vec<Referral>, sqlx::Error> {
        sqlx::query_as::<_, Referral>(
            r#"
            SELECT
                id, referrer_id, referral_code, referred_email, status,
                has_published_site, has_pro_subscription, credits_awarded,
                created_at, qualified_at, rewarded_at
            FROM referrals
            WHERE referrer_id = $1
            ORDER BY created_at DESC
            "#
        )
        .bind(referrer_id)
        .fetch_all(&self.pool)
        .await
    }
}
