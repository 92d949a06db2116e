// service/referral.rs
use std::sync::Arc;

use rand::Rng;
use uuid::Uuid;

use crate::{
    db::referraldb::ReferralExt,
    models::referralmodel::{Referral, ReferralStatus, ReferralSummary},
};

const CODE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Client-side fallback code: the caller's id prefix plus four random characters.
pub fn generate_referral_code(user_id: Uuid) -> String {
    let prefix = user_id
        .to_string()
        .chars()
        .take(8)
        .collect::<String>()
        .to_uppercase();

    let mut rng = rand::rng();
    let suffix = (0..4)
        .map(|_| CODE_CHARSET[rng.random_range(0..CODE_CHARSET.len())] as char)
        .collect::<String>();

    format!("{}{}", prefix, suffix)
}

pub fn generate_referral_link(base_url: &str, code: Option<&str>) -> String {
    match code {
        Some(code) if !code.is_empty() => {
            format!("{}/auth?ref={}", base_url.trim_end_matches('/'), code)
        }
        _ => String::new(),
    }
}

fn summarize(referral_code: Option<String>, referrals: Vec<Referral>) -> ReferralSummary {
    let mut total_credits_earned = 0_i64;
    let mut pending_referrals = 0;
    let mut qualified_referrals = 0;

    for referral in &referrals {
        total_credits_earned += i64::from(referral.credits_awarded);
        let status = referral.status();
        if status.is_pending() {
            pending_referrals += 1;
        } else if status.is_qualified() {
            qualified_referrals += 1;
        }
    }

    ReferralSummary {
        referral_code,
        referrals,
        total_credits_earned,
        pending_referrals,
        qualified_referrals,
    }
}

/// Read side of the referral program. Remote failures are logged and degrade to defaults.
pub struct ReferralService {
    store: Arc<dyn ReferralExt>,
    origin: String,
}

impl ReferralService {
    pub fn new(store: Arc<dyn ReferralExt>, origin: impl Into<String>) -> Self {
        Self {
            store,
            origin: origin.into(),
        }
    }

    pub fn referral_link(&self, code: Option<&str>) -> String {
        generate_referral_link(&self.origin, code)
    }

    async fn fetch_referrals(&self, user_id: Uuid) -> Option<Vec<Referral>> {
        match self.store.get_referrals_by_referrer(user_id).await {
            Ok(referrals) => Some(referrals),
            Err(e) => {
                tracing::error!("Failed to fetch referrals for {}: {}", user_id, e);
                None
            }
        }
    }

    pub async fn fetch_referral_data(&self, caller: Option<Uuid>) -> ReferralSummary {
        let Some(user_id) = caller else {
            return ReferralSummary::default();
        };

        let mut referral_code = None;
        let mut allocation_missing = false;

        match self.store.get_or_create_referral_code(user_id).await {
            Ok(Some(code)) => referral_code = Some(code),
            Ok(None) => allocation_missing = true,
            Err(e) => {
                tracing::error!("Referral code allocation failed for {}: {}", user_id, e);
            }
        }

        let fetched = self.fetch_referrals(user_id).await;
        let fetch_ok = fetched.is_some();
        let mut referrals = fetched.unwrap_or_default();

        // Only insert a candidate when we know the caller owns no rows yet;
        // an existing row's code wins over a fresh local one.
        if allocation_missing && fetch_ok && referrals.is_empty() {
            let candidate = generate_referral_code(user_id);
            match self
                .store
                .insert_referral(user_id, &candidate, ReferralStatus::Pending)
                .await
            {
                Ok(row) => {
                    tracing::info!("Created referral code {} for {}", row.referral_code, user_id);
                    referral_code = Some(row.referral_code.clone());
                    referrals = self.fetch_referrals(user_id).await.unwrap_or_else(|| vec![row]);
                }
                Err(e) => {
                    tracing::error!("Failed to store referral code for {}: {}", user_id, e);
                }
            }
        }

        if referral_code.is_none() {
            referral_code = referrals.first().map(|r| r.referral_code.clone());
        }

        summarize(referral_code, referrals)
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{Duration, Utc};
    use std::sync::Mutex;

    #[derive(Clone)]
    pub enum Allocation {
        Code(String),
        Missing,
        Error,
    }

    pub struct FakeReferralStore {
        pub allocation: Allocation,
        pub rows: Mutex<Vec<Referral>>,
        pub fail_fetch: bool,
        pub fail_insert: bool,
        pub calls: Mutex<Vec<&'static str>>,
    }

    impl FakeReferralStore {
        pub fn new(allocation: Allocation, rows: Vec<Referral>) -> Self {
            Self {
                allocation,
                rows: Mutex::new(rows),
                fail_fetch: false,
                fail_insert: false,
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap().clone()
        }

        pub fn row_count(&self) -> usize {
            self.rows.lock().unwrap().len()
        }
    }

    pub fn referral(referrer_id: Uuid, code: &str, status: &str, credits: i32, minutes_ago: i64) -> Referral {
        Referral {
            id: Uuid::new_v4(),
            referrer_id,
            referral_code: code.to_string(),
            referred_email: None,
            status: status.to_string(),
            has_published_site: false,
            has_pro_subscription: false,
            credits_awarded: credits,
            created_at: Utc::now() - Duration::minutes(minutes_ago),
            qualified_at: None,
            rewarded_at: None,
        }
    }

    #[async_trait]
    impl ReferralExt for FakeReferralStore {
        async fn get_or_create_referral_code(&self, _user_id: Uuid) -> Result<Option<String>, sqlx::Error> {
            self.calls.lock().unwrap().push("allocate");
            match &self.allocation {
                Allocation::Code(code) => Ok(Some(code.clone())),
                Allocation::Missing => Ok(None),
                Allocation::Error => Err(sqlx::Error::PoolTimedOut),
            }
        }

        async fn insert_referral(
            &self,
            referrer_id: Uuid,
            referral_code: &str,
            status: ReferralStatus,
        ) -> Result<Referral, sqlx::Error> {
            self.calls.lock().unwrap().push("insert");
            if self.fail_insert {
                return Err(sqlx::Error::PoolTimedOut);
            }
            let row = referral(referrer_id, referral_code, status.to_str(), 0, 0);
            self.rows.lock().unwrap().push(row.clone());
            Ok(row)
        }

        async fn get_referrals_by_referrer(&self, referrer_id: Uuid) -> Result<Vec<Referral>, sqlx::Error> {
            self.calls.lock().unwrap().push("select");
            if self.fail_fetch {
                return Err(sqlx::Error::PoolTimedOut);
            }
            let mut rows: Vec<Referral> = self
                .rows
                .lock()
                .unwrap()
                .iter()
                .filter(|r| r.referrer_id == referrer_id)
                .cloned()
                .collect();
            rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Ok(rows)
        }
    }

    fn service(store: Arc<FakeReferralStore>) -> ReferralService {
        ReferralService::new(store, "https://sitegen.test")
    }

    #[test]
    fn fallback_code_uses_id_prefix() {
        let user_id = Uuid::parse_str("a1b2c3d4-0000-4000-8000-000000000000").unwrap();
        let code = generate_referral_code(user_id);

        assert_eq!(code.len(), 12);
        assert!(code.starts_with("A1B2C3D4"));
        assert!(code[8..].bytes().all(|b| CODE_CHARSET.contains(&b)));
    }

    #[test]
    fn link_is_empty_without_code() {
        assert_eq!(generate_referral_link("https://sitegen.test", None), "");
        assert_eq!(generate_referral_link("https://sitegen.test", Some("")), "");
        assert_eq!(
            generate_referral_link("https://sitegen.test/", Some("ABCD1234")),
            "https://sitegen.test/auth?ref=ABCD1234"
        );
    }

    #[tokio::test]
    async fn absent_caller_makes_no_remote_calls() {
        let store = Arc::new(FakeReferralStore::new(Allocation::Code("X".into()), vec![]));
        let summary = service(store.clone()).fetch_referral_data(None).await;

        assert_eq!(summary, ReferralSummary::default());
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn allocated_code_is_adopted() {
        let store = Arc::new(FakeReferralStore::new(Allocation::Code("ABCD1234".into()), vec![]));
        let svc = service(store.clone());
        let summary = svc.fetch_referral_data(Some(Uuid::new_v4())).await;

        assert_eq!(summary.referral_code.as_deref(), Some("ABCD1234"));
        assert_eq!(
            svc.referral_link(summary.referral_code.as_deref()),
            "https://sitegen.test/auth?ref=ABCD1234"
        );
        assert_eq!(store.calls(), vec!["allocate", "select"]);
    }

    #[tokio::test]
    async fn aggregates_are_computed_over_rows() {
        let user_id = Uuid::new_v4();
        let rows = vec![
            referral(user_id, "CODE", "rewarded", 5, 3),
            referral(user_id, "CODE", "pending", 0, 2),
            referral(user_id, "CODE", "signed_up", 3, 1),
        ];
        let store = Arc::new(FakeReferralStore::new(Allocation::Code("CODE".into()), rows));
        let summary = service(store).fetch_referral_data(Some(user_id)).await;

        assert_eq!(summary.total_credits_earned, 8);
        assert_eq!(summary.pending_referrals, 2);
        assert_eq!(summary.qualified_referrals, 1);
        assert_eq!(summary.referrals[0].status, "signed_up");
    }

    #[tokio::test]
    async fn allocation_error_falls_back_to_newest_row() {
        let user_id = Uuid::new_v4();
        let rows = vec![
            referral(user_id, "OLDER", "pending", 0, 10),
            referral(user_id, "NEWER", "pending", 0, 1),
        ];
        let store = Arc::new(FakeReferralStore::new(Allocation::Error, rows));
        let summary = service(store.clone()).fetch_referral_data(Some(user_id)).await;

        assert_eq!(summary.referral_code.as_deref(), Some("NEWER"));
        assert!(!store.calls().contains(&"insert"));
    }

    #[tokio::test]
    async fn allocation_error_without_rows_leaves_no_code() {
        let store = Arc::new(FakeReferralStore::new(Allocation::Error, vec![]));
        let svc = service(store);
        let summary = svc.fetch_referral_data(Some(Uuid::new_v4())).await;

        assert_eq!(summary.referral_code, None);
        assert_eq!(svc.referral_link(summary.referral_code.as_deref()), "");
    }

    #[tokio::test]
    async fn missing_code_inserts_a_pending_candidate() {
        let user_id = Uuid::new_v4();
        let store = Arc::new(FakeReferralStore::new(Allocation::Missing, vec![]));
        let summary = service(store.clone()).fetch_referral_data(Some(user_id)).await;

        let code = summary.referral_code.expect("candidate code adopted");
        let prefix = user_id.to_string()[..8].to_uppercase();
        assert!(code.starts_with(&prefix));
        assert_eq!(summary.referrals.len(), 1);
        assert_eq!(summary.pending_referrals, 1);
        assert_eq!(store.row_count(), 1);
    }

    #[tokio::test]
    async fn missing_code_reuses_existing_row_instead_of_inserting() {
        let user_id = Uuid::new_v4();
        let rows = vec![referral(user_id, "EXISTING", "signed_up", 0, 5)];
        let store = Arc::new(FakeReferralStore::new(Allocation::Missing, rows));
        let summary = service(store.clone()).fetch_referral_data(Some(user_id)).await;

        assert_eq!(summary.referral_code.as_deref(), Some("EXISTING"));
        assert_eq!(store.row_count(), 1);
    }

    #[tokio::test]
    async fn failed_fetch_skips_candidate_insert() {
        let mut store = FakeReferralStore::new(Allocation::Missing, vec![]);
        store.fail_fetch = true;
        let store = Arc::new(store);
        let summary = service(store.clone()).fetch_referral_data(Some(Uuid::new_v4())).await;

        assert_eq!(summary, ReferralSummary::default());
        assert!(!store.calls().contains(&"insert"));
    }

    #[tokio::test]
    async fn failed_insert_degrades_to_no_code() {
        let mut store = FakeReferralStore::new(Allocation::Missing, vec![]);
        store.fail_insert = true;
        let store = Arc::new(store);
        let summary = service(store).fetch_referral_data(Some(Uuid::new_v4())).await;

        assert_eq!(summary.referral_code, None);
        assert!(summary.referrals.is_empty());
    }

    #[tokio::test]
    async fn repeated_refresh_is_stable() {
        let user_id = Uuid::new_v4();
        let store = Arc::new(FakeReferralStore::new(Allocation::Missing, vec![]));
        let svc = service(store.clone());

        let first = svc.fetch_referral_data(Some(user_id)).await;
        let second = svc.fetch_referral_data(Some(user_id)).await;

        assert_eq!(first, second);
        assert_eq!(store.row_count(), 1);
    }
}
