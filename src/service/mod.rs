pub mod error;
pub mod preferences;
pub mod referral;
pub mod site_resolver;
pub mod storage;
