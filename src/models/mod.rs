pub mod preferencemodel;
pub mod referralmodel;
