pub mod db;
pub mod preferencedb;
pub mod referraldb;
