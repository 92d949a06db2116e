pub mod checkout;
pub mod preferences;
pub mod referral;
pub mod site;

#[cfg(test)]
pub mod testing;
