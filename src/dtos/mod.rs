pub mod checkoutdtos;
pub mod preferencedtos;
pub mod referraldtos;
