pub mod customers;
pub mod expenses;
pub mod hotel_settings;
