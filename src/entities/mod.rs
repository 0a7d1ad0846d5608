pub mod driver;
pub mod expense;
pub mod party;
pub mod payment_book;
pub mod supplier;
pub mod trip;
pub mod trip_expense;
pub mod truck;
