pub mod auth;
pub mod branches;
pub mod checkin;
pub mod export;
pub mod records;
pub mod users;
pub mod vacations;

#[cfg(test)]
pub mod test_support;
