pub mod health;
pub mod history;
pub mod notification;
pub mod outcome;
pub mod retry;
