pub mod alert;
pub mod control;
pub mod page;
