pub mod auth;
pub mod catalog;
pub mod link_check;
pub mod reading_plan;
pub mod recommendations;
pub mod statistics;

pub use catalog::Catalog;
pub use link_check::LinkChecker;
