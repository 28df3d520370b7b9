pub mod application;
pub mod convert;
pub mod walkthrough;
