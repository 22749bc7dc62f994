pub mod exam;
pub mod init;
pub mod review;
pub mod study;
pub mod validate;
