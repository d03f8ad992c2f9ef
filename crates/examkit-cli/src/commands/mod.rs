pub mod compare;
pub mod fetch;
pub mod grade;
pub mod init;
pub mod validate;
