pub mod check;
pub mod grade;
pub mod init;
pub mod validate;
