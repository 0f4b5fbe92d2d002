pub mod init;
pub mod vector;
