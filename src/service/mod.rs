pub mod ask;
pub mod bootstrap;
pub mod chat;
pub mod history;
pub mod init;
pub mod platforms;
