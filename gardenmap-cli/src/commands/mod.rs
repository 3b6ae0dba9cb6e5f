pub mod delete;
pub mod init;
pub mod list;
pub mod map;
pub mod set_active;
pub mod submit;
