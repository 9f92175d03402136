pub mod cancel;
pub mod get;
pub mod list;
pub mod place;
pub mod track;
pub mod update_status;
