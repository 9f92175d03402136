pub mod address_add;
pub mod address_remove;
pub mod address_update;
pub mod block;
pub mod forgot_password;
pub mod get;
pub mod list;
pub mod login;
pub mod register;
pub mod resend_verification;
pub mod reset_password;
pub mod unblock;
pub mod update;
pub mod verify;
