pub mod dispatch;
pub mod notification;
