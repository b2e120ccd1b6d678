pub mod diff;
pub mod dispatch;
pub mod path;
pub mod shape;
pub mod shared;
pub mod validate;
