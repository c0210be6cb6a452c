pub mod animation;
pub mod frame;

pub use animation::Animation;
pub use frame::Frame;
