pub mod ease;
pub mod tween;

pub use ease::Easing;
pub use tween::{Timeline, TweenRecord};
