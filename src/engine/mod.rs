pub mod clock;
pub mod metrics;
pub mod timer;
pub mod validator;
pub mod window;

pub use clock::{Clock, ManualClock, SystemClock};
