pub mod playback;
pub mod session;
pub use playback::{frame, Playback};
pub use session::{Frame, Session, Stage};
