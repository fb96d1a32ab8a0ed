
pub mod combiner;
pub mod finger_bank;

pub use combiner::RakeCombiner;
pub use finger_bank::{Finger, FingerBank, MAX_FINGERS};
