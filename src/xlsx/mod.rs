pub mod writer;

pub use writer::hand_summary;
pub use writer::write_scoresheet;
