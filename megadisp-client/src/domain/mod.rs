pub mod abt_flow;
pub mod source;
pub mod yokogawa;

pub use abt_flow::{AbtFlow, AbtFlowRow};
pub use source::{SourcePreferenceRow, SourceTag};
pub use yokogawa::{DcScheduleRow, SgScheduleRow, YokogawaReadingRow};
