//! Simulated A/B test population for comparing "assign on arrival" (early split) against
//! "assign at first interaction" (late split).
//!
//! A [`Scenario`] is one random draw of who drops off and who lands in which group.  The dots
//! shown at each step of the walkthrough are derived from it with pure functions, so the page can
//! step back and forth freely without anything drifting.

pub mod narrative;
pub mod params;
pub mod render;
pub mod scenario;
pub mod stats;
pub mod walkthrough;

pub use params::{Params, ParamsError, ParamsPatch};
pub use render::{DotColor, DotState, MAX_STEP, STEP_COUNT};
pub use scenario::{generate, Group, Scenario};
pub use stats::{count_colors, GroupCounts, GroupShares};
pub use walkthrough::{render_frame, Frame, Walkthrough};
