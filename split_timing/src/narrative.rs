use crate::render::{MAX_STEP, STEP_COUNT};

const STEP_LABELS: [&str; STEP_COUNT] = [
  "Users (dots) start off hidden.",
  "All users arrive.",
  "Early Split: assign groups now. Late Split: wait to assign.",
  "Show drop-off. Early Split: dropped users are faded but already assigned a group. Late \
   Split: only survivors remain.",
  "Late Split: now assign groups to only the users who made it.",
  "Compare final group sizes!",
];

/// Explanation shown under the panels, e.g. "Step 3: Early Split: assign groups now. ..."
pub fn step_label(step: usize) -> String {
  let step = step.min(MAX_STEP);
  format!("Step {}: {}", step + 1, STEP_LABELS[step])
}

/// "Step 1 / 6"
pub fn step_caption(step: usize) -> String {
  format!("Step {} / {}", step.min(MAX_STEP) + 1, STEP_COUNT)
}

#[test]
fn labels_and_captions() {
  assert_eq!(step_label(0), "Step 1: Users (dots) start off hidden.");
  assert_eq!(step_label(5), "Step 6: Compare final group sizes!");
  assert!(step_label(3).contains("Late Split: only survivors remain."));
  assert_eq!(step_caption(0), "Step 1 / 6");
  assert_eq!(step_caption(5), "Step 6 / 6");
  assert_eq!(step_caption(17), "Step 6 / 6");
}
