use nanoserde::SerJson;

use crate::render::{DotColor, DotState};

/// Number of active (visible and not faded) users per group.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, SerJson)]
pub struct GroupCounts {
  pub control: u32,
  pub variant: u32,
}

/// Rounded integer percentage of `part` in `total`.  An empty total is 0%.
pub fn share(part: u32, total: u32) -> u32 {
  if total == 0 {
    return 0;
  }
  ((part as u64 * 100 + total as u64 / 2) / total as u64) as u32
}

/// Rounded percentage of active users per group, as shown next to the counts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, SerJson)]
pub struct GroupShares {
  pub control: u32,
  pub variant: u32,
}

impl GroupCounts {
  pub fn total(&self) -> u32 {
    self.control + self.variant
  }

  pub fn control_share(&self) -> u32 {
    share(self.control, self.total())
  }

  pub fn variant_share(&self) -> u32 {
    share(self.variant, self.total())
  }

  pub fn shares(&self) -> GroupShares {
    GroupShares {
      control: self.control_share(),
      variant: self.variant_share(),
    }
  }
}

pub fn count_colors(dots: &[DotState]) -> GroupCounts {
  let mut counts = GroupCounts::default();
  for dot in dots {
    if !dot.visible || dot.faded {
      continue;
    }
    match dot.color {
      DotColor::Control => counts.control += 1,
      DotColor::Variant => counts.variant += 1,
      DotColor::Grey => (),
    }
  }
  counts
}
