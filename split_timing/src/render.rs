//! Derives what every dot looks like at a given step.  Everything here is a pure function of
//! `(step, scenario)`; stepping backwards just recomputes from scratch.

use crate::scenario::{Group, Scenario};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DotColor {
  Grey,
  Control,
  Variant,
}

impl From<Group> for DotColor {
  fn from(group: Group) -> Self {
    match group {
      Group::Control => DotColor::Control,
      Group::Variant => DotColor::Variant,
    }
  }
}

impl DotColor {
  pub fn hex(self) -> &'static str {
    match self {
      DotColor::Grey => "#888",
      DotColor::Control => "#f44",
      DotColor::Variant => "#4af",
    }
  }

  fn code(self) -> u8 {
    match self {
      DotColor::Grey => 0,
      DotColor::Control => 1,
      DotColor::Variant => 2,
    }
  }
}

pub const FADED_OPACITY: f32 = 0.3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DotState {
  pub color: DotColor,
  pub visible: bool,
  pub faded: bool,
}

impl DotState {
  pub const HIDDEN: DotState = DotState {
    color: DotColor::Grey,
    visible: false,
    faded: false,
  };
  pub const GREY: DotState = DotState {
    color: DotColor::Grey,
    visible: true,
    faded: false,
  };

  pub fn assigned(group: Group) -> Self {
    DotState {
      color: group.into(),
      visible: true,
      faded: false,
    }
  }

  pub fn opacity(&self) -> f32 {
    match (self.visible, self.faded) {
      (false, _) => 0.,
      (true, true) => FADED_OPACITY,
      (true, false) => 1.,
    }
  }

  /// bit 0: visible, bit 1: faded, bits 2-3: color (0 grey, 1 control, 2 variant)
  pub fn packed(&self) -> u8 {
    (self.visible as u8) | ((self.faded as u8) << 1) | (self.color.code() << 2)
  }
}

pub const MAX_STEP: usize = 5;
pub const STEP_COUNT: usize = MAX_STEP + 1;

/// Step at which the early panel colors everyone.
const EARLY_ASSIGN_STEP: usize = 2;
/// Step at which drop-off becomes visible in both panels.
const DROP_OFF_STEP: usize = 3;
/// Step at which the late panel colors the survivors.
const LATE_ASSIGN_STEP: usize = 4;

/// Early split: everyone is assigned a group on arrival, and users who later drop off stay in
/// their group, faded.
pub fn early_split_dots(step: usize, scenario: &Scenario) -> Vec<DotState> {
  (0..scenario.population())
    .map(|user_ix| {
      if step == 0 {
        return DotState::HIDDEN;
      }
      if step < EARLY_ASSIGN_STEP {
        return DotState::GREY;
      }

      let mut dot = DotState::assigned(scenario.early_assignment()[user_ix]);
      if step >= DROP_OFF_STEP && scenario.early_drop().contains(user_ix) {
        dot.faded = true;
      }
      dot
    })
    .collect()
}

/// Late split: nobody is assigned until drop-off has happened, then only the survivors are.
pub fn late_split_dots(step: usize, scenario: &Scenario) -> Vec<DotState> {
  (0..scenario.population())
    .map(|user_ix| {
      if step == 0 {
        return DotState::HIDDEN;
      }
      if step >= DROP_OFF_STEP && scenario.late_drop().contains(user_ix) {
        return DotState::HIDDEN;
      }
      if step < LATE_ASSIGN_STEP {
        return DotState::GREY;
      }

      match scenario.late_assignment()[user_ix] {
        Some(group) => DotState::assigned(group),
        None => DotState::GREY,
      }
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::scenario::generate;
  use common::build_rng;

  fn scenario(n: usize, d: usize) -> Scenario {
    generate(&mut build_rng((42, 4242)), n, d)
  }

  #[test]
  fn step_zero_hides_everyone() {
    let scenario = scenario(50, 20);
    assert!(early_split_dots(0, &scenario).iter().all(|d| *d == DotState::HIDDEN));
    assert!(late_split_dots(0, &scenario).iter().all(|d| *d == DotState::HIDDEN));
  }

  #[test]
  fn step_one_shows_grey_everywhere() {
    let scenario = scenario(50, 20);
    assert!(early_split_dots(1, &scenario).iter().all(|d| *d == DotState::GREY));
    assert!(late_split_dots(1, &scenario).iter().all(|d| *d == DotState::GREY));
  }

  #[test]
  fn early_panel_assigns_at_step_two() {
    let scenario = scenario(50, 20);
    let dots = early_split_dots(2, &scenario);
    for (ix, dot) in dots.iter().enumerate() {
      assert_eq!(*dot, DotState::assigned(scenario.early_assignment()[ix]));
    }
    // late panel still waits
    assert!(late_split_dots(2, &scenario).iter().all(|d| *d == DotState::GREY));
  }

  #[test]
  fn early_panel_fades_dropped_users_and_keeps_their_color() {
    let scenario = scenario(50, 20);
    for step in 3..=MAX_STEP {
      let dots = early_split_dots(step, &scenario);
      for (ix, dot) in dots.iter().enumerate() {
        assert!(dot.visible);
        assert_eq!(dot.faded, scenario.early_drop().contains(ix));
        assert_eq!(dot.color, DotColor::from(scenario.early_assignment()[ix]));
      }
    }
    assert_eq!(early_split_dots(4, &scenario), early_split_dots(3, &scenario));
    assert_eq!(early_split_dots(5, &scenario), early_split_dots(3, &scenario));
  }

  #[test]
  fn late_panel_hides_dropped_users_from_step_three() {
    let scenario = scenario(50, 20);
    let dots = late_split_dots(3, &scenario);
    for (ix, dot) in dots.iter().enumerate() {
      if scenario.late_drop().contains(ix) {
        assert_eq!(*dot, DotState::HIDDEN);
      } else {
        assert_eq!(*dot, DotState::GREY);
      }
    }
  }

  #[test]
  fn late_panel_assigns_only_survivors() {
    let scenario = scenario(50, 20);
    for step in LATE_ASSIGN_STEP..=MAX_STEP {
      let dots = late_split_dots(step, &scenario);
      for (ix, dot) in dots.iter().enumerate() {
        if scenario.late_drop().contains(ix) {
          assert!(!dot.visible);
          assert_eq!(dot.color, DotColor::Grey);
        } else {
          assert!(dot.visible);
          assert_ne!(dot.color, DotColor::Grey);
        }
      }
    }
    assert_eq!(late_split_dots(5, &scenario), late_split_dots(4, &scenario));
  }

  #[test]
  fn rendering_is_idempotent() {
    let scenario = scenario(300, 75);
    for step in 0..=MAX_STEP {
      assert_eq!(early_split_dots(step, &scenario), early_split_dots(step, &scenario));
      assert_eq!(late_split_dots(step, &scenario), late_split_dots(step, &scenario));
    }
  }

  #[test]
  fn early_panel_reveal_is_monotonic() {
    let scenario = scenario(120, 50);
    let frames: Vec<_> = (0..=MAX_STEP).map(|step| early_split_dots(step, &scenario)).collect();
    for s1 in 0..=MAX_STEP {
      for s2 in s1 + 1..=MAX_STEP {
        for ix in 0..scenario.population() {
          let (a, b) = (frames[s1][ix], frames[s2][ix]);
          if a.visible {
            assert!(b.visible, "user {ix} hidden again at step {s2}");
          }
          if a.color != DotColor::Grey {
            assert_eq!(a.color, b.color, "user {ix} changed color at step {s2}");
          }
        }
      }
    }
  }

  #[test]
  fn no_drop_off_means_nobody_leaves() {
    let scenario = scenario(80, 0);
    for step in 1..=MAX_STEP {
      assert!(early_split_dots(step, &scenario).iter().all(|d| d.visible && !d.faded));
      assert!(late_split_dots(step, &scenario).iter().all(|d| d.visible));
    }
  }

  #[test]
  fn packing() {
    assert_eq!(DotState::HIDDEN.packed(), 0b0000);
    assert_eq!(DotState::GREY.packed(), 0b0001);
    assert_eq!(DotState::assigned(Group::Control).packed(), 0b0101);
    let faded = DotState {
      faded: true,
      ..DotState::assigned(Group::Variant)
    };
    assert_eq!(faded.packed(), 0b1011);
    assert_eq!(faded.opacity(), FADED_OPACITY);
    assert_eq!(DotState::HIDDEN.opacity(), 0.);
  }
}
