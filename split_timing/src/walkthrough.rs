use nanoserde::SerJson;
use rand::Rng;

use crate::{
  narrative::{step_caption, step_label},
  params::{Params, ParamsError, ParamsPatch},
  render::{early_split_dots, late_split_dots, DotState, MAX_STEP},
  scenario::{generate, Scenario},
  stats::{count_colors, GroupCounts, GroupShares},
};

/// Everything the page needs to draw one step.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
  pub step: usize,
  pub early_dots: Vec<DotState>,
  pub late_dots: Vec<DotState>,
  pub early_stats: GroupCounts,
  pub late_stats: GroupCounts,
  pub early_shares: GroupShares,
  pub late_shares: GroupShares,
  pub show_stats: bool,
  pub can_prev: bool,
  pub can_next: bool,
  pub label: String,
  pub caption: String,
}

/// JSON shape of a [`Frame`] handed to the page; dots are packed with [`DotState::packed`].
#[derive(SerJson)]
struct FrameJson {
  step: u32,
  early_dots: Vec<u8>,
  late_dots: Vec<u8>,
  early_stats: GroupCounts,
  late_stats: GroupCounts,
  early_shares: GroupShares,
  late_shares: GroupShares,
  show_stats: bool,
  can_prev: bool,
  can_next: bool,
  label: String,
  caption: String,
}

impl Frame {
  pub fn to_json(&self) -> String {
    let pack = |dots: &[DotState]| -> Vec<u8> { dots.iter().map(DotState::packed).collect() };
    FrameJson {
      step: self.step as u32,
      early_dots: pack(&self.early_dots),
      late_dots: pack(&self.late_dots),
      early_stats: self.early_stats,
      late_stats: self.late_stats,
      early_shares: self.early_shares,
      late_shares: self.late_shares,
      show_stats: self.show_stats,
      can_prev: self.can_prev,
      can_next: self.can_next,
      label: self.label.clone(),
      caption: self.caption.clone(),
    }
    .serialize_json()
  }
}

pub fn render_frame(step: usize, scenario: &Scenario) -> Frame {
  let step = step.min(MAX_STEP);
  let early_dots = early_split_dots(step, scenario);
  let late_dots = late_split_dots(step, scenario);
  let early_stats = count_colors(&early_dots);
  let late_stats = count_colors(&late_dots);

  Frame {
    step,
    early_dots,
    late_dots,
    early_stats,
    late_stats,
    early_shares: early_stats.shares(),
    late_shares: late_stats.shares(),
    show_stats: step == MAX_STEP,
    can_prev: step > 0,
    can_next: step < MAX_STEP,
    label: step_label(step),
    caption: step_caption(step),
  }
}

/// The navigable state of the demo: current params, the scenario drawn for them, and the step.
pub struct Walkthrough<R: Rng> {
  rng: R,
  params: Params,
  scenario: Scenario,
  step: usize,
}

impl<R: Rng> Walkthrough<R> {
  pub fn new(mut rng: R, params: Params) -> Self {
    let params = params.sanitized();
    let scenario = generate(&mut rng, params.participants as usize, params.drop_off_count());
    Walkthrough {
      rng,
      params,
      scenario,
      step: 0,
    }
  }

  pub fn params(&self) -> Params {
    self.params
  }

  pub fn scenario(&self) -> &Scenario {
    &self.scenario
  }

  pub fn step(&self) -> usize {
    self.step
  }

  fn regenerate(&mut self) {
    self.scenario = generate(
      &mut self.rng,
      self.params.participants as usize,
      self.params.drop_off_count(),
    );
    log::info!(
      "New scenario: {} participants, {}% drop-off ({} users)",
      self.params.participants,
      self.params.drop_off_percent,
      self.params.drop_off_count()
    );
  }

  pub fn next(&mut self) {
    self.step = (self.step + 1).min(MAX_STEP);
    log::debug!("step -> {}", self.step);
  }

  pub fn prev(&mut self) {
    self.step = self.step.saturating_sub(1);
    log::debug!("step -> {}", self.step);
  }

  /// Draws a fresh scenario and goes back to the first step.
  pub fn reset(&mut self) {
    self.regenerate();
    self.step = 0;
  }

  /// Replaces the params, drawing a new scenario if anything actually changed.  Returns whether
  /// it did.
  pub fn set_params(&mut self, params: Params) -> bool {
    let params = params.sanitized();
    if params == self.params {
      return false;
    }
    self.params = params;
    self.regenerate();
    true
  }

  pub fn set_participants(&mut self, participants: i64) -> bool {
    self.set_params(self.params.apply(&ParamsPatch {
      participants: Some(participants),
      drop_off_percent: None,
    }))
  }

  pub fn set_drop_off_percent(&mut self, percent: i64) -> bool {
    self.set_params(self.params.apply(&ParamsPatch {
      participants: None,
      drop_off_percent: Some(percent),
    }))
  }

  pub fn apply_json(&mut self, json: &str) -> Result<bool, ParamsError> {
    let patch = ParamsPatch::from_json(json)?;
    Ok(self.set_params(self.params.apply(&patch)))
  }

  pub fn frame(&self) -> Frame {
    render_frame(self.step, &self.scenario)
  }
}
