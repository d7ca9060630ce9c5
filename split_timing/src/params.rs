use std::fmt;

use common::clamp;
use nanoserde::{DeJson, SerJson};

pub const MIN_PARTICIPANTS: u32 = 50;
pub const MAX_PARTICIPANTS: u32 = 1000;
pub const MAX_DROP_OFF_PERCENT: u32 = 100;

pub const DEFAULT_PARTICIPANTS: u32 = 50;
/// 20 of the default 50 participants.
pub const DEFAULT_DROP_OFF_PERCENT: u32 = 40;

/// User-adjustable knobs.  Always holds in-range values; everything coming from the page goes
/// through the clamping constructors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, SerJson)]
pub struct Params {
  pub participants: u32,
  pub drop_off_percent: u32,
}

impl Default for Params {
  fn default() -> Self {
    Params {
      participants: DEFAULT_PARTICIPANTS,
      drop_off_percent: DEFAULT_DROP_OFF_PERCENT,
    }
  }
}

pub fn clamp_participants(participants: i64) -> u32 {
  clamp(
    participants,
    MIN_PARTICIPANTS as i64,
    MAX_PARTICIPANTS as i64,
  ) as u32
}

pub fn clamp_drop_off_percent(percent: i64) -> u32 {
  clamp(percent, 0, MAX_DROP_OFF_PERCENT as i64) as u32
}

/// `round(participants * percent / 100)`, clamped to `[0, participants]`.
pub fn drop_off_count(participants: u32, percent: u32) -> usize {
  let percent = percent.min(MAX_DROP_OFF_PERCENT) as u64;
  let participants = participants as u64;
  // integer round-half-up; inputs are non-negative so this matches `Math.round`
  let count = (participants * percent + 50) / 100;
  count.min(participants) as usize
}

impl Params {
  pub fn new(participants: i64, drop_off_percent: i64) -> Self {
    Params {
      participants: clamp_participants(participants),
      drop_off_percent: clamp_drop_off_percent(drop_off_percent),
    }
  }

  pub fn sanitized(self) -> Self {
    Params::new(self.participants as i64, self.drop_off_percent as i64)
  }

  pub fn drop_off_count(&self) -> usize {
    drop_off_count(self.participants, self.drop_off_percent)
  }

  /// Applies whichever fields are present in `patch`, clamping them into range.
  pub fn apply(self, patch: &ParamsPatch) -> Self {
    Params {
      participants: patch
        .participants
        .map(clamp_participants)
        .unwrap_or(self.participants),
      drop_off_percent: patch
        .drop_off_percent
        .map(clamp_drop_off_percent)
        .unwrap_or(self.drop_off_percent),
    }
  }

  pub fn to_json(&self) -> String {
    self.serialize_json()
  }
}

/// Partial parameter update as sent by the page, e.g. `{"participants": 200}`.  Values are
/// unclamped and may be out of range.
#[derive(Clone, Debug, Default, PartialEq, Eq, DeJson)]
pub struct ParamsPatch {
  pub participants: Option<i64>,
  pub drop_off_percent: Option<i64>,
}

impl ParamsPatch {
  pub fn from_json(json: &str) -> Result<Self, ParamsError> {
    ParamsPatch::deserialize_json(json).map_err(|err| ParamsError {
      msg: format!("{}", err),
    })
  }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParamsError {
  pub msg: String,
}

impl fmt::Display for ParamsError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "invalid params: {}", self.msg)
  }
}

impl std::error::Error for ParamsError {}
