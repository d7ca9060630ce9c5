use common::{build_rng, entropy_rng, rand_pcg::Pcg32};
use split_timing::{DotState, Frame, Params, Walkthrough};
use wasm_bindgen::prelude::*;

static mut DID_INIT: bool = false;

fn maybe_init() {
  unsafe {
    if DID_INIT {
      return;
    }
    DID_INIT = true;
  }

  console_error_panic_hook::set_once();
  wasm_logger::init(wasm_logger::Config::new(log::Level::Info));
}

pub struct SplitTimingCtx {
  pub walkthrough: Walkthrough<Pcg32>,
  /// Recomputed after every interaction; getters only read it.
  pub frame: Frame,
}

impl SplitTimingCtx {
  pub fn new(rng: Pcg32) -> Self {
    let walkthrough = Walkthrough::new(rng, Params::default());
    let frame = walkthrough.frame();
    SplitTimingCtx { walkthrough, frame }
  }

  fn refresh(&mut self) {
    self.frame = self.walkthrough.frame();
  }

  pub fn apply_json_params(&mut self, json: &str) -> String {
    let res = self.walkthrough.apply_json(json);
    self.refresh();
    match res {
      Ok(_) => String::new(),
      Err(err) => {
        log::warn!("{err}");
        err.to_string()
      }
    }
  }
}

fn pack_dots(dots: &[DotState]) -> Vec<u8> {
  dots.iter().map(DotState::packed).collect()
}

/// JS number inputs can hold anything; round, then saturate into `i64` (NaN becomes 0) so the
/// clamping downstream lands on the nearest valid value.
fn js_number_to_i64(val: f64) -> i64 {
  val.round() as i64
}

fn shares_array(frame: &Frame) -> Vec<u32> {
  vec![
    frame.early_shares.control,
    frame.early_shares.variant,
    frame.late_shares.control,
    frame.late_shares.variant,
  ]
}

fn stats_array(frame: &Frame) -> Vec<u32> {
  vec![
    frame.early_stats.control,
    frame.early_stats.variant,
    frame.late_stats.control,
    frame.late_stats.variant,
  ]
}

/// Creates a walkthrough with a fixed seed, for reproducible runs.
#[wasm_bindgen]
pub fn split_timing_init(seed_hi: u64, seed_lo: u64) -> *mut SplitTimingCtx {
  maybe_init();

  Box::into_raw(Box::new(SplitTimingCtx::new(build_rng((seed_hi, seed_lo)))))
}

#[wasm_bindgen]
pub fn split_timing_init_from_entropy() -> *mut SplitTimingCtx {
  maybe_init();

  Box::into_raw(Box::new(SplitTimingCtx::new(entropy_rng())))
}

#[wasm_bindgen]
pub fn split_timing_free(ctx: *mut SplitTimingCtx) {
  drop(unsafe { Box::from_raw(ctx) });
}

#[wasm_bindgen]
pub fn split_timing_next(ctx: *mut SplitTimingCtx) {
  let ctx = unsafe { &mut *ctx };
  ctx.walkthrough.next();
  ctx.refresh();
}

#[wasm_bindgen]
pub fn split_timing_prev(ctx: *mut SplitTimingCtx) {
  let ctx = unsafe { &mut *ctx };
  ctx.walkthrough.prev();
  ctx.refresh();
}

#[wasm_bindgen]
pub fn split_timing_reset(ctx: *mut SplitTimingCtx) {
  let ctx = unsafe { &mut *ctx };
  ctx.walkthrough.reset();
  ctx.refresh();
}

#[wasm_bindgen]
pub fn split_timing_set_participants(ctx: *mut SplitTimingCtx, participants: f64) {
  let ctx = unsafe { &mut *ctx };
  ctx.walkthrough.set_participants(js_number_to_i64(participants));
  ctx.refresh();
}

#[wasm_bindgen]
pub fn split_timing_set_drop_off_percent(ctx: *mut SplitTimingCtx, percent: f64) {
  let ctx = unsafe { &mut *ctx };
  ctx.walkthrough.set_drop_off_percent(js_number_to_i64(percent));
  ctx.refresh();
}

/// Takes a partial JSON object like `{"participants": 200, "drop_off_percent": 15}`.  Returns
/// an empty string on success, or the parse error.
#[wasm_bindgen]
pub fn split_timing_set_params(ctx: *mut SplitTimingCtx, params_json: &str) -> String {
  let ctx = unsafe { &mut *ctx };
  ctx.apply_json_params(params_json)
}

#[wasm_bindgen]
pub fn split_timing_get_params(ctx: *const SplitTimingCtx) -> String {
  let ctx = unsafe { &*ctx };
  ctx.walkthrough.params().to_json()
}

#[wasm_bindgen]
pub fn split_timing_get_drop_off_count(ctx: *const SplitTimingCtx) -> usize {
  let ctx = unsafe { &*ctx };
  ctx.walkthrough.params().drop_off_count()
}

#[wasm_bindgen]
pub fn split_timing_get_step(ctx: *const SplitTimingCtx) -> usize {
  let ctx = unsafe { &*ctx };
  ctx.frame.step
}

/// One byte per dot; see `DotState::packed` for the layout.
#[wasm_bindgen]
pub fn split_timing_get_early_dots(ctx: *const SplitTimingCtx) -> Vec<u8> {
  let ctx = unsafe { &*ctx };
  pack_dots(&ctx.frame.early_dots)
}

#[wasm_bindgen]
pub fn split_timing_get_late_dots(ctx: *const SplitTimingCtx) -> Vec<u8> {
  let ctx = unsafe { &*ctx };
  pack_dots(&ctx.frame.late_dots)
}

/// `[early_control, early_variant, late_control, late_variant]`
#[wasm_bindgen]
pub fn split_timing_get_stats(ctx: *const SplitTimingCtx) -> Vec<u32> {
  let ctx = unsafe { &*ctx };
  stats_array(&ctx.frame)
}

/// Rounded percentages, same layout as `split_timing_get_stats`.  An empty panel reads 0%.
#[wasm_bindgen]
pub fn split_timing_get_shares(ctx: *const SplitTimingCtx) -> Vec<u32> {
  let ctx = unsafe { &*ctx };
  shares_array(&ctx.frame)
}

#[wasm_bindgen]
pub fn split_timing_get_frame_json(ctx: *const SplitTimingCtx) -> String {
  let ctx = unsafe { &*ctx };
  ctx.frame.to_json()
}

#[wasm_bindgen]
pub fn split_timing_get_label(ctx: *const SplitTimingCtx) -> String {
  let ctx = unsafe { &*ctx };
  ctx.frame.label.clone()
}

#[wasm_bindgen]
pub fn split_timing_get_caption(ctx: *const SplitTimingCtx) -> String {
  let ctx = unsafe { &*ctx };
  ctx.frame.caption.clone()
}
