
use std::collections::VecDeque;

use num_complex::Complex;
use num_traits::Zero;

use crate::{ConfigErr, Sample};
use crate::block::BlockResult;
use crate::rake::finger_bank::{Finger, FingerBank};

/// The signal path.  Every output sample is the gain-weighted sum over fingers of the input correlated against the
/// conjugated reference pattern, starting `delay` samples after the output index.
pub struct RakeCombiner {
	bank: FingerBank,
	buffer: VecDeque<Sample>,
}

fn correlate<F: Fn(usize) -> Complex<f64>>(pattern:&[Complex<f64>], start:usize, at:&F) -> Complex<f64> {
	let mut acc:Complex<f64> = Complex::zero();
	for (j, p) in pattern.iter().enumerate() {
		acc += at(start + j) * p.conj();
	}
	acc
}

// Fingers whose window would run past the available samples contribute nothing for this output
fn combine_at<F: Fn(usize) -> Complex<f64>>(fingers:&[Finger], pattern:&[Complex<f64>], available:usize, i:usize, at:F) -> Complex<f64> {
	let mut combined:Complex<f64> = Complex::zero();
	for finger in fingers {
		let in_range = match i.checked_add(finger.delay).and_then(|s| s.checked_add(pattern.len())) {
			Some(end) => end <= available,
			None => false,
		};

		let finger_output = if in_range { correlate(pattern, i + finger.delay, &at) } else { Complex::zero() };
		combined += finger_output * finger.gain;
	}
	combined
}

impl RakeCombiner {

	pub fn new(num_fingers:usize, delays:&[usize], gains:&[f64], pattern_length:usize) -> Result<Self, ConfigErr> {
		Ok(Self::from_bank(FingerBank::new(num_fingers, delays, gains, pattern_length)?))
	}

	/// The streaming buffer starts empty and only grows as `apply` is fed, so block-only callers never allocate it
	pub fn from_bank(bank:FingerBank) -> Self {
		Self { bank, buffer: VecDeque::new() }
	}

	pub fn bank(&self) -> &FingerBank { &self.bank }
	pub fn num_fingers(&self) -> usize { self.bank.num_fingers() }
	pub fn history(&self) -> usize { self.bank.history() }

	pub fn set_delays(&mut self, delays:&[usize]) -> Result<(), ConfigErr> { self.bank.set_delays(delays) }

	pub fn set_gains(&mut self, gains:&[f64]) -> Result<(), ConfigErr> { self.bank.set_gains(gains) }
	pub fn set_pattern(&mut self, pattern:&[Complex<f64>]) -> Result<(), ConfigErr> { self.bank.set_pattern(pattern) }

	/// Combined output for index `i` given the lookback buffer `input`, where `input[i]` lines up with output `i`
	pub fn combine(&self, input:&[Complex<f64>], i:usize) -> Complex<f64> {
		combine_at(self.bank.fingers(), self.bank.pattern(), input.len(), i, |k| input[k])
	}

	/// Fills all of `output` from `input` the way a synchronous host block would and returns the number of
	/// samples produced.  The host is expected to supply `output.len() + history() - 1` input samples; output
	/// samples whose windows aren't covered by `input` come out as zero.
	pub fn work(&self, input:&[Complex<f64>], output:&mut [Complex<f64>]) -> usize {
		for (i, out) in output.iter_mut().enumerate() {
			*out = self.combine(input, i);
		}
		output.len()
	}

	/// Streaming form of `combine`.  Output sample `i` becomes ready once input `i + max_delay + pattern_length - 1`
	/// has been provided and carries the index of the first input sample in its window.
	pub fn apply(&mut self, sample:&Sample) -> BlockResult<Sample> {
		let window = self.bank.window_len();

		self.buffer.push_back(*sample);
		while self.buffer.len() > window { self.buffer.pop_front(); }

		if self.buffer.len() < window {
			BlockResult::NotReady
		} else {
			let buffer = &self.buffer;
			let val = combine_at(self.bank.fingers(), self.bank.pattern(), buffer.len(), 0, |k| buffer[k].val);

			match self.buffer.pop_front() {
				Some(first) => BlockResult::Ready(Sample{ val, idx: first.idx }),
				None => BlockResult::NotReady,
			}
		}
	}

	/// Drops buffered samples, for example after a discontinuity in the input stream
	pub fn reset(&mut self) {
		self.buffer.clear();
	}

}
