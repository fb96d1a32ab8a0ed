
use num_complex::Complex;
use serde::{Serialize, Deserialize};

use crate::ConfigErr;

pub const MAX_FINGERS:usize = 5;

// history() is max_delay + pattern_length + 1 and has to fit in a usize
fn check_delays(delays:&[usize], pattern_length:usize) -> Result<(), ConfigErr> {
	for &delay in delays {
		if delay.checked_add(pattern_length).and_then(|w| w.checked_add(1)).is_none() {
			return Err(ConfigErr::DelayRange{ delay, pattern_length });
		}
	}
	Ok(())
}

/// One correlator tap.  Negative gains are valid and invert the phase of that path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Finger {
	pub delay: usize,
	pub gain: f64,
}

/// The set of fingers and the reference pattern they correlate against.  The finger count and the pattern
/// length are fixed at construction; every mutator validates the whole update before committing any of it.
#[derive(Debug, Clone)]
pub struct FingerBank {
	fingers: Vec<Finger>,
	pattern: Vec<Complex<f64>>,
}

impl FingerBank {

	pub fn new(num_fingers:usize, delays:&[usize], gains:&[f64], pattern_length:usize) -> Result<Self, ConfigErr> {
		if num_fingers < 1 || num_fingers > MAX_FINGERS {
			return Err(ConfigErr::FingerCount{ got: num_fingers });
		}
		if delays.len() != num_fingers {
			return Err(ConfigErr::DelayCount{ expected: num_fingers, got: delays.len() });
		}
		if gains.len() != num_fingers {
			return Err(ConfigErr::GainCount{ expected: num_fingers, got: gains.len() });
		}
		if pattern_length == 0 {
			return Err(ConfigErr::EmptyPattern);
		}
		check_delays(delays, pattern_length)?;

		let fingers:Vec<Finger> = delays.iter().zip(gains.iter()).map(|(&delay, &gain)| Finger{ delay, gain }).collect();
		let pattern:Vec<Complex<f64>> = vec![Complex{ re: 1.0, im: 0.0 }; pattern_length];

		Ok(Self { fingers, pattern })
	}

	pub fn num_fingers(&self) -> usize { self.fingers.len() }
	pub fn pattern_length(&self) -> usize { self.pattern.len() }
	pub fn fingers(&self) -> &[Finger] { &self.fingers }
	pub fn pattern(&self) -> &[Complex<f64>] { &self.pattern }

	pub fn delays(&self) -> Vec<usize> { self.fingers.iter().map(|f| f.delay).collect() }
	pub fn gains(&self) -> Vec<f64> { self.fingers.iter().map(|f| f.gain).collect() }

	pub fn max_delay(&self) -> usize { self.fingers.iter().map(|f| f.delay).max().unwrap_or(0) }

	/// Number of input samples spanned by the longest finger window
	pub fn window_len(&self) -> usize { self.max_delay() + self.pattern.len() }

	/// Lookback the host has to keep available ahead of each output sample
	pub fn history(&self) -> usize { self.window_len() + 1 }

	pub fn set_delays(&mut self, delays:&[usize]) -> Result<(), ConfigErr> {
		if delays.len() != self.fingers.len() {
			return Err(ConfigErr::DelayCount{ expected: self.fingers.len(), got: delays.len() });
		}
		check_delays(delays, self.pattern.len())?;
		for (finger, &delay) in self.fingers.iter_mut().zip(delays.iter()) {
			finger.delay = delay;
		}
		Ok(())
	}

	pub fn set_gains(&mut self, gains:&[f64]) -> Result<(), ConfigErr> {
		if gains.len() != self.fingers.len() {
			return Err(ConfigErr::GainCount{ expected: self.fingers.len(), got: gains.len() });
		}
		for (finger, &gain) in self.fingers.iter_mut().zip(gains.iter()) {
			finger.gain = gain;
		}
		Ok(())
	}

	pub fn set_pattern(&mut self, pattern:&[Complex<f64>]) -> Result<(), ConfigErr> {
		if pattern.len() != self.pattern.len() {
			return Err(ConfigErr::PatternLength{ expected: self.pattern.len(), got: pattern.len() });
		}
		self.pattern.copy_from_slice(pattern);
		Ok(())
	}

}
