
use std::path::Path;

use num_complex::Complex;
use serde::{Serialize, Deserialize};

use crate::RakeErr;
use crate::receiver::{GpsSourceConfig, RakeReceiver};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReceiverConfig {
	pub num_fingers: usize,
	pub delays: Vec<usize>,
	pub gains: Vec<f64>,
	pub pattern_length: usize,
	/// Reference pattern as `[re, im]` pairs; all ones when absent
	pub pattern: Option<Vec<[f64; 2]>>,
	pub adaptive_mode: bool,
	pub gps_speed_kmh: Option<f64>,
	pub path_search_rate_hz: Option<f64>,
	pub tracking_bandwidth_hz: Option<f64>,
	pub path_detection_threshold: Option<f64>,
	pub lock_threshold: Option<f64>,
	pub reassignment_period_s: Option<f64>,
	pub gps: GpsSourceConfig,
}

impl Default for ReceiverConfig {
	fn default() -> Self {
		Self {
			num_fingers: 3,
			delays: vec![0, 10, 20],
			gains: vec![1.0, 0.8, 0.6],
			pattern_length: 16,
			pattern: None,
			adaptive_mode: false,
			gps_speed_kmh: None,
			path_search_rate_hz: None,
			tracking_bandwidth_hz: None,
			path_detection_threshold: None,
			lock_threshold: None,
			reassignment_period_s: None,
			gps: GpsSourceConfig::default(),
		}
	}
}

impl ReceiverConfig {

	pub fn from_json(s:&str) -> Result<Self, RakeErr> {
		Ok(serde_json::from_str(s)?)
	}

	pub fn from_file<P: AsRef<Path>>(path:P) -> Result<Self, RakeErr> {
		let s = std::fs::read_to_string(path)?;
		Self::from_json(&s)
	}

	/// Manual parameters are applied before adaptive mode is switched on, so a configured speed takes precedence
	/// over them when adaptive mode is enabled.
	pub fn build(&self) -> Result<RakeReceiver, RakeErr> {
		let mut rx = RakeReceiver::new(self.num_fingers, &self.delays, &self.gains, self.pattern_length)?;

		if let Some(pattern) = &self.pattern {
			let pattern:Vec<Complex<f64>> = pattern.iter().map(|p| Complex{ re: p[0], im: p[1] }).collect();
			rx.set_pattern(&pattern)?;
		}

		if let Some(x) = self.path_search_rate_hz      { rx.set_path_search_rate(x); }
		if let Some(x) = self.tracking_bandwidth_hz    { rx.set_tracking_bandwidth(x); }
		if let Some(x) = self.path_detection_threshold { rx.set_path_detection_threshold(x); }
		if let Some(x) = self.lock_threshold           { rx.set_lock_threshold(x); }
		if let Some(x) = self.reassignment_period_s    { rx.set_reassignment_period(x); }
		if let Some(s) = self.gps_speed_kmh            { rx.set_gps_speed(s); }

		rx.set_gps_config(self.gps.clone());
		rx.set_adaptive_mode(self.adaptive_mode);

		Ok(rx)
	}

}
