
use log::info;
use serde::{Serialize, Deserialize};

#[cfg(test)]
mod tests;

pub const UNKNOWN_SPEED_KMH:f64 = -1.0;

pub const DEFAULT_PATH_SEARCH_RATE_HZ:f64 = 20.0;
pub const DEFAULT_TRACKING_BANDWIDTH_HZ:f64 = 120.0;
pub const DEFAULT_PATH_DETECTION_THRESHOLD:f64 = 0.5;
pub const DEFAULT_LOCK_THRESHOLD:f64 = 0.7;
pub const DEFAULT_REASSIGNMENT_PERIOD_S:f64 = 1.0;
pub const DEFAULT_RECOMMENDED_FINGERS:usize = 4;

// Speeds above this are scheduled as if they were exactly this fast
pub const MAX_SCHEDULED_SPEED_KMH:f64 = 200.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeedCategory {
	Stationary,
	Pedestrian,
	VehicleLowSpeed,
	VehicleHighSpeed,
	VeryHighSpeed,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackingParameters {
	pub path_search_rate_hz: f64,
	pub tracking_bandwidth_hz: f64,
	pub reassignment_period_s: f64,
	pub num_fingers: usize,
}

impl SpeedCategory {

	/// Categories use inclusive upper bounds, so 15 km/h is still pedestrian
	pub fn from_speed(speed_kmh:f64) -> Option<Self> {
		if !(speed_kmh >= 0.0)      { None }
		else if speed_kmh <= 5.0    { Some(SpeedCategory::Stationary) }
		else if speed_kmh <= 15.0   { Some(SpeedCategory::Pedestrian) }
		else if speed_kmh <= 60.0   { Some(SpeedCategory::VehicleLowSpeed) }
		else if speed_kmh <= 120.0  { Some(SpeedCategory::VehicleHighSpeed) }
		else                        { Some(SpeedCategory::VeryHighSpeed) }
	}

	pub fn upper_bound_kmh(&self) -> f64 { match self {
		SpeedCategory::Stationary       => 5.0,
		SpeedCategory::Pedestrian       => 15.0,
		SpeedCategory::VehicleLowSpeed  => 60.0,
		SpeedCategory::VehicleHighSpeed => 120.0,
		SpeedCategory::VeryHighSpeed    => MAX_SCHEDULED_SPEED_KMH,
	}}

	pub fn anchor(&self) -> TrackingParameters { match self {
		SpeedCategory::Stationary       => TrackingParameters{ path_search_rate_hz:   5.0, tracking_bandwidth_hz:  50.0, reassignment_period_s: 2.0,  num_fingers: 3 },
		SpeedCategory::Pedestrian       => TrackingParameters{ path_search_rate_hz:  10.0, tracking_bandwidth_hz: 100.0, reassignment_period_s: 1.0,  num_fingers: 3 },
		SpeedCategory::VehicleLowSpeed  => TrackingParameters{ path_search_rate_hz:  20.0, tracking_bandwidth_hz: 120.0, reassignment_period_s: 1.0,  num_fingers: 4 },
		SpeedCategory::VehicleHighSpeed => TrackingParameters{ path_search_rate_hz:  50.0, tracking_bandwidth_hz: 200.0, reassignment_period_s: 0.5,  num_fingers: 4 },
		SpeedCategory::VeryHighSpeed    => TrackingParameters{ path_search_rate_hz: 100.0, tracking_bandwidth_hz: 300.0, reassignment_period_s: 0.25, num_fingers: 4 },
	}}

	fn previous(&self) -> Option<Self> { match self {
		SpeedCategory::Stationary       => None,
		SpeedCategory::Pedestrian       => Some(SpeedCategory::Stationary),
		SpeedCategory::VehicleLowSpeed  => Some(SpeedCategory::Pedestrian),
		SpeedCategory::VehicleHighSpeed => Some(SpeedCategory::VehicleLowSpeed),
		SpeedCategory::VeryHighSpeed    => Some(SpeedCategory::VehicleHighSpeed),
	}}

}

fn lerp(lower:f64, upper:f64, alpha:f64) -> f64 { lower + alpha * (upper - lower) }

/// Piecewise-linear schedule between the category anchors.  Returns None for negative (or NaN) speeds.
pub fn schedule(speed_kmh:f64) -> Option<TrackingParameters> {
	let category = SpeedCategory::from_speed(speed_kmh)?;

	// Within the stationary range there's nothing to interpolate
	let lower_category = match category.previous() {
		Some(c) => c,
		None    => return Some(category.anchor()),
	};

	let lower = lower_category.anchor();
	let upper = category.anchor();
	let lo_kmh = lower_category.upper_bound_kmh();
	let hi_kmh = category.upper_bound_kmh();

	let speed = speed_kmh.min(MAX_SCHEDULED_SPEED_KMH);
	let alpha = ((speed - lo_kmh) / (hi_kmh - lo_kmh)).max(0.0).min(1.0);

	// Finger counts snap instead of interpolating; only the two slower brackets actually change count
	let num_fingers = match category {
		SpeedCategory::Pedestrian | SpeedCategory::VehicleLowSpeed => {
			if speed < 0.5 * (lo_kmh + hi_kmh) { lower.num_fingers } else { upper.num_fingers }
		},
		_ => upper.num_fingers,
	};

	Some(TrackingParameters {
		path_search_rate_hz:   lerp(lower.path_search_rate_hz,   upper.path_search_rate_hz,   alpha),
		tracking_bandwidth_hz: lerp(lower.tracking_bandwidth_hz, upper.tracking_bandwidth_hz, alpha),
		reassignment_period_s: lerp(lower.reassignment_period_s, upper.reassignment_period_s, alpha),
		num_fingers,
	})
}

/// Mobility-driven receiver parameters.  While adaptive mode is on and a valid speed is known the scheduled
/// parameters are recomputed on every speed update; otherwise they hold whatever was last set manually.  The two
/// thresholds are always manual.
#[derive(Debug, Clone, Serialize)]
pub struct SpeedScheduleController {
	speed_kmh: f64,
	adaptive_mode: bool,
	path_search_rate_hz: f64,
	tracking_bandwidth_hz: f64,
	path_detection_threshold: f64,
	lock_threshold: f64,
	reassignment_period_s: f64,
	recommended_num_fingers: usize,
}

impl Default for SpeedScheduleController {
	fn default() -> Self {
		Self {
			speed_kmh: UNKNOWN_SPEED_KMH,
			adaptive_mode: false,
			path_search_rate_hz: DEFAULT_PATH_SEARCH_RATE_HZ,
			tracking_bandwidth_hz: DEFAULT_TRACKING_BANDWIDTH_HZ,
			path_detection_threshold: DEFAULT_PATH_DETECTION_THRESHOLD,
			lock_threshold: DEFAULT_LOCK_THRESHOLD,
			reassignment_period_s: DEFAULT_REASSIGNMENT_PERIOD_S,
			recommended_num_fingers: DEFAULT_RECOMMENDED_FINGERS,
		}
	}
}

impl SpeedScheduleController {

	pub fn new() -> Self { Self::default() }

	pub fn gps_speed(&self) -> f64 { self.speed_kmh }
	pub fn adaptive_mode(&self) -> bool { self.adaptive_mode }
	pub fn path_search_rate(&self) -> f64 { self.path_search_rate_hz }
	pub fn tracking_bandwidth(&self) -> f64 { self.tracking_bandwidth_hz }
	pub fn path_detection_threshold(&self) -> f64 { self.path_detection_threshold }
	pub fn lock_threshold(&self) -> f64 { self.lock_threshold }
	pub fn reassignment_period(&self) -> f64 { self.reassignment_period_s }

	/// Finger count suggested by the schedule.  Informational only, the finger bank isn't resized to match.
	pub fn recommended_num_fingers(&self) -> usize { self.recommended_num_fingers }

	pub fn has_valid_speed(&self) -> bool { self.speed_kmh >= 0.0 }
	pub fn speed_category(&self) -> Option<SpeedCategory> { SpeedCategory::from_speed(self.speed_kmh) }

	pub fn set_gps_speed(&mut self, speed_kmh:f64) {
		let previous = self.speed_category();
		self.speed_kmh = speed_kmh;

		if self.adaptive_mode && self.has_valid_speed() {
			self.apply_speed_category(speed_kmh);

			let current = self.speed_category();
			if current != previous {
				if let Some(c) = current {
					info!("Speed {:.1} [km/h] entered {:?} category, path search {:.2} [Hz], tracking bandwidth {:.1} [Hz]",
						speed_kmh, c, self.path_search_rate_hz, self.tracking_bandwidth_hz);
				}
			}
		}
	}

	pub fn set_adaptive_mode(&mut self, enable:bool) {
		if enable != self.adaptive_mode {
			info!("Adaptive mode {}", if enable { "enabled" } else { "disabled" });
		}
		self.adaptive_mode = enable;

		if enable && self.has_valid_speed() {
			self.apply_speed_category(self.speed_kmh);
		}
	}

	pub fn set_path_search_rate(&mut self, rate_hz:f64) { self.path_search_rate_hz = rate_hz; }
	pub fn set_tracking_bandwidth(&mut self, bandwidth_hz:f64) { self.tracking_bandwidth_hz = bandwidth_hz; }
	pub fn set_path_detection_threshold(&mut self, threshold:f64) { self.path_detection_threshold = threshold; }
	pub fn set_lock_threshold(&mut self, threshold:f64) { self.lock_threshold = threshold; }
	pub fn set_reassignment_period(&mut self, period_s:f64) { self.reassignment_period_s = period_s; }

	/// Overwrites the scheduled parameters from `speed_kmh`.  Negative speeds leave everything as is.
	pub fn apply_speed_category(&mut self, speed_kmh:f64) {
		if let Some(p) = schedule(speed_kmh) {
			self.path_search_rate_hz = p.path_search_rate_hz;
			self.tracking_bandwidth_hz = p.tracking_bandwidth_hz;
			self.reassignment_period_s = p.reassignment_period_s;
			self.recommended_num_fingers = p.num_fingers;
		}
	}

}
