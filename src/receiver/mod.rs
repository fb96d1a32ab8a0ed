
use std::fmt;
use std::str::FromStr;

use log::{debug, info};
use num_complex::Complex;
use serde::{Serialize, Deserialize};

use crate::{ConfigErr, ParseErr, RakeErr, Sample};
use crate::adaptive::{SpeedCategory, SpeedScheduleController};
use crate::block::{BlockFunctionality, BlockResult};
use crate::rake::{Finger, RakeCombiner};
use crate::telemetry;

pub mod config;


pub const DEFAULT_SERIAL_DEVICE:&str = "/dev/ttyUSB0";
pub const DEFAULT_SERIAL_BAUD_RATE:u32 = 4800;
pub const DEFAULT_GPSD_HOST:&str = "localhost";
pub const DEFAULT_GPSD_PORT:u16 = 2947;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GpsSource {
	None,
	Serial,
	Gpsd,
}

impl FromStr for GpsSource {
	type Err = ConfigErr;

	fn from_str(s:&str) -> Result<Self, ConfigErr> { match s {
		"none"   => Ok(GpsSource::None),
		"serial" => Ok(GpsSource::Serial),
		"gpsd"   => Ok(GpsSource::Gpsd),
		x        => Err(ConfigErr::UnknownGpsSource(x.to_string())),
	}}
}

impl fmt::Display for GpsSource {
	fn fmt(&self, f:&mut fmt::Formatter) -> fmt::Result {
		let name = match self {
			GpsSource::None   => "none",
			GpsSource::Serial => "serial",
			GpsSource::Gpsd   => "gpsd",
		};
		write!(f, "{}", name)
	}
}

/// Where telemetry is supposed to come from.  The receiver only records this; opening the port or socket and
/// feeding payloads into `deliver_telemetry` is up to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GpsSourceConfig {
	pub source: GpsSource,
	pub serial_device: String,
	pub serial_baud_rate: u32,
	pub gpsd_host: String,
	pub gpsd_port: u16,
}

impl Default for GpsSourceConfig {
	fn default() -> Self {
		Self {
			source: GpsSource::None,
			serial_device: DEFAULT_SERIAL_DEVICE.to_string(),
			serial_baud_rate: DEFAULT_SERIAL_BAUD_RATE,
			gpsd_host: DEFAULT_GPSD_HOST.to_string(),
			gpsd_port: DEFAULT_GPSD_PORT,
		}
	}
}

/// Reconfiguration delivered alongside the sample stream
#[derive(Debug, Clone)]
pub enum RakeControl {
	SetDelays(Vec<usize>),
	SetGains(Vec<f64>),
	SetPattern(Vec<Complex<f64>>),
	Telemetry(Vec<u8>),
	SetGpsSpeed(f64),
	SetAdaptiveMode(bool),
	SetPathSearchRate(f64),
	SetTrackingBandwidth(f64),
	SetPathDetectionThreshold(f64),
	SetLockThreshold(f64),
	SetReassignmentPeriod(f64),
	Reset,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReceiverStatus {
	pub num_fingers: usize,
	pub fingers: Vec<Finger>,
	pub pattern_length: usize,
	pub history: usize,
	pub speed_category: Option<SpeedCategory>,
	pub adaptive: SpeedScheduleController,
	pub gps: GpsSourceConfig,
	pub gps_running: bool,
}

pub struct RakeReceiver {
	combiner: RakeCombiner,
	adaptive: SpeedScheduleController,
	gps: GpsSourceConfig,
	gps_running: bool,
}

impl RakeReceiver {

	pub fn new(num_fingers:usize, delays:&[usize], gains:&[f64], pattern_length:usize) -> Result<Self, ConfigErr> {
		let combiner = RakeCombiner::new(num_fingers, delays, gains, pattern_length)?;
		Ok(Self { combiner, adaptive: SpeedScheduleController::new(), gps: GpsSourceConfig::default(), gps_running: false })
	}

	// Signal path
	pub fn combiner(&self) -> &RakeCombiner { &self.combiner }
	pub fn num_fingers(&self) -> usize { self.combiner.num_fingers() }
	pub fn delays(&self) -> Vec<usize> { self.combiner.bank().delays() }
	pub fn gains(&self) -> Vec<f64> { self.combiner.bank().gains() }
	pub fn pattern_length(&self) -> usize { self.combiner.bank().pattern_length() }
	pub fn history(&self) -> usize { self.combiner.history() }

	pub fn set_delays(&mut self, delays:&[usize]) -> Result<(), ConfigErr> {
		self.combiner.set_delays(delays)?;
		debug!("Delays set to {:?}, history now {} samples", delays, self.combiner.history());
		Ok(())
	}

	pub fn set_gains(&mut self, gains:&[f64]) -> Result<(), ConfigErr> { self.combiner.set_gains(gains) }
	pub fn set_pattern(&mut self, pattern:&[Complex<f64>]) -> Result<(), ConfigErr> { self.combiner.set_pattern(pattern) }

	pub fn work(&self, input:&[Complex<f64>], output:&mut [Complex<f64>]) -> usize { self.combiner.work(input, output) }

	// Adaptive parameters
	pub fn adaptive_state(&self) -> &SpeedScheduleController { &self.adaptive }

	pub fn gps_speed(&self) -> f64 { self.adaptive.gps_speed() }
	pub fn path_search_rate(&self) -> f64 { self.adaptive.path_search_rate() }
	pub fn tracking_bandwidth(&self) -> f64 { self.adaptive.tracking_bandwidth() }
	pub fn path_detection_threshold(&self) -> f64 { self.adaptive.path_detection_threshold() }
	pub fn lock_threshold(&self) -> f64 { self.adaptive.lock_threshold() }
	pub fn reassignment_period(&self) -> f64 { self.adaptive.reassignment_period() }
	pub fn adaptive_mode(&self) -> bool { self.adaptive.adaptive_mode() }
	pub fn recommended_num_fingers(&self) -> usize { self.adaptive.recommended_num_fingers() }
	pub fn speed_category(&self) -> Option<SpeedCategory> { self.adaptive.speed_category() }

	pub fn set_gps_speed(&mut self, speed_kmh:f64) { self.adaptive.set_gps_speed(speed_kmh) }
	pub fn set_adaptive_mode(&mut self, enable:bool) { self.adaptive.set_adaptive_mode(enable) }
	pub fn set_path_search_rate(&mut self, rate_hz:f64) { self.adaptive.set_path_search_rate(rate_hz) }
	pub fn set_tracking_bandwidth(&mut self, bandwidth_hz:f64) { self.adaptive.set_tracking_bandwidth(bandwidth_hz) }
	pub fn set_path_detection_threshold(&mut self, threshold:f64) { self.adaptive.set_path_detection_threshold(threshold) }
	pub fn set_lock_threshold(&mut self, threshold:f64) { self.adaptive.set_lock_threshold(threshold) }
	pub fn set_reassignment_period(&mut self, period_s:f64) { self.adaptive.set_reassignment_period(period_s) }

	// Telemetry
	fn update_speed(&mut self, parsed:Result<f64, ParseErr>) -> Result<(), ParseErr> {
		match parsed {
			Ok(speed_kmh) => {
				self.set_gps_speed(speed_kmh);
				Ok(())
			},
			Err(e) => {
				debug!("Ignoring telemetry: {}", e);
				Err(e)
			}
		}
	}

	/// Parses a payload of either format and, if it yields a speed, applies it
	pub fn parse_gps_data(&mut self, gps_data:&str) -> Result<(), ParseErr> {
		self.update_speed(telemetry::parse_gps_speed(gps_data))
	}

	pub fn parse_nmea0183(&mut self, nmea_message:&str) -> Result<(), ParseErr> {
		self.update_speed(telemetry::parse_nmea0183_speed(nmea_message))
	}

	pub fn parse_gpsd(&mut self, gpsd_json:&str) -> Result<(), ParseErr> {
		self.update_speed(telemetry::parse_gpsd_speed(gpsd_json))
	}

	/// Entry point for whatever transport carries the telemetry.  A failed payload leaves the receiver as it was.
	pub fn deliver_telemetry(&mut self, payload:&[u8]) -> Result<(), ParseErr> {
		self.update_speed(telemetry::parse_gps_bytes(payload))
	}

	// GPS source settings
	pub fn gps_config(&self) -> &GpsSourceConfig { &self.gps }
	pub fn set_gps_config(&mut self, gps:GpsSourceConfig) { self.gps = gps; }

	pub fn gps_source(&self) -> GpsSource { self.gps.source }
	pub fn set_gps_source(&mut self, source:GpsSource) { self.gps.source = source; }
	pub fn serial_device(&self) -> &str { &self.gps.serial_device }
	pub fn set_serial_device(&mut self, device_path:&str) { self.gps.serial_device = device_path.to_string(); }
	pub fn serial_baud_rate(&self) -> u32 { self.gps.serial_baud_rate }
	pub fn set_serial_baud_rate(&mut self, baud_rate:u32) { self.gps.serial_baud_rate = baud_rate; }
	pub fn gpsd_host(&self) -> &str { &self.gps.gpsd_host }
	pub fn set_gpsd_host(&mut self, host:&str) { self.gps.gpsd_host = host.to_string(); }
	pub fn gpsd_port(&self) -> u16 { self.gps.gpsd_port }
	pub fn set_gpsd_port(&mut self, port:u16) { self.gps.gpsd_port = port; }

	pub fn gps_running(&self) -> bool { self.gps_running }

	/// Marks the configured source as active.  Returns false when no source is configured.
	pub fn start_gps(&mut self) -> bool {
		match self.gps.source {
			GpsSource::None => {
				debug!("start_gps called with no GPS source configured");
				false
			},
			GpsSource::Serial => {
				info!("GPS source serial at {} ({} baud) started", self.gps.serial_device, self.gps.serial_baud_rate);
				self.gps_running = true;
				true
			},
			GpsSource::Gpsd => {
				info!("GPS source gpsd at {}:{} started", self.gps.gpsd_host, self.gps.gpsd_port);
				self.gps_running = true;
				true
			},
		}
	}

	pub fn stop_gps(&mut self) {
		if self.gps_running {
			info!("GPS source {} stopped", self.gps.source);
		}
		self.gps_running = false;
	}

	pub fn status(&self) -> ReceiverStatus {
		ReceiverStatus {
			num_fingers: self.num_fingers(),
			fingers: self.combiner.bank().fingers().to_vec(),
			pattern_length: self.pattern_length(),
			history: self.history(),
			speed_category: self.speed_category(),
			adaptive: self.adaptive.clone(),
			gps: self.gps.clone(),
			gps_running: self.gps_running,
		}
	}

}

impl BlockFunctionality<RakeControl, (), Sample, Sample> for RakeReceiver {

	fn control(&mut self, control:&RakeControl) -> Result<(), RakeErr> {
		match control {
			RakeControl::SetDelays(d)                  => self.set_delays(d)?,
			RakeControl::SetGains(g)                   => self.set_gains(g)?,
			RakeControl::SetPattern(p)                 => self.set_pattern(p)?,
			RakeControl::Telemetry(payload)            => self.deliver_telemetry(payload)?,
			RakeControl::SetGpsSpeed(s)                => self.set_gps_speed(*s),
			RakeControl::SetAdaptiveMode(b)            => self.set_adaptive_mode(*b),
			RakeControl::SetPathSearchRate(x)          => self.set_path_search_rate(*x),
			RakeControl::SetTrackingBandwidth(x)       => self.set_tracking_bandwidth(*x),
			RakeControl::SetPathDetectionThreshold(x)  => self.set_path_detection_threshold(*x),
			RakeControl::SetLockThreshold(x)           => self.set_lock_threshold(*x),
			RakeControl::SetReassignmentPeriod(x)      => self.set_reassignment_period(*x),
			RakeControl::Reset                         => self.combiner.reset(),
		}
		Ok(())
	}

	fn apply(&mut self, input:&Sample) -> BlockResult<Sample> {
		self.combiner.apply(input)
	}

}
