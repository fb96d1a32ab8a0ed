
use num_complex::Complex;
use thiserror::Error;

pub mod adaptive;
pub mod block;
pub mod io;
pub mod rake;
pub mod receiver;
pub mod telemetry;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
	pub val: Complex<f64>,
	pub idx: usize,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum DigSigProcErr {
	Other(&'static str),
}

/// Rejected receiver configuration.  Whatever was configured before the failing call stays in effect.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigErr {
	#[error("number of fingers must be between 1 and 5, got {got}")]
	FingerCount{ got:usize },
	#[error("number of delays must match number of fingers ({expected}), got {got}")]
	DelayCount{ expected:usize, got:usize },
	#[error("number of gains must match number of fingers ({expected}), got {got}")]
	GainCount{ expected:usize, got:usize },
	#[error("pattern length must match pattern_length parameter ({expected}), got {got}")]
	PatternLength{ expected:usize, got:usize },
	#[error("pattern length must be greater than zero")]
	EmptyPattern,
	#[error("delay {delay} with pattern length {pattern_length} exceeds the addressable history")]
	DelayRange{ delay:usize, pattern_length:usize },
	#[error("unknown GPS source type {0:?}, expected one of none, serial, gpsd")]
	UnknownGpsSource(String),
}

/// Telemetry that didn't yield a usable speed.  These are expected in normal operation and never fatal.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseErr {
	#[error("empty telemetry payload")]
	Empty,
	#[error("telemetry payload is not valid UTF-8")]
	InvalidUtf8,
	#[error("payload is neither an NMEA0183 sentence nor a GPSD report")]
	UnrecognizedFormat,
	#[error("NMEA0183 sentence must start with '$'")]
	NotNmea,
	#[error("unsupported NMEA0183 sentence {0:?}")]
	UnsupportedSentence(String),
	#[error("NMEA0183 sentence has {0} fields, need at least 8")]
	TooFewFields(usize),
	#[error("speed field {0:?} is not a number")]
	InvalidSpeed(String),
	#[error("speed {0} is negative")]
	NegativeSpeed(f64),
	#[error("no \"speed\" key in GPSD report")]
	MissingSpeedKey,
	#[error("no ':' after \"speed\" key in GPSD report")]
	MissingColon,
	#[error("empty \"speed\" value in GPSD report")]
	EmptyValue,
}

#[derive(Debug, Error)]
pub enum RakeErr {
	#[error("configuration error: {0}")]
	Config(#[from] ConfigErr),
	#[error("telemetry error: {0}")]
	Parse(#[from] ParseErr),
	#[error("unable to read config file: {0}")]
	ConfigFile(#[from] serde_json::Error),
	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),
}
