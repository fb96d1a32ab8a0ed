
use log::debug;

use crate::ParseErr;

pub mod gpsd;
pub mod nmea;

pub use gpsd::parse_gpsd_speed;
pub use nmea::parse_nmea0183_speed;

#[cfg(test)]
mod tests;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpsFormat {
	Nmea0183,
	GpsdJson,
}

/// The first character is what NMEA sentences normally start with, but serial captures often carry line noise
/// ahead of the `$`, so the whole payload is searched
pub fn is_nmea0183(data:&str) -> bool {
	data.starts_with('$') || data.contains('$')
}

pub fn is_gpsd_json(data:&str) -> bool {
	data.trim_start_matches(|c:char| c == ' ' || c == '\t' || c == '\n' || c == '\r').starts_with('{') || data.contains("\"class\"")
}

/// Formats the payload could be, in the order the dispatcher tries them
pub fn detect_formats(data:&str) -> Vec<GpsFormat> {
	let mut ans:Vec<GpsFormat> = vec![];
	if is_nmea0183(data)  { ans.push(GpsFormat::Nmea0183); }
	if is_gpsd_json(data) { ans.push(GpsFormat::GpsdJson); }
	ans
}

/// Speed in km/h from a payload of either format.  A payload that looks like NMEA but doesn't parse is only
/// retried as GPSD if it also passes the GPSD check on its own.
pub fn parse_gps_speed(data:&str) -> Result<f64, ParseErr> {
	if data.is_empty() {
		return Err(ParseErr::Empty);
	}

	let mut last_err = ParseErr::UnrecognizedFormat;

	for format in detect_formats(data) {
		let parsed = match format {
			GpsFormat::Nmea0183 => parse_nmea0183_speed(data),
			GpsFormat::GpsdJson => parse_gpsd_speed(data),
		};

		match parsed {
			Ok(speed) => return Ok(speed),
			Err(e) => {
				debug!("{:?} parse failed: {}", format, e);
				last_err = e;
			}
		}
	}

	Err(last_err)
}

/// Byte payloads as they come off a serial port or socket
pub fn parse_gps_bytes(payload:&[u8]) -> Result<f64, ParseErr> {
	let data = std::str::from_utf8(payload).map_err(|_| ParseErr::InvalidUtf8)?;
	parse_gps_speed(data.trim_end_matches(|c:char| c == '\r' || c == '\n'))
}
