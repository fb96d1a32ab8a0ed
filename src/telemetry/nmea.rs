
use crate::ParseErr;

pub const KMH_PER_KNOT:f64 = 1.852;

// Ground speed sits at the same field index in both sentence types
const SPEED_FIELD_IDX:usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentence {
	/// Recommended minimum data, speed in knots
	Rmc,
	/// Track made good and ground speed, speed in km/h
	Vtg,
}

impl Sentence {

	/// Identifies the sentence from its talker and type, accepting either the GPS or the combined GNSS talker
	pub fn from_message(message:&str) -> Option<Self> {
		if message.starts_with("$GPRMC") || message.starts_with("$GNRMC") { Some(Sentence::Rmc) }
		else if message.starts_with("$GPVTG") || message.starts_with("$GNVTG") { Some(Sentence::Vtg) }
		else { None }
	}

	fn kmh_per_unit(&self) -> f64 { match self {
		Sentence::Rmc => KMH_PER_KNOT,
		Sentence::Vtg => 1.0,
	}}

}

fn parse_speed_field(field:&str) -> Result<f64, ParseErr> {
	// The last field of a short sentence still carries the checksum
	let value = match field.find('*') {
		Some(pos) => &field[..pos],
		None      => field,
	};

	match value.trim().parse::<f64>() {
		Ok(v) if v.is_finite() => Ok(v),
		_ => Err(ParseErr::InvalidSpeed(field.to_string())),
	}
}

/// Ground speed in km/h from an RMC or VTG sentence.  The checksum isn't verified.
pub fn parse_nmea0183_speed(message:&str) -> Result<f64, ParseErr> {
	if !message.starts_with('$') {
		return Err(ParseErr::NotNmea);
	}

	let sentence = match Sentence::from_message(message) {
		Some(s) => s,
		None => {
			let name:String = message.chars().skip(1).take_while(|c| *c != ',').collect();
			return Err(ParseErr::UnsupportedSentence(name));
		}
	};

	let fields:Vec<&str> = message.split(',').collect();
	if fields.len() <= SPEED_FIELD_IDX {
		return Err(ParseErr::TooFewFields(fields.len()));
	}

	let speed_kmh = parse_speed_field(fields[SPEED_FIELD_IDX])? * sentence.kmh_per_unit();
	if speed_kmh < 0.0 { Err(ParseErr::NegativeSpeed(speed_kmh)) } else { Ok(speed_kmh) }
}
