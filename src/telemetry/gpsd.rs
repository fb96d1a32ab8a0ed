
use crate::ParseErr;

pub const KMH_PER_METER_PER_SEC:f64 = 3.6;

const SPEED_KEY:&str = "\"speed\"";

fn is_value_terminator(c:char) -> bool { c == ',' || c == '}' || c == ' ' || c == '\t' || c == '\n' }

/// Speed in km/h from the first `"speed"` key of a GPSD report (TPV reports give it in m/s).  This is a targeted
/// scan for that one key rather than a JSON parse, so it doesn't care what the rest of the object holds.
pub fn parse_gpsd_speed(json:&str) -> Result<f64, ParseErr> {
	if json.is_empty() {
		return Err(ParseErr::Empty);
	}

	let key_pos = json.find(SPEED_KEY).ok_or(ParseErr::MissingSpeedKey)?;
	let after_key = &json[key_pos + SPEED_KEY.len()..];
	let colon_pos = after_key.find(':').ok_or(ParseErr::MissingColon)?;

	let value = after_key[colon_pos + 1..].trim_start_matches(|c:char| c == ' ' || c == '\t');
	let value_end = value.find(is_value_terminator).unwrap_or_else(|| value.len());
	let value = &value[..value_end];

	if value.is_empty() {
		return Err(ParseErr::EmptyValue);
	}

	let speed_ms = match value.trim_end().parse::<f64>() {
		Ok(v) if v.is_finite() => v,
		_ => return Err(ParseErr::InvalidSpeed(value.to_string())),
	};
	let speed_kmh = speed_ms * KMH_PER_METER_PER_SEC;
	if speed_kmh < 0.0 { Err(ParseErr::NegativeSpeed(speed_kmh)) } else { Ok(speed_kmh) }
}
