use crate::ParseErr;
use crate::telemetry::{detect_formats, is_gpsd_json, is_nmea0183, parse_gps_bytes, parse_gps_speed, GpsFormat};

const GPRMC:&str = "$GPRMC,123519,A,4807.038,N,01131.000,E,022.4,084.4,230394,003.1,W*6A";

#[test]
fn format_detection() {
	assert!(is_nmea0183(GPRMC));
	assert!(is_nmea0183("\u{0}\u{7f}$GPVTG,054.7"));
	assert!(!is_nmea0183(""));
	assert!(!is_nmea0183("{\"class\":\"TPV\"}"));

	assert!(is_gpsd_json("{\"class\":\"TPV\"}"));
	assert!(is_gpsd_json(" \r\n\t{\"speed\":1.0}"));
	assert!(is_gpsd_json("garbage \"class\":\"TPV\""));
	assert!(!is_gpsd_json(""));
	assert!(!is_gpsd_json("   "));
	assert!(!is_gpsd_json(GPRMC));

	assert_eq!(detect_formats(GPRMC), vec![GpsFormat::Nmea0183]);
	assert_eq!(detect_formats("{\"class\":\"$\"}"), vec![GpsFormat::Nmea0183, GpsFormat::GpsdJson]);
	assert!(detect_formats("hello").is_empty());
}

#[test]
fn dispatches_by_format() {
	assert!((parse_gps_speed("{\"class\":\"TPV\",\"speed\":10.0}").unwrap() - 36.0).abs() < 1e-9);
	assert!((parse_gps_speed(GPRMC).unwrap() - 22.4 * 1.852).abs() < 1e-9);
}

#[test]
fn failed_nmea_falls_through_only_when_gpsd_check_passes() {
	// Looks like NMEA (has a '$') and like GPSD (starts with '{'), NMEA parse fails, GPSD succeeds
	assert!((parse_gps_speed("{\"class\":\"TPV\",\"device\":\"$1\",\"speed\":1.0}").unwrap() - 3.6).abs() < 1e-9);

	// Leading noise before the sentence passes detection but not the parser, and nothing makes it GPSD
	assert_eq!(parse_gps_speed("xx$GPRMC,123519,A,4807.038,N,01131.000,E,022.4"), Err(ParseErr::NotNmea));

	// A "speed" key is not enough on its own to be treated as GPSD
	assert_eq!(parse_gps_speed("$GPGGA,\"speed\":3.0"), Err(ParseErr::UnsupportedSentence("GPGGA".to_string())));
}

#[test]
fn garbage_is_rejected_without_panicking() {
	assert_eq!(parse_gps_speed(""), Err(ParseErr::Empty));
	assert_eq!(parse_gps_speed("hello world"), Err(ParseErr::UnrecognizedFormat));
	assert_eq!(parse_gps_speed("{\"class\":\"SKY\"}"), Err(ParseErr::MissingSpeedKey));

	for payload in &["$", "$,", "{", "{\"speed\"", "$GPRMC,,,,,,,,", "\"class\"\"speed\":", "$GNVTG,\u{00e9},,,,,,\u{00e9}"] {
		assert!(parse_gps_speed(payload).is_err(), "{:?}", payload);
	}
}

#[test]
fn byte_payloads() {
	let line = format!("{}\r\n", GPRMC);
	assert!((parse_gps_bytes(line.as_bytes()).unwrap() - 41.4848).abs() < 1e-3);
	assert_eq!(parse_gps_bytes(&[0xff, 0xfe, b'$']), Err(ParseErr::InvalidUtf8));
}

#[test]
fn every_detected_format_is_tried_in_order() {
	// Both checks pass and both parsers fail, so the GPSD error is the one reported
	assert_eq!(detect_formats("{\"class\":\"$\"}"), vec![GpsFormat::Nmea0183, GpsFormat::GpsdJson]);
	assert_eq!(parse_gps_speed("{\"class\":\"$\"}"), Err(ParseErr::MissingSpeedKey));

	// Only NMEA is detected, so its error stands
	assert_eq!(parse_gps_speed("$GPGSV,1,1"), Err(ParseErr::UnsupportedSentence("GPGSV".to_string())));
}
