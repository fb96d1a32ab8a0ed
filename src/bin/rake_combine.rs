
use clap::{Arg, App};
use colored::*;
use log::{error, info, warn};
use rake_radio::block::{BlockFunctionality, BlockResult};
use rake_radio::io::{SampleFormat, SampleSink, SampleSource, TelemetrySource};
use rake_radio::receiver::config::ReceiverConfig;

fn parse_list<T: std::str::FromStr>(s:&str) -> Result<Vec<T>, &'static str> {
	s.split(',').map(|x| x.trim().parse::<T>().map_err(|_| "Unable to parse comma-separated list")).collect()
}

fn main() -> Result<(), &'static str> {

	env_logger::init();

	let matches = App::new("RAKE Combine")
		.version("0.1.0")
		.author("John Stanford (johnwstanford@gmail.com)")
		.about("Takes IQ samples and combines delayed multipath replicas with a RAKE receiver, optionally adapting to GPS speed")
		.arg(Arg::with_name("filename")
			.short("f").long("filename")
			.help("Input filename")
			.required(true).takes_value(true))
		.arg(Arg::with_name("output_filename")
			.short("o").long("output_filename")
			.help("Output filename for combined samples as interleaved f32")
			.takes_value(true))
		.arg(Arg::with_name("input_type")
			.short("t").long("type")
			.takes_value(true)
			.possible_value("i16")
			.possible_value("f32"))
		.arg(Arg::with_name("config")
			.short("c").long("config")
			.help("JSON receiver configuration")
			.takes_value(true))
		.arg(Arg::with_name("fingers")
			.short("n").long("fingers")
			.takes_value(true))
		.arg(Arg::with_name("delays")
			.short("d").long("delays")
			.help("Comma-separated finger delays in samples")
			.takes_value(true))
		.arg(Arg::with_name("gains")
			.short("g").long("gains")
			.help("Comma-separated finger gains")
			.takes_value(true))
		.arg(Arg::with_name("pattern_length")
			.short("l").long("pattern-length")
			.takes_value(true))
		.arg(Arg::with_name("adaptive")
			.short("a").long("adaptive")
			.help("Enable speed-adaptive tracking parameters"))
		.arg(Arg::with_name("speed")
			.short("s").long("speed")
			.help("Initial GPS speed [km/h]")
			.takes_value(true))
		.arg(Arg::with_name("gps_log")
			.long("gps-log")
			.help("File of NMEA0183 sentences or GPSD reports, one per line")
			.takes_value(true))
		.arg(Arg::with_name("gps_interval")
			.long("gps-interval")
			.help("Number of input samples between consecutive GPS log lines (default=1000)")
			.takes_value(true))
		.get_matches();

	let fname:&str = matches.value_of("filename").ok_or("No input filename provided")?;
	let out_fname:&str = matches.value_of("output_filename").unwrap_or("rake_output.dat");
	let format:SampleFormat = matches.value_of("input_type").unwrap_or("i16").parse()?;
	let gps_interval:usize = matches.value_of("gps_interval").unwrap_or("1000").parse().map_err(|_| "Unable to parse GPS interval as a usize")?;
	if gps_interval == 0 { return Err("GPS interval must be greater than zero"); }

	// Config file first, then command line overrides
	let mut cfg:ReceiverConfig = match matches.value_of("config") {
		Some(path) => ReceiverConfig::from_file(path).map_err(|e| {
			error!("{}", e);
			"Unable to load receiver configuration"
		})?,
		None => ReceiverConfig::default(),
	};

	if let Some(s) = matches.value_of("fingers")        { cfg.num_fingers = s.parse().map_err(|_| "Unable to parse number of fingers")?; }
	if let Some(s) = matches.value_of("delays")         { cfg.delays = parse_list(s)?; }
	if let Some(s) = matches.value_of("gains")          { cfg.gains = parse_list(s)?; }
	if let Some(s) = matches.value_of("pattern_length") { cfg.pattern_length = s.parse().map_err(|_| "Unable to parse pattern length")?; }
	if let Some(s) = matches.value_of("speed")          { cfg.gps_speed_kmh = Some(s.parse().map_err(|_| "Unable to parse speed as an f64")?); }
	if matches.is_present("adaptive")                   { cfg.adaptive_mode = true; }

	let mut rx = cfg.build().map_err(|e| {
		error!("{}", e);
		"Invalid receiver configuration"
	})?;

	eprintln!("Combining {} with {} fingers at delays {:?}, history {} samples",
		fname, rx.num_fingers(), rx.delays(), rx.history());

	let mut telemetry_lines = match matches.value_of("gps_log") {
		Some(path) => {
			let src = TelemetrySource::open(path).map_err(|_| "Unable to open GPS log")?;
			if rx.start_gps() { info!("Replaying {} over the configured GPS source", path); }
			Some(src)
		},
		None => None,
	};

	let mut src = SampleSource::open(fname, format).map_err(|_| "Unable to open input file")?;
	let mut sink = SampleSink::create(out_fname).map_err(|_| "Unable to create output file")?;

	let mut num_inputs:usize = 0;
	let mut accepted:usize = 0;
	let mut rejected:usize = 0;
	let mut last_category = rx.speed_category();

	for s in src.by_ref() {

		if s.idx % gps_interval == 0 {
			if let Some(line) = telemetry_lines.as_mut().and_then(|t| t.next()) {
				match rx.deliver_telemetry(&line) {
					Ok(()) => accepted += 1,
					Err(_) => rejected += 1,
				}

				let category = rx.speed_category();
				if category != last_category {
					if let Some(c) = category {
						let result_str = format!("{:?} at {:.1} [km/h], path search {:.2} [Hz], tracking bandwidth {:.1} [Hz]",
							c, rx.gps_speed(), rx.path_search_rate(), rx.tracking_bandwidth());
						if rx.adaptive_mode() { eprintln!("{:10} [samples] {}", s.idx, result_str.green()); }
						else { eprintln!("{:10} [samples] {}", s.idx, result_str.yellow()); }
					}
					last_category = category;
				}
			}
		}

		match rx.apply(&s) {
			BlockResult::Ready(out) => sink.write(&out.val).map_err(|_| "Unable to write to output file")?,
			BlockResult::NotReady => {},
			BlockResult::Err(e) => {
				error!("{:?}", e);
				return Err("Combiner failed");
			},
		}

		num_inputs += 1;
	}

	rx.stop_gps();

	if let Some(e) = src.take_error() {
		error!("{}", e);
		return Err("Unable to read input file");
	}
	if let Some(e) = telemetry_lines.as_mut().and_then(|t| t.take_error()) {
		warn!("GPS log replay stopped early: {}", e);
	}

	let num_outputs = sink.count();
	sink.finish().map_err(|_| "Unable to flush output file")?;

	eprintln!("{} input samples -> {} combined samples in {}", num_inputs, num_outputs, out_fname);
	if telemetry_lines.is_some() {
		let summary = format!("{} telemetry lines accepted, {} rejected", accepted, rejected);
		if rejected > 0 { eprintln!("{}", summary.yellow()); }
		else { eprintln!("{}", summary.green()); }
	}

	// Output final receiver state in JSON format
	println!("{}", serde_json::to_string_pretty(&rx.status()).map_err(|_| "Unable to serialize receiver status")?);

	Ok(())

}
