
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::Path;
use std::str::FromStr;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use log::error;
use num_complex::Complex;

use crate::{RakeErr, Sample};


pub const BUFFER_SIZE:usize = 2048;

/// Layout of interleaved little-endian IQ samples
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleFormat {
	ComplexI16,
	ComplexF32,
}

impl SampleFormat {

	pub fn bytes_per_sample(&self) -> usize { match self {
		SampleFormat::ComplexI16 => 4,
		SampleFormat::ComplexF32 => 8,
	}}

}

impl FromStr for SampleFormat {
	type Err = &'static str;

	fn from_str(s:&str) -> Result<Self, Self::Err> { match s {
		"i16" | "complex_i16" => Ok(SampleFormat::ComplexI16),
		"f32" | "complex_f32" => Ok(SampleFormat::ComplexF32),
		_ => Err("Sample format must be one of i16, f32"),
	}}
}

/// Iterator over the IQ samples of a byte stream, each tagged with its position in the stream.  A trailing partial
/// sample is discarded.  Iteration also ends on a read error, which is kept for `take_error`.
pub struct SampleSource<S: Read> {
	src: BufReader<S>,
	format: SampleFormat,
	idx: usize,
	err: Option<std::io::Error>,
}

impl<S: Read> SampleSource<S> {

	pub fn new(src:S, format:SampleFormat) -> Self {
		Self { src: BufReader::with_capacity(BUFFER_SIZE * format.bytes_per_sample(), src), format, idx: 0, err: None }
	}

	/// The error that stopped iteration, if it was anything other than the end of the stream
	pub fn take_error(&mut self) -> Option<std::io::Error> { self.err.take() }

	fn read_val(&mut self) -> std::io::Result<Complex<f64>> { match self.format {
		SampleFormat::ComplexI16 => {
			let re = self.src.read_i16::<LittleEndian>()?;
			let im = self.src.read_i16::<LittleEndian>()?;
			Ok(Complex{ re: re as f64, im: im as f64 })
		},
		SampleFormat::ComplexF32 => {
			let re = self.src.read_f32::<LittleEndian>()?;
			let im = self.src.read_f32::<LittleEndian>()?;
			Ok(Complex{ re: re as f64, im: im as f64 })
		},
	}}

}

impl SampleSource<File> {

	pub fn open<P: AsRef<Path>>(path:P, format:SampleFormat) -> Result<Self, RakeErr> {
		Ok(Self::new(File::open(path)?, format))
	}

}

impl<S: Read> Iterator for SampleSource<S> {
	type Item = Sample;

	fn next(&mut self) -> Option<Sample> {
		if self.err.is_some() { return None; }

		match self.read_val() {
			Ok(val) => {
				let ans = Sample{ val, idx: self.idx };
				self.idx += 1;
				Some(ans)
			},
			Err(e) if e.kind() == ErrorKind::UnexpectedEof => None,
			Err(e) => {
				error!("Read failed after {} samples: {}", self.idx, e);
				self.err = Some(e);
				None
			},
		}
	}
}

/// Writes combiner output as interleaved little-endian f32 pairs
pub struct SampleSink<W: Write> {
	dst: BufWriter<W>,
	count: usize,
}

impl<W: Write> SampleSink<W> {

	pub fn new(dst:W) -> Self { Self { dst: BufWriter::new(dst), count: 0 } }

	pub fn count(&self) -> usize { self.count }

	pub fn write(&mut self, val:&Complex<f64>) -> Result<(), RakeErr> {
		self.dst.write_f32::<LittleEndian>(val.re as f32)?;
		self.dst.write_f32::<LittleEndian>(val.im as f32)?;
		self.count += 1;
		Ok(())
	}

	pub fn finish(mut self) -> Result<W, RakeErr> {
		self.dst.flush()?;
		self.dst.into_inner().map_err(|e| RakeErr::Io(e.into_error()))
	}

}

impl SampleSink<File> {

	pub fn create<P: AsRef<Path>>(path:P) -> Result<Self, RakeErr> {
		Ok(Self::new(File::create(path)?))
	}

}

/// Line-oriented telemetry log; blank lines are skipped and line endings are left for the parsers to trim
pub struct TelemetrySource<R: Read> {
	lines: std::io::Split<BufReader<R>>,
	err: Option<std::io::Error>,
}

impl<R: Read> TelemetrySource<R> {

	pub fn new(src:R) -> Self { Self { lines: BufReader::new(src).split(b'\n'), err: None } }

	pub fn take_error(&mut self) -> Option<std::io::Error> { self.err.take() }

}

impl TelemetrySource<File> {

	pub fn open<P: AsRef<Path>>(path:P) -> Result<Self, RakeErr> {
		Ok(Self::new(File::open(path)?))
	}

}

impl<R: Read> Iterator for TelemetrySource<R> {
	type Item = Vec<u8>;

	fn next(&mut self) -> Option<Vec<u8>> {
		if self.err.is_some() { return None; }

		loop {
			match self.lines.next()? {
				Ok(line) => {
					if line.iter().all(|b| b.is_ascii_whitespace()) { continue; }
					return Some(line);
				},
				Err(e) => {
					error!("Telemetry read failed: {}", e);
					self.err = Some(e);
					return None;
				},
			}
		}
	}
}
