use num_complex::Complex;

use crate::{DigSigProcErr, RakeErr, Sample};
use crate::block::{Block, BlockFunctionality, BlockResult};
use crate::receiver::{RakeControl, RakeReceiver};

struct MockDecimator {
	pub keep_every: usize,
	pub fail_at: usize,
}

impl BlockFunctionality<usize, (), usize, usize> for MockDecimator {

	fn control(&mut self, control:&usize) -> Result<(), RakeErr> {
		self.keep_every = *control;
		Ok(())
	}

	fn apply(&mut self, input:&usize) -> BlockResult<usize> {
		if *input == self.fail_at { BlockResult::Err(DigSigProcErr::Other("mock failure")) }
		else if input % self.keep_every == 0 { BlockResult::Ready(*input) }
		else { BlockResult::NotReady }
	}

}

fn sample(idx:usize) -> Sample { Sample{ val: Complex{ re: 1.0, im: 0.0 }, idx } }

#[tokio::test(threaded_scheduler)]
async fn block_stops_on_error() {
	let Block{ tx_control, mut tx_input, mut rx_output, handles } = Block::from(MockDecimator{ keep_every: 3, fail_at: 10 });

	let feeder = tokio::spawn(async move {
		for i in 0..20usize {
			if tx_input.send(i).await.is_err() { break; }
		}
	});

	let mut results:Vec<usize> = vec![];
	while let Some(x) = rx_output.recv().await {
		results.push(x);
	}

	assert_eq!(results, vec![0, 3, 6, 9]);

	drop(tx_control);
	feeder.await.unwrap();
	for handle in handles { handle.await.unwrap().unwrap(); }
}

#[tokio::test(threaded_scheduler)]
async fn reconfiguration_is_applied_between_samples() {
	let rx = RakeReceiver::new(1, &[0], &[1.0], 4).unwrap();
	let Block{ mut tx_control, mut tx_input, mut rx_output, handles } = Block::from(rx);

	// Queued ahead of the first sample, so every output sees the new gain.  The bad delay vector is rejected
	// without stopping the block, and the garbage telemetry is ignored.
	tx_control.send(RakeControl::SetGains(vec![0.5])).await.unwrap();
	tx_control.send(RakeControl::SetDelays(vec![1, 2])).await.unwrap();
	tx_control.send(RakeControl::Telemetry(b"$GPRMC,garbage".to_vec())).await.unwrap();

	let feeder = tokio::spawn(async move {
		for idx in 0..40 {
			if tx_input.send(sample(idx)).await.is_err() { break; }
		}
	});

	let mut outputs:Vec<Sample> = vec![];
	while let Some(s) = rx_output.recv().await {
		outputs.push(s);
	}

	feeder.await.unwrap();
	drop(tx_control);
	for handle in handles { handle.await.unwrap().unwrap(); }

	assert_eq!(outputs.len(), 40 - 3);
	for (i, s) in outputs.iter().enumerate() {
		assert_eq!(s.idx, i);
		assert_eq!(s.val, Complex{ re: 2.0, im: 0.0 });
	}
}

#[tokio::test(threaded_scheduler)]
async fn shutdown_with_pending_output() {
	let rx = RakeReceiver::new(2, &[0, 3], &[1.0, -1.0], 8).unwrap();
	let mut block = Block::from(rx);

	for idx in 0..15 {
		block.tx_input.send(sample(idx)).await.unwrap();
	}

	block.shutdown().await.unwrap();
}
