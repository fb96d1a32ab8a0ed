
use log::{debug, error, warn};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::{DigSigProcErr as DSPErr, RakeErr};

#[cfg(test)]
mod tests;

pub const CHANNEL_CAPACITY:usize = 10;

pub enum BlockResult<U> {
	NotReady,
	Ready(U),
	Err(DSPErr)
}

// A type that implements BlockFunctionality consumes instances of T and produces BlockResult::Ready(U) if an
// output is ready, BlockResult::NotReady if it isn't, or BlockResult::Err(_) if the operation fails.  Control
// values of type C reconfigure the block between inputs.
pub trait BlockFunctionality<C: Clone, D, T: Clone, U> {

	fn control(&mut self, control:&C) -> Result<D, RakeErr>;
	fn apply(&mut self, input:&T) -> BlockResult<U>;

}

pub struct Block<C: 'static + Send, T: 'static + Send, U: 'static + Send> {
	pub tx_control: mpsc::Sender<C>,
	pub tx_input:   mpsc::Sender<T>,
	pub rx_output:  mpsc::Receiver<U>,
	pub handles:    Vec<JoinHandle<Result<(), &'static str>>>,
}

impl<C: Send + Sync + Clone, T: Send + Sync + Clone, U: Send + Sync> Block<C, T, U> {

	pub fn from<D: 'static + Send, B: 'static + BlockFunctionality<C, D, T, U> + Send + Sync>(b:B) -> Self {

		let (   tx_control, mut rx_control) = mpsc::channel::<C>(CHANNEL_CAPACITY);
		let (     tx_input,   mut rx_input) = mpsc::channel::<T>(CHANNEL_CAPACITY);
		let (mut tx_output,      rx_output) = mpsc::channel::<U>(CHANNEL_CAPACITY);

		let handle:JoinHandle<Result<(), &'static str>> = tokio::spawn(async move {

			let mut owned_b = b;

			'rx: while let Some(t) = rx_input.recv().await {

				// Every control value queued before this input takes effect before it's processed, so the block's
				// state never needs a mutex.  A rejected control value leaves the previous configuration in place.
				while let Ok(c) = rx_control.try_recv() {
					if let Err(e) = owned_b.control(&c) {
						warn!("Control value rejected: {}", e);
					}
				}

				match owned_b.apply(&t) {
					BlockResult::Ready(u) => {
						if tx_output.send(u).await.is_err() {
							debug!("Output receiver dropped, stopping block");
							break 'rx;
						}
					},
					BlockResult::NotReady => (),
					BlockResult::Err(e)   => {
						error!("Error in block: {:?}", e);
						break 'rx;
					}
				}

			}

			Ok(())
		});

		let handles = vec![handle];

		Block{ tx_control, tx_input, rx_output, handles }
	}

	/// Closes the inputs, discards any pending output and waits for the block to finish
	pub async fn shutdown(self) -> Result<(), &'static str> {

		let Block{ tx_control, tx_input, rx_output, handles } = self;

		drop(tx_control);
		drop(tx_input);
		drop(rx_output);

		for handle in handles {
			handle.await.map_err(|_| "Block task panicked")??;
		}

		Ok(())
	}

}
