// crates.io
use tracing::{Span, field, instrument::Instrumented};
// self
use crate::{_prelude::*, obs::RelayOperation};

/// A span builder used by relay operations.
#[derive(Clone, Debug)]
pub struct OperationSpan {
	span: Span,
}
impl OperationSpan {
	/// Creates a new span tagged with the provided operation; `phase` is filled in as the
	/// call progresses.
	pub fn new(operation: RelayOperation) -> Self {
		let span = tracing::info_span!(
			"recruit_relay.operation",
			operation = operation.as_str(),
			phase = field::Empty
		);

		Self { span }
	}

	/// Marks the phase the operation is in (`ensure_token`, `dispatch`, `refresh`, `retry`).
	pub fn record_phase(&self, phase: &'static str) {
		self.span.record("phase", phase);
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> Instrumented<Fut>
	where
		Fut: Future,
	{
		// crates.io
		use tracing::Instrument;

		fut.instrument(self.span.clone())
	}
}

/// Records `phase` on the operation span the caller is currently running in.
pub fn record_phase(phase: &'static str) {
	Span::current().record("phase", phase);
}
