// self
use crate::{_prelude::*, obs::CoreOp};

/// A span builder used by the observed core operations.
#[derive(Clone, Debug)]
pub struct CoreSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl CoreSpan {
	/// Creates a new span tagged with the provided operation + stage.
	pub fn new(op: CoreOp, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("social_bridge.op", op = op.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (op, stage);

			Self {}
		}
	}

	/// Enters the span for the current synchronous section.
	pub fn entered(self) -> CoreSpanGuard {
		#[cfg(feature = "tracing")]
		{
			CoreSpanGuard { guard: self.span.entered() }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = self;

			CoreSpanGuard {}
		}
	}
}

/// RAII guard returned by [`CoreSpan::entered`].
pub struct CoreSpanGuard {
	#[cfg(feature = "tracing")]
	#[allow(dead_code)]
	guard: tracing::span::EnteredSpan,
}
impl Debug for CoreSpanGuard {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("CoreSpanGuard(..)")
	}
}
