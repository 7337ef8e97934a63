/// Counts ticks and says which ones to publish. Physics runs on every
/// tick; consumers only redraw on published ones.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickSchedule {
	publish_every: u32,
	ticks: u64,
}

impl TickSchedule {
	pub fn new(publish_every: u32) -> Self {
		Self {
			publish_every: publish_every.max(1),
			ticks: 0,
		}
	}

	/// Record one tick. Returns true when this tick should be published.
	pub fn advance(&mut self) -> bool {
		self.ticks += 1;
		self.ticks % u64::from(self.publish_every) == 0
	}

	pub fn ticks(&self) -> u64 {
		self.ticks
	}
}

/// Ticket for one payload request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RequestTicket(u64);

/// Hands out request tickets so only the newest response is applied.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RequestTracker {
	latest: u64,
}

impl RequestTracker {
	pub fn begin(&mut self) -> RequestTicket {
		self.latest += 1;
		RequestTicket(self.latest)
	}

	pub fn is_current(&self, ticket: RequestTicket) -> bool {
		ticket.0 == self.latest
	}
}
