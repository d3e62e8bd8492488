mod element_waiter;
mod poller;

pub use element_waiter::ElementWaiter;
pub use poller::{ElementPoller, ElementPollerTicker};
