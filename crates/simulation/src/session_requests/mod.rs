pub mod executor;
pub mod outcomes;
pub mod plugin;
pub mod queue;
pub mod requests;
pub mod result_log;

pub use executor::execute_session_requests;
pub use outcomes::*;
pub use plugin::SessionRequestsPlugin;
pub use queue::*;
pub use requests::*;
pub use result_log::SessionResultLog;

#[cfg(test)]
mod tests;
