mod action_queue;
mod actions;
mod event_loop;
mod views;

pub(crate) use actions::load_trips;
pub use event_loop::run_app;
