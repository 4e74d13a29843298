pub mod walk;

pub use walk::Dispatcher;
