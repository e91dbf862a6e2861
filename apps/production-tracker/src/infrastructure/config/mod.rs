//! Wiring of stores, ports and use cases.

mod container;

pub use container::Container;
