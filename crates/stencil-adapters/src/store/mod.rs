//! Domain configuration stores.

mod memory;

pub use memory::InMemoryDomainStore;
