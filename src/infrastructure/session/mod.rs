//! Session storage implementations

mod file;
mod in_memory;

pub use file::FileSessionStorage;
pub use in_memory::InMemorySessionStorage;
