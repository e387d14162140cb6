//! Concrete collaborators: page stores and the letter outbox.

pub mod fs;
pub mod memory;
pub mod outbox;

pub use fs::FsPageStore;
pub use memory::InMemoryPageStore;
pub use outbox::OutboxTransport;
