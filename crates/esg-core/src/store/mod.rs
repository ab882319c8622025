//! Store relacional: contrato y backend en memoria.

mod memory;
mod types;

pub use memory::InMemoryEsgStore;
pub use types::{EsgStore, NewSubmission};
