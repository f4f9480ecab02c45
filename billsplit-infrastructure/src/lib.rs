#![warn(clippy::uninlined_format_args)]

pub mod cached;
pub mod id_generator;
pub mod json_store;
pub mod memory_store;
pub mod records;

pub use cached::CachedBillRepository;
pub use id_generator::RandomIdGenerator;
pub use json_store::JsonFileBillRepository;
pub use memory_store::InMemoryBillRepository;
pub use records::StoredBill;
