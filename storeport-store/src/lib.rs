pub mod error;
pub mod memory;
#[cfg(feature = "sqlite")]
pub mod sql_store;

pub use error::{StoreError, StoreResult};
pub use memory::{
    MemoryOptionsStore, MemoryPostStore, MemoryShippingStore, MemoryTableRateStore,
    MemoryTransientStore,
};
#[cfg(feature = "sqlite")]
pub use sql_store::SqlStore;
