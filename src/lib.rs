//! Workspace façade crate.
//!
//! Re-exports the individual workspace crates so host applications can depend
//! on `gallery-sync` alone: the acquisition pipeline (`core-sync`), the
//! polling client controller (`core-client`), the storage-gateway connector
//! (`provider-mega`), and the runtime/bridge infrastructure underneath.

pub use bridge_native as native;
pub use bridge_traits as bridge;
pub use core_client as client;
pub use core_runtime as runtime;
pub use core_sync as sync;
pub use provider_mega as mega;
