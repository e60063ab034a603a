pub mod backend;
pub mod logging;

pub use backend::{initialize_backend, initialize_backend_with, WalletBackend};
