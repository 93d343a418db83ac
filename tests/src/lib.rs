//! # Peer-SD Test Suite
//!
//! Cross-crate flows that drive the discovery scheduler through its real
//! adapters where that can be done on one machine.
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── benches/          # criterion benchmarks of the pure domain logic
//! └── src/integration/  # end-to-end discovery rounds
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p psd-tests
//! cargo bench -p psd-tests
//! ```

pub mod integration;
