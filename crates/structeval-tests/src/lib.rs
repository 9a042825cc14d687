//! Shared test crate for structeval; all tests live under `tests/`.
