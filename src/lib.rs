//! Workspace root package; the cross-crate tests live in `tests/`.
