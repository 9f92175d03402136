//! Storefront integration tests: the services driven directly against an
//! in-memory store.

mod support;

mod accounts;
mod catalog;
mod failures;
