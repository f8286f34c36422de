//! Registry service tests.

mod helpers;
mod signed;
