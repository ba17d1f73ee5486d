//! Builders for syntax trees used in tests.
//!
//! The parser lives outside this crate, so tests assemble [`SourceFile`]s by
//! hand. These helpers keep that readable:
//!
//! ```rust
//! use gomap::testkit::*;
//!
//! let worker = func_decl("worker", vec![range_over("job", ident("jobs"), vec![])]);
//! let file = source_file("pool.go", "pool", vec![worker.into()]);
//! assert_eq!(file.functions().count(), 1);
//! ```
//!
//! Statements default to line 1; use [`at`] to place them.

mod builders;

pub use builders::*;
