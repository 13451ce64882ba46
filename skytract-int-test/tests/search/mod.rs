//! End-to-end searches over the small sky fixture.

mod concurrency_test;
mod polygon_search_test;
mod tract_patch_search_test;
