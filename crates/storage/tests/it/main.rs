/*! Integration tests for rl_storage.
 *
 * One test binary; modules are grouped by list operation:
 * - create: creation placement, insert_at, clamping
 * - reorder: swaps and moves to either end, adjacency
 * - removal: remove_from_list, on_destroy, destroy
 * - scopes: null, expression, unscoped and cross-scope moves
 * - queries: list options and lazy queries
 * - concurrency: lock conflicts across store handles
 * - invariants: random operation sequences keep every list dense
 */

use tracing_subscriber::EnvFilter;

#[ctor::ctor]
fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("rl_storage=info".parse().unwrap()),
        )
        .with_test_writer()
        .try_init();
}

mod concurrency;
mod invariants;
mod scopes;
