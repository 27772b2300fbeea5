//! bz-bench: criterion benchmarks for bz-core (see `benches/`).
