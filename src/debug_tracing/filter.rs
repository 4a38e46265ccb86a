use tracing_subscriber::filter::FilterFn;

fn is_search_node_event(target: &str) -> bool {
    target.starts_with("lattice_align::aligner")
        && (target.ends_with("set_visited") || target.ends_with("queue_item"))
}

/// Keep per-node search events out of the regular log output
pub fn search_node_filter() -> FilterFn {
    FilterFn::new(|metadata| !is_search_node_event(metadata.target()))
}

/// Only the search span and its per-node events
pub fn only_search_nodes() -> FilterFn {
    FilterFn::new(|metadata| {
        is_search_node_event(metadata.target()) || metadata.name() == "astar_run"
    })
}
