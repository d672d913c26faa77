use crate::pick::{AnnotatedPick, Feature, Pick, phase_velocity};
use crate::zeros::ZeroTables;

/// Half the velocity change from mislabelling a pick by two mode orders.
///
/// Uses the next lower order of the same parity when one exists, otherwise the next
/// higher one. `None` when the table does not reach the neighbouring order.
pub fn estimate_error(pick: &Pick, distance: f64, tables: &ZeroTables) -> Option<f64> {
	let table = match pick.feature {
		Feature::ZeroCross => &tables.j0,
		Feature::Peak | Feature::Trough => &tables.j1,
	};

	let neighbour = if pick.order >= 2 { pick.order - 2 } else { pick.order + 2 };
	let velocity = |order: u32| table.get(order).map(|zero| phase_velocity(pick.frequency, distance, zero));

	Some((velocity(neighbour)? - velocity(pick.order)?) / 2.0)
}

/// Attaches an error estimate to every pick; picks beyond the table edge get 0.
pub fn annotate(picks: &[Pick], distance: f64, tables: &ZeroTables) -> Vec<AnnotatedPick> {
	picks
		.iter()
		.map(|&pick| AnnotatedPick { pick, error: estimate_error(&pick, distance, tables).unwrap_or(0.0) })
		.collect()
}
