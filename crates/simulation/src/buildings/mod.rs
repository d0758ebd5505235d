mod collapse;
mod placement;
mod plugin;
pub mod types;

pub use collapse::{
    collapse_linked, collapse_on_fire, mark_deleted_by_game, remove_collapsed_buildings,
    BuildingQuery,
};
pub use placement::{link_buildings, place_building};
pub use plugin::BuildingsPlugin;
pub use types::{Building, BuildingLinks, BuildingState};
