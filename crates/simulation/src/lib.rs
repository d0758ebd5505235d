use bevy::prelude::*;
use std::collections::BTreeMap;

pub mod buildings;
pub mod config;
pub mod earthquake;
pub mod effects;
pub mod grid;
pub mod map_refresh;
pub mod notifications;
pub mod save_buffer;
pub mod scenario;
pub mod sim_rng;
pub mod simulation_sets;
pub mod sound_effects;
pub mod time_of_day;

pub use simulation_sets::SimulationSet;

#[cfg(any(test, feature = "bench"))]
pub mod test_harness;

// ---------------------------------------------------------------------------
// Saveable trait + registry for the extension map save pattern
// ---------------------------------------------------------------------------

/// Trait for resources that the host save system persists as opaque blobs.
///
/// Each implementing resource provides its own serialization; the host only
/// sees a key and bytes. A plugin opts in by registering the type with
/// [`SaveableRegistry::register`] in its `build()`.
pub trait Saveable: Resource + Default + Send + Sync + 'static {
    /// Unique key for this resource in the save file's extension map.
    /// Must be stable across versions.
    const SAVE_KEY: &'static str;

    /// Serialize this resource to bytes.
    /// Return `None` to skip saving (e.g. when the resource is at its default state).
    fn save_to_bytes(&self) -> Option<Vec<u8>>;

    /// Deserialize from bytes, returning the restored resource.
    fn load_from_bytes(bytes: &[u8]) -> Self;
}

/// Type alias for the save function stored in a `SaveableEntry`.
pub type SaveFn = Box<dyn Fn(&World) -> Option<Vec<u8>> + Send + Sync>;
/// Type alias for the load function stored in a `SaveableEntry`.
pub type LoadFn = Box<dyn Fn(&mut World, &[u8]) + Send + Sync>;
/// Type alias for the reset function stored in a `SaveableEntry`.
pub type ResetFn = Box<dyn Fn(&mut World) + Send + Sync>;

/// Type-erased save/load/reset operations for a single registered resource.
pub struct SaveableEntry {
    pub key: String,
    pub save_fn: SaveFn,
    pub load_fn: LoadFn,
    pub reset_fn: ResetFn,
}

/// Registry of all saveable resources, populated during plugin setup.
#[derive(Resource, Default)]
pub struct SaveableRegistry {
    pub entries: Vec<SaveableEntry>,
}

impl SaveableRegistry {
    /// Register a resource type that implements `Saveable`.
    ///
    /// A second registration under the same key is ignored (and asserts in
    /// debug builds).
    pub fn register<T: Saveable>(&mut self) {
        let key = T::SAVE_KEY.to_string();
        if self.entries.iter().any(|e| e.key == key) {
            warn!(
                "SaveableRegistry: duplicate key '{}', ignoring second registration",
                key
            );
            debug_assert!(false, "SaveableRegistry: duplicate key '{}'", key);
            return;
        }
        self.entries.push(SaveableEntry {
            key,
            save_fn: Box::new(|world: &World| {
                world.get_resource::<T>().and_then(|r| r.save_to_bytes())
            }),
            load_fn: Box::new(|world: &mut World, bytes: &[u8]| {
                let value = T::load_from_bytes(bytes);
                world.insert_resource(value);
            }),
            reset_fn: Box::new(|world: &mut World| {
                world.insert_resource(T::default());
            }),
        });
    }

    pub fn is_registered(&self, key: &str) -> bool {
        self.entries.iter().any(|e| e.key == key)
    }

    /// Save all registered resources into an extension map.
    pub fn save_all(&self, world: &World) -> BTreeMap<String, Vec<u8>> {
        let mut extensions = BTreeMap::new();
        for entry in &self.entries {
            if let Some(bytes) = (entry.save_fn)(world) {
                extensions.insert(entry.key.clone(), bytes);
            }
        }
        extensions
    }

    /// Load registered resources from an extension map.
    /// Resources whose key is absent are left unchanged.
    pub fn load_all(&self, world: &mut World, extensions: &BTreeMap<String, Vec<u8>>) {
        for entry in &self.entries {
            if let Some(bytes) = extensions.get(&entry.key) {
                (entry.load_fn)(world, bytes);
            }
        }
    }

    /// Reset all registered resources to their defaults.
    pub fn reset_all(&self, world: &mut World) {
        for entry in &self.entries {
            (entry.reset_fn)(world);
        }
    }
}

/// Runs `f` with the registry temporarily removed from `world`, so that the
/// registry's entries can take `&mut World`.
pub fn with_saveable_registry<R>(
    world: &mut World,
    f: impl FnOnce(&SaveableRegistry, &mut World) -> R,
) -> Option<R> {
    let registry = world.remove_resource::<SaveableRegistry>()?;
    let result = f(&registry, world);
    world.insert_resource(registry);
    Some(result)
}

// ---------------------------------------------------------------------------
// Core resources
// ---------------------------------------------------------------------------

/// Global tick counter incremented each FixedUpdate.
#[derive(Resource, Default)]
pub struct TickCounter(pub u64);

pub fn advance_tick_counter(mut tick: ResMut<TickCounter>) {
    tick.0 = tick.0.wrapping_add(1);
}

pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            FixedUpdate,
            (
                SimulationSet::PreSim,
                SimulationSet::Simulation,
                SimulationSet::PostSim,
            )
                .chain(),
        );

        app.init_resource::<TickCounter>()
            .init_resource::<grid::WorldGrid>()
            .init_resource::<SaveableRegistry>()
            .add_systems(
                FixedUpdate,
                advance_tick_counter.in_set(SimulationSet::PreSim),
            );

        // Collaborators the earthquake calls into
        app.add_plugins((
            time_of_day::TimeOfDayPlugin,
            sim_rng::SimRngPlugin,
            buildings::BuildingsPlugin,
            sound_effects::SoundEffectsPlugin,
            notifications::NotificationsPlugin,
            map_refresh::MapRefreshPlugin,
            effects::EffectsPlugin,
        ));

        // Scenario events
        app.add_plugins(earthquake::EarthquakePlugin);
    }
}
