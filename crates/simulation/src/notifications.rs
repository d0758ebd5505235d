//! City message log.
//!
//! Simulation systems emit `NotificationEvent`s; they are collected into
//! `NotificationLog` at the end of the tick. Disaster messages stay visible
//! until the player dismisses them.

use bevy::prelude::*;

use crate::grid::WorldGrid;
use crate::time_of_day::{GameClock, GameDate};

/// What a message is about. Used by the host to pick icons and text templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    Earthquake,
}

impl NotificationKind {
    pub fn label(&self) -> &'static str {
        match self {
            NotificationKind::Earthquake => "EARTHQUAKE",
        }
    }
}

#[derive(Event, Debug, Clone)]
pub struct NotificationEvent {
    pub kind: NotificationKind,
    pub text: String,
    /// Row-major grid offset of the tile the message refers to.
    pub grid_offset: Option<usize>,
    /// World-space location (x, z) of that tile's center.
    pub location: Option<(f32, f32)>,
}

impl NotificationEvent {
    /// A disaster message with no map location.
    pub fn disaster(kind: NotificationKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            grid_offset: None,
            location: None,
        }
    }

    /// A disaster message anchored to tile `(x, y)` of `grid`.
    pub fn disaster_at(
        kind: NotificationKind,
        text: impl Into<String>,
        grid: &WorldGrid,
        x: usize,
        y: usize,
    ) -> Self {
        Self {
            grid_offset: Some(grid.grid_offset(x, y)),
            location: Some(WorldGrid::grid_to_world(x, y)),
            ..Self::disaster(kind, text)
        }
    }
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub id: u64,
    pub kind: NotificationKind,
    pub text: String,
    pub grid_offset: Option<usize>,
    pub location: Option<(f32, f32)>,
    pub date: GameDate,
    pub created_tick: u64,
    pub dismissed: bool,
}

#[derive(Resource)]
pub struct NotificationLog {
    /// Currently visible notifications.
    pub active: Vec<Notification>,
    /// Every notification ever posted, oldest first, capped at `max_journal`.
    pub journal: Vec<Notification>,
    pub max_journal: usize,
    next_id: u64,
}

impl Default for NotificationLog {
    fn default() -> Self {
        Self {
            active: Vec::new(),
            journal: Vec::new(),
            max_journal: 500,
            next_id: 1,
        }
    }
}

impl NotificationLog {
    pub fn push(&mut self, event: &NotificationEvent, date: GameDate, tick: u64) {
        let id = self.next_id;
        self.next_id += 1;
        let notification = Notification {
            id,
            kind: event.kind,
            text: event.text.clone(),
            grid_offset: event.grid_offset,
            location: event.location,
            date,
            created_tick: tick,
            dismissed: false,
        };
        self.journal.push(notification.clone());
        self.active.push(notification);

        if self.journal.len() > self.max_journal {
            let excess = self.journal.len() - self.max_journal;
            self.journal.drain(0..excess);
        }
    }

    pub fn dismiss(&mut self, id: u64) {
        if let Some(n) = self.active.iter_mut().find(|n| n.id == id) {
            n.dismissed = true;
        }
    }

    /// Removes dismissed notifications from the active list.
    pub fn sweep(&mut self) {
        self.active.retain(|n| !n.dismissed);
    }

    pub fn count_of(&self, kind: NotificationKind) -> usize {
        self.journal.iter().filter(|n| n.kind == kind).count()
    }
}

fn collect_notifications(
    mut events: EventReader<NotificationEvent>,
    mut log: ResMut<NotificationLog>,
    clock: Res<GameClock>,
    tick: Res<crate::TickCounter>,
) {
    for event in events.read() {
        info!("[{}] {}", event.kind.label(), event.text);
        log.push(event, clock.date(), tick.0);
    }
}

fn sweep_dismissed_notifications(mut log: ResMut<NotificationLog>, tick: Res<crate::TickCounter>) {
    if tick.0 % 10 != 0 {
        return;
    }
    log.sweep();
}

pub struct NotificationsPlugin;

impl Plugin for NotificationsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<NotificationLog>()
            .add_event::<NotificationEvent>()
            .add_systems(
                FixedUpdate,
                (collect_notifications, sweep_dismissed_notifications)
                    .chain()
                    .in_set(crate::SimulationSet::PostSim),
            );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> GameDate {
        GameDate { year: 0, month: 3 }
    }

    fn quake(text: &str) -> NotificationEvent {
        NotificationEvent::disaster(NotificationKind::Earthquake, text)
    }

    #[test]
    fn test_disaster_at_references_tile() {
        let grid = WorldGrid::new(10, 10);
        let event = NotificationEvent::disaster_at(
            NotificationKind::Earthquake,
            "Earthquake!",
            &grid,
            3,
            3,
        );
        assert_eq!(event.grid_offset, Some(33));
        assert_eq!(event.location, Some(WorldGrid::grid_to_world(3, 3)));
        assert_eq!(event.text, "Earthquake!");
    }

    #[test]
    fn test_disaster_without_location() {
        let event = quake("somewhere");
        assert_eq!(event.grid_offset, None);
        assert_eq!(event.location, None);
    }

    #[test]
    fn test_push_records_date_and_journal() {
        let mut log = NotificationLog::default();
        log.push(&quake("hello"), date(), 7);
        assert_eq!(log.active.len(), 1);
        assert_eq!(log.journal.len(), 1);
        assert_eq!(log.active[0].date, date());
        assert_eq!(log.active[0].created_tick, 7);
    }

    #[test]
    fn test_messages_persist_until_dismissed() {
        let mut log = NotificationLog::default();
        log.push(&quake("first"), date(), 0);
        log.push(&quake("second"), date(), 0);

        log.sweep();
        assert_eq!(log.active.len(), 2);

        let id = log.active[0].id;
        log.dismiss(id);
        log.sweep();
        assert_eq!(log.active.len(), 1);
        assert_eq!(log.active[0].text, "second");
        assert_eq!(log.journal.len(), 2, "journal keeps dismissed entries");
    }

    #[test]
    fn test_journal_trimming() {
        let mut log = NotificationLog {
            max_journal: 3,
            ..Default::default()
        };
        for i in 0..6 {
            log.push(&quake(&format!("Event {i}")), date(), i);
        }
        assert_eq!(log.journal.len(), 3);
        assert_eq!(log.journal[0].text, "Event 3");
        assert_eq!(log.journal[2].text, "Event 5");
        assert_eq!(log.count_of(NotificationKind::Earthquake), 3);
    }
}
