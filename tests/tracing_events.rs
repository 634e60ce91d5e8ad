//! Verifies the diagnostic events emitted while building and querying indexes.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use locatum::locator::{GridPointLocator, PointIndex};
use locatum::spatial::Grid;
use locatum::{Interval, IntervalTree, Point2, Rect2};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

/// A recorded event with its level and fields.
#[derive(Debug, Clone)]
struct CapturedEvent {
    level: Level,
    fields: HashMap<String, String>,
}

impl CapturedEvent {
    fn message(&self) -> &str {
        self.fields.get("message").map(String::as_str).unwrap_or("")
    }
}

#[derive(Debug, Clone, Default)]
struct EventStore(Arc<Mutex<Vec<CapturedEvent>>>);

impl EventStore {
    fn find(&self, message: &str) -> Vec<CapturedEvent> {
        self.0
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.message() == message)
            .cloned()
            .collect()
    }
}

struct EventCaptureLayer {
    store: EventStore,
}

struct FieldVisitor(HashMap<String, String>);

impl Visit for FieldVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.0.insert(field.name().to_string(), format!("{:?}", value));
    }
}

impl<S: Subscriber> Layer<S> for EventCaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = FieldVisitor(HashMap::new());
        event.record(&mut visitor);
        self.store.0.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            fields: visitor.0,
        });
    }
}

fn init_test_tracing() -> (EventStore, tracing::subscriber::DefaultGuard) {
    let store = EventStore::default();
    let layer = EventCaptureLayer {
        store: store.clone(),
    };
    let subscriber = tracing_subscriber::registry().with(layer);
    let guard = tracing::subscriber::set_default(subscriber);
    (store, guard)
}

#[test]
fn test_interval_tree_build_event() {
    let (store, _guard) = init_test_tracing();

    let tree = IntervalTree::build(vec![
        Interval::new(-1.0, 2.0, 'A'),
        Interval::new(5.0, 9.0, 'B'),
        Interval::new(3.0, 6.0, 'C'),
    ])
    .unwrap();

    let events = store.find("built interval tree");
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].level, Level::DEBUG);
    assert_eq!(events[0].fields["intervals"], "3");
    assert_eq!(events[0].fields["nodes"], tree.node_count().to_string());
    assert_eq!(events[0].fields["depth"], tree.depth().to_string());
}

#[test]
fn test_invalid_batch_emits_no_build_event() {
    let (store, _guard) = init_test_tracing();

    assert!(IntervalTree::build(vec![Interval::new(2.0, 1.0, 'X')]).is_err());
    assert!(store.find("built interval tree").is_empty());
}

#[test]
fn test_grid_events() {
    let (store, _guard) = init_test_tracing();

    let mut grid: Grid<Point2<f64>, char> =
        Grid::new(&Rect2::new(0.0, 0.0, 10.0, 5.0), 2.0).unwrap();
    let created = store.find("created grid");
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].fields["i_range"], "5");
    assert_eq!(created[0].fields["j_range"], "3");

    grid.add('A', Point2::new(1.0, 1.0)).unwrap();
    grid.remove(&'A', Point2::new(1.0, 1.0)).unwrap();
    assert_eq!(store.find("grid add").len(), 1);
    assert_eq!(store.find("grid remove")[0].level, Level::TRACE);

    // A far corner forces the nearest search to widen
    grid.add('B', Point2::new(10.0, 5.0)).unwrap();
    assert_eq!(grid.nearest(&Point2::new(0.0, 0.0)), Some(&'B'));
    assert!(!store.find("grid nearest: widening search").is_empty());
}

#[test]
fn test_grid_locator_build_event() {
    let (store, _guard) = init_test_tracing();

    let locator = GridPointLocator::new(vec![
        Point2::new(0.0, 0.0),
        Point2::new(1.0, 6.0),
        Point2::new(5.4, 1.4),
    ])
    .unwrap();
    assert_eq!(locator.len(), 3);

    let events = store.find("built grid point locator");
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].fields["points"], "3");
}
