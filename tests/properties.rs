use proptest::prelude::*;
use roi_counter::{CentroidTracker, Position, TrackId, TrackStore, TrackerConfig};

/// Detections as (frame step, x, y); frames are the running sum of steps.
fn detections() -> impl Strategy<Value = Vec<(u64, i32, i32)>> {
    prop::collection::vec((0u64..4, 0i32..200, 0i32..200), 1..60)
}

fn run(
    config: TrackerConfig,
    detections: &[(u64, i32, i32)],
    prune_each_frame: bool,
) -> (TrackStore, Vec<(TrackId, bool)>) {
    let tracker = CentroidTracker::new(config).unwrap();
    let mut store = TrackStore::new();
    let mut updates = Vec::new();
    let mut frame = 0u64;
    for &(step, x, y) in detections {
        if step > 0 && prune_each_frame {
            tracker.prune(&mut store);
        }
        frame += step;
        let update = tracker.update(&mut store, Position::new(x, y), frame);
        updates.push((update.id, update.is_new));
    }
    (store, updates)
}

proptest! {
    #[test]
    fn first_detection_is_id0(dets in detections()) {
        let (_, updates) = run(TrackerConfig::default(), &dets, true);
        prop_assert_eq!(updates[0], (TrackId(0), true));
    }

    #[test]
    fn ids_are_allocated_in_order(dets in detections()) {
        let (store, updates) = run(TrackerConfig::default(), &dets, true);
        let created: Vec<u64> = updates
            .iter()
            .filter(|(_, is_new)| *is_new)
            .map(|(id, _)| id.0)
            .collect();
        let expected: Vec<u64> = (0..created.len() as u64).collect();
        prop_assert_eq!(created, expected);
        prop_assert_eq!(store.len(), updates.iter().filter(|(_, n)| *n).count());
    }

    #[test]
    fn histories_are_non_empty_and_ordered(dets in detections()) {
        let (store, _) = run(TrackerConfig::default(), &dets, true);
        for track in &store {
            let frames: Vec<u64> = track.history().map(|(f, _)| f).collect();
            prop_assert!(!frames.is_empty());
            prop_assert!(frames.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn prune_keeps_most_recent_entries(dets in detections(), window in 1usize..8) {
        let config = TrackerConfig {
            history_window: window,
            ..TrackerConfig::default()
        };
        let (mut store, _) = run(config, &dets, false);
        let before: Vec<Vec<(u64, Position)>> =
            store.iter().map(|t| t.history().collect()).collect();

        store.prune(window);

        for (track, previous) in store.iter().zip(before) {
            let kept: Vec<(u64, Position)> = track.history().collect();
            prop_assert_eq!(kept.len(), window.min(previous.len()));
            prop_assert_eq!(&kept[..], &previous[previous.len() - kept.len()..]);
        }
    }
}
