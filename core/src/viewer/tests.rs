use super::*;

const DWELL: Duration = Duration::from_secs(5);

mod common {
    use super::*;

    pub(super) fn t(secs: u64) -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000 + secs)
    }

    pub(super) fn showing(index: usize) -> ViewerState {
        ViewerState::Showing { index }
    }
}

mod open {
    use super::common::*;
    use super::*;

    #[test]
    fn test_open_shows_index_and_arms_timer() {
        let mut viewer = Viewer::new(DWELL);

        assert_eq!(viewer.open(2, 5, t(0)), showing(2));
        assert!(viewer.is_open());
        assert_eq!(viewer.shown_at(), Some(t(0)));
        assert_eq!(viewer.armed().unwrap().deadline, t(5));
    }

    #[test]
    fn test_open_on_empty_collection_stays_closed() {
        let mut viewer = Viewer::new(DWELL);

        assert_eq!(viewer.open(0, 0, t(0)), ViewerState::Closed);
        assert!(viewer.armed().is_none());
    }

    #[test]
    fn test_open_out_of_range_closes() {
        let mut viewer = Viewer::new(DWELL);

        assert_eq!(viewer.open(5, 5, t(0)), ViewerState::Closed);
        assert!(viewer.armed().is_none());
        assert_eq!(viewer.shown_at(), None);
    }

    #[test]
    fn test_unbounded_dwell_never_fires() {
        let mut viewer = Viewer::new(Duration::from_secs(u64::MAX));

        assert_eq!(viewer.open(0, 2, t(0)), showing(0));
        let deadline = viewer.armed().unwrap().deadline;
        assert!(deadline > t(0));
        assert_eq!(viewer.tick(2, t(1_000_000)), None);
        assert_eq!(viewer.state(), showing(0));
    }

    #[test]
    fn test_reopen_replaces_timer() {
        let mut viewer = Viewer::new(DWELL);
        viewer.open(0, 3, t(0));
        let first = viewer.armed().unwrap().token;

        viewer.open(1, 3, t(2));
        let second = viewer.armed().unwrap();
        assert_ne!(first, second.token);
        assert_eq!(second.deadline, t(7));
    }
}

mod navigation {
    use super::common::*;
    use super::*;

    #[test]
    fn test_prev_walks_back_then_closes() {
        let mut viewer = Viewer::new(DWELL);
        viewer.open(2, 5, t(0));

        assert_eq!(viewer.prev(5, t(1)), showing(1));
        assert_eq!(viewer.prev(5, t(2)), showing(0));
        assert_eq!(viewer.prev(5, t(3)), ViewerState::Closed);
        assert!(viewer.armed().is_none());
    }

    #[test]
    fn test_next_at_last_closes() {
        let mut viewer = Viewer::new(DWELL);
        viewer.open(4, 5, t(0));

        assert_eq!(viewer.next(5, t(1)), ViewerState::Closed);
    }

    #[test]
    fn test_next_advances_and_rearms() {
        let mut viewer = Viewer::new(DWELL);
        viewer.open(0, 3, t(0));
        let before = viewer.armed().unwrap().token;

        assert_eq!(viewer.next(3, t(2)), showing(1));
        let after = viewer.armed().unwrap();
        assert_ne!(before, after.token);
        assert_eq!(after.deadline, t(7));
        assert_eq!(viewer.shown_at(), Some(t(2)));
    }

    #[test]
    fn test_navigation_while_closed_is_noop() {
        let mut viewer = Viewer::new(DWELL);

        assert_eq!(viewer.next(3, t(0)), ViewerState::Closed);
        assert_eq!(viewer.prev(3, t(0)), ViewerState::Closed);
        assert!(viewer.armed().is_none());
    }

    #[test]
    fn test_next_when_collection_shrank_closes() {
        let mut viewer = Viewer::new(DWELL);
        viewer.open(3, 5, t(0));

        assert_eq!(viewer.next(2, t(1)), ViewerState::Closed);
    }

    #[test]
    fn test_navigate_dispatches() {
        let mut viewer = Viewer::new(DWELL);
        viewer.open(1, 3, t(0));

        assert_eq!(viewer.navigate(Navigation::Next, 3, t(1)), showing(2));
        assert_eq!(viewer.navigate(Navigation::Prev, 3, t(2)), showing(1));
    }

    #[test]
    fn test_close_cancels_everything() {
        let mut viewer = Viewer::new(DWELL);
        viewer.open(1, 3, t(0));

        assert_eq!(viewer.close(), ViewerState::Closed);
        assert!(viewer.armed().is_none());
        assert_eq!(viewer.shown_at(), None);
        assert_eq!(viewer.index(), None);
    }
}

mod auto_advance {
    use super::common::*;
    use super::*;

    #[test]
    fn test_tick_before_deadline_does_nothing() {
        let mut viewer = Viewer::new(DWELL);
        viewer.open(0, 3, t(0));

        assert_eq!(viewer.tick(3, t(4)), None);
        assert_eq!(viewer.state(), showing(0));
    }

    #[test]
    fn test_tick_at_deadline_advances() {
        let mut viewer = Viewer::new(DWELL);
        viewer.open(0, 3, t(0));

        assert_eq!(viewer.tick(3, t(5)), Some(showing(1)));
        assert_eq!(viewer.armed().unwrap().deadline, t(10));
    }

    #[test]
    fn test_auto_advance_off_the_end_closes() {
        let mut viewer = Viewer::new(DWELL);
        viewer.open(2, 3, t(0));

        assert_eq!(viewer.tick(3, t(5)), Some(ViewerState::Closed));
        assert_eq!(viewer.tick(3, t(50)), None);
    }

    #[test]
    fn test_fire_with_current_token() {
        let mut viewer = Viewer::new(DWELL);
        viewer.open(0, 2, t(0));
        let token = viewer.armed().unwrap().token;

        assert_eq!(viewer.fire(token, 2, t(5)), Some(showing(1)));
    }

    #[test]
    fn test_superseded_token_is_ignored() {
        let mut viewer = Viewer::new(DWELL);
        viewer.open(0, 3, t(0));
        let stale = viewer.armed().unwrap().token;
        viewer.next(3, t(1));

        assert_eq!(viewer.fire(stale, 3, t(5)), None);
        assert_eq!(viewer.state(), showing(1));
    }

    #[test]
    fn test_token_after_close_is_ignored() {
        let mut viewer = Viewer::new(DWELL);
        viewer.open(0, 3, t(0));
        let token = viewer.armed().unwrap().token;
        viewer.close();

        assert_eq!(viewer.fire(token, 3, t(5)), None);
        assert_eq!(viewer.state(), ViewerState::Closed);
    }

    #[test]
    fn test_token_from_previous_session_is_ignored() {
        let mut viewer = Viewer::new(DWELL);
        viewer.open(0, 3, t(0));
        let old_session = viewer.armed().unwrap().token;
        viewer.close();
        viewer.open(0, 3, t(1));

        assert_eq!(viewer.fire(old_session, 3, t(5)), None);
        assert_eq!(viewer.state(), showing(0));
    }
}

mod reindex {
    use super::common::*;
    use super::*;

    #[test]
    fn test_follows_story_to_new_index_without_rearming() {
        let mut viewer = Viewer::new(DWELL);
        viewer.open(3, 5, t(0));
        let armed = viewer.armed();

        assert_eq!(viewer.reindex(Some(1), 3), showing(1));
        assert_eq!(viewer.armed(), armed);
        assert_eq!(viewer.shown_at(), Some(t(0)));
    }

    #[test]
    fn test_missing_story_closes() {
        let mut viewer = Viewer::new(DWELL);
        viewer.open(1, 5, t(0));

        assert_eq!(viewer.reindex(None, 4), ViewerState::Closed);
        assert!(viewer.armed().is_none());
    }

    #[test]
    fn test_closed_viewer_stays_closed() {
        let mut viewer = Viewer::new(DWELL);
        assert_eq!(viewer.reindex(Some(0), 3), ViewerState::Closed);
    }
}

mod presentation {
    use super::common::*;
    use super::*;

    #[test]
    fn test_affordances() {
        let mut viewer = Viewer::new(DWELL);
        assert_eq!(viewer.affordances(3), None);

        viewer.open(0, 3, t(0));
        assert_eq!(
            viewer.affordances(3),
            Some(Affordances {
                show_prev: false,
                show_next: true
            })
        );

        viewer.next(3, t(1));
        assert_eq!(
            viewer.affordances(3),
            Some(Affordances {
                show_prev: true,
                show_next: true
            })
        );

        viewer.next(3, t(2));
        assert_eq!(
            viewer.affordances(3),
            Some(Affordances {
                show_prev: true,
                show_next: false
            })
        );
    }

    #[test]
    fn test_single_story_hides_both() {
        let mut viewer = Viewer::new(DWELL);
        viewer.open(0, 1, t(0));
        assert_eq!(
            viewer.affordances(1),
            Some(Affordances {
                show_prev: false,
                show_next: false
            })
        );
    }

    #[test]
    fn test_progress() {
        let mut viewer = Viewer::new(DWELL);
        assert_eq!(viewer.progress(t(0)), 0.0);

        viewer.open(0, 2, t(10));
        assert_eq!(viewer.progress(t(10)), 0.0);
        assert!((viewer.progress(t(10) + Duration::from_millis(2500)) - 0.5).abs() < 1e-6);
        assert_eq!(viewer.progress(t(20)), 1.0);
        assert_eq!(viewer.progress(t(5)), 0.0);
    }
}
