pub const DEFAULT_TRANSITION_SETTLE_MS: u64 = 600;
pub const DEFAULT_SNAP_DEBOUNCE_MS: u64 = 50;
pub const DEFAULT_SNAP_DURATION_MS: u64 = 800;
pub const DEFAULT_WHEEL_GUARD_MS: u64 = 800;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct SnapTimings {
    pub transition_settle_ms: u64,
    pub snap_debounce_ms: u64,
    pub snap_duration_ms: u64,
    pub wheel_guard_ms: u64,
}

impl Default for SnapTimings {
    fn default() -> Self {
        Self {
            transition_settle_ms: DEFAULT_TRANSITION_SETTLE_MS,
            snap_debounce_ms: DEFAULT_SNAP_DEBOUNCE_MS,
            snap_duration_ms: DEFAULT_SNAP_DURATION_MS,
            wheel_guard_ms: DEFAULT_WHEEL_GUARD_MS,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Idle,
    Scrolling,
    Settling,
    Snapping,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Scrolling => "scrolling",
            Self::Settling => "settling",
            Self::Snapping => "snapping",
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SlideDirection {
    Forward,
    Backward,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum WheelDecision {
    Allow,
    Suppress,
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct IndexChange {
    pub from: usize,
    pub to: usize,
    pub direction: SlideDirection,
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct SnapTarget {
    pub section: usize,
    pub scroll_to: f64,
}

pub fn active_index_for(progress: f64, item_count: usize) -> usize {
    if item_count == 0 {
        return 0;
    }

    let card_height = 1.0 / item_count as f64;
    let raw = (progress / card_height).floor();

    if raw < 0.0 {
        return 0;
    }

    (raw as usize).min(item_count - 1)
}

pub struct StackController {
    item_count: usize,
    timings: SnapTimings,
    phase: Phase,
    progress: f64,
    active_index: usize,
    scroll_y: f64,
    container_top: f64,
    viewport_height: f64,
    last_scroll_ms: Option<u64>,
    last_index_change_ms: Option<u64>,
    snap_started_ms: Option<u64>,
}

impl StackController {
    pub fn new(item_count: usize, timings: SnapTimings) -> Self {
        Self {
            item_count,
            timings,
            phase: Phase::Idle,
            progress: 0.0,
            active_index: 0,
            scroll_y: 0.0,
            container_top: 0.0,
            viewport_height: 0.0,
            last_scroll_ms: None,
            last_index_change_ms: None,
            snap_started_ms: None,
        }
    }

    pub fn item_count(&self) -> usize {
        self.item_count
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn active_index(&self) -> usize {
        self.active_index
    }

    pub fn is_snapping(&self) -> bool {
        self.phase == Phase::Snapping
    }

    pub fn container_height(&self) -> f64 {
        self.viewport_height * self.item_count as f64
    }

    pub fn is_transitioning(&self, now_ms: u64) -> bool {
        self.last_index_change_ms
            .is_some_and(|changed| now_ms.saturating_sub(changed) < self.timings.transition_settle_ms)
    }

    pub fn note_scroll(
        &mut self,
        scroll_y: f64,
        container_top: f64,
        viewport_height: f64,
        now_ms: u64,
    ) -> Option<IndexChange> {
        if self.item_count == 0 {
            return None;
        }

        self.scroll_y = scroll_y;
        self.container_top = container_top;
        self.viewport_height = viewport_height;

        let container_height = self.container_height();
        if container_height <= 0.0 {
            self.progress = 0.0;
            return None;
        }

        self.progress = ((scroll_y - container_top) / container_height).clamp(0.0, 1.0);
        self.last_scroll_ms = Some(now_ms);

        // The corrective scroll issued while snapping produces scroll events of
        // its own; those must not re-arm the debounce.
        if self.phase != Phase::Snapping {
            self.phase = Phase::Scrolling;
        }

        let next = active_index_for(self.progress, self.item_count);
        if next == self.active_index {
            return None;
        }

        let change = IndexChange {
            from: self.active_index,
            to: next,
            direction: if next > self.active_index {
                SlideDirection::Forward
            } else {
                SlideDirection::Backward
            },
        };
        self.active_index = next;
        self.last_index_change_ms = Some(now_ms);
        Some(change)
    }

    pub fn wheel_decision(&self, now_ms: u64) -> WheelDecision {
        if self.phase == Phase::Snapping {
            return WheelDecision::Suppress;
        }

        let within_guard = self
            .last_index_change_ms
            .is_some_and(|changed| now_ms.saturating_sub(changed) < self.timings.wheel_guard_ms);

        if self.is_transitioning(now_ms) && within_guard {
            return WheelDecision::Suppress;
        }

        WheelDecision::Allow
    }

    pub fn tick(&mut self, now_ms: u64) -> Option<SnapTarget> {
        if self.item_count == 0 {
            return None;
        }

        match self.phase {
            Phase::Idle => None,
            Phase::Snapping => {
                let elapsed = self
                    .snap_started_ms
                    .map(|started| now_ms.saturating_sub(started))
                    .unwrap_or(u64::MAX);
                if elapsed >= self.timings.snap_duration_ms {
                    self.phase = Phase::Idle;
                    self.snap_started_ms = None;
                }
                None
            }
            Phase::Scrolling => {
                let quiet = self
                    .last_scroll_ms
                    .map(|last| now_ms.saturating_sub(last))
                    .unwrap_or(0);
                if quiet < self.timings.snap_debounce_ms {
                    return None;
                }
                self.phase = Phase::Settling;
                self.settle(now_ms)
            }
            Phase::Settling => self.settle(now_ms),
        }
    }

    fn settle(&mut self, now_ms: u64) -> Option<SnapTarget> {
        if self.viewport_height <= 0.0 {
            self.phase = Phase::Idle;
            return None;
        }

        let section = ((self.scroll_y - self.container_top) / self.viewport_height).round();
        if section < 0.0 || section >= self.item_count as f64 {
            self.phase = Phase::Idle;
            return None;
        }

        let section = section as usize;
        self.phase = Phase::Snapping;
        self.snap_started_ms = Some(now_ms);
        Some(SnapTarget {
            section,
            scroll_to: self.container_top + section as f64 * self.viewport_height,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller(item_count: usize) -> StackController {
        StackController::new(item_count, SnapTimings::default())
    }

    #[test]
    fn active_index_stays_in_bounds_for_any_progress() {
        for item_count in 1..=8 {
            for step in 0..=1000 {
                let progress = step as f64 / 1000.0;
                let index = active_index_for(progress, item_count);
                assert!(index < item_count, "progress {progress} item_count {item_count}");
            }
        }
    }

    #[test]
    fn active_index_is_monotonic_over_a_forward_sweep() {
        let mut ctl = controller(5);
        let mut previous = 0;

        for step in 0..=500 {
            let scroll_y = step as f64 * 10.0;
            ctl.note_scroll(scroll_y, 0.0, 1000.0, step);
            let index = ctl.active_index();
            assert!(index >= previous, "index reversed at scroll_y {scroll_y}");
            assert!(index <= previous + 1, "index skipped at scroll_y {scroll_y}");
            previous = index;
        }

        assert_eq!(previous, 4);
    }

    #[test]
    fn boundary_crossing_matches_floor_of_progress() {
        // 4 items, viewport 1000px, container top 0.
        let mut ctl = controller(4);

        ctl.note_scroll(1999.0, 0.0, 1000.0, 1);
        assert!((ctl.progress() - 0.49975).abs() < 1e-9);
        assert_eq!(ctl.active_index(), 1);

        ctl.note_scroll(2001.0, 0.0, 1000.0, 2);
        assert!((ctl.progress() - 0.50025).abs() < 1e-9);
        assert_eq!(ctl.active_index(), 2);
    }

    #[test]
    fn zero_items_is_inert() {
        let mut ctl = controller(0);
        assert_eq!(ctl.note_scroll(500.0, 0.0, 1000.0, 10), None);
        assert_eq!(ctl.tick(100), None);
        assert_eq!(ctl.phase(), Phase::Idle);
        assert_eq!(ctl.progress(), 0.0);
    }

    #[test]
    fn zero_container_height_reports_zero_progress() {
        let mut ctl = controller(3);
        assert_eq!(ctl.note_scroll(500.0, 0.0, 0.0, 10), None);
        assert_eq!(ctl.progress(), 0.0);
        assert_eq!(ctl.phase(), Phase::Idle);
        assert_eq!(ctl.tick(100), None);
    }

    #[test]
    fn quiet_period_emits_exactly_one_snap() {
        let mut ctl = controller(4);

        for t in [0, 10, 20, 30] {
            ctl.note_scroll(1999.0, 0.0, 1000.0, t);
        }

        // 15ms after the last event: still inside the debounce window.
        assert_eq!(ctl.tick(45), None);
        assert_eq!(ctl.phase(), Phase::Scrolling);

        let snap = ctl.tick(85).expect("quiet period should trigger a snap");
        assert_eq!(snap.section, 2);
        assert_eq!(snap.scroll_to, 2000.0);
        assert_eq!(ctl.phase(), Phase::Snapping);

        // No second snap while the first is in flight.
        assert_eq!(ctl.tick(120), None);
        assert_eq!(ctl.phase(), Phase::Snapping);

        assert_eq!(ctl.tick(85 + DEFAULT_SNAP_DURATION_MS), None);
        assert_eq!(ctl.phase(), Phase::Idle);
    }

    #[test]
    fn snap_honors_container_top_offset() {
        let mut ctl = controller(3);
        ctl.note_scroll(3400.0, 2000.0, 1000.0, 0);

        let snap = ctl.tick(100).expect("snap expected");
        assert_eq!(snap.section, 1);
        assert_eq!(snap.scroll_to, 3000.0);
    }

    #[test]
    fn snap_is_skipped_past_the_container() {
        let mut ctl = controller(3);
        ctl.note_scroll(9000.0, 0.0, 1000.0, 0);

        assert_eq!(ctl.tick(100), None);
        assert_eq!(ctl.phase(), Phase::Idle);
    }

    #[test]
    fn scroll_events_during_snap_do_not_rearm_the_debounce() {
        let mut ctl = controller(4);
        ctl.note_scroll(1400.0, 0.0, 1000.0, 0);
        ctl.tick(60).expect("snap expected");

        // The smooth scroll produces its own events.
        ctl.note_scroll(1200.0, 0.0, 1000.0, 100);
        ctl.note_scroll(1050.0, 0.0, 1000.0, 200);
        assert_eq!(ctl.phase(), Phase::Snapping);
        assert_eq!(ctl.tick(300), None);

        assert_eq!(ctl.tick(60 + DEFAULT_SNAP_DURATION_MS), None);
        assert_eq!(ctl.phase(), Phase::Idle);
    }

    #[test]
    fn index_still_tracks_progress_while_snapping() {
        let mut ctl = controller(4);
        ctl.note_scroll(2600.0, 0.0, 1000.0, 0);
        assert_eq!(ctl.active_index(), 2);
        ctl.tick(60).expect("snap expected");

        let change = ctl.note_scroll(1400.0, 0.0, 1000.0, 100).expect("index change");
        assert_eq!(change.to, 1);
        assert_eq!(change.direction, SlideDirection::Backward);
    }

    #[test]
    fn wheel_is_suppressed_while_snapping() {
        let mut ctl = controller(4);
        ctl.note_scroll(1400.0, 0.0, 1000.0, 0);
        ctl.tick(60).expect("snap expected");

        let index_before = ctl.active_index();
        assert_eq!(ctl.wheel_decision(100), WheelDecision::Suppress);
        assert_eq!(ctl.active_index(), index_before);

        ctl.tick(60 + DEFAULT_SNAP_DURATION_MS);
        assert_eq!(ctl.wheel_decision(2000), WheelDecision::Allow);
    }

    #[test]
    fn wheel_is_guarded_right_after_an_index_change() {
        let mut ctl = controller(4);
        ctl.note_scroll(100.0, 0.0, 1000.0, 0);
        ctl.note_scroll(1100.0, 0.0, 1000.0, 10).expect("index change");

        assert_eq!(ctl.wheel_decision(20), WheelDecision::Suppress);
        // The settle window ends before the guard does; past it the guard no
        // longer applies.
        assert_eq!(ctl.wheel_decision(10 + DEFAULT_TRANSITION_SETTLE_MS), WheelDecision::Allow);
    }

    #[test]
    fn transition_window_matches_the_configured_settle_time() {
        let mut ctl = controller(4);
        ctl.note_scroll(1100.0, 0.0, 1000.0, 50).expect("index change");

        assert!(ctl.is_transitioning(50));
        assert!(ctl.is_transitioning(50 + DEFAULT_TRANSITION_SETTLE_MS - 1));
        assert!(!ctl.is_transitioning(50 + DEFAULT_TRANSITION_SETTLE_MS));
    }

    #[test]
    fn direction_follows_the_index_delta() {
        let mut ctl = controller(5);
        let forward = ctl.note_scroll(2100.0, 0.0, 1000.0, 0).expect("index change");
        assert_eq!(forward.direction, SlideDirection::Forward);
        assert_eq!((forward.from, forward.to), (0, 2));

        let backward = ctl.note_scroll(900.0, 0.0, 1000.0, 10).expect("index change");
        assert_eq!(backward.direction, SlideDirection::Backward);
        assert_eq!((backward.from, backward.to), (2, 0));
    }

    #[test]
    fn custom_timings_drive_the_machine() {
        let timings = SnapTimings {
            transition_settle_ms: 100,
            snap_debounce_ms: 10,
            snap_duration_ms: 50,
            wheel_guard_ms: 100,
        };
        let mut ctl = StackController::new(3, timings);

        ctl.note_scroll(400.0, 0.0, 1000.0, 0);
        assert_eq!(ctl.tick(5), None);
        assert!(ctl.tick(15).is_some());
        ctl.tick(70);
        assert_eq!(ctl.phase(), Phase::Idle);
    }
}
