use ocrgrab_types::{Point, PointerButton, PointerEvent, PointerKind, ScreenRect};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorState {
    Idle,
    Dragging { start: Point, current: Point },
}

/// Result of feeding one pointer event into a session
#[derive(Debug)]
pub enum Step {
    /// Session still open; carries the rectangle to outline, if any
    Continue(SelectionSession, Option<ScreenRect>),
    /// Session closed. `None` means nothing was selected.
    Finished(Option<ScreenRect>),
}

/// One drag gesture over the screen.
///
/// A session is consumed by the release that completes it, so a finished
/// session cannot receive further events; the caller starts a new one.
#[derive(Debug)]
pub struct SelectionSession {
    bounds: ScreenRect,
    state: SelectorState,
}

impl SelectionSession {
    pub fn start(bounds: ScreenRect) -> Self {
        tracing::debug!("selection session started over {}", bounds);
        Self {
            bounds,
            state: SelectorState::Idle,
        }
    }

    pub fn bounds(&self) -> ScreenRect {
        self.bounds
    }

    pub fn state(&self) -> SelectorState {
        self.state
    }

    /// In-progress rectangle, clipped to the session bounds
    pub fn current_rect(&self) -> Option<ScreenRect> {
        match self.state {
            SelectorState::Idle => None,
            SelectorState::Dragging { start, current } => self.clip(start, current),
        }
    }

    pub fn handle(self, event: PointerEvent) -> Step {
        if event.kind == PointerKind::Cancel {
            tracing::debug!("selection cancelled");
            return Step::Finished(None);
        }

        if event.button != PointerButton::Left {
            let rect = self.current_rect();
            return Step::Continue(self, rect);
        }

        let point = event.position();
        match (self.state, event.kind) {
            (SelectorState::Idle, PointerKind::Press) => {
                let next = Self {
                    state: SelectorState::Dragging {
                        start: point,
                        current: point,
                    },
                    ..self
                };
                Step::Continue(next, None)
            }
            (SelectorState::Dragging { start, .. }, PointerKind::Move) => {
                let next = Self {
                    state: SelectorState::Dragging {
                        start,
                        current: point,
                    },
                    ..self
                };
                let rect = next.current_rect();
                Step::Continue(next, rect)
            }
            (SelectorState::Dragging { start, .. }, PointerKind::Release) => {
                let selected = self.clip(start, point);
                tracing::debug!("selection finished: {:?}", selected);
                Step::Finished(selected)
            }
            // A second press restarts the drag from the new point
            (SelectorState::Dragging { .. }, PointerKind::Press) => {
                let next = Self {
                    state: SelectorState::Dragging {
                        start: point,
                        current: point,
                    },
                    ..self
                };
                Step::Continue(next, None)
            }
            (SelectorState::Idle, _) => Step::Continue(self, None),
            (_, PointerKind::Cancel) => Step::Finished(None),
        }
    }

    fn clip(&self, start: Point, end: Point) -> Option<ScreenRect> {
        let rect = ScreenRect::from_corners(start, end);
        if rect.is_empty() {
            return None;
        }
        self.bounds.intersect(&rect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCREEN: ScreenRect = ScreenRect {
        x: 0,
        y: 0,
        width: 1920,
        height: 1080,
    };

    fn drag(events: &[PointerEvent]) -> Option<ScreenRect> {
        let mut session = SelectionSession::start(SCREEN);
        for event in events {
            match session.handle(*event) {
                Step::Continue(next, _) => session = next,
                Step::Finished(rect) => return rect,
            }
        }
        panic!("session never finished");
    }

    #[test]
    fn forward_and_reverse_drag_match() {
        let forward = drag(&[
            PointerEvent::press(10, 10),
            PointerEvent::moved(50, 30),
            PointerEvent::release(110, 60),
        ]);
        let reverse = drag(&[
            PointerEvent::press(110, 60),
            PointerEvent::moved(70, 20),
            PointerEvent::release(10, 10),
        ]);

        assert_eq!(forward, Some(ScreenRect::new(10, 10, 100, 50)));
        assert_eq!(forward, reverse);
    }

    #[test]
    fn every_direction_normalizes() {
        let corners = [(0, 0), (300, 0), (0, 200), (300, 200)];
        for &(sx, sy) in &corners {
            for &(ex, ey) in &corners {
                let rect = drag(&[PointerEvent::press(sx + 100, sy + 100), PointerEvent::release(ex + 100, ey + 100)]);
                if sx == ex || sy == ey {
                    assert_eq!(rect, None);
                } else {
                    assert_eq!(rect, Some(ScreenRect::new(100, 100, 300, 200)));
                }
            }
        }
    }

    #[test]
    fn click_without_drag_selects_nothing() {
        assert_eq!(
            drag(&[PointerEvent::press(40, 40), PointerEvent::release(40, 40)]),
            None
        );
    }

    #[test]
    fn moves_report_in_progress_rect() {
        let session = SelectionSession::start(SCREEN);
        let Step::Continue(session, None) = session.handle(PointerEvent::press(100, 100)) else {
            panic!("press should keep the session open");
        };

        match session.handle(PointerEvent::moved(40, 70)) {
            Step::Continue(session, Some(rect)) => {
                assert_eq!(rect, ScreenRect::new(40, 70, 60, 30));
                assert!(matches!(session.state(), SelectorState::Dragging { .. }));
            }
            other => panic!("unexpected step: {other:?}"),
        }
    }

    #[test]
    fn idle_release_and_move_are_ignored() {
        let session = SelectionSession::start(SCREEN);
        let Step::Continue(session, None) = session.handle(PointerEvent::moved(5, 5)) else {
            panic!("move while idle should be ignored");
        };
        let Step::Continue(session, None) = session.handle(PointerEvent::release(5, 5)) else {
            panic!("release while idle should be ignored");
        };
        assert_eq!(session.state(), SelectorState::Idle);
    }

    #[test]
    fn right_button_does_not_start_drag() {
        let session = SelectionSession::start(SCREEN);
        let mut press = PointerEvent::press(10, 10);
        press.button = PointerButton::Right;

        let Step::Continue(session, _) = session.handle(press) else {
            panic!("right press should not close the session");
        };
        assert_eq!(session.state(), SelectorState::Idle);
    }

    #[test]
    fn cancel_closes_without_selection() {
        assert_eq!(
            drag(&[PointerEvent::press(10, 10), PointerEvent::moved(90, 90), PointerEvent::cancel()]),
            None
        );
    }

    #[test]
    fn selection_is_clipped_to_screen() {
        assert_eq!(
            drag(&[PointerEvent::press(1900, 1000), PointerEvent::release(2100, 1200)]),
            Some(ScreenRect::new(1900, 1000, 20, 80))
        );
    }
}
