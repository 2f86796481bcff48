//! Panning by dragging with a pointer button held.
//!
//! Graph editors usually pan when the canvas is dragged, and the drag runs
//! opposite to the content that comes into view: dragging left reveals what
//! is to the right. [`PanMapping`] owns that sign convention so a plan can
//! stay in viewport-movement terms.

use crate::capture::{Clock, Panner};
use crate::error::{Error, Result};
use crate::interpolation::{generate_steps, Curve};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tilectl::PanStep;
use tracing::debug;

/// Mouse buttons
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    Left,
    Right,
    #[default]
    Middle,
}

impl std::str::FromStr for MouseButton {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "left" => Ok(MouseButton::Left),
            "right" => Ok(MouseButton::Right),
            "middle" => Ok(MouseButton::Middle),
            _ => Err(format!("Unknown button '{}'. Use: left, right, middle", s)),
        }
    }
}

/// Minimal pointer control needed to perform a drag.
pub trait PointerDevice {
    fn button_down(&mut self, button: MouseButton) -> Result<()>;
    fn button_up(&mut self, button: MouseButton) -> Result<()>;
    /// Move the pointer by a relative amount (positive = right / down).
    fn move_by(&mut self, dx: i32, dy: i32) -> Result<()>;
}

/// Maps a viewport pan to the pointer drag that produces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanMapping {
    pub invert_x: bool,
    pub invert_y: bool,
}

impl Default for PanMapping {
    fn default() -> Self {
        Self {
            invert_x: true,
            invert_y: true,
        }
    }
}

impl PanMapping {
    /// Pointer displacement for `step`.
    pub fn drag_vector(&self, step: PanStep) -> Result<(i32, i32)> {
        let apply = |value: i32, invert: bool| {
            if invert {
                value
                    .checked_neg()
                    .ok_or_else(|| Error::PanFailed(format!("drag distance {} overflows", value)))
            } else {
                Ok(value)
            }
        };
        Ok((apply(step.dx, self.invert_x)?, apply(step.dy, self.invert_y)?))
    }
}

/// How a single drag is performed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSettings {
    pub button: MouseButton,
    pub duration: Duration,
    /// Used for the long drag back to column 0.
    pub rewind_duration: Duration,
    pub curve: Curve,
}

impl Default for DragSettings {
    fn default() -> Self {
        Self {
            button: MouseButton::Middle,
            duration: Duration::from_millis(500),
            rewind_duration: Duration::from_millis(1000),
            curve: Curve::Linear,
        }
    }
}

/// [`Panner`] that drags the canvas with a [`PointerDevice`].
pub struct DragPanner<P, C> {
    device: P,
    clock: C,
    mapping: PanMapping,
    settings: DragSettings,
}

impl<P: PointerDevice, C: Clock> DragPanner<P, C> {
    pub fn new(device: P, clock: C, mapping: PanMapping, settings: DragSettings) -> Self {
        Self {
            device,
            clock,
            mapping,
            settings,
        }
    }

    pub fn device(&self) -> &P {
        &self.device
    }

    pub fn into_device(self) -> P {
        self.device
    }

    fn drag(&mut self, dx: i32, dy: i32, duration: Duration) -> Result<()> {
        let steps = generate_steps(dx, dy, duration.as_secs_f64(), self.settings.curve);
        let delay = duration / steps.len() as u32;

        for (step_x, step_y) in steps {
            self.device.move_by(step_x, step_y)?;
            self.clock.sleep(delay);
        }
        Ok(())
    }

    fn pan_over(&mut self, step: PanStep, duration: Duration) -> Result<()> {
        if step.is_zero() {
            return Ok(());
        }
        let (dx, dy) = self.mapping.drag_vector(step)?;
        debug!(dx, dy, button = ?self.settings.button, "dragging viewport");

        self.device.button_down(self.settings.button)?;
        let moved = self.drag(dx, dy, duration);
        // Never leave the button held, even if a move failed.
        let released = self.device.button_up(self.settings.button);
        moved.and(released)
    }
}

impl<P: PointerDevice, C: Clock> Panner for DragPanner<P, C> {
    fn pan(&mut self, step: PanStep) -> Result<()> {
        self.pan_over(step, self.settings.duration)
    }

    fn rewind(&mut self, step: PanStep) -> Result<()> {
        self.pan_over(step, self.settings.rewind_duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[derive(Debug, Clone, PartialEq)]
    enum PointerEvent {
        Down(MouseButton),
        Up(MouseButton),
        Move(i32, i32),
    }

    #[derive(Default)]
    struct RecordingPointer {
        events: Vec<PointerEvent>,
        fail_moves: bool,
    }

    impl PointerDevice for RecordingPointer {
        fn button_down(&mut self, button: MouseButton) -> Result<()> {
            self.events.push(PointerEvent::Down(button));
            Ok(())
        }

        fn button_up(&mut self, button: MouseButton) -> Result<()> {
            self.events.push(PointerEvent::Up(button));
            Ok(())
        }

        fn move_by(&mut self, dx: i32, dy: i32) -> Result<()> {
            if self.fail_moves {
                return Err(Error::PanFailed("pointer unplugged".into()));
            }
            self.events.push(PointerEvent::Move(dx, dy));
            Ok(())
        }
    }

    #[derive(Default)]
    struct CountingClock {
        slept: Cell<Duration>,
    }

    impl Clock for CountingClock {
        fn sleep(&self, duration: Duration) {
            self.slept.set(self.slept.get() + duration);
        }
    }

    fn moved(events: &[PointerEvent]) -> (i32, i32) {
        events.iter().fold((0, 0), |(x, y), e| match e {
            PointerEvent::Move(dx, dy) => (x + dx, y + dy),
            _ => (x, y),
        })
    }

    #[test]
    fn default_mapping_drags_against_content() {
        let mapping = PanMapping::default();
        assert_eq!(mapping.drag_vector(PanStep::new(700, 0)).unwrap(), (-700, 0));
        assert_eq!(mapping.drag_vector(PanStep::new(0, 500)).unwrap(), (0, -500));
    }

    #[test]
    fn mapping_can_follow_content() {
        let mapping = PanMapping {
            invert_x: false,
            invert_y: true,
        };
        assert_eq!(mapping.drag_vector(PanStep::new(-1400, 20)).unwrap(), (-1400, -20));
    }

    #[test]
    fn mapping_rejects_unrepresentable_drag() {
        let mapping = PanMapping::default();
        assert!(mapping.drag_vector(PanStep::new(i32::MIN, 0)).is_err());
    }

    #[test]
    fn drag_holds_button_for_whole_move() {
        let clock = CountingClock::default();
        let mut panner = DragPanner::new(
            RecordingPointer::default(),
            &clock,
            PanMapping::default(),
            DragSettings::default(),
        );
        panner.pan(PanStep::new(700, 0)).expect("pan");

        let events = &panner.device().events;
        assert_eq!(events.first(), Some(&PointerEvent::Down(MouseButton::Middle)));
        assert_eq!(events.last(), Some(&PointerEvent::Up(MouseButton::Middle)));
        assert_eq!(moved(events), (-700, 0));
        assert!(clock.slept.get() <= Duration::from_millis(500));
        assert!(clock.slept.get() >= Duration::from_millis(490));
    }

    #[test]
    fn zero_pan_emits_nothing() {
        let clock = CountingClock::default();
        let mut panner = DragPanner::new(
            RecordingPointer::default(),
            &clock,
            PanMapping::default(),
            DragSettings::default(),
        );
        panner.pan(PanStep::new(0, 0)).expect("pan");
        assert!(panner.device().events.is_empty());
    }

    #[test]
    fn failed_move_still_releases_button() {
        let clock = CountingClock::default();
        let pointer = RecordingPointer {
            fail_moves: true,
            ..Default::default()
        };
        let mut panner =
            DragPanner::new(pointer, &clock, PanMapping::default(), DragSettings::default());
        assert!(panner.pan(PanStep::new(10, 0)).is_err());
        assert_eq!(
            panner.into_device().events,
            vec![
                PointerEvent::Down(MouseButton::Middle),
                PointerEvent::Up(MouseButton::Middle),
            ]
        );
    }

    #[test]
    fn rewind_drags_for_longer() {
        let clock = CountingClock::default();
        let mut panner = DragPanner::new(
            RecordingPointer::default(),
            &clock,
            PanMapping::default(),
            DragSettings::default(),
        );
        panner.rewind(PanStep::new(-1400, 0)).expect("rewind");

        assert_eq!(moved(&panner.device().events), (1400, 0));
        assert!(clock.slept.get() <= Duration::from_millis(1000));
        assert!(clock.slept.get() >= Duration::from_millis(990));
    }

    #[test]
    fn button_parses_config_names() {
        assert_eq!("Middle".parse::<MouseButton>(), Ok(MouseButton::Middle));
        assert!("side".parse::<MouseButton>().is_err());
    }
}
