use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppEvent {
    /// Open a selection session; `None` covers the primary screen
    StartSelection(Option<ScreenRect>),
    Pointer(PointerEvent),
    /// Skip selection and capture this region directly
    TriggerOcr(ScreenRect),
    SetMode(OcrMode),
    CopyText,
    Quit,

    /// In-progress rectangle while dragging
    SelectionChanged(ScreenRect),
    SelectionClosed(Option<ScreenRect>),
    ShowText(String),
    OcrStatusUpdate {
        status: String,
        capturing: bool,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Screen-space rectangle with its origin at the top-left corner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScreenRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl ScreenRect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Bounding box of two corner points, independent of drag direction.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: a.x.abs_diff(b.x),
            height: a.y.abs_diff(b.y),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    pub fn right(&self) -> i64 {
        i64::from(self.x) + i64::from(self.width)
    }

    pub fn bottom(&self) -> i64 {
        i64::from(self.y) + i64::from(self.height)
    }

    pub fn contains_rect(&self, other: &ScreenRect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Overlapping part of both rectangles, `None` when they do not overlap.
    pub fn intersect(&self, other: &ScreenRect) -> Option<ScreenRect> {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if right <= i64::from(left) || bottom <= i64::from(top) {
            return None;
        }

        Some(ScreenRect {
            x: left,
            y: top,
            width: (right - i64::from(left)) as u32,
            height: (bottom - i64::from(top)) as u32,
        })
    }
}

impl fmt::Display for ScreenRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}+{}+{}", self.width, self.height, self.x, self.y)
    }
}

/// Selects the preprocessing chain and the engine parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OcrMode {
    #[default]
    Printed,
    Handwriting,
    Kannada,
}

impl OcrMode {
    pub const ALL: [OcrMode; 3] = [OcrMode::Printed, OcrMode::Handwriting, OcrMode::Kannada];

    pub fn as_str(&self) -> &'static str {
        match self {
            OcrMode::Printed => "printed",
            OcrMode::Handwriting => "handwriting",
            OcrMode::Kannada => "kannada",
        }
    }
}

impl fmt::Display for OcrMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseModeError(pub String);

impl fmt::Display for ParseModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown OCR mode '{}', expected printed, handwriting or kannada",
            self.0
        )
    }
}

impl std::error::Error for ParseModeError {}

impl FromStr for OcrMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "printed" | "print" => Ok(OcrMode::Printed),
            "handwriting" | "handwritten" => Ok(OcrMode::Handwriting),
            "kannada" | "kan" => Ok(OcrMode::Kannada),
            other => Err(ParseModeError(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerKind {
    Press,
    Move,
    Release,
    /// Escape key or window loss; aborts the selection
    Cancel,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerButton {
    #[default]
    Left,
    Right,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub kind: PointerKind,
    #[serde(default)]
    pub button: PointerButton,
    pub x: i32,
    pub y: i32,
}

impl PointerEvent {
    pub fn press(x: i32, y: i32) -> Self {
        Self {
            kind: PointerKind::Press,
            button: PointerButton::Left,
            x,
            y,
        }
    }

    pub fn moved(x: i32, y: i32) -> Self {
        Self {
            kind: PointerKind::Move,
            button: PointerButton::Left,
            x,
            y,
        }
    }

    pub fn release(x: i32, y: i32) -> Self {
        Self {
            kind: PointerKind::Release,
            button: PointerButton::Left,
            x,
            y,
        }
    }

    pub fn cancel() -> Self {
        Self {
            kind: PointerKind::Cancel,
            button: PointerButton::Left,
            x: 0,
            y: 0,
        }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}
