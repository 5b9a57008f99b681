//! Player records and the identifiers used to address them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable per-session player identifier reported by the game.
pub type PlayerId = u8;

/// Opaque reference to an object inside the observed process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Handle(pub u64);

impl Handle {
    pub const NULL: Handle = Handle(0);

    pub fn is_null(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// World-space coordinates of a player.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Player body colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorId {
    Red,
    Blue,
    Green,
    Pink,
    Orange,
    Yellow,
    Black,
    White,
    Purple,
    Brown,
    Cyan,
    Lime,
    Maroon,
    Rose,
    Banana,
    Gray,
    Tan,
    Sunset,
    Coral,
}

impl ColorId {
    const BY_INDEX: [ColorId; 19] = [
        ColorId::Red,
        ColorId::Blue,
        ColorId::Green,
        ColorId::Pink,
        ColorId::Orange,
        ColorId::Yellow,
        ColorId::Black,
        ColorId::White,
        ColorId::Purple,
        ColorId::Brown,
        ColorId::Cyan,
        ColorId::Lime,
        ColorId::Maroon,
        ColorId::Rose,
        ColorId::Banana,
        ColorId::Gray,
        ColorId::Tan,
        ColorId::Sunset,
        ColorId::Coral,
    ];

    /// Map the game's raw colour index, if it is one we know.
    pub fn from_index(index: u8) -> Option<Self> {
        Self::BY_INDEX.get(usize::from(index)).copied()
    }

    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            ColorId::Red => "Red",
            ColorId::Blue => "Blue",
            ColorId::Green => "Green",
            ColorId::Pink => "Pink",
            ColorId::Orange => "Orange",
            ColorId::Yellow => "Yellow",
            ColorId::Black => "Black",
            ColorId::White => "White",
            ColorId::Purple => "Purple",
            ColorId::Brown => "Brown",
            ColorId::Cyan => "Cyan",
            ColorId::Lime => "Lime",
            ColorId::Maroon => "Maroon",
            ColorId::Rose => "Rose",
            ColorId::Banana => "Banana",
            ColorId::Gray => "Gray",
            ColorId::Tan => "Tan",
            ColorId::Sunset => "Sunset",
            ColorId::Coral => "Coral",
        }
    }
}

impl fmt::Display for ColorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One player as seen in the latest full player read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub id: PlayerId,
    pub color: Option<ColorId>,
    pub position: Position,
    #[serde(default)]
    pub is_local: bool,
}

impl PlayerRecord {
    pub fn new(id: PlayerId, color: Option<ColorId>, position: Position) -> Self {
        Self {
            id,
            color,
            position,
            is_local: false,
        }
    }

    /// Mark this record as the locally controlled player.
    pub fn local(mut self) -> Self {
        self.is_local = true;
        self
    }
}
