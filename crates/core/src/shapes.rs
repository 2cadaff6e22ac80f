//! Shape loading - turns declarative shape specs into piece definitions
//!
//! A raw shape is an ASCII (or cell) grid plus optional difficulty, frequency,
//! color and rotation rules. Loading trims the grid to its bounding box,
//! precomputes the allowed rotation states, resolves paint (solid or pixel
//! art) and derives bevel shades. Loading happens once; the resulting
//! [`ShapeRegistry`] is read-only afterwards.
//!
//! # Example
//!
//! ```
//! use contortris_core::ShapeRegistry;
//!
//! let json = r##"[
//!     { "id": "t", "grid": [".X.", "XXX"], "color": "#b04cff" },
//!     { "name": "Long Bar", "grid": ["XXXXX"], "difficulty": 2, "frequency": 0.4 }
//! ]"##;
//! let registry = ShapeRegistry::from_json_str(json, 10).unwrap();
//!
//! assert_eq!(registry.len(), 2);
//! assert_eq!(registry.get(0).unwrap().rotations.len(), 4);
//! assert_eq!(registry.get(1).unwrap().id, "long_bar");
//! assert_eq!(registry.get(1).unwrap().rotations.len(), 2);
//! ```

use std::collections::HashSet;

use serde::Deserialize;
use tracing::warn;

use crate::color::{adjust, parse_hex, SHADE_BOTTOM_LEFT, SHADE_TOP_RIGHT};
use crate::error::{ConfigurationError, Result};
use crate::matrix::{Bounds, Grid, Matrix};
use crate::types::Rgb;

/// Largest pixel-art scale factor accepted for color grids.
pub const MAX_PIXEL_SCALE: usize = 7;

/// The bundled shape set.
pub const BUILTIN_SHAPES_JSON: &str = include_str!("../shapes/main_shapes.json");

/// Occupancy grid as written in a shape file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawGrid {
    /// `"X.."`-style rows, right-padded with empty cells
    Rows(Vec<String>),
    /// One string per cell; blanks, `"."` and `null` are empty
    Cells(Vec<Vec<Option<String>>>),
}

impl Default for RawGrid {
    fn default() -> Self {
        RawGrid::Rows(Vec::new())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawColor {
    Solid(String),
    /// Pixel art: `k` times the occupancy grid in both axes
    Grid(Vec<Vec<Option<String>>>),
}

/// Which rotation states a shape may use.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum RotationSpec {
    /// Every geometrically distinct state
    #[default]
    Any,
    /// Base orientation only
    #[serde(rename = "none")]
    Fixed,
    /// Explicit indices into the four clockwise states
    Custom {
        #[serde(default)]
        allowed: Option<Vec<i64>>,
    },
}

impl RotationSpec {
    /// Indices into `all` (the four clockwise states) kept by this mode.
    fn keep(&self, all: &[Matrix]) -> Vec<usize> {
        match self {
            RotationSpec::Fixed => vec![0],
            RotationSpec::Custom { allowed } => {
                let mut keep = Vec::new();
                for idx in allowed.as_deref().unwrap_or(&[0]) {
                    let idx = idx.rem_euclid(4) as usize;
                    if !keep.contains(&idx) {
                        keep.push(idx);
                    }
                }
                if keep.is_empty() {
                    keep.push(0);
                }
                keep
            }
            RotationSpec::Any => {
                let mut keep: Vec<usize> = Vec::new();
                for (idx, m) in all.iter().enumerate() {
                    if !keep.iter().any(|&k| all[k] == *m) {
                        keep.push(idx);
                    }
                }
                keep
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct Glow {
    pub enabled: bool,
    pub strength: f64,
}

impl Default for Glow {
    fn default() -> Self {
        Self {
            enabled: true,
            strength: 0.35,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawStyle {
    pub shade_top_right: Option<String>,
    pub shade_bottom_left: Option<String>,
    pub glow: Option<Glow>,
}

/// One shape as declared in a shape file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawShape {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub grid: RawGrid,
    #[serde(default)]
    pub difficulty: Option<f64>,
    #[serde(default)]
    pub frequency: Option<f64>,
    #[serde(default)]
    pub color: Option<RawColor>,
    #[serde(default)]
    pub rotation: RotationSpec,
    #[serde(default)]
    pub style: RawStyle,
}

impl RawShape {
    pub fn new<S: Into<String>>(id: &str, rows: impl IntoIterator<Item = S>) -> Self {
        Self {
            id: Some(id.to_string()),
            grid: RawGrid::Rows(rows.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn with_difficulty(mut self, difficulty: f64) -> Self {
        self.difficulty = Some(difficulty);
        self
    }

    pub fn with_frequency(mut self, frequency: f64) -> Self {
        self.frequency = Some(frequency);
        self
    }

    pub fn with_color(mut self, hex: &str) -> Self {
        self.color = Some(RawColor::Solid(hex.to_string()));
        self
    }

    pub fn with_rotation(mut self, rotation: RotationSpec) -> Self {
        self.rotation = rotation;
        self
    }
}

/// Bevel colors and glow for drawing blocks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Style {
    pub shade_top_right: Rgb,
    pub shade_bottom_left: Rgb,
    pub glow: Glow,
}

/// How a shape's blocks are colored.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Rgb),
    /// `scale` × `scale` pixels per block, one grid per kept rotation
    Pixels {
        scale: usize,
        rotations: Vec<Grid<Rgb>>,
    },
}

impl Paint {
    /// Pixels per block edge (1 for solid paint).
    pub fn scale(&self) -> usize {
        match self {
            Paint::Solid(_) => 1,
            Paint::Pixels { scale, .. } => *scale,
        }
    }

    /// Color of pixel `(px, py)` inside block `(cell_x, cell_y)` of a rotation.
    pub fn pixel(
        &self,
        rotation: usize,
        cell_x: usize,
        cell_y: usize,
        px: usize,
        py: usize,
    ) -> Option<Rgb> {
        match self {
            Paint::Solid(rgb) => Some(*rgb),
            Paint::Pixels { scale, rotations } => rotations
                .get(rotation)?
                .get(cell_x * scale + px, cell_y * scale + py)
                .copied(),
        }
    }
}

/// A fully loaded, immutable piece definition.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeDefinition {
    pub id: String,
    pub name: String,
    pub difficulty: f64,
    /// Spawn weight in `[0, 1]`; 0 never spawns
    pub frequency: f64,
    pub color: Rgb,
    pub paint: Paint,
    pub style: Style,
    /// Kept rotation states, each trimmed to its bounding box
    pub rotations: Vec<Matrix>,
}

impl ShapeDefinition {
    /// Rotation state `idx`, wrapping around the kept states.
    pub fn rotation(&self, idx: usize) -> &Matrix {
        &self.rotations[idx % self.rotations.len()]
    }

    pub fn max_width(&self) -> usize {
        self.rotations.iter().map(Matrix::width).max().unwrap_or(0)
    }
}

/// Ordered, id-unique collection of loaded shapes.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeRegistry {
    shapes: Vec<ShapeDefinition>,
}

impl ShapeRegistry {
    /// Load raw shapes for a board `cols` wide. Input order is preserved.
    pub fn load(raws: &[RawShape], cols: usize) -> Result<Self> {
        if raws.is_empty() {
            return Err(ConfigurationError::NoShapes);
        }
        let mut seen = HashSet::new();
        let mut shapes = Vec::with_capacity(raws.len());
        for (index, raw) in raws.iter().enumerate() {
            let shape = load_shape(index, raw, cols)?;
            if !seen.insert(shape.id.clone()) {
                return Err(ConfigurationError::DuplicateId(shape.id));
            }
            shapes.push(shape);
        }
        Ok(Self { shapes })
    }

    /// Parse a JSON array of raw shapes and load it.
    pub fn from_json_str(json: &str, cols: usize) -> Result<Self> {
        let raws: Vec<RawShape> = serde_json::from_str(json)?;
        Self::load(&raws, cols)
    }

    /// The bundled shape set.
    pub fn builtin(cols: usize) -> Result<Self> {
        Self::from_json_str(BUILTIN_SHAPES_JSON, cols)
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&ShapeDefinition> {
        self.shapes.get(idx)
    }

    pub fn shapes(&self) -> &[ShapeDefinition] {
        &self.shapes
    }

    pub fn iter(&self) -> impl Iterator<Item = &ShapeDefinition> {
        self.shapes.iter()
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.shapes.iter().position(|s| s.id == id)
    }

    /// Widest rotation across all shapes.
    pub fn max_width(&self) -> usize {
        self.shapes
            .iter()
            .map(ShapeDefinition::max_width)
            .max()
            .unwrap_or(0)
    }
}

/// Lowercase, with every non-alphanumeric replaced by `_`.
pub fn derive_id(name: &str) -> String {
    name.chars()
        .flat_map(char::to_lowercase)
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}

fn load_shape(index: usize, raw: &RawShape, cols: usize) -> Result<ShapeDefinition> {
    let id = match (&raw.id, &raw.name) {
        (Some(id), _) if !id.trim().is_empty() => id.trim().to_string(),
        (_, Some(name)) if !name.trim().is_empty() => derive_id(name.trim()),
        _ => return Err(ConfigurationError::MissingId { index }),
    };

    let full = occupancy(&id, &raw.grid)?;
    let (base, bounds) = full
        .trimmed()
        .ok_or_else(|| ConfigurationError::EmptyGrid(id.clone()))?;

    let all = clockwise_states(&base);
    let keep = raw.rotation.keep(&all);
    let rotations: Vec<Matrix> = keep.iter().map(|&i| all[i].clone()).collect();

    if let Some(width) = rotations.iter().map(Matrix::width).max() {
        if width > cols {
            return Err(ConfigurationError::TooWide { id, width, cols });
        }
    }

    let color_grid = match (&raw.color, &raw.grid) {
        (Some(RawColor::Grid(cells)), _) => Some(cells),
        (None, RawGrid::Cells(cells)) => Some(cells),
        _ => None,
    };

    let color = match (&raw.color, color_grid) {
        (Some(RawColor::Solid(hex)), _) => parse_hex(hex).unwrap_or_else(|| {
            warn!(shape = %id, color = %hex, "invalid color, using white");
            Rgb::WHITE
        }),
        (_, Some(cells)) => first_valid_color(cells).unwrap_or(Rgb::WHITE),
        _ => Rgb::WHITE,
    };

    let paint = match color_grid {
        Some(cells) if first_valid_color(cells).is_some() => {
            pixel_paint(&id, cells, color, &full, &base, bounds, &keep)
        }
        _ => Paint::Solid(color),
    };

    let style = Style {
        shade_top_right: style_override(&id, raw.style.shade_top_right.as_deref())
            .unwrap_or_else(|| adjust(color, SHADE_TOP_RIGHT)),
        shade_bottom_left: style_override(&id, raw.style.shade_bottom_left.as_deref())
            .unwrap_or_else(|| adjust(color, SHADE_BOTTOM_LEFT)),
        glow: raw.style.glow.unwrap_or_default(),
    };

    let frequency = match raw.frequency {
        Some(f) if f.is_finite() => f.clamp(0.0, 1.0),
        _ => 1.0,
    };
    let difficulty = match raw.difficulty {
        Some(d) if d.is_finite() => d.max(0.0),
        _ => 1.0,
    };

    Ok(ShapeDefinition {
        name: raw.name.clone().unwrap_or_else(|| id.clone()),
        id,
        difficulty,
        frequency,
        color,
        paint,
        style,
        rotations,
    })
}

fn occupancy(id: &str, grid: &RawGrid) -> Result<Matrix> {
    match grid {
        RawGrid::Rows(rows) if rows.is_empty() => Err(ConfigurationError::EmptyGrid(id.to_string())),
        RawGrid::Rows(rows) => Ok(Matrix::from_ascii(rows)),
        RawGrid::Cells(cells) if cells.is_empty() => {
            Err(ConfigurationError::EmptyGrid(id.to_string()))
        }
        RawGrid::Cells(cells) => {
            let rows: Vec<Vec<bool>> = cells
                .iter()
                .map(|row| row.iter().map(|c| is_filled_cell(c.as_deref())).collect())
                .collect();
            Matrix::from_rows(rows).ok_or_else(|| ConfigurationError::MalformedGrid {
                id: id.to_string(),
                reason: "cell rows have different lengths".to_string(),
            })
        }
    }
}

fn is_filled_cell(cell: Option<&str>) -> bool {
    matches!(cell.map(str::trim), Some(s) if !s.is_empty() && s != ".")
}

/// The four clockwise states of `base`, each re-trimmed.
fn clockwise_states(base: &Matrix) -> Vec<Matrix> {
    let mut states = Vec::with_capacity(4);
    let mut current = base.clone();
    for _ in 0..4 {
        let trimmed = current.trimmed().map_or_else(|| current.clone(), |(m, _)| m);
        let next = current.rotate_cw();
        states.push(trimmed);
        current = next;
    }
    states
}

fn first_valid_color(cells: &[Vec<Option<String>>]) -> Option<Rgb> {
    cells
        .iter()
        .flatten()
        .filter_map(|c| c.as_deref())
        .find_map(parse_hex)
}

fn style_override(id: &str, hex: Option<&str>) -> Option<Rgb> {
    let hex = hex?;
    let rgb = parse_hex(hex);
    if rgb.is_none() {
        warn!(shape = %id, color = %hex, "invalid shade override, deriving from base color");
    }
    rgb
}

/// Resolve a color grid into per-rotation pixel grids, or fall back to solid paint.
///
/// The grid may be scaled against either the trimmed occupancy or the grid as
/// written (padding included); the latter is cropped to the bounding box.
fn pixel_paint(
    id: &str,
    cells: &[Vec<Option<String>>],
    base_color: Rgb,
    full: &Matrix,
    base: &Matrix,
    bounds: Bounds,
    keep: &[usize],
) -> Paint {
    let Some(grid) = Grid::from_rows(cells.to_vec()) else {
        warn!(shape = %id, "color grid rows have different lengths, using solid color");
        return Paint::Solid(base_color);
    };

    let (cw, ch) = (grid.width(), grid.height());
    let fitted = (1..=MAX_PIXEL_SCALE).find_map(|k| {
        if cw == k * base.width() && ch == k * base.height() {
            Some((k, grid.clone()))
        } else if cw == k * full.width() && ch == k * full.height() {
            grid.crop(k * bounds.left, k * bounds.top, k * bounds.width, k * bounds.height)
                .map(|g| (k, g))
        } else {
            None
        }
    });

    let Some((scale, fitted)) = fitted else {
        warn!(
            shape = %id,
            color_w = cw,
            color_h = ch,
            grid_w = base.width(),
            grid_h = base.height(),
            "color grid is not an integer multiple of the shape, using solid color"
        );
        return Paint::Solid(base_color);
    };

    let resolved: Vec<Vec<Rgb>> = fitted
        .rows()
        .map(|row| {
            row.iter()
                .map(|c| c.as_deref().and_then(parse_hex).unwrap_or(base_color))
                .collect()
        })
        .collect();
    let Some(mut current) = Grid::from_rows(resolved) else {
        return Paint::Solid(base_color);
    };

    let mut all = Vec::with_capacity(4);
    for _ in 0..4 {
        let next = current.rotate_cw();
        all.push(current);
        current = next;
    }
    Paint::Pixels {
        scale,
        rotations: keep.iter().map(|&i| all[i].clone()).collect(),
    }
}
