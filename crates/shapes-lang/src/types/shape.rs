use crate::runtime::scheduler::TaskId;
use crate::surface::{AttrValue, Attribute};

pub const DEFAULT_FILL: &str = "black";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind { Circle, Rect }

impl ShapeKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Circle => "circle",
            Self::Rect   => "rect",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "circle" => Some(Self::Circle),
            "rect"   => Some(Self::Rect),
            _ => None,
        }
    }

    /// Positional attribute names, in the order every positional primitive uses.
    pub fn attribute_names(self) -> &'static [&'static str] {
        match self {
            Self::Circle => &["cx", "cy", "r"],
            Self::Rect   => &["x", "y", "width", "height"],
        }
    }

    pub fn arity(self) -> usize { self.attribute_names().len() }
}

// ─── Geometry ─────────────────────────────────────────────────────────────────

/// Positional fields of a shape. The first two fields of either kind are its
/// stored position; go through `position` / `set_position` rather than
/// relying on that.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Circle { cx: f64, cy: f64, r: f64 },
    Rect   { x: f64, y: f64, width: f64, height: f64 },
}

impl Geometry {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Self::Circle { .. } => ShapeKind::Circle,
            Self::Rect { .. }   => ShapeKind::Rect,
        }
    }

    /// Build from values in attribute order. `None` unless exactly `kind.arity()` values.
    pub fn from_values(kind: ShapeKind, values: &[f64]) -> Option<Self> {
        match (kind, values) {
            (ShapeKind::Circle, &[cx, cy, r]) => Some(Self::Circle { cx, cy, r }),
            (ShapeKind::Rect, &[x, y, width, height]) => Some(Self::Rect { x, y, width, height }),
            _ => None,
        }
    }

    /// Values in attribute order.
    pub fn values(&self) -> Vec<f64> {
        match *self {
            Self::Circle { cx, cy, r } => vec![cx, cy, r],
            Self::Rect { x, y, width, height } => vec![x, y, width, height],
        }
    }

    pub fn position(&self) -> (f64, f64) {
        match *self {
            Self::Circle { cx, cy, .. } => (cx, cy),
            Self::Rect { x, y, .. }     => (x, y),
        }
    }

    pub fn set_position(&mut self, (px, py): (f64, f64)) {
        match self {
            Self::Circle { cx, cy, .. } => { *cx = px; *cy = py; }
            Self::Rect { x, y, .. }     => { *x = px; *y = py; }
        }
    }

    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        let (x, y) = self.position();
        let mut g = self.clone();
        g.set_position((x + dx, y + dy));
        g
    }

    /// Center of the bounding box; the pivot for rotation.
    pub fn center(&self) -> (f64, f64) {
        match *self {
            Self::Circle { cx, cy, .. } => (cx, cy),
            Self::Rect { x, y, width, height } => (x + width / 2.0, y + height / 2.0),
        }
    }

    pub fn attributes(&self) -> Vec<Attribute> {
        self.kind().attribute_names().iter()
            .zip(self.values())
            .map(|(&name, v)| Attribute::new(name, AttrValue::Number(v)))
            .collect()
    }
}

// ─── Shape record ─────────────────────────────────────────────────────────────

/// Graph edges of one shape. At most one parent: the scene graph is a forest.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bindings {
    pub parent: Option<String>,
    pub children: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MotionTasks {
    pub x: Option<TaskId>,
    pub y: Option<TaskId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub geometry: Geometry,
    pub fill: String,
    /// Accumulated rotation in degrees.
    pub rotation: f64,
    pub bindings: Bindings,
    pub rotation_task: Option<TaskId>,
    pub motion_tasks: Option<MotionTasks>,
}

impl Shape {
    pub fn new(geometry: Geometry) -> Self {
        Self {
            geometry,
            fill: DEFAULT_FILL.to_string(),
            rotation: 0.0,
            bindings: Bindings::default(),
            rotation_task: None,
            motion_tasks: None,
        }
    }

    pub fn circle(cx: f64, cy: f64, r: f64) -> Self {
        Self::new(Geometry::Circle { cx, cy, r })
    }

    pub fn rect(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(Geometry::Rect { x, y, width, height })
    }

    pub fn with_fill(mut self, fill: impl Into<String>) -> Self {
        self.fill = fill.into();
        self
    }

    pub fn kind(&self) -> ShapeKind { self.geometry.kind() }

    pub fn position(&self) -> (f64, f64) { self.geometry.position() }

    pub fn set_position(&mut self, p: (f64, f64)) { self.geometry.set_position(p); }

    /// Geometry, fill and rotation from `self`; edges and task handles from
    /// `previous`, which other records and the scheduler still refer to.
    pub fn replacing(mut self, previous: &Shape) -> Self {
        self.bindings = previous.bindings.clone();
        self.rotation_task = previous.rotation_task;
        self.motion_tasks = previous.motion_tasks;
        self
    }

    /// Drop edges and task handles. A value looked up from another record
    /// carries that record's bookkeeping, which a new id must not inherit.
    pub fn detached(mut self) -> Self {
        self.bindings = Bindings::default();
        self.rotation_task = None;
        self.motion_tasks = None;
        self
    }
}
