use smallvec::SmallVec;

use crate::foundation::color::Color;
use crate::foundation::core::{Point, Transform2D};

/// Polyline point storage. Grid lines and short cracks stay inline.
pub type PointList = SmallVec<[Point; 4]>;

/// Geometry of a drawable. Only `Group` may have children.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Shape {
    Group,
    /// Circle centered on the drawable origin; `size` is the diameter.
    Circle {
        size: f64,
    },
    Polyline {
        points: PointList,
        closed: bool,
    },
    Text(TextStyle),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    pub text: String,
    pub font_family: String,
    pub font_size: f64,
    pub align: TextAlign,
}

/// Animatable scalar properties of a drawable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub enum PropertyKey {
    X,
    Y,
    Opacity,
    /// Circle diameter. Absent on other shapes.
    Size,
    /// Uniform scale; reads the x component, writes both.
    Scale,
    Rotation,
    LineWidth,
}

/// A renderable primitive with resolved local properties.
///
/// The renderer reads these after every tick; behaviors mutate them through
/// [`crate::SceneGraph::write`].
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Drawable {
    pub shape: Shape,
    pub transform: Transform2D,
    pub opacity: f64,
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
    pub line_width: f64,
}

impl Drawable {
    fn with_shape(shape: Shape) -> Self {
        Self {
            shape,
            transform: Transform2D::default(),
            opacity: 1.0,
            fill: None,
            stroke: None,
            line_width: 0.0,
        }
    }

    pub fn group() -> Self {
        Self::with_shape(Shape::Group)
    }

    pub fn circle(size: f64) -> Self {
        Self::with_shape(Shape::Circle { size })
    }

    pub fn polyline(points: impl IntoIterator<Item = Point>, closed: bool) -> Self {
        Self::with_shape(Shape::Polyline {
            points: points.into_iter().collect(),
            closed,
        })
    }

    pub fn text(style: TextStyle) -> Self {
        Self::with_shape(Shape::Text(style))
    }

    pub fn at(mut self, position: Point) -> Self {
        self.transform.translate = position.to_vec2();
        self
    }

    pub fn with_fill(mut self, color: Color) -> Self {
        self.fill = Some(color);
        self
    }

    pub fn with_stroke(mut self, color: Color, width: f64) -> Self {
        self.stroke = Some(color);
        self.line_width = width;
        self
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.transform.scale = kurbo::Vec2::new(scale, scale);
        self
    }

    pub fn is_group(&self) -> bool {
        matches!(self.shape, Shape::Group)
    }

    pub fn position(&self) -> Point {
        self.transform.position()
    }

    /// Polyline points, if this is a polyline.
    pub fn points(&self) -> Option<&[Point]> {
        match &self.shape {
            Shape::Polyline { points, .. } => Some(points.as_slice()),
            _ => None,
        }
    }

    /// Replace polyline points in place; `false` on other shapes.
    pub fn set_points(&mut self, new_points: impl IntoIterator<Item = Point>) -> bool {
        match &mut self.shape {
            Shape::Polyline { points, .. } => {
                points.clear();
                points.extend(new_points);
                true
            }
            _ => false,
        }
    }

    pub fn get(&self, key: PropertyKey) -> Option<f64> {
        let t = &self.transform;
        match key {
            PropertyKey::X => Some(t.translate.x),
            PropertyKey::Y => Some(t.translate.y),
            PropertyKey::Opacity => Some(self.opacity),
            PropertyKey::Size => match self.shape {
                Shape::Circle { size } => Some(size),
                _ => None,
            },
            PropertyKey::Scale => Some(t.scale.x),
            PropertyKey::Rotation => Some(t.rotation_rad),
            PropertyKey::LineWidth => Some(self.line_width),
        }
    }

    /// Write a property; returns `false` when the shape has no such property.
    pub fn set(&mut self, key: PropertyKey, v: f64) -> bool {
        let t = &mut self.transform;
        match key {
            PropertyKey::X => t.translate.x = v,
            PropertyKey::Y => t.translate.y = v,
            PropertyKey::Opacity => self.opacity = v,
            PropertyKey::Size => match &mut self.shape {
                Shape::Circle { size } => *size = v,
                _ => return false,
            },
            PropertyKey::Scale => t.scale = kurbo::Vec2::new(v, v),
            PropertyKey::Rotation => t.rotation_rad = v,
            PropertyKey::LineWidth => self.line_width = v,
        }
        true
    }
}
