//! The closed set of style properties the movement engine may write.

use std::fmt;
use std::time::Duration;

/// Horizontal inset side, matching a non-`None` direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Visible,
    Hidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerEvents {
    #[default]
    Auto,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Positioning {
    #[default]
    Static,
    Absolute,
}

/// One style write. `None` payloads clear the property.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StyleProperty {
    Position(Positioning),
    /// Inset on `Side`, in pixels
    Inset(Side, Option<f64>),
    /// Vertical offset in pixels
    Top(Option<f64>),
    Opacity(Option<f64>),
    Visibility(Visibility),
    PointerEvents(PointerEvents),
    ZIndex(i32),
    /// `translateX(px)`
    Transform(Option<f64>),
    /// `transform linear <duration>`
    Transition(Option<Duration>),
    /// Overrides only the duration of the current transition
    TransitionDuration(Duration),
}

impl fmt::Display for StyleProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Position(Positioning::Static) => write!(f, "position: static"),
            Self::Position(Positioning::Absolute) => write!(f, "position: absolute"),
            Self::Inset(side, v) => write!(f, "{}: {}", side.name(), px(*v)),
            Self::Top(v) => write!(f, "top: {}", px(*v)),
            Self::Opacity(Some(v)) => write!(f, "opacity: {}", v),
            Self::Opacity(None) => write!(f, "opacity: "),
            Self::Visibility(Visibility::Visible) => write!(f, "visibility: visible"),
            Self::Visibility(Visibility::Hidden) => write!(f, "visibility: hidden"),
            Self::PointerEvents(PointerEvents::Auto) => write!(f, "pointer-events: auto"),
            Self::PointerEvents(PointerEvents::None) => write!(f, "pointer-events: none"),
            Self::ZIndex(z) => write!(f, "z-index: {}", z),
            Self::Transform(Some(x)) => write!(f, "transform: translateX({}px)", x),
            Self::Transform(None) => write!(f, "transform: "),
            Self::Transition(Some(d)) => {
                write!(f, "transition: transform linear {}ms", d.as_millis())
            }
            Self::Transition(None) => write!(f, "transition: "),
            Self::TransitionDuration(d) => write!(f, "transition-duration: {}ms", d.as_millis()),
        }
    }
}

fn px(v: Option<f64>) -> String {
    v.map(|v| format!("{}px", v)).unwrap_or_default()
}

/// Snapshot of every property the engine owns on a node
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeStyle {
    pub position: Positioning,
    pub left: Option<f64>,
    pub right: Option<f64>,
    pub top: Option<f64>,
    pub opacity: Option<f64>,
    pub visibility: Visibility,
    pub pointer_events: PointerEvents,
    pub z_index: i32,
    pub transform: Option<f64>,
    /// Duration of the linear transform transition, `None` when unset
    pub transition: Option<Duration>,
}

impl NodeStyle {
    pub fn apply(&mut self, property: StyleProperty) {
        match property {
            StyleProperty::Position(p) => self.position = p,
            StyleProperty::Inset(Side::Left, v) => self.left = v,
            StyleProperty::Inset(Side::Right, v) => self.right = v,
            StyleProperty::Top(v) => self.top = v,
            StyleProperty::Opacity(v) => self.opacity = v,
            StyleProperty::Visibility(v) => self.visibility = v,
            StyleProperty::PointerEvents(v) => self.pointer_events = v,
            StyleProperty::ZIndex(z) => self.z_index = z,
            StyleProperty::Transform(v) => self.transform = v,
            StyleProperty::Transition(v) => self.transition = v,
            StyleProperty::TransitionDuration(d) => self.transition = Some(d),
        }
    }

    /// Inset on the given side
    pub fn inset(&self, side: Side) -> Option<f64> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    /// Effective transition duration (zero when unset)
    pub fn transition_duration(&self) -> Duration {
        self.transition.unwrap_or(Duration::ZERO)
    }

    pub fn is_visible(&self) -> bool {
        self.visibility == Visibility::Visible
    }
}
