//! Face colors: the four symbolic labels and their continuous blends
use std::fmt;

/// One of the four face labels of the tetrahedron
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Red,
    Green,
    Blue,
    Black,
}

impl Color {
    pub const ALL: [Color; 4] = [Color::Red, Color::Green, Color::Blue, Color::Black];

    pub fn rgb(self) -> Rgb {
        match self {
            Color::Red => Rgb::new(1.0, 0.0, 0.0),
            Color::Green => Rgb::new(0.0, 1.0, 0.0),
            Color::Blue => Rgb::new(0.0, 0.0, 1.0),
            Color::Black => Rgb::new(0.0, 0.0, 0.0),
        }
    }

    /// Colors taken on by the three inner children when a face of this
    /// color is subdivided, in child order. Always the other three labels.
    pub fn inner_colors(self) -> [Color; 3] {
        match self {
            Color::Red => [Color::Black, Color::Green, Color::Blue],
            Color::Green => [Color::Black, Color::Blue, Color::Red],
            Color::Blue => [Color::Black, Color::Red, Color::Green],
            Color::Black => [Color::Blue, Color::Green, Color::Red],
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Color::Red => "red",
            Color::Green => "green",
            Color::Blue => "blue",
            Color::Black => "black",
        };
        f.write_str(name)
    }
}

/// A continuous RGB color with components in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Linear interpolation, `amount` 0 gives `self` and 1 gives `other`
    pub fn lerp(self, other: Rgb, amount: f32) -> Rgb {
        Rgb::new(
            self.r + (other.r - self.r) * amount,
            self.g + (other.g - self.g) * amount,
            self.b + (other.b - self.b) * amount,
        )
    }

    pub fn scaled(self, factor: f32) -> Rgb {
        Rgb::new(self.r * factor, self.g * factor, self.b * factor)
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<[f32; 3]> for Rgb {
    fn from([r, g, b]: [f32; 3]) -> Self {
        Self::new(r, g, b)
    }
}

/// What a triangle is painted with
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shade {
    Solid(Color),
    /// Fading from one label to another while a face folds in
    Blend { from: Color, to: Color, amount: f32 },
}

impl Shade {
    pub fn rgb(&self) -> Rgb {
        match *self {
            Shade::Solid(color) => color.rgb(),
            Shade::Blend { from, to, amount } => from.rgb().lerp(to.rgb(), amount),
        }
    }

    /// The label a face carries into the next subdivision.
    ///
    /// A blend is on its way to `to`, which is what it shows once settled.
    pub fn label(&self) -> Color {
        match *self {
            Shade::Solid(color) => color,
            Shade::Blend { to, .. } => to,
        }
    }
}

impl From<Color> for Shade {
    fn from(color: Color) -> Self {
        Shade::Solid(color)
    }
}
