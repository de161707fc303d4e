pub type Unit = euclid::UnknownUnit;

pub type Point = euclid::Point2D<f64, Unit>;
pub type Vector = euclid::Vector2D<f64, Unit>;

pub fn point(x: f64, y: f64) -> Point {
    euclid::point2(x, y)
}

pub fn vector(x: f64, y: f64) -> Vector {
    euclid::vec2(x, y)
}

pub fn midpoint(a: Point, b: Point) -> Point {
    a.lerp(b, 0.5)
}

/// `v` rotated a quarter turn clockwise: `(dy, -dx)`.
pub fn perpendicular(v: Vector) -> Vector {
    vector(v.y, -v.x)
}

/// Unit vector along `v`, or `None` for a zero-length vector.
pub fn unit(v: Vector) -> Option<Vector> {
    let len = v.length();
    (len > f64::EPSILON).then(|| v / len)
}
