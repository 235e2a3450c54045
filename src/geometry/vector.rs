//! Small 2D vector helpers over `(f64, f64)` tuples

pub fn sub(a: (f64, f64), b: (f64, f64)) -> (f64, f64) {
    (a.0 - b.0, a.1 - b.1)
}

pub fn add_scaled(a: (f64, f64), dir: (f64, f64), s: f64) -> (f64, f64) {
    (a.0 + dir.0 * s, a.1 + dir.1 * s)
}

pub fn length(v: (f64, f64)) -> f64 {
    v.0.hypot(v.1)
}

pub fn dot(a: (f64, f64), b: (f64, f64)) -> f64 {
    a.0 * b.0 + a.1 * b.1
}

/// z component of the 3D cross product
pub fn cross(a: (f64, f64), b: (f64, f64)) -> f64 {
    a.0 * b.1 - a.1 * b.0
}

/// Unit vector, or `None` for a (near) zero vector
pub fn normalize(v: (f64, f64)) -> Option<(f64, f64)> {
    let len = length(v);
    if len < 1e-9 {
        None
    } else {
        Some((v.0 / len, v.1 / len))
    }
}

pub fn midpoint(a: (f64, f64), b: (f64, f64)) -> (f64, f64) {
    ((a.0 + b.0) / 2.0, (a.1 + b.1) / 2.0)
}
