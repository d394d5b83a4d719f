use cgmath::{EuclideanSpace, InnerSpace};

pub type Point3 = cgmath::Point3<f64>;
pub type Point2 = cgmath::Point2<f64>;
pub type Vector3 = cgmath::Vector3<f64>;

// We rely on the cgmath types being plain repr(C) coordinate tuples.
static_assertions::assert_eq_size!(Point3, [f64; 3]);
static_assertions::assert_eq_size!(Point2, [f64; 2]);
static_assertions::assert_eq_align!(Vector3, f64);

pub const ZERO: Vector3 = Vector3 {
    x: 0.0,
    y: 0.0,
    z: 0.0,
};

/// Returns `v` scaled to unit length, or the zero vector if `v` has no
/// usable direction.
pub fn unitize(v: Vector3) -> Vector3 {
    let len = v.magnitude();
    if len > 0.0 && len.is_finite() {
        v / len
    } else {
        ZERO
    }
}

/// Unit normal of the triangle `p0, p1, p2` following its winding.
pub fn facet_normal(p0: Point3, p1: Point3, p2: Point3) -> Vector3 {
    let u = p1 - p0;
    let v = p2 - p0;
    unitize(u.cross(v))
}

pub fn centroid(p0: Point3, p1: Point3, p2: Point3) -> Point3 {
    Point3::from_vec((p0.to_vec() + p1.to_vec() + p2.to_vec()) / 3.0)
}

/// A plane described by an origin and an orthonormal frame.
///
/// Points are projected into plane-local coordinates: the returned 2-D point
/// is the offset from `origin` measured along `x_axis` and `y_axis`. The
/// component along `normal` is dropped.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Plane {
    pub origin: Point3,
    pub x_axis: Vector3,
    pub y_axis: Vector3,
    pub normal: Vector3,
}

impl Plane {
    /// Builds a plane through `origin` with the given normal.
    ///
    /// Returns `None` if the normal has zero length.
    pub fn from_origin_normal(origin: Point3, normal: Vector3) -> Option<Self> {
        let normal = unitize(normal);
        if normal == ZERO {
            return None;
        }
        let x_axis = unitize(perpendicular(normal));
        let y_axis = normal.cross(x_axis);
        Some(Self {
            origin,
            x_axis,
            y_axis,
            normal,
        })
    }

    pub fn project(&self, p: Point3) -> Point2 {
        let d = p - self.origin;
        Point2 {
            x: d.dot(self.x_axis),
            y: d.dot(self.y_axis),
        }
    }
}

// Any vector perpendicular to `n`. Zeroes the smallest component and swaps the
// other two so the result can never vanish for a non-zero input.
fn perpendicular(n: Vector3) -> Vector3 {
    let (ax, ay, az) = (n.x.abs(), n.y.abs(), n.z.abs());
    if ax <= ay && ax <= az {
        Vector3::new(0.0, -n.z, n.y)
    } else if ay <= az {
        Vector3::new(-n.z, 0.0, n.x)
    } else {
        Vector3::new(-n.y, n.x, 0.0)
    }
}
