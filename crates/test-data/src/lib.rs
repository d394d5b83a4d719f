use patchwork_mesh::{
    CdtResult, Point3, SurfaceMetadata, SurfacePointId, SurfacePoints, Vector3,
};

/// A small triangle soup over points that double as surface points.
pub struct TestModel {
    pub points: &'static [[f64; 3]],
    pub triangles: &'static [[u32; 3]],
}

impl TestModel {
    pub fn surface_points(&self) -> SurfacePoints {
        self.points
            .iter()
            .map(|&[x, y, z]| Point3::new(x, y, z))
            .collect()
    }

    pub fn cdt(&self) -> CdtResult {
        CdtResult::from_surface_triangles(self.triangles)
    }
}

/// A unit square split along its diagonal.
///
/// ```text
///   3 --- 2
///   |   / |
///   |  /  |
///   | /   |
///   0 --- 1
/// ```
pub const TWO_TRIANGLES: TestModel = TestModel {
    points: &[
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [1.0, 1.0, 0.0],
        [0.0, 1.0, 0.0],
    ],
    triangles: &[[0, 1, 2], [0, 2, 3]],
};

/// The four side faces of a square pyramid, without the base. The apex (4)
/// is shared by every face and the base square 0-1-2-3 is the boundary.
pub const OPEN_PYRAMID: TestModel = TestModel {
    points: &[
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [1.0, 1.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.5, 0.5, 1.0],
    ],
    triangles: &[[4, 0, 1], [4, 1, 2], [4, 2, 3], [4, 3, 0]],
};

/// A half-open fan around vertex 0. Every vertex, including the hub, lies on
/// the boundary 0-1-2-3-4-5.
pub const FAN: TestModel = TestModel {
    points: &[
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [0.7, 0.7, 0.0],
        [0.0, 1.0, 0.0],
        [-0.7, 0.7, 0.0],
        [-1.0, 0.0, 0.0],
    ],
    triangles: &[[0, 1, 2], [0, 2, 3], [0, 3, 4], [0, 4, 5]],
};

/// A flat `nx` by `ny` cell grid in the z = 0 plane, two triangles per cell,
/// wound counter-clockwise when seen from +z.
///
/// Point `(i, j)` has id `j * (nx + 1) + i`.
pub fn grid(nx: u32, ny: u32) -> (SurfacePoints, CdtResult) {
    let mut points = SurfacePoints::new();
    for j in 0..=ny {
        for i in 0..=nx {
            points.push(Point3::new(i as f64, j as f64, 0.0));
        }
    }
    let id = |i: u32, j: u32| j * (nx + 1) + i;
    let mut triangles = Vec::new();
    for j in 0..ny {
        for i in 0..nx {
            triangles.push([id(i, j), id(i + 1, j), id(i + 1, j + 1)]);
            triangles.push([id(i, j), id(i + 1, j + 1), id(i, j + 1)]);
        }
    }
    (points, CdtResult::from_surface_triangles(&triangles))
}

/// Surface metadata matching [`grid`]: normals along +z and the outer ring of
/// points marked as surface edge points.
pub fn grid_metadata(nx: u32, ny: u32) -> SurfaceMetadata {
    let mut meta = SurfaceMetadata::default();
    for j in 0..=ny {
        for i in 0..=nx {
            let p = SurfacePointId(j * (nx + 1) + i);
            meta.normals.insert(p, Vector3::new(0.0, 0.0, 1.0));
            if i == 0 || j == 0 || i == nx || j == ny {
                meta.edge_points.insert(p);
            }
        }
    }
    meta
}
