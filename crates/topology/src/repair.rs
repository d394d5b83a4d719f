use std::collections::{BTreeSet, VecDeque};

use cgmath::InnerSpace;
use log::{debug, info};
use patchwork_mesh::{Plane, Point2, Triangle, Vector3, VertexId};

use crate::{error::Result, mesh::Mesh};

/// The local neighbourhood of a defect, assembled for re-triangulation.
///
/// `mesh` is a planar mesh: its 2-D points are the parent's 3-D points
/// projected into the plane through the seed, with the same vertex numbering.
/// Its boundary loops give the polygon to triangulate, and `interior_points`
/// are vertices the new triangulation must keep.
pub struct Submesh<'s> {
    pub seed: Triangle,
    pub mesh: Mesh<'s>,
    pub interior_points: BTreeSet<VertexId>,
    /// Allowed deviation from the seed normal in the final growth round.
    pub angle_deg: f64,
    /// Number of growth rounds run.
    pub rounds: usize,
}

impl<'s> Submesh<'s> {
    pub fn triangle_count(&self) -> usize {
        self.mesh.triangle_count()
    }
}

/// Consumer of assembled submeshes.
///
/// This is where a constrained triangulator plugs in. Repair itself never
/// replaces triangles in the parent mesh.
pub trait Retriangulator {
    fn retriangulate(&mut self, submesh: &Submesh<'_>);
}

impl<F> Retriangulator for F
where
    F: FnMut(&Submesh<'_>),
{
    fn retriangulate(&mut self, submesh: &Submesh<'_>) {
        self(submesh)
    }
}

/// Discards every submesh.
pub struct NoRetriangulation;

impl Retriangulator for NoRetriangulation {
    fn retriangulate(&mut self, _submesh: &Submesh<'_>) {}
}

/// Summary of a repair pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RepairReport {
    /// Triangles seeded for repair.
    pub seeds: usize,
    /// Submeshes handed to the retriangulator.
    pub submeshes: usize,
    /// Submeshes that stayed below the minimum size at the angle cap.
    pub undersized: usize,
    /// Triangles collected over all submeshes.
    pub triangles: usize,
}

impl<'s> Mesh<'s> {
    /// Triangles waiting for repair.
    pub fn pending_seeds(&self) -> &BTreeSet<Triangle> {
        &self.seeds
    }

    /// Seeds the repair set with every singular and flipped triangle and
    /// remeshes them one at a time, handing each submesh to `retriangulator`.
    ///
    /// Stops at the first seed whose submesh boundary cannot be walked. That
    /// seed is already gone from [`Mesh::pending_seeds`]; the rest stay.
    pub fn repair_with<R: Retriangulator>(&mut self, retriangulator: &mut R) -> Result<RepairReport> {
        let singular = self.singularity_triangles();
        let flipped = self.try_interior_incorrect_normals(true)?;
        self.seeds.clear();
        self.seeds.extend(singular);
        self.seeds.extend(flipped);

        let mut report = RepairReport {
            seeds: self.seeds.len(),
            ..Default::default()
        };
        while let Some(seed) = self.seeds.first().copied() {
            let submesh = self.remesh(seed)?;
            report.submeshes += 1;
            report.triangles += submesh.triangle_count();
            if submesh.triangle_count() < self.config.min_submesh_triangles {
                report.undersized += 1;
            }
            retriangulator.retriangulate(&submesh);
        }

        info!(
            "repair assembled {} submeshes from {} seeds ({} undersized)",
            report.submeshes, report.seeds, report.undersized
        );
        Ok(report)
    }

    /// [`Mesh::repair_with`] without a retriangulator.
    pub fn repair(&mut self) -> Result<RepairReport> {
        self.repair_with(&mut NoRetriangulation)
    }

    /// Grows a planar submesh around `seed` and removes `seed` from the
    /// pending repair set.
    ///
    /// Growth starts at the configured angle and widens step by step until
    /// the submesh is large enough or the angle cap is reached. Whatever was
    /// collected in the last round is returned, provided its boundary walks
    /// into closed loops; otherwise the boundary error is returned and the
    /// seed is still dropped from the repair set.
    pub fn remesh(&mut self, seed: Triangle) -> Result<Submesh<'s>> {
        let points_2d = self.project_around(seed);
        let mut submesh = Mesh::planar(
            self.surface,
            self.metadata,
            self.config.clone(),
            self.vertices.clone(),
            points_2d,
        );

        let step = self.config.angle_step_deg;
        let mut interior_points = BTreeSet::new();
        let mut angle_deg = self.config.start_angle_deg.min(self.config.max_angle_deg);
        let mut rounds = 0;
        loop {
            submesh.reset();
            self.plant_seed(seed, &mut submesh, &mut interior_points);
            let count = self.collect_neighbor_triangles(seed, angle_deg, &mut submesh);
            rounds += 1;
            debug!(
                "seed {:?}: {} triangles within {} degrees",
                seed.v, count, angle_deg
            );
            if count >= self.config.min_submesh_triangles
                || angle_deg >= self.config.max_angle_deg
                || step <= 0.0
            {
                break;
            }
            angle_deg = (angle_deg + step).min(self.config.max_angle_deg);
        }

        self.seeds.remove(&seed);
        submesh.try_boundary_loops(false)?;
        Ok(Submesh {
            seed,
            mesh: submesh,
            interior_points,
            angle_deg,
            rounds,
        })
    }

    // Projects every vertex into the plane through the seed's centre, facing
    // along its surface normal.
    fn project_around(&self, seed: Triangle) -> Vec<Point2> {
        let origin = self.triangle_center(seed);
        let plane = Plane::from_origin_normal(origin, self.guide_normal(seed))
            .or_else(|| Plane::from_origin_normal(origin, Vector3::unit_z()));
        (0..self.vertices.len() as VertexId)
            .map(|v| match (&plane, self.point_3d(v)) {
                (Some(plane), Some(p)) => plane.project(p),
                _ => Point2::new(0.0, 0.0),
            })
            .collect()
    }

    // A seed on a problem edge cannot go in as a triangle; its vertices that
    // are neither singular nor on the surface edge must survive as interior
    // points instead.
    fn plant_seed(
        &self,
        seed: Triangle,
        submesh: &mut Mesh<'s>,
        interior_points: &mut BTreeSet<VertexId>,
    ) {
        if !self.tri_problem_edges(seed) {
            submesh.add_triangle(seed, false);
            return;
        }
        for v in seed.v {
            if self.is_singular_vertex(v) || self.is_edge_vertex(v) {
                continue;
            }
            interior_points.insert(v);
        }
        debug!(
            "seed {:?} is on a problem edge, {} interior points",
            seed.v,
            interior_points.len()
        );
    }

    /// Breadth-first growth of `submesh` through vertex neighbours, one ring
    /// per level, starting from the seed.
    ///
    /// A candidate whose surface normal deviates from the seed's by more than
    /// `angle_deg` is dropped and not grown through. A candidate without a
    /// surface normal is always dropped. A candidate the submesh
    /// refuses because it would pinch the boundary is forgotten, so that a
    /// later neighbour can offer it again.
    fn collect_neighbor_triangles(
        &self,
        seed: Triangle,
        angle_deg: f64,
        submesh: &mut Mesh<'s>,
    ) -> usize {
        let angle = angle_deg.to_radians();
        let seed_normal = self.guide_normal(seed);

        let mut visited = BTreeSet::from([seed]);
        let mut current = VecDeque::new();
        let mut next = VecDeque::new();
        for t in self.vertex_neighborhood(seed) {
            if visited.insert(t) {
                current.push_back(t);
            }
        }

        while let Some(t) = current.pop_front() {
            let dot = seed_normal.dot(self.surface_normal(t));
            let deviation = if float_eq::float_eq!(dot, 1.0, abs <= self.config.unit_tolerance) {
                0.0
            } else {
                dot.clamp(-1.0, 1.0).acos()
            };

            if deviation > angle {
                debug!("angle rejection ({}, {})", deviation, angle);
            } else if submesh.add_triangle(t, true) {
                for n in self.vertex_neighborhood(t) {
                    if visited.insert(n) {
                        next.push_back(n);
                    }
                }
            } else {
                visited.remove(&t);
            }

            if current.is_empty() {
                std::mem::swap(&mut current, &mut next);
            }
        }

        submesh.triangle_count()
    }
}
