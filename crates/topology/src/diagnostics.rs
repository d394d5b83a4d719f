use std::io;

use cgmath::{EuclideanSpace, InnerSpace, MetricSpace};
use patchwork_mesh::{centroid, Point3, Triangle, VertexId};
use patchwork_plot::{palette_color, PlotSink, Rgb, BLUE, CYAN, DARK_GREEN, GREEN, RED};

use crate::mesh::{Mesh, MeshMode};

impl<'s> Mesh<'s> {
    fn plot_corners(&self, t: Triangle) -> Option<[Point3; 3]> {
        Some([
            self.position(t.v[0])?,
            self.position(t.v[1])?,
            self.position(t.v[2])?,
        ])
    }

    /// Boundary edges in one colour, problem edges in red.
    pub fn plot_boundary_edges<S: PlotSink>(&mut self, filter: bool, sink: &mut S) -> io::Result<()> {
        let edges = self.boundary_edges(filter);
        sink.color(palette_color(0))?;
        for e in &edges {
            let [a, b] = e.endpoints();
            if let (Some(a), Some(b)) = (self.position(a), self.position(b)) {
                sink.segment(a, b)?;
            }
        }

        if self.problem_edges.is_empty() {
            return Ok(());
        }
        sink.color(RED)?;
        for e in &self.problem_edges {
            let [a, b] = e.endpoints();
            if let (Some(a), Some(b)) = (self.position(a), self.position(b)) {
                sink.segment(a, b)?;
            }
        }
        Ok(())
    }

    /// Each boundary loop as a closed polyline in its own colour.
    pub fn plot_boundary_loops<S: PlotSink>(&mut self, filter: bool, sink: &mut S) -> io::Result<()> {
        for (i, l) in self.boundary_loops(filter).iter().enumerate() {
            let points: Vec<Point3> = l.iter().filter_map(|&v| self.position(v)).collect();
            sink.color(palette_color(i))?;
            sink.polyline(&points)?;
        }
        Ok(())
    }

    /// Outline of `t`, optionally filled, with its geometric normal in cyan
    /// and the surface normal at half length in dark green.
    ///
    /// The fill is drawn as spokes from the centroid to the corners and edge
    /// midpoints. Rays are scaled by the mean edge length. Planar meshes draw
    /// no rays, since their normals live in the parent's 3-D frame.
    pub fn plot_triangle<S: PlotSink>(
        &self,
        t: Triangle,
        outline: Rgb,
        fill: Option<Rgb>,
        sink: &mut S,
    ) -> io::Result<()> {
        let Some([a, b, c]) = self.plot_corners(t) else {
            return Ok(());
        };
        sink.color(outline)?;
        sink.polyline(&[a, b, c, a])?;

        let center = centroid(a, b, c);
        if let Some(fill) = fill {
            sink.color(fill)?;
            for p in [a, a.midpoint(b), b, b.midpoint(c), c, c.midpoint(a)] {
                sink.segment(center, p)?;
            }
        }
        if self.mode == MeshMode::TwoD {
            return Ok(());
        }

        let scale = (a.distance(b) + b.distance(c) + c.distance(a)) / 3.0;
        let normal = self.triangle_normal(t);
        if normal.magnitude2() > 0.0 {
            sink.color(CYAN)?;
            sink.segment(center, center + normal * scale)?;
        }
        let surface = self.surface_normal(t);
        if surface.magnitude2() > 0.0 {
            sink.color(DARK_GREEN)?;
            sink.segment(center, center + surface * (scale / 2.0))?;
        }
        Ok(())
    }

    /// `t` in red and the triangles sharing an edge with it in blue.
    pub fn plot_face_neighbors<S: PlotSink>(&self, t: Triangle, sink: &mut S) -> io::Result<()> {
        self.plot_triangle(t, RED, None, sink)?;
        for n in self.face_neighbors(t) {
            self.plot_triangle(n, BLUE, None, sink)?;
        }
        Ok(())
    }

    /// The triangles around `v` in blue, then `v` itself in green.
    pub fn plot_vertex_face_neighbors<S: PlotSink>(&self, v: VertexId, sink: &mut S) -> io::Result<()> {
        for t in self.vertex_face_neighbors(v) {
            self.plot_triangle(t, BLUE, None, sink)?;
        }
        if let Some(p) = self.position(v) {
            sink.color(GREEN)?;
            sink.point(p)?;
        }
        Ok(())
    }

    pub fn plot_interior_incorrect_normals<S: PlotSink>(
        &mut self,
        filter: bool,
        sink: &mut S,
    ) -> io::Result<()> {
        for t in self.interior_incorrect_normals(filter) {
            self.plot_triangle(t, GREEN, Some(GREEN), sink)?;
        }
        Ok(())
    }

    /// Outlines of `triangles`, cycling through the palette.
    pub fn plot_triangles<S, I>(&self, triangles: I, sink: &mut S) -> io::Result<()>
    where
        S: PlotSink,
        I: IntoIterator<Item = Triangle>,
    {
        for (i, t) in triangles.into_iter().enumerate() {
            let Some([a, b, c]) = self.plot_corners(t) else {
                continue;
            };
            sink.color(palette_color(i))?;
            sink.polyline(&[a, b, c, a])?;
        }
        Ok(())
    }

    pub fn plot_all_triangles<S: PlotSink>(&self, sink: &mut S) -> io::Result<()> {
        self.plot_triangles(self.triangles.iter().copied(), sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_eq::assert_float_eq;
    use patchwork_mesh::{SurfaceMetadata, SurfacePointId};
    use patchwork_plot::PlotCommand;
    use patchwork_test_data::{OPEN_PYRAMID, TWO_TRIANGLES};

    fn segments(commands: &[PlotCommand]) -> usize {
        commands
            .iter()
            .filter(|c| matches!(c, PlotCommand::Line(_)))
            .count()
    }

    #[test]
    fn boundary_edges_without_problems() {
        let points = TWO_TRIANGLES.surface_points();
        let mut mesh = Mesh::new(&points);
        mesh.build_3d(&TWO_TRIANGLES.cdt());

        let mut plot = Vec::new();
        mesh.plot_boundary_edges(false, &mut plot).unwrap();
        assert_eq!(PlotCommand::Color(palette_color(0)), plot[0]);
        assert_eq!(4, segments(&plot));
        assert!(!plot.contains(&PlotCommand::Color(RED)));
    }

    #[test]
    fn problem_edges_are_red() {
        let points = TWO_TRIANGLES.surface_points();
        let mut meta = SurfaceMetadata::default();
        for i in [0, 1, 2] {
            meta.edge_points.insert(SurfacePointId(i));
        }
        let mut mesh = Mesh::new(&points);
        mesh.set_surface_metadata(&meta);
        mesh.build_3d(&TWO_TRIANGLES.cdt());

        let mut plot = Vec::new();
        mesh.plot_boundary_edges(true, &mut plot).unwrap();
        let red = plot
            .iter()
            .position(|c| *c == PlotCommand::Color(RED))
            .unwrap();
        assert_eq!(2, segments(&plot[..red]));
        assert_eq!(2, segments(&plot[red..]));
    }

    #[test]
    fn loops_are_closed_polylines() {
        let points = OPEN_PYRAMID.surface_points();
        let mut mesh = Mesh::new(&points);
        mesh.build_3d(&OPEN_PYRAMID.cdt());

        let mut plot = Vec::new();
        mesh.plot_boundary_loops(false, &mut plot).unwrap();
        assert_eq!(6, plot.len());
        assert_eq!(PlotCommand::Move(Point3::new(0.0, 0.0, 0.0)), plot[1]);
        assert_eq!(PlotCommand::Line(Point3::new(0.0, 0.0, 0.0)), plot[5]);
    }

    #[test]
    fn triangle_with_fill_and_normals() {
        let points = TWO_TRIANGLES.surface_points();
        let mut meta = SurfaceMetadata::default();
        for i in 0..4 {
            meta.normals.insert(SurfacePointId(i), cgmath::Vector3::unit_z());
        }
        let mut mesh = Mesh::new(&points);
        mesh.set_surface_metadata(&meta);
        mesh.build_3d(&TWO_TRIANGLES.cdt());

        let mut plot = Vec::new();
        mesh.plot_triangle(Triangle::new(0, 1, 2), RED, Some(BLUE), &mut plot)
            .unwrap();
        // Outline, six spokes, two rays.
        assert_eq!(3 + 6 + 2, segments(&plot));

        let cyan = plot
            .iter()
            .position(|c| *c == PlotCommand::Color(CYAN))
            .unwrap();
        let PlotCommand::Line(tip) = plot[cyan + 2] else {
            panic!("expected the normal ray, got {:?}", plot[cyan + 2]);
        };
        let scale = (1.0 + 1.0 + 2f64.sqrt()) / 3.0;
        assert_float_eq!(tip.x, 2.0 / 3.0, abs <= 1e-12);
        assert_float_eq!(tip.z, scale, abs <= 1e-12);

        let PlotCommand::Line(tip) = plot[plot.len() - 1] else {
            panic!("expected the surface ray");
        };
        assert_float_eq!(tip.z, scale / 2.0, abs <= 1e-12);
    }

    #[test]
    fn vertex_neighbours_end_on_the_vertex() {
        let points = OPEN_PYRAMID.surface_points();
        let mut mesh = Mesh::new(&points);
        mesh.build_3d(&OPEN_PYRAMID.cdt());

        let mut plot = Vec::new();
        mesh.plot_vertex_face_neighbors(4, &mut plot).unwrap();
        assert_eq!(
            Some(&PlotCommand::Point(Point3::new(0.5, 0.5, 1.0))),
            plot.last()
        );
        assert_eq!(4, plot.iter().filter(|c| **c == PlotCommand::Color(BLUE)).count());

        let mut plot = Vec::new();
        mesh.plot_face_neighbors(Triangle::new(4, 0, 1), &mut plot)
            .unwrap();
        assert_eq!(PlotCommand::Color(RED), plot[0]);
        assert_eq!(2, plot.iter().filter(|c| **c == PlotCommand::Color(BLUE)).count());
    }

    #[test]
    fn planar_mesh_plots_flat() {
        let points = OPEN_PYRAMID.surface_points();
        let mut mesh = Mesh::new(&points);
        mesh.build_3d(&OPEN_PYRAMID.cdt());
        // Without surface normals only the seed is collected.
        let submesh = mesh.remesh(Triangle::new(4, 0, 1)).unwrap();

        let mut plot = Vec::new();
        submesh.mesh.plot_all_triangles(&mut plot).unwrap();
        assert_eq!(5, plot.len());
        for c in plot {
            if let PlotCommand::Move(p) | PlotCommand::Line(p) = c {
                assert_eq!(0.0, p.z);
            }
        }
    }

    #[test]
    fn planar_triangle_has_no_normal_rays() {
        let points = TWO_TRIANGLES.surface_points();
        let mut meta = SurfaceMetadata::default();
        for i in 0..4 {
            meta.normals.insert(SurfacePointId(i), cgmath::Vector3::unit_z());
        }
        let mut mesh = Mesh::new(&points);
        mesh.set_surface_metadata(&meta);
        mesh.build_3d(&TWO_TRIANGLES.cdt());
        let seed = Triangle::new(0, 1, 2);
        let submesh = mesh.remesh(seed).unwrap();

        let mut plot = Vec::new();
        submesh.mesh.plot_triangle(seed, RED, Some(BLUE), &mut plot).unwrap();
        assert_eq!(3 + 6, segments(&plot));
        assert!(!plot.contains(&PlotCommand::Color(CYAN)));
        assert!(!plot.contains(&PlotCommand::Color(DARK_GREEN)));
    }
}
