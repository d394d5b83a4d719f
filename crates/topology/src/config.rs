/// Tunables for defect detection and local repair.
#[derive(Debug, Clone, PartialEq)]
pub struct RepairConfig {
    /// A triangle whose geometric normal has a dot product below this with
    /// the surface normal is considered flipped.
    pub normal_agreement: f64,
    /// Angular deviation from the seed normal allowed in the first growth
    /// round, in degrees.
    pub start_angle_deg: f64,
    /// Increase of the allowed deviation between growth rounds.
    pub angle_step_deg: f64,
    /// Growth stops widening once the allowed deviation reaches this.
    pub max_angle_deg: f64,
    /// A submesh with at least this many triangles is large enough.
    pub min_submesh_triangles: usize,
    /// Dot products this close to 1 are treated as parallel normals.
    pub unit_tolerance: f64,
}

impl Default for RepairConfig {
    fn default() -> Self {
        Self {
            normal_agreement: 0.1,
            start_angle_deg: 10.0,
            angle_step_deg: 5.0,
            max_angle_deg: 45.0,
            min_submesh_triangles: 10,
            unit_tolerance: 1e-12,
        }
    }
}
