//! Connector curve geometry.

use crate::geometry::Rect;

/// Cubic bezier from a parent's right edge to a child's left edge.
///
/// Both control points share the horizontal midpoint, which gives the
/// horizontal S-shape. Their vertical pull is `curve_factor` times the
/// vertical gap: nearly flat for neighbors, more pronounced far apart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnectorCurve {
    pub start: (f32, f32),
    pub control1: (f32, f32),
    pub control2: (f32, f32),
    pub end: (f32, f32),
}

impl ConnectorCurve {
    pub fn between(parent: Rect, child: Rect, curve_factor: f32) -> Self {
        let start = (parent.right(), parent.center_y());
        let end = (child.x, child.center_y());
        Self::from_endpoints(start, end, curve_factor)
    }

    pub fn from_endpoints(start: (f32, f32), end: (f32, f32), curve_factor: f32) -> Self {
        let control_x = (start.0 + end.0) / 2.0;
        let curve_offset = (end.1 - start.1) * curve_factor;
        Self {
            start,
            control1: (control_x, start.1 + curve_offset),
            control2: (control_x, end.1 - curve_offset),
            end,
        }
    }

    /// SVG path data, e.g. `M 100 25 C 150 40, 150 110, 200 125`.
    pub fn to_svg_path(&self) -> String {
        format!(
            "M {} {} C {} {}, {} {}, {} {}",
            self.start.0,
            self.start.1,
            self.control1.0,
            self.control1.1,
            self.control2.0,
            self.control2.1,
            self.end.0,
            self.end.1
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn test_between_uses_edge_midpoints() {
        let parent = Rect::new(0.0, 0.0, 100.0, 50.0);
        let child = Rect::new(200.0, 100.0, 100.0, 50.0);
        let curve = ConnectorCurve::between(parent, child, 0.15);
        assert_eq!(curve.start, (100.0, 25.0));
        assert_eq!(curve.end, (200.0, 125.0));
    }

    #[test]
    fn test_control_points_share_midpoint_x() {
        let curve = ConnectorCurve::from_endpoints((100.0, 25.0), (200.0, 125.0), 0.15);
        assert_eq!(curve.control1.0, 150.0);
        assert_eq!(curve.control2.0, 150.0);
        assert!(approx(curve.control1.1, 40.0));
        assert!(approx(curve.control2.1, 110.0));
    }

    #[test]
    fn test_level_endpoints_give_flat_controls() {
        let curve = ConnectorCurve::from_endpoints((0.0, 40.0), (80.0, 40.0), 0.15);
        assert_eq!(curve.control1.1, 40.0);
        assert_eq!(curve.control2.1, 40.0);
    }

    #[test]
    fn test_upward_child_bends_other_way() {
        let curve = ConnectorCurve::from_endpoints((0.0, 100.0), (100.0, 0.0), 0.15);
        assert!(approx(curve.control1.1, 85.0));
        assert!(approx(curve.control2.1, 15.0));
    }

    #[test]
    fn test_svg_path_format() {
        let curve = ConnectorCurve::from_endpoints((100.0, 20.0), (200.0, 120.0), 0.25);
        assert_eq!(curve.to_svg_path(), "M 100 20 C 150 45, 150 95, 200 120");
    }
}
