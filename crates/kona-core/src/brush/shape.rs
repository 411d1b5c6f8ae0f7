//! Outline rasterization for the brush shapes

use ahash::AHashSet;
use bresenham::Bresenham;
use glam::{IVec2, Vec2};
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, SQRT_2};

/// Midpoint circle outline centered on `center`. A non-positive radius
/// degenerates to the center cell alone.
pub(crate) fn circle_outline(center: IVec2, radius: i32) -> AHashSet<IVec2> {
    let mut outline = AHashSet::new();
    if radius <= 0 {
        outline.insert(center);
        return outline;
    }

    let mut x = radius;
    let mut y = 0;
    let mut error = 1 - radius;
    while x >= y {
        for (dx, dy) in [
            (x, y),
            (y, x),
            (-y, x),
            (-x, y),
            (-x, -y),
            (-y, -x),
            (y, -x),
            (x, -y),
        ] {
            outline.insert(center + IVec2::new(dx, dy));
        }
        y += 1;
        if error < 0 {
            error += 2 * y + 1;
        } else {
            x -= 1;
            error += 2 * (y - x) + 1;
        }
    }
    outline
}

/// Square outline: four corners on a circle of half-diagonal length,
/// rotated by `rotation`, joined with Bresenham lines
pub(crate) fn square_outline(center: IVec2, radius: i32, rotation: f32) -> AHashSet<IVec2> {
    let mut outline = AHashSet::new();
    if radius <= 0 {
        outline.insert(center);
        return outline;
    }

    let half_diagonal = radius as f32 * SQRT_2;
    let center_f = Vec2::new(center.x as f32, center.y as f32);
    let corners: Vec<IVec2> = (0..4)
        .map(|k| {
            let angle = rotation + FRAC_PI_4 + k as f32 * FRAC_PI_2;
            let corner = center_f + Vec2::from_angle(angle) * half_diagonal;
            IVec2::new(corner.x.round() as i32, corner.y.round() as i32)
        })
        .collect();

    for k in 0..4 {
        let a = corners[k];
        let b = corners[(k + 1) % 4];
        for (x, y) in Bresenham::new(
            (a.x as isize, a.y as isize),
            (b.x as isize, b.y as isize),
        ) {
            outline.insert(IVec2::new(x as i32, y as i32));
        }
        // Bresenham excludes the endpoint
        outline.insert(b);
    }
    outline
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_radius_zero_collapses_to_center() {
        let center = IVec2::new(5, 7);
        assert_eq!(circle_outline(center, 0).len(), 1);
        assert!(circle_outline(center, 0).contains(&center));
        assert_eq!(square_outline(center, 0, 0.0).len(), 1);
        assert!(square_outline(center, 0, 0.0).contains(&center));
    }

    #[test]
    fn test_radius_one_circle_is_the_four_neighbors() {
        let center = IVec2::ZERO;
        let outline = circle_outline(center, 1);
        assert_eq!(outline.len(), 4);
        for offset in [
            IVec2::new(1, 0),
            IVec2::new(-1, 0),
            IVec2::new(0, 1),
            IVec2::new(0, -1),
        ] {
            assert!(outline.contains(&offset));
        }
    }

    #[test]
    fn test_circle_outline_grows_with_radius() {
        let center = IVec2::ZERO;
        let mut previous = circle_outline(center, 1).len();
        for radius in 2..20 {
            let count = circle_outline(center, radius).len();
            assert!(count > previous, "outline shrank at radius {radius}");
            previous = count;
        }
    }

    #[test]
    fn test_circle_outline_is_symmetric() {
        let outline = circle_outline(IVec2::ZERO, 6);
        for point in &outline {
            assert!(outline.contains(&IVec2::new(-point.x, point.y)));
            assert!(outline.contains(&IVec2::new(point.x, -point.y)));
            assert!(outline.contains(&IVec2::new(point.y, point.x)));
        }
    }

    #[test]
    fn test_axis_aligned_square_has_straight_edges() {
        let radius = 4;
        let outline = square_outline(IVec2::ZERO, radius, 0.0);
        // Every outline cell sits on the boundary of the [-r, r] box
        for point in &outline {
            assert!(
                point.x.abs() == radius || point.y.abs() == radius,
                "{point:?} off the box boundary"
            );
            assert!(point.x.abs() <= radius && point.y.abs() <= radius);
        }
        // And the box boundary is fully covered
        for v in -radius..=radius {
            assert!(outline.contains(&IVec2::new(v, radius)));
            assert!(outline.contains(&IVec2::new(v, -radius)));
            assert!(outline.contains(&IVec2::new(radius, v)));
            assert!(outline.contains(&IVec2::new(-radius, v)));
        }
    }

    #[test]
    fn test_rotated_square_is_closed() {
        // An eighth turn turns the square into a diamond; the outline
        // must stay a connected ring around the center
        let outline = square_outline(IVec2::ZERO, 5, FRAC_PI_4);
        assert!(outline.len() > 8);
        for point in &outline {
            let neighbors = [
                IVec2::new(1, 0),
                IVec2::new(-1, 0),
                IVec2::new(0, 1),
                IVec2::new(0, -1),
                IVec2::new(1, 1),
                IVec2::new(1, -1),
                IVec2::new(-1, 1),
                IVec2::new(-1, -1),
            ];
            let connected = neighbors
                .iter()
                .filter(|offset| outline.contains(&(*point + **offset)))
                .count();
            assert!(connected >= 2, "{point:?} dangling");
        }
    }
}
