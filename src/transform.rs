//! Screen ↔ image coordinate mapping.
//!
//! The outer pan/zoom controller pushes an affine matrix mapping image pixels to
//! screen pixels. The inverse is recomputed on every change so both directions
//! always agree.

use cairo::Matrix;

use crate::draw::Point;
use crate::error::EngineError;

/// Affine image→screen mapping plus its inverse.
#[derive(Clone, Copy)]
pub struct ViewTransform {
    matrix: Matrix,
    inverse: Matrix,
}

fn coefficients(m: &Matrix) -> [f64; 6] {
    [m.xx(), m.yx(), m.xy(), m.yy(), m.x0(), m.y0()]
}

impl PartialEq for ViewTransform {
    fn eq(&self, other: &Self) -> bool {
        coefficients(&self.matrix) == coefficients(&other.matrix)
    }
}

impl std::fmt::Debug for ViewTransform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewTransform")
            .field("matrix", &coefficients(&self.matrix))
            .finish()
    }
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            matrix: Matrix::identity(),
            inverse: Matrix::identity(),
        }
    }
}

impl ViewTransform {
    /// Builds a transform, failing if `matrix` cannot be inverted.
    pub fn new(matrix: Matrix) -> Result<Self, EngineError> {
        let mut transform = Self::default();
        transform.set(matrix)?;
        Ok(transform)
    }

    /// Uniform zoom followed by a translation, as produced by pan/zoom controllers.
    pub fn scale_translate(scale: f64, tx: f64, ty: f64) -> Result<Self, EngineError> {
        Self::new(Matrix::new(scale, 0.0, 0.0, scale, tx, ty))
    }

    /// Installs a new mapping.
    ///
    /// Non-invertible or non-finite matrices are rejected and the previous
    /// mapping stays in place.
    pub fn set(&mut self, matrix: Matrix) -> Result<(), EngineError> {
        let finite = coefficients(&matrix).iter().all(|v| v.is_finite());
        if !finite {
            return Err(EngineError::NonInvertibleTransform);
        }

        let inverse = matrix
            .try_invert()
            .map_err(|_| EngineError::NonInvertibleTransform)?;
        self.matrix = matrix;
        self.inverse = inverse;
        Ok(())
    }

    pub fn matrix(&self) -> Matrix {
        self.matrix
    }

    pub fn inverse(&self) -> Matrix {
        self.inverse
    }

    pub fn screen_to_image(&self, screen: Point) -> Point {
        self.inverse.transform_point(screen.x, screen.y).into()
    }

    pub fn image_to_screen(&self, image: Point) -> Point {
        self.matrix.transform_point(image.x, image.y).into()
    }

    /// Effective linear scale along the x axis.
    pub fn scale(&self) -> f64 {
        self.matrix.xx().hypot(self.matrix.yx())
    }

    /// Converts an image-pixel point to [0, 1] coordinates for an image of the given size.
    pub fn normalize(image: Point, width: i32, height: i32) -> Point {
        if width <= 0 || height <= 0 {
            return Point::default();
        }
        Point::new(image.x / width as f64, image.y / height as f64)
    }

    /// Whether a normalized point lies inside the image.
    pub fn is_inside_normalized(normalized: Point) -> bool {
        (0.0..=1.0).contains(&normalized.x) && (0.0..=1.0).contains(&normalized.y)
    }

    /// One-line summary of the transform for debug overlays and logs.
    pub fn describe(&self) -> String {
        format!(
            "scaleX={:.3} scaleY={:.3} translateX={:.1} translateY={:.1}",
            self.matrix.xx(),
            self.matrix.yy(),
            self.matrix.x0(),
            self.matrix.y0()
        )
    }
}

/// Point where the segment `from → to` enters the rectangle `[0, w] × [0, h]`.
///
/// Returns `None` when the segment never touches the rectangle. When `from`
/// is already inside, `from` itself is returned.
pub fn clip_entry(from: Point, to: Point, width: f64, height: f64) -> Option<Point> {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let mut t_enter: f64 = 0.0;
    let mut t_exit: f64 = 1.0;

    for (p, q) in [
        (-dx, from.x),
        (dx, width - from.x),
        (-dy, from.y),
        (dy, height - from.y),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            t_enter = t_enter.max(t);
        } else {
            t_exit = t_exit.min(t);
        }
    }

    if t_enter > t_exit {
        return None;
    }
    Some(Point::new(from.x + t_enter * dx, from.y + t_enter * dy))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
    }

    #[test]
    fn round_trip_recovers_point() {
        let transforms = [
            Matrix::new(2.5, 0.0, 0.0, 2.5, -120.0, 37.5),
            Matrix::new(0.3, 0.1, -0.2, 0.7, 10.0, 20.0),
            Matrix::new(-1.0, 0.0, 0.0, 1.0, 640.0, 0.0),
        ];
        let points = [
            Point::new(0.0, 0.0),
            Point::new(123.4, 567.8),
            Point::new(-50.0, 999.0),
        ];
        for matrix in transforms {
            let transform = ViewTransform::new(matrix).unwrap();
            for p in points {
                let back = transform.screen_to_image(transform.image_to_screen(p));
                assert!(approx(back, p), "{back:?} != {p:?}");
            }
        }
    }

    #[test]
    fn singular_matrix_is_rejected_and_previous_kept() {
        let mut transform = ViewTransform::scale_translate(2.0, 10.0, 10.0).unwrap();
        let before = transform;
        let singular = Matrix::new(1.0, 2.0, 2.0, 4.0, 0.0, 0.0);
        assert!(matches!(
            transform.set(singular),
            Err(EngineError::NonInvertibleTransform)
        ));
        assert_eq!(transform, before);
        assert_eq!(transform.scale(), 2.0);
    }

    #[test]
    fn non_finite_matrix_is_rejected() {
        let mut transform = ViewTransform::default();
        assert!(
            transform
                .set(Matrix::new(f64::NAN, 0.0, 0.0, 1.0, 0.0, 0.0))
                .is_err()
        );
        assert_eq!(transform, ViewTransform::default());
    }

    #[test]
    fn screen_to_image_undoes_zoom_and_pan() {
        let transform = ViewTransform::scale_translate(2.0, 100.0, 50.0).unwrap();
        let image = transform.screen_to_image(Point::new(300.0, 250.0));
        assert!(approx(image, Point::new(100.0, 100.0)));
    }

    #[test]
    fn normalize_and_bounds() {
        let n = ViewTransform::normalize(Point::new(50.0, 200.0), 100, 100);
        assert!(!ViewTransform::is_inside_normalized(n));
        let n = ViewTransform::normalize(Point::new(100.0, 0.0), 100, 100);
        assert!(ViewTransform::is_inside_normalized(n));
    }

    #[test]
    fn clip_entry_finds_boundary_crossing() {
        let entry = clip_entry(Point::new(-10.0, 50.0), Point::new(10.0, 50.0), 100.0, 100.0);
        assert!(approx(entry.unwrap(), Point::new(0.0, 50.0)));

        let inside = clip_entry(Point::new(5.0, 5.0), Point::new(6.0, 6.0), 100.0, 100.0);
        assert!(approx(inside.unwrap(), Point::new(5.0, 5.0)));

        assert!(clip_entry(Point::new(-10.0, -10.0), Point::new(-5.0, 200.0), 100.0, 100.0).is_none());
    }
}
