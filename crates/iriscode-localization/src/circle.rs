use serde::{Deserialize, Serialize};

/// A circle with integer center and radius, in pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Circle {
    /// Center `(x, y)`.
    pub center: (u32, u32),
    /// Radius in pixels.
    pub radius: u32,
}

impl Circle {
    /// Create a circle from its center and radius.
    pub fn new(x: u32, y: u32, radius: u32) -> Self {
        Self {
            center: (x, y),
            radius,
        }
    }

    /// Center as floating point coordinates.
    pub fn center_f64(&self) -> (f64, f64) {
        (self.center.0 as f64, self.center.1 as f64)
    }
}

/// The pupil and iris boundaries of an eye.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircleSet {
    /// Boundary between pupil and iris.
    pub pupil: Circle,
    /// Boundary between iris and sclera.
    pub iris: Circle,
}

impl CircleSet {
    /// The circles in `[pupil, iris]` order.
    pub fn to_array(&self) -> [Circle; 2] {
        [self.pupil, self.iris]
    }
}

/// How a boundary circle was obtained.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CircleSource {
    /// Averaged from circle search candidates.
    Hough,
    /// Derived from the coarse pupil estimate, no candidate qualified.
    Fallback,
}

/// A boundary circle together with its provenance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircleFit {
    /// The fitted circle.
    pub circle: Circle,
    /// How it was obtained.
    pub source: CircleSource,
}

/// Coarse pupil center and radius, estimated from the dark blob before the
/// circle search.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PupilEstimate {
    /// Center `(x, y)` in image coordinates.
    pub center: (u32, u32),
    /// Average of the left and right dark run lengths along the center row.
    pub radius: u32,
}

impl PupilEstimate {
    /// Center as floating point coordinates.
    pub fn center_f64(&self) -> (f64, f64) {
        (self.center.0 as f64, self.center.1 as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_set_json() -> Result<(), serde_json::Error> {
        let circles = CircleSet {
            pupil: Circle::new(160, 140, 40),
            iris: Circle::new(161, 140, 100),
        };
        assert_eq!(circles.to_array()[1].radius, 100);

        let json = serde_json::to_string(&circles)?;
        assert_eq!(
            json,
            r#"{"pupil":{"center":[160,140],"radius":40},"iris":{"center":[161,140],"radius":100}}"#
        );
        assert_eq!(serde_json::from_str::<CircleSet>(&json)?, circles);

        assert_eq!(serde_json::to_string(&CircleSource::Fallback)?, r#""fallback""#);
        Ok(())
    }
}
