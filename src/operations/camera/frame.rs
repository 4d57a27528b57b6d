use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::geometry::{Aabb, CameraPose};
use crate::host::{HostCapabilities, HostResult, ViewportHost};

use super::{LookAt, OrbitEye};

/// Which geometry the camera is aimed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameTarget {
    /// The union of both clashing items.
    #[default]
    CombinedBounds,
    /// The first item alone, falling back to the combined bounds when it
    /// has no geometry.
    FirstItem,
}

/// Where the eye of an explicit look-at comes from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum EyeSource {
    /// Synthesized around the target from its size.
    Orbit(OrbitEye),
    /// Keep the host's current camera position and only re-aim.
    Current,
}

impl Default for EyeSource {
    fn default() -> Self {
        EyeSource::Orbit(OrbitEye::default())
    }
}

/// Parameters of the explicit look-at strategy.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LookAtFraming {
    pub eye: EyeSource,
}

/// How the camera is brought onto a clash.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum FramingMode {
    /// Ask the host to zoom to the current selection.
    DelegatedFit,
    /// Compute a look-at pose locally and push it to the host.
    ExplicitLookAt(LookAtFraming),
}

impl FramingMode {
    /// Returns `true` if `caps` provides what this strategy needs.
    #[must_use]
    pub fn is_supported(&self, caps: &HostCapabilities) -> bool {
        match self {
            FramingMode::DelegatedFit => caps.frame_to_selection,
            FramingMode::ExplicitLookAt(_) => caps.camera_control,
        }
    }

    /// Picks the first strategy in `preferences` that `caps` supports.
    #[must_use]
    pub fn resolve(preferences: &[FramingMode], caps: &HostCapabilities) -> Option<FramingMode> {
        preferences.iter().copied().find(|mode| mode.is_supported(caps))
    }

    /// # Errors
    ///
    /// Returns an error if the orbit parameters are invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            FramingMode::ExplicitLookAt(LookAtFraming {
                eye: EyeSource::Orbit(orbit),
            }) => orbit.validate(),
            _ => Ok(()),
        }
    }

    /// Short name used in logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            FramingMode::DelegatedFit => "delegated_fit",
            FramingMode::ExplicitLookAt(_) => "explicit_look_at",
        }
    }
}

/// Result of a framing attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FramingOutcome {
    /// The host framed the selection itself.
    Delegated,
    /// A pose was computed and applied.
    Posed(CameraPose),
    /// Eye and target coincided; the camera was left untouched.
    DegenerateView,
}

/// Applies a framing strategy to a target box.
pub struct Framer {
    mode: FramingMode,
    target: Aabb,
}

impl Framer {
    /// Creates a new `Framer`. `target` must not be empty for the explicit
    /// strategy.
    #[must_use]
    pub fn new(mode: FramingMode, target: Aabb) -> Self {
        Self { mode, target }
    }

    /// Executes the framing against `host`.
    ///
    /// The delegated strategy relies on the host's current selection.
    ///
    /// # Errors
    ///
    /// Returns an error if a host call fails.
    pub fn execute(&self, host: &mut dyn ViewportHost) -> HostResult<FramingOutcome> {
        let FramingMode::ExplicitLookAt(look_at) = self.mode else {
            host.frame_to_selection()?;
            return Ok(FramingOutcome::Delegated);
        };

        let target = self.target.center();
        let eye = match look_at.eye {
            EyeSource::Orbit(orbit) => orbit.execute(&self.target),
            EyeSource::Current => host.current_camera_pose()?.position,
        };
        match LookAt::new(eye, target).execute() {
            Ok(pose) => {
                host.set_camera_pose(&pose)?;
                Ok(FramingOutcome::Posed(pose))
            }
            Err(error) => {
                tracing::warn!(%error, "Cannot build look-at pose, leaving camera unchanged");
                Ok(FramingOutcome::DegenerateView)
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::host::memory::{HostOp, ModelDocument};
    use crate::math::Point3;
    use approx::assert_relative_eq;

    fn unit_box_at(x: f64) -> Aabb {
        Aabb::new(Point3::new(x, 0.0, 0.0), Point3::new(x + 1.0, 1.0, 1.0))
    }

    #[test]
    fn resolve_picks_first_supported() {
        let prefs = [
            FramingMode::DelegatedFit,
            FramingMode::ExplicitLookAt(LookAtFraming::default()),
        ];
        let all = HostCapabilities::all();
        assert_eq!(FramingMode::resolve(&prefs, &all), Some(FramingMode::DelegatedFit));

        let no_fit = HostCapabilities {
            frame_to_selection: false,
            ..all
        };
        assert!(matches!(
            FramingMode::resolve(&prefs, &no_fit),
            Some(FramingMode::ExplicitLookAt(_))
        ));

        let nothing = HostCapabilities {
            frame_to_selection: false,
            camera_control: false,
            ..all
        };
        assert_eq!(FramingMode::resolve(&prefs, &nothing), None);
    }

    #[test]
    fn explicit_orbit_sets_pose() {
        let mut doc = ModelDocument::new();
        let target = unit_box_at(4.0);
        let outcome = Framer::new(FramingMode::ExplicitLookAt(LookAtFraming::default()), target)
            .execute(&mut doc)
            .unwrap();

        let FramingOutcome::Posed(pose) = outcome else {
            panic!("expected a pose, got {outcome:?}");
        };
        assert_eq!(doc.camera(), &pose);
        assert_relative_eq!((pose.position - target.center()).norm(), 10.0, epsilon = 1e-9);
        assert!(pose.is_orthonormal(1e-9));
    }

    #[test]
    fn current_eye_on_target_is_degenerate() {
        let mut doc = ModelDocument::new();
        // Default camera sits at the origin; aim at a point box there.
        let target = Aabb::from_point(Point3::origin());
        let mode = FramingMode::ExplicitLookAt(LookAtFraming {
            eye: EyeSource::Current,
        });
        let outcome = Framer::new(mode, target).execute(&mut doc).unwrap();
        assert_eq!(outcome, FramingOutcome::DegenerateView);
        assert_eq!(doc.calls().count(HostOp::SetCameraPose), 0);
    }

    #[test]
    fn delegated_calls_host() {
        let mut doc = ModelDocument::new();
        let item = doc.add_item("a", Some(unit_box_at(0.0)));
        doc.set_selection(&[item]).unwrap();
        let outcome = Framer::new(FramingMode::DelegatedFit, unit_box_at(0.0))
            .execute(&mut doc)
            .unwrap();
        assert_eq!(outcome, FramingOutcome::Delegated);
        assert_eq!(doc.calls().count(HostOp::FrameToSelection), 1);
    }
}
