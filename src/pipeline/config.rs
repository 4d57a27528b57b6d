use serde::{Deserialize, Serialize};

use crate::clash::StatusFilter;
use crate::error::{ConfigError, SetupError};
use crate::geometry::Color;
use crate::host::HostCapabilities;
use crate::operations::camera::{
    EyeSource, FrameTarget, FramingMode, LookAtFraming, OrbitEye, ViewDistance,
};
use crate::operations::section::PaddingPolicy;

/// Default prefix of output folder names.
pub const DEFAULT_FOLDER_PREFIX: &str = "Clash VP";

/// How the rest of the model is treated while a clash is captured.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum IsolationMode {
    /// Leave every other item as it is.
    #[default]
    None,
    /// Hide every item not involved in the clash.
    HideOthers,
    /// Override every other item with a translucent template color.
    FadeTemplate {
        #[serde(default = "faded")]
        color: Color,
    },
}

fn faded() -> Color {
    Color::FADED
}

/// Reference point for a single horizontal section plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaneAnchor {
    /// Center of the first clashing item, or of the combined bounds when
    /// that item has no geometry.
    #[default]
    FirstItemCenter,
    /// Center of the combined bounds.
    BoundsCenter,
}

/// Section cutaway applied around each clash.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SectionMode {
    None,
    Box(PaddingPolicy),
    SinglePlane {
        #[serde(default)]
        anchor: PlaneAnchor,
    },
}

impl Default for SectionMode {
    fn default() -> Self {
        SectionMode::Box(PaddingPolicy::standard())
    }
}

/// Complete description of one viewpoint pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Prefix of the output folder name.
    pub folder_prefix: String,
    pub isolation: IsolationMode,
    pub section: SectionMode,
    /// Framing strategies in order of preference; the first one the host
    /// supports is used for the whole batch.
    pub framing: Vec<FramingMode>,
    pub frame_target: FrameTarget,
    pub highlight_color: Color,
    /// Filter used when the batch is started through test selection.
    pub status_filter: StatusFilter,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            folder_prefix: DEFAULT_FOLDER_PREFIX.to_string(),
            isolation: IsolationMode::None,
            section: SectionMode::default(),
            framing: vec![
                FramingMode::DelegatedFit,
                FramingMode::ExplicitLookAt(LookAtFraming::default()),
            ],
            frame_target: FrameTarget::CombinedBounds,
            highlight_color: Color::RED,
            status_filter: StatusFilter::All,
        }
    }
}

impl PipelineConfig {
    /// Hide everything but the clash and cut a padded section box around it.
    #[must_use]
    pub fn isolate_and_section() -> Self {
        Self {
            isolation: IsolationMode::HideOthers,
            ..Self::default()
        }
    }

    /// Fade the surrounding model and frame tightly with a computed camera.
    #[must_use]
    pub fn fade_template() -> Self {
        Self {
            isolation: IsolationMode::FadeTemplate {
                color: Color::FADED,
            },
            section: SectionMode::Box(PaddingPolicy::tight()),
            framing: vec![
                FramingMode::ExplicitLookAt(LookAtFraming {
                    eye: EyeSource::Orbit(OrbitEye {
                        distance: ViewDistance::tight(),
                        ..OrbitEye::default()
                    }),
                }),
                FramingMode::DelegatedFit,
            ],
            ..Self::default()
        }
    }

    /// Highlight the clash in its full model context, without sectioning.
    #[must_use]
    pub fn context_highlight() -> Self {
        Self {
            section: SectionMode::None,
            ..Self::default()
        }
    }

    /// Open clashes only, cut by a horizontal plane at the first item.
    #[must_use]
    pub fn status_filtered_plane() -> Self {
        Self {
            section: SectionMode::SinglePlane {
                anchor: PlaneAnchor::FirstItemCenter,
            },
            status_filter: StatusFilter::open(),
            ..Self::default()
        }
    }

    /// Parses and validates a TOML configuration. Missing keys take their
    /// default values.
    ///
    /// # Errors
    ///
    /// Returns an error if the document does not parse or fails validation.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: PipelineConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns an error describing the first invalid setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.folder_prefix.trim().is_empty() {
            return Err(ConfigError::Invalid("folder prefix must not be empty".into()));
        }
        if self.framing.is_empty() {
            return Err(ConfigError::Invalid(
                "at least one framing strategy is required".into(),
            ));
        }
        for mode in &self.framing {
            mode.validate()?;
        }
        if let SectionMode::Box(padding) = &self.section {
            padding.validate()?;
        }
        if !self.highlight_color.is_valid() {
            return Err(ConfigError::Invalid("highlight color out of range".into()));
        }
        if let IsolationMode::FadeTemplate { color } = &self.isolation {
            if !color.is_valid() {
                return Err(ConfigError::Invalid("fade color out of range".into()));
            }
        }
        Ok(())
    }

    /// Checks the configuration against what the host offers and picks the
    /// framing strategy for the batch.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured mode needs a missing capability or
    /// no framing strategy is supported.
    pub fn resolve_for(&self, caps: &HostCapabilities) -> Result<FramingMode, SetupError> {
        if !matches!(self.section, SectionMode::None) && !caps.sectioning {
            return Err(SetupError::UnsupportedCapability("sectioning"));
        }
        if matches!(self.isolation, IsolationMode::HideOthers) && !caps.hiding {
            return Err(SetupError::UnsupportedCapability("hiding"));
        }
        FramingMode::resolve(&self.framing, caps).ok_or(SetupError::NoFramingStrategy)
    }
}
