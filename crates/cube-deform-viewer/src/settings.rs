//! Startup configuration.
//!
//! Defaults reproduce the classic demo scene; a couple of command-line
//! switches pick the geometry strategy and the corner convention.

use bevy::prelude::*;
use cube_deform::{CornerConvention, DashPattern, DeformError, GeometryStrategy};
use thiserror::Error;

/// Errors from command-line parsing.
#[derive(Debug, Error, PartialEq)]
pub enum SettingsError {
    /// An argument this viewer does not understand.
    #[error("unknown option `{0}` (expected --geometry=<triangulated|indexed> or --corners=<symmetric|unit>)")]
    UnknownOption(String),

    /// An option given without its value.
    #[error("option `{0}` needs a value")]
    MissingValue(String),

    /// A value rejected by the deformation library.
    #[error(transparent)]
    Invalid(#[from] DeformError),
}

/// Scene configuration, fixed for the lifetime of the app.
#[derive(Resource, Debug, Clone)]
pub struct ViewerSettings {
    /// Tessellation of the solid cube.
    pub geometry: GeometryStrategy,
    /// Resting corners of the control points.
    pub corners: CornerConvention,
    /// Hidden-edge dash pattern in world units.
    pub dash: DashPattern,
    /// Initial camera position; the camera looks at the origin.
    pub camera_eye: Vec3,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    /// Near clip distance.
    pub near: f32,
    /// Far clip distance.
    pub far: f32,
    /// Window background.
    pub clear_color: Color,
    /// Edge length of a control-point handle.
    pub handle_size: f32,
    /// Handle color, translucent.
    pub handle_color: Color,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            geometry: GeometryStrategy::default(),
            corners: CornerConvention::default(),
            dash: DashPattern::default(),
            camera_eye: Vec3::new(3.0, 3.0, 4.0),
            fov_degrees: 50.0,
            near: 0.01,
            far: 30_000.0,
            clear_color: Color::WHITE,
            handle_size: 0.1,
            handle_color: Color::srgba(0.0, 1.0, 1.0, 0.5),
        }
    }
}

impl ViewerSettings {
    /// Applies command-line arguments (without the program name) to the
    /// defaults.
    ///
    /// Accepts `--geometry=<name>` / `--geometry <name>` and
    /// `--corners=<name>` / `--corners <name>`.
    pub fn from_args<I>(args: I) -> Result<Self, SettingsError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut settings = Self::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            let (name, inline) = match arg.split_once('=') {
                Some((name, value)) => (name.to_string(), Some(value.to_string())),
                None => (arg.clone(), None),
            };
            match name.as_str() {
                "--geometry" | "--corners" => {
                    let value = inline
                        .or_else(|| args.next())
                        .ok_or_else(|| SettingsError::MissingValue(name.clone()))?;
                    if name == "--geometry" {
                        settings.geometry = value.parse()?;
                    } else {
                        settings.corners = value.parse()?;
                    }
                }
                _ => return Err(SettingsError::UnknownOption(arg)),
            }
        }

        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<ViewerSettings, SettingsError> {
        ViewerSettings::from_args(args.iter().map(ToString::to_string))
    }

    #[test]
    fn test_defaults() {
        let settings = parse(&[]).unwrap();
        assert_eq!(settings.geometry, GeometryStrategy::Triangulated);
        assert_eq!(settings.corners, CornerConvention::Symmetric);
        assert_eq!(settings.camera_eye, Vec3::new(3.0, 3.0, 4.0));
    }

    #[test]
    fn test_inline_and_separate_values() {
        let settings = parse(&["--geometry=indexed", "--corners", "unit"]).unwrap();
        assert_eq!(settings.geometry, GeometryStrategy::Indexed);
        assert_eq!(settings.corners, CornerConvention::Unit);
    }

    #[test]
    fn test_errors() {
        assert_eq!(
            parse(&["--wireframe"]).unwrap_err(),
            SettingsError::UnknownOption("--wireframe".to_string())
        );
        assert_eq!(
            parse(&["--corners"]).unwrap_err(),
            SettingsError::MissingValue("--corners".to_string())
        );
        assert!(matches!(
            parse(&["--geometry=quads"]),
            Err(SettingsError::Invalid(DeformError::UnknownGeometry(_)))
        ));
    }
}
