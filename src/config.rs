// SPDX-License-Identifier: GPL-3.0-or-later
// src/config.rs
//
// Global configuration for the application with cosmic-config support.

use cosmic::cosmic_config::{self, CosmicConfigEntry, cosmic_config_derive::CosmicConfigEntry};
use std::path::PathBuf;

use crate::constant::DEFAULT_ASPECT_RATIO;
use crate::domain::product::CancelPolicy;

/// Global configuration for the application.
#[derive(Debug, Clone, CosmicConfigEntry, PartialEq)]
#[version = 1]
pub struct AppConfig {
    /// Directory the file picker opens in. Follows the last picked file.
    pub default_image_dir: Option<PathBuf>,
    /// Aspect ratio (width / height) enforced by the crop overlay.
    pub crop_aspect_ratio: f32,
    /// Whether the crop overlay draws a rule-of-thirds grid.
    pub crop_show_grid: bool,
    /// Whether cancelling the form also clears the upload previews.
    pub clear_uploads_on_cancel: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_image_dir: dirs::picture_dir().or_else(dirs::home_dir),
            crop_aspect_ratio: DEFAULT_ASPECT_RATIO,
            crop_show_grid: true,
            clear_uploads_on_cancel: false,
        }
    }
}

impl AppConfig {
    /// Aspect ratio to hand to the crop overlay, ignoring nonsensical values.
    pub fn aspect_ratio(&self) -> Option<f32> {
        (self.crop_aspect_ratio.is_finite() && self.crop_aspect_ratio > 0.0)
            .then_some(self.crop_aspect_ratio)
    }

    pub fn cancel_policy(&self) -> CancelPolicy {
        if self.clear_uploads_on_cancel {
            CancelPolicy::ClearUploads
        } else {
            CancelPolicy::KeepUploads
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_keeps_uploads_and_uses_four_by_three() {
        let config = AppConfig::default();
        assert_eq!(config.cancel_policy(), CancelPolicy::KeepUploads);
        assert_eq!(config.aspect_ratio(), Some(4.0 / 3.0));
    }

    #[test]
    fn invalid_aspect_ratio_disables_constraint() {
        let config = AppConfig {
            crop_aspect_ratio: 0.0,
            ..AppConfig::default()
        };
        assert_eq!(config.aspect_ratio(), None);
    }

    #[test]
    fn clear_flag_selects_clearing_policy() {
        let config = AppConfig {
            clear_uploads_on_cancel: true,
            ..AppConfig::default()
        };
        assert_eq!(config.cancel_policy(), CancelPolicy::ClearUploads);
    }
}
