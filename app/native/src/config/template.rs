//! Configuration template generation.
//!
//! Generates a commented configuration template with all available options.

use std::fs;
use std::path::Path;

/// Generates a configuration template with all options commented out.
#[must_use]
pub fn generate_config_template() -> String {
    r#"// Orientation Lock Configuration File
// ===================================
// This file uses JSONC format (JSON with comments).
// All options below are commented out and show their default values.
// Uncomment and modify the options you want to configure.

{
  // Lock applied when the controller is created. Match this to the
  // orientation declared in the application's platform manifest.
  // One of: "unlocked", "portrait", "portraitUpsideDown",
  //         "landscapeLeft", "landscapeRight"
  // "initialLock": "unlocked",

  // Subscribe to the orientation sensor as soon as the controller exists.
  // "trackOnStart": false,

  // Degrees a rotation reading must travel into a new orientation band
  // before the tracker switches to it. 0 disables filtering (max 44).
  // "angleHysteresis": 0
}
"#
    .to_string()
}

/// Writes the configuration template to `path`, creating parent directories.
///
/// # Errors
///
/// Returns an error if the directories or the file cannot be written.
pub fn create_config_file(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(path, generate_config_template())
}
