//! Process exit codes shared by every CLI tool in the workspace.

/// Invalid or missing layer/tool configuration.
pub const ERROR_CONFIG: i32 = 3;
/// Invalid or missing command-line parameters.
pub const ERROR_PARAMS: i32 = 4;
/// `layersettings` names an image layer but its settings are invalid.
pub const ERROR_IMAGELAYERSETTINGS: i32 = 5;
/// `layersettings` names an elevation layer but its settings are invalid.
pub const ERROR_ELVLAYERSETTINGS: i32 = 6;
/// Allocation failure / out of memory.
pub const ERROR_NOMEMORY: i32 = 101;
/// Tile-store or input file could not be read or written.
pub const ERROR_FILE: i32 = 102;
/// A GDAL-backed raster/vector source could not be opened or read.
pub const ERROR_GDAL: i32 = 103;
/// Elevation data failed to load for a requested tile or extent.
pub const ERROR_LOADELEVATION: i32 = 104;
/// The requested area lies outside the layer's configured extent.
pub const ERROR_AREA: i32 = 105;
