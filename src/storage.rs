//! Output layout helpers for sampled examples on disk.

use std::path::{Path, PathBuf};

use crate::models::DocumentPath;

/// Suffix appended to extension directories that would otherwise use a
/// reserved device name.
pub const RESERVED_NAME_SUFFIX: &str = "_ext";

/// Device names Windows refuses as file or directory names, with or without
/// an extension.
const RESERVED_NAMES: &[&str] = &[
    "con", "prn", "aux", "nul", "com1", "com2", "com3", "com4", "com5", "com6", "com7", "com8",
    "com9", "lpt1", "lpt2", "lpt3", "lpt4", "lpt5", "lpt6", "lpt7", "lpt8", "lpt9",
];

/// Check whether a name collides with a reserved device name.
pub fn is_reserved_name(name: &str) -> bool {
    let stem = name.split('.').next().unwrap_or(name);
    RESERVED_NAMES
        .iter()
        .any(|reserved| stem.eq_ignore_ascii_case(reserved))
}

/// Directory name used for an extension bucket.
///
/// `con` becomes `con_ext`; everything else is used as is.
pub fn extension_dir_name(extension: &str) -> String {
    if is_reserved_name(extension) {
        format!("{}{}", extension, RESERVED_NAME_SUFFIX)
    } else {
        extension.to_string()
    }
}

/// Construct the output directory for an extension bucket.
///
/// `{output_root}/{extension}`
pub fn extension_dir(output_root: &Path, extension: &str) -> PathBuf {
    output_root.join(extension_dir_name(extension))
}

/// Construct the destination of a copied example.
///
/// `{extension_dir}/{collection}_{id}_{filename}`
pub fn example_destination(extension_dir: &Path, path: &DocumentPath) -> PathBuf {
    extension_dir.join(path.flattened())
}

/// Destination for the `attempt`-th example claiming the same flattened name.
///
/// The first attempt is [`example_destination`]; later ones insert `_{attempt}`
/// before the file extension (`a_1_1.tif`, `a_1_1_2.tif`, ...).
pub fn numbered_destination(extension_dir: &Path, path: &DocumentPath, attempt: usize) -> PathBuf {
    if attempt <= 1 {
        return example_destination(extension_dir, path);
    }

    let name = path.flattened();
    let numbered = match name.rfind('.') {
        Some(dot) if dot > 0 => format!("{}_{}{}", &name[..dot], attempt, &name[dot..]),
        _ => format!("{}_{}", name, attempt),
    };
    extension_dir.join(numbered)
}
