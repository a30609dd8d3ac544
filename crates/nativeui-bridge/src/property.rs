//! The string-keyed property surface a screen exposes to the host runtime.
//!
//! The host's generic property dispatch addresses screen state by name. The
//! screen understands three names:
//!
//! | Name                | Access     | Effect                              |
//! |---------------------|------------|-------------------------------------|
//! | `title`             | write-only | sets the screen title               |
//! | `removeoptionsmenu` | write-only | removes the command bar (any value) |
//! | `isShown`           | read-only  | `"true"` or `"false"`               |

use std::fmt;
use std::str::FromStr;

use nativeui_bridge_core::BridgeError;

/// Name of the title property.
pub const TITLE: &str = "title";

/// Name of the remove-options-menu property.
pub const REMOVE_OPTIONS_MENU: &str = "removeoptionsmenu";

/// Name of the is-shown property.
pub const IS_SHOWN: &str = "isShown";

/// Whether a property is read or written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyAccess {
    /// Only `set_property` is accepted.
    WriteOnly,
    /// Only `get_property` is accepted.
    ReadOnly,
}

/// A property name the screen understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScreenProperty {
    /// `title`
    Title,
    /// `removeoptionsmenu`
    RemoveOptionsMenu,
    /// `isShown`
    IsShown,
}

impl ScreenProperty {
    /// The wire name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Title => TITLE,
            Self::RemoveOptionsMenu => REMOVE_OPTIONS_MENU,
            Self::IsShown => IS_SHOWN,
        }
    }

    /// How the property may be accessed.
    pub fn access(self) -> PropertyAccess {
        match self {
            Self::Title | Self::RemoveOptionsMenu => PropertyAccess::WriteOnly,
            Self::IsShown => PropertyAccess::ReadOnly,
        }
    }

    /// Fails with `PropertyNotReadable` unless the property can be read.
    pub fn check_readable(self) -> Result<Self, BridgeError> {
        match self.access() {
            PropertyAccess::ReadOnly => Ok(self),
            PropertyAccess::WriteOnly => Err(BridgeError::PropertyNotReadable(self.name().into())),
        }
    }

    /// Fails with `PropertyNotWritable` unless the property can be written.
    pub fn check_writable(self) -> Result<Self, BridgeError> {
        match self.access() {
            PropertyAccess::WriteOnly => Ok(self),
            PropertyAccess::ReadOnly => Err(BridgeError::PropertyNotWritable(self.name().into())),
        }
    }
}

impl FromStr for ScreenProperty {
    type Err = BridgeError;

    /// Names match exactly, case included.
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            TITLE => Ok(Self::Title),
            REMOVE_OPTIONS_MENU => Ok(Self::RemoveOptionsMenu),
            IS_SHOWN => Ok(Self::IsShown),
            other => Err(BridgeError::UnknownProperty(other.to_string())),
        }
    }
}

impl fmt::Display for ScreenProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Render a boolean the way the host expects property values.
pub fn bool_value(value: bool) -> String {
    let text = if value { "true" } else { "false" };
    text.to_string()
}
