use colored::Color;

pub const PRIMARY: Color = Color::TrueColor { r: 102, g: 217, b: 239 };
pub const ACCENT: Color = Color::TrueColor { r: 249, g: 38, b: 114 };
pub const SEPARATOR: Color = Color::TrueColor { r: 117, g: 113, b: 94 };
pub const TEXT_DEFAULT: Color = Color::TrueColor { r: 230, g: 230, b: 230 };

pub const IPV4_ADDR: Color = Color::TrueColor { r: 166, g: 226, b: 46 };
pub const IPV4_PREFIX: Color = Color::TrueColor { r: 174, g: 129, b: 255 };

pub const ROUTER: Color = Color::TrueColor { r: 253, g: 151, b: 31 };
pub const SWITCH: Color = Color::TrueColor { r: 102, g: 217, b: 239 };
pub const UNKNOWN: Color = Color::BrightBlack;

pub const SEVERITY_ERROR: Color = Color::Red;
pub const SEVERITY_WARNING: Color = Color::Yellow;
pub const SEVERITY_BEST_PRACTICE: Color = Color::Cyan;
