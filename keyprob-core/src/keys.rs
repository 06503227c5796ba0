use serde::{Deserialize, Serialize};

/// Symbolic name of the space bar.
pub const SPACE_KEY: &str = "space";

/// Standard single-character keyboard set (US layout, unshifted and shifted).
pub const DEFAULT_KEY_NAMES: &[&str] = &[
	SPACE_KEY,
	"q", "w", "e", "r", "t", "y", "u", "i", "o", "p", "[", "]", "\\",
	"a", "s", "d", "f", "g", "h", "j", "k", "l", ";", "'",
	"z", "x", "c", "v", "b", "n", "m", ",", ".", "/",
	"1", "2", "3", "4", "5", "6", "7", "8", "9", "0", "-", "=", "`",
	"~", "!", "@", "#", "$", "%", "^", "&", "*", "(", ")", "_", "+",
	"{", "}", "|", ":", "\"", "<", ">", "?",
];

/// Returns the default accepted key names as owned strings.
pub fn default_key_names() -> Vec<String> {
	DEFAULT_KEY_NAMES.iter().map(|name| (*name).to_owned()).collect()
}

/// A key press delivered by an external keyboard source.
///
/// `name` is a key identifier such as `"a"`, `";"` or `"space"`. Matching
/// against the accepted alphabet is case-insensitive.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct KeyEvent {
	pub name: String,
}

impl KeyEvent {
	pub fn new(name: impl Into<String>) -> Self {
		Self { name: name.into() }
	}
}

/// Maps a key identifier to the character it types.
///
/// - `"space"` → `' '`
/// - any single-character name → that character
/// - anything else (`"f6"`, `"shift"`, `""`) → `None`
pub fn key_to_char(name: &str) -> Option<char> {
	if name == SPACE_KEY {
		return Some(' ');
	}
	let mut chars = name.chars();
	match (chars.next(), chars.next()) {
		(Some(c), None) => Some(c),
		_ => None,
	}
}
