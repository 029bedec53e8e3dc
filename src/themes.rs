use serde::Serialize;

/// Display theme. Color tokens live in the page stylesheet; nothing in the
/// journal branches on the theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Theme {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

pub const THEMES: [Theme; 4] = [
    Theme {
        id: "default",
        name: "Default",
        description: "Clean indigo on white",
    },
    Theme {
        id: "dark",
        name: "Dark",
        description: "Low-light slate palette",
    },
    Theme {
        id: "pastel",
        name: "Pastel",
        description: "Soft pinks and lavenders",
    },
    Theme {
        id: "nature",
        name: "Nature",
        description: "Calm greens and earth tones",
    },
];

/// Unknown ids fall back to the first theme.
pub fn theme_by_id(id: &str) -> &'static Theme {
    THEMES
        .iter()
        .find(|theme| theme.id == id.trim())
        .unwrap_or(&THEMES[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_id_and_fallback() {
        assert_eq!(theme_by_id("dark").name, "Dark");
        assert_eq!(theme_by_id(" nature ").id, "nature");
        assert_eq!(theme_by_id("neon").id, "default");
        assert_eq!(theme_by_id("").id, "default");
    }
}
