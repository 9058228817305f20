/// Ordered keyword → glyph lookup for weather descriptions.
///
/// The table also owns the language the provider is asked to answer in:
/// the keywords only match descriptions written in that language.
#[derive(Debug)]
pub struct IconTable {
    pub lang: &'static str,
    entries: &'static [(&'static str, &'static str)],
    fallback: &'static str,
}

/// Russian keywords, matched against `lang=ru` descriptions.
pub static RUSSIAN: IconTable = IconTable {
    lang: "ru",
    entries: &[
        ("ясно", "☀️"),
        ("облачно", "☁️"),
        ("пасмурно", "☁️"),
        ("дождь", "🌧️"),
        ("ливень", "⛈️"),
        ("гроза", "⛈️"),
        ("снег", "❄️"),
        ("туман", "🌫️"),
        ("ветер", "💨"),
    ],
    fallback: "🌤️",
};

impl IconTable {
    /// First keyword contained in the lowercased description wins.
    pub fn icon_for(&self, description: &str) -> &'static str {
        let lower = description.to_lowercase();
        self.entries
            .iter()
            .find(|(keyword, _)| lower.contains(keyword))
            .map(|(_, icon)| *icon)
            .unwrap_or(self.fallback)
    }

    pub fn fallback(&self) -> &'static str {
        self.fallback
    }
}
