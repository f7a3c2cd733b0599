/// Maps package language name (e.g. `english`) to locale code.
/// Returns None for languages the platform has no locale for.
pub fn locale_from_language(language: &str) -> Option<&'static str> {
    let locale = match language {
        "ukrainian" => "uk",
        "russian" => "ru",
        "english" => "en",
        "hungarian" => "hu",
        "azerbaijani" => "az",
        "french" => "fr",
        "arabic" => "ar",
        "uzbek" => "uz",
        "kazakh" => "kk",
        "spanish" => "es",
        "polish" => "pl",
        "german" => "de",
        "turkish" => "tr",
        _ => return None,
    };
    Some(locale)
}
